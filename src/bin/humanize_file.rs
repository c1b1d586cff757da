use anyhow::{bail, Context, Result};
use humanizer_lib::services::sentence_segmenter::segment_sentences;
use humanizer_lib::services::text_processor::normalize_punctuation;
use humanizer_lib::{init_logging, ConfigStore, HumanizationResult, Humanizer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn parse_number<T: std::str::FromStr>(args: &[String], key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_arg_value(args, key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  humanize_file <path.txt> [--score <0-100>] [--seed <n>] [--rules <rules.json>] [--config <dir>] [--out <json_path>] [--save]\n\nNotes:\n  - --save stores the given --score/--seed/--rules as the new defaults.\n  - Without --score the configured default score is used.\n  - Without --seed (or HUMANIZER_SEED) every run is different."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let store = match parse_arg_value(&args, "--config") {
        Some(dir) => ConfigStore::new(PathBuf::from(dir)),
        None => ConfigStore::new(
            ConfigStore::default_config_dir().context("no config directory on this platform")?,
        ),
    };
    let config = store.load_or_default();
    init_logging(&config.logging);

    let score_arg = parse_number::<f64>(&args, "--score")?;
    let seed_arg = parse_number::<u64>(&args, "--seed")?;
    let rules_arg = parse_arg_value(&args, "--rules");

    let score = score_arg.unwrap_or(config.default_score);
    if !(0.0..=100.0).contains(&score) {
        bail!("score must be within 0..=100, got {}", score);
    }
    let seed = seed_arg.or_else(|| config.effective_seed());
    let rules_path = rules_arg.clone().or_else(|| config.rules_path.clone());

    if has_flag(&args, "--save") {
        store
            .remember_defaults(score_arg, seed_arg, rules_arg.as_deref())
            .with_context(|| format!("failed to save config to {}", store.config_file().display()))?;
        println!("Saved defaults: {}", store.config_file().display());
    }
    let out_path = parse_arg_value(&args, "--out");

    let humanizer = match &rules_path {
        Some(p) => Humanizer::from_rules_file(Path::new(p))
            .with_context(|| format!("failed to load rule tables from {}", p))?,
        None => Humanizer::builtin(),
    };

    let raw = std::fs::read_to_string(&path).with_context(|| format!("read file failed: {}", path))?;
    let text = normalize_punctuation(&raw);
    info!(file = %path, chars = text.chars().count(), "[HUMANIZER] Input loaded");

    let result = match seed {
        Some(seed) => humanizer.humanize_seeded(&text, score, seed)?,
        None => humanizer.humanize(&text, score)?,
    };

    print_report(&path, score, seed, &result);

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            file: &'a str,
            score: f64,
            seed: Option<u64>,
            rules: Option<&'a str>,
            sentences_before: usize,
            sentences_after: usize,
            #[serde(flatten)]
            result: &'a HumanizationResult,
        }

        let out = Output {
            file: &path,
            score,
            seed,
            rules: rules_path.as_deref(),
            sentences_before: segment_sentences(&result.original_text).len(),
            sentences_after: segment_sentences(&result.humanized_text).len(),
            result: &result,
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}

fn print_report(path: &str, score: f64, seed: Option<u64>, result: &HumanizationResult) {
    println!("File: {}", path);
    println!("Score: {:.1}", score);
    println!("Intensity: {}", result.intensity);
    println!(
        "Seed: {}",
        seed.map(|s| s.to_string()).unwrap_or_else(|| "(entropy)".to_string())
    );
    println!();

    println!("Stages:");
    for stage in &result.stages {
        println!("  {:<24} {}", stage.stage, if stage.changed { "changed" } else { "-" });
    }
    println!();

    println!("Changes: {}", result.changes.len());
    for change in &result.changes {
        match change.count {
            Some(n) => println!("  [{}] x{}  {}", change.category.as_str(), n, change.description),
            None => println!("  [{}]  {}", change.category.as_str(), change.description),
        }
    }
    println!();

    println!("Before: {}", preview(&result.original_text, 160));
    println!();
    println!("{}", result.humanized_text);
}
