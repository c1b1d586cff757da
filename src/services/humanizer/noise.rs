// Natural Noise
// Small imperfections of spoken thought: self-corrections, emphatic
// repetitions and "Now, " bridges after a past-tense sentence.
// At most one per sentence; skipped entirely at low intensity.

use super::rules::{compile_rewrite, NoiseRules, RewriteSpec, RuleTables};
use super::{pick, roll};
use crate::models::{HumanizeError, Intensity};
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{lower_first, map_paragraphs};
use rand::RngCore;
use regex::{Captures, Regex};

const SELF_CORRECTION: RewriteSpec = RewriteSpec {
    name: "self_correction",
    pattern: r"(?i)\b(I) (think|believe|consider)\b",
    rewrite: self_correct,
};

const REPETITION: RewriteSpec = RewriteSpec {
    name: "repetition",
    pattern: r"(?i)\b(very|quite|really)\b",
    rewrite: repeat_intensifier,
};

const PRESENT_TENSE: &str = r"(?i)\b(is|are|does|do|says|say|makes|make)\b";
const PAST_TENSE: &str = r"(?i)\b(was|were|did|said|made|had)\b";

pub(crate) fn compile_noise_rules() -> Result<NoiseRules, HumanizeError> {
    let tense = |pattern: &str| {
        Regex::new(pattern).map_err(|e| HumanizeError::InvalidRules(format!("noise regex: {}", e)))
    };
    Ok(NoiseRules {
        self_correction: compile_rewrite(&SELF_CORRECTION)?,
        repetition: compile_rewrite(&REPETITION)?,
        present_tense: tense(PRESENT_TENSE)?,
        past_tense: tense(PAST_TENSE)?,
    })
}

fn self_correct(caps: &Captures) -> String {
    match caps[2].to_lowercase().as_str() {
        "think" => "I believe... no, I think".to_string(),
        "believe" => "I think... or rather, I believe".to_string(),
        _ => "I'd say... or better, I consider".to_string(),
    }
}

fn repeat_intensifier(caps: &Captures) -> String {
    format!("{}, {}", &caps[1], caps[1].to_lowercase())
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum NoiseKind {
    SelfCorrection,
    Repetition,
    TenseShift,
}

pub fn add_natural_noise(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().noise;
    if factor <= 0.0 {
        return text.to_string();
    }
    map_paragraphs(text, |paragraph| noise_paragraph(&rules.noise, paragraph, factor, rng))
}

fn noise_paragraph(noise: &NoiseRules, paragraph: &str, factor: f64, rng: &mut dyn RngCore) -> String {
    let sentences = split_sentences(paragraph);
    let mut out = Vec::with_capacity(sentences.len());

    for (i, sentence) in sentences.iter().enumerate() {
        if !roll(rng, factor) {
            out.push(sentence.clone());
            continue;
        }

        let mut eligible = Vec::with_capacity(3);
        if noise.self_correction.matcher.is_match(sentence) {
            eligible.push(NoiseKind::SelfCorrection);
        }
        if noise.repetition.matcher.is_match(sentence) {
            eligible.push(NoiseKind::Repetition);
        }
        if i > 0 && noise.present_tense.is_match(sentence) && noise.past_tense.is_match(&sentences[i - 1]) {
            eligible.push(NoiseKind::TenseShift);
        }

        let noisy = match pick(rng, &eligible) {
            Some(NoiseKind::SelfCorrection) => noise.self_correction.apply_first(sentence),
            Some(NoiseKind::Repetition) => noise.repetition.apply_first(sentence),
            Some(NoiseKind::TenseShift) => format!("Now, {}", lower_first(sentence)),
            None => sentence.clone(),
        };
        out.push(noisy);
    }

    out.join(" ")
}
