// Humanizer Module
// Rewriting pipeline organized into one submodule per stage:
// - structure: sentence splitting, merging and clause inversion
// - lexical: formal -> colloquial substitutions and idioms
// - orality: spoken-language markers and digressions
// - personal: first-person openers
// - formality: formal connectives and passive -> active rewrites
// - noise: self-corrections, repetitions, tense bridges
// - enrichment: topic-aware anecdote opener
// - report: change records derived from original vs final text

pub mod intensity;
pub mod rules;
pub mod topics;
pub mod structure;
pub mod lexical;
pub mod orality;
pub mod personal;
pub mod formality;
pub mod noise;
pub mod enrichment;
pub mod report;

pub use intensity::IntensityProfile;
pub use report::report_changes;
pub use rules::{builtin_rules, RuleTables};
pub use topics::detect_topics;

use crate::models::{HumanizationResult, HumanizeError, Intensity, StageTrace};
use crate::services::text_processor::upper_first;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Pipeline stages in their fixed execution order
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    StructuralVariation,
    LexicalSubstitution,
    OralityMarkers,
    PersonalReferences,
    FormalityReduction,
    NaturalNoise,
    ContextualEnrichment,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::StructuralVariation,
        Stage::LexicalSubstitution,
        Stage::OralityMarkers,
        Stage::PersonalReferences,
        Stage::FormalityReduction,
        Stage::NaturalNoise,
        Stage::ContextualEnrichment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::StructuralVariation => "structural_variation",
            Stage::LexicalSubstitution => "lexical_substitution",
            Stage::OralityMarkers => "orality_markers",
            Stage::PersonalReferences => "personal_references",
            Stage::FormalityReduction => "formality_reduction",
            Stage::NaturalNoise => "natural_noise",
            Stage::ContextualEnrichment => "contextual_enrichment",
        }
    }

    /// Run one stage: text x intensity x rng -> text
    pub fn apply(
        self,
        rules: &RuleTables,
        text: &str,
        intensity: Intensity,
        rng: &mut dyn RngCore,
    ) -> String {
        match self {
            Stage::StructuralVariation => structure::vary_structure(rules, text, intensity, rng),
            Stage::LexicalSubstitution => lexical::colloquialize(rules, text, intensity, rng),
            Stage::OralityMarkers => orality::add_orality_markers(rules, text, intensity, rng),
            Stage::PersonalReferences => personal::add_personal_references(rules, text, intensity, rng),
            Stage::FormalityReduction => formality::reduce_formality(rules, text, intensity, rng),
            Stage::NaturalNoise => noise::add_natural_noise(rules, text, intensity, rng),
            Stage::ContextualEnrichment => enrichment::enrich_with_context(rules, text, rng),
        }
    }
}

// ============ Random draws ============

/// True with probability `p`
pub(crate) fn roll(rng: &mut dyn RngCore, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Uniform choice; `None` only for an empty slice
pub(crate) fn pick<'a, T>(rng: &mut dyn RngCore, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = (rng.gen::<f64>() * items.len() as f64) as usize;
    items.get(idx.min(items.len() - 1))
}

// ============ Phrase replacement ============

/// Capitalize the replacement when the text capitalized a lower-case table phrase
fn match_case(found: &str, table_phrase: &str, replacement: &str) -> String {
    let table_lower = table_phrase
        .chars()
        .next()
        .map(|c| c.is_lowercase())
        .unwrap_or(false);
    let found_upper = found
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false);
    if table_lower && found_upper {
        upper_first(replacement)
    } else {
        replacement.to_string()
    }
}

pub(crate) fn replace_all_phrases(
    matcher: &Regex,
    text: &str,
    table_phrase: &str,
    replacement: &str,
) -> String {
    matcher
        .replace_all(text, |caps: &Captures| match_case(&caps[0], table_phrase, replacement))
        .into_owned()
}

pub(crate) fn replace_first_phrase(
    matcher: &Regex,
    text: &str,
    table_phrase: &str,
    replacement: &str,
) -> String {
    matcher
        .replace(text, |caps: &Captures| match_case(&caps[0], table_phrase, replacement))
        .into_owned()
}

// ============ Orchestrator ============

#[derive(Debug, Clone)]
pub struct Humanizer {
    rules: Cow<'static, RuleTables>,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Humanizer {
    /// Humanizer over the built-in tables
    pub fn builtin() -> Self {
        Self {
            rules: Cow::Borrowed(builtin_rules()),
        }
    }

    pub fn with_rules(rules: RuleTables) -> Self {
        Self {
            rules: Cow::Owned(rules),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, HumanizeError> {
        Ok(Self::with_rules(RuleTables::from_json(raw)?))
    }

    pub fn from_rules_file(path: &Path) -> Result<Self, HumanizeError> {
        Ok(Self::with_rules(RuleTables::from_path(path)?))
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    /// Humanize with an entropy-seeded generator
    pub fn humanize(&self, text: &str, machine_score: f64) -> Result<HumanizationResult, HumanizeError> {
        let mut rng = StdRng::from_entropy();
        self.humanize_with_rng(text, machine_score, &mut rng)
    }

    /// Humanize reproducibly: the same seed yields the same output
    pub fn humanize_seeded(
        &self,
        text: &str,
        machine_score: f64,
        seed: u64,
    ) -> Result<HumanizationResult, HumanizeError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.humanize_with_rng(text, machine_score, &mut rng)
    }

    pub fn humanize_with_rng(
        &self,
        text: &str,
        machine_score: f64,
        rng: &mut dyn RngCore,
    ) -> Result<HumanizationResult, HumanizeError> {
        if text.trim().is_empty() {
            return Err(HumanizeError::InvalidInput(
                "text is empty or whitespace-only".to_string(),
            ));
        }

        let intensity = Intensity::from_score(machine_score);
        info!(
            score = machine_score,
            intensity = intensity.as_str(),
            chars = text.chars().count(),
            "[HUMANIZER] Starting pipeline"
        );

        let mut current = text.to_string();
        let mut stages = Vec::with_capacity(Stage::ORDER.len());
        for stage in Stage::ORDER {
            let next = stage.apply(&self.rules, &current, intensity, rng);
            let changed = next != current;
            debug!(
                stage = stage.as_str(),
                changed,
                chars = next.chars().count(),
                "[HUMANIZER] Stage finished"
            );
            stages.push(StageTrace {
                stage: stage.as_str().to_string(),
                changed,
            });
            current = next;
        }

        let changes = report_changes(&self.rules, text, &current);
        info!(
            intensity = intensity.as_str(),
            changes = changes.len(),
            out_chars = current.chars().count(),
            "[HUMANIZER] Pipeline finished"
        );

        Ok(HumanizationResult {
            original_text: text.to_string(),
            humanized_text: current,
            intensity,
            changes,
            stages,
        })
    }
}

/// Humanize `text` given its machine-likeness score in [0, 100]
pub fn humanize(text: &str, machine_score: f64) -> Result<HumanizationResult, HumanizeError> {
    Humanizer::builtin().humanize(text, machine_score)
}

/// Fixed-output generators for driving stages down known branches
#[cfg(test)]
pub(crate) mod test_rng {
    use rand::RngCore;

    pub struct FixedRng(pub u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (i, b) in dest.iter_mut().enumerate() {
                *b = self.0.to_le_bytes()[i % 8];
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// Every draw is 0.0: every probability gate fires, every choice takes the first item
    pub fn always() -> FixedRng {
        FixedRng(0)
    }

    /// Every draw is just below 1.0: no gate fires, every choice takes the last item
    pub fn never() -> FixedRng {
        FixedRng(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::test_rng::{always, never};
    use super::*;
    use crate::models::ChangeCategory;

    const SAMPLE: &str = "Artificial intelligence is transforming the software industry. \
        Additionally, it is imperative that companies adapt. The new algorithm was designed by engineers. \
        I think the results are very good. Consequently, many businesses are investing in digital tools, \
        and the internet is full of examples that show how rapidly this field is growing.\n\n\
        In conclusion, technology is very important. It should be noted that education matters too.";

    #[test]
    fn test_empty_input_rejected() {
        let err = Humanizer::builtin().humanize_seeded("", 90.0, 1).unwrap_err();
        assert!(matches!(err, HumanizeError::InvalidInput(_)));
    }

    #[test]
    fn test_whitespace_input_rejected() {
        let err = humanize(" \n\t ", 50.0).unwrap_err();
        assert!(matches!(err, HumanizeError::InvalidInput(_)));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let humanizer = Humanizer::builtin();
        for score in [30.0, 70.0, 95.0] {
            let a = humanizer.humanize_seeded(SAMPLE, score, 42).unwrap();
            let b = humanizer.humanize_seeded(SAMPLE, score, 42).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_never_firing_rng_still_enriches() {
        let humanizer = Humanizer::builtin();
        let text = "The sky is blue today.\n\nThe grass is green as well.";
        let result = humanizer.humanize_with_rng(text, 95.0, &mut never()).unwrap();
        assert_eq!(
            result.humanized_text,
            "The sky is blue today.\n\nAfter reflecting on this topic for a long time, the grass is green as well."
        );
        let categories: Vec<_> = result.changes.iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![ChangeCategory::ContextualEnrichment]);
    }

    #[test]
    fn test_stage_trace_follows_fixed_order() {
        let result = Humanizer::builtin()
            .humanize_with_rng("One short line.", 10.0, &mut never())
            .unwrap();
        let names: Vec<_> = result.stages.iter().map(|s| s.stage.as_str()).collect();
        let expected: Vec<_> = Stage::ORDER.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, expected);
        assert!(result.stages.last().unwrap().changed);
        assert!(result.stages[..6].iter().all(|s| !s.changed));
    }

    #[test]
    fn test_result_carries_intensity_and_original() {
        let result = Humanizer::builtin().humanize_seeded(SAMPLE, 85.0, 7).unwrap();
        assert_eq!(result.intensity, Intensity::High);
        assert_eq!(result.original_text, SAMPLE);
        assert!(!result.changes.is_empty());
    }

    #[test]
    fn test_output_never_empty_across_seeds() {
        let humanizer = Humanizer::builtin();
        let texts = [SAMPLE, "x", "Año nuevo, vida nueva. ¿Qué tal? Muy bien, gracias!", "no punctuation at all"];
        for text in texts {
            for seed in 0..40 {
                let result = humanizer.humanize_seeded(text, 99.0, seed).unwrap();
                assert!(!result.humanized_text.trim().is_empty());
                assert_ne!(result.humanized_text, text);
            }
        }
    }

    #[test]
    fn test_always_firing_rng_runs_every_stage() {
        let result = Humanizer::builtin()
            .humanize_with_rng(SAMPLE, 95.0, &mut always())
            .unwrap();
        assert!(result.stages.iter().filter(|s| s.changed).count() >= 4);
        assert!(!result
            .changes
            .iter()
            .any(|c| c.category == ChangeCategory::SubtleAdjustments));
    }

    #[test]
    fn test_custom_rules_from_json() {
        let mut value: serde_json::Value = serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/humanizer_rules.json"
        )))
        .unwrap();
        value["generic_anecdotes"] = serde_json::json!(["Funny enough, "]);
        let humanizer = Humanizer::from_json(&value.to_string()).unwrap();
        let result = humanizer
            .humanize_with_rng("Nothing topical here.", 10.0, &mut never())
            .unwrap();
        assert_eq!(result.humanized_text, "Funny enough, nothing topical here.");
    }

    #[test]
    fn test_humanizer_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Humanizer>();
    }

    #[test]
    fn test_pick_and_roll_bounds() {
        let items = [1, 2, 3];
        assert_eq!(pick(&mut always(), &items), Some(&1));
        assert_eq!(pick(&mut never(), &items), Some(&3));
        assert_eq!(pick::<i32>(&mut always(), &[]), None);
        assert!(roll(&mut always(), 0.05));
        assert!(!roll(&mut never(), 0.9));
        assert!(!roll(&mut always(), 0.0));
    }
}
