// Change Reporter
// Change records derived purely from the original and final text, in
// stage order.

use super::rules::RuleTables;
use crate::models::{ChangeCategory, ChangeRecord};
use crate::services::sentence_segmenter::split_sentences;
use regex::Regex;

const ELLIPSIS: &str = "...";

pub fn report_changes(rules: &RuleTables, original: &str, humanized: &str) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    if split_sentences(original).len() != split_sentences(humanized).len() {
        changes.push(ChangeRecord::flag(ChangeCategory::StructuralVariation));
    }

    let colloquial = rules
        .colloquial_markers
        .iter()
        .filter(|m| m.is_match(humanized) && !m.is_match(original))
        .count();
    push_counted(&mut changes, ChangeCategory::ColloquialExpressions, colloquial);

    let markers = rules.orality_markers.iter().map(|m| &m.matcher);
    let orality = increase(markers, original, humanized);
    push_counted(&mut changes, ChangeCategory::OralityMarkers, orality);

    if rules.personal_triggers.iter().any(|t| t.is_match(humanized)) {
        changes.push(ChangeRecord::flag(ChangeCategory::PersonalReferences));
    }

    // Formal phrases only ever go down; count how many went away
    let formal = increase(rules.formality.iter().map(|r| &r.matcher), humanized, original);
    push_counted(&mut changes, ChangeCategory::FormalityReduced, formal);

    if humanized.contains(ELLIPSIS) && !original.contains(ELLIPSIS) {
        changes.push(ChangeRecord::flag(ChangeCategory::NaturalNoise));
    }

    if rules
        .known_openers
        .iter()
        .any(|o| humanized.contains(o.as_str()) && !original.contains(o.as_str()))
    {
        changes.push(ChangeRecord::flag(ChangeCategory::ContextualEnrichment));
    }

    if changes.is_empty() {
        changes.push(ChangeRecord::flag(ChangeCategory::SubtleAdjustments));
    }
    changes
}

/// Sum over matchers of how many more hits `after` has than `before`
fn increase<'a>(matchers: impl Iterator<Item = &'a Regex>, before: &str, after: &str) -> usize {
    matchers
        .map(|m| m.find_iter(after).count().saturating_sub(m.find_iter(before).count()))
        .sum()
}

fn push_counted(changes: &mut Vec<ChangeRecord>, category: ChangeCategory, count: usize) {
    if count > 0 {
        changes.push(ChangeRecord::counted(category, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::builtin_rules;

    fn categories(original: &str, humanized: &str) -> Vec<ChangeCategory> {
        report_changes(builtin_rules(), original, humanized)
            .into_iter()
            .map(|c| c.category)
            .collect()
    }

    #[test]
    fn test_unchanged_text_yields_subtle_adjustments() {
        let changes = report_changes(builtin_rules(), "Same text.", "Same text.");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].category, ChangeCategory::SubtleAdjustments);
    }

    #[test]
    fn test_sentence_count_change_is_structural() {
        assert_eq!(
            categories("The cat sat. The dog ran.", "The cat sat, and the dog ran."),
            vec![ChangeCategory::StructuralVariation]
        );
    }

    #[test]
    fn test_colloquial_count() {
        let changes = report_changes(
            builtin_rules(),
            "It is very easy. It was correct.",
            "It is a piece of cake. It was spot on.",
        );
        assert_eq!(changes[0].category, ChangeCategory::ColloquialExpressions);
        assert_eq!(changes[0].count, Some(2));
    }

    #[test]
    fn test_orality_net_increase() {
        let changes = report_changes(
            builtin_rules(),
            "You know the drill.",
            "You know the drill, honestly, you know.",
        );
        assert_eq!(changes[0].category, ChangeCategory::OralityMarkers);
        assert_eq!(changes[0].count, Some(2));
    }

    #[test]
    fn test_personal_reference_flag() {
        assert_eq!(
            categories("The sky is blue.", "Personally, the sky is blue."),
            vec![ChangeCategory::PersonalReferences]
        );
    }

    #[test]
    fn test_personal_flag_when_trigger_already_in_original() {
        assert_eq!(
            categories("Personally, I agree.", "Personally, I agree."),
            vec![ChangeCategory::PersonalReferences]
        );
    }

    #[test]
    fn test_formality_and_orality_are_not_colloquial() {
        assert_eq!(
            categories("Consequently, it rained.", "So, it rained."),
            vec![ChangeCategory::FormalityReduced]
        );
        assert_eq!(
            categories("Consequently, it rained.", "So, it rained, so to speak."),
            vec![ChangeCategory::OralityMarkers, ChangeCategory::FormalityReduced]
        );
    }

    #[test]
    fn test_personal_opener_is_not_enrichment() {
        assert_eq!(
            categories("The sky is blue.", "Over the years, I have noticed that the sky is blue."),
            vec![ChangeCategory::SubtleAdjustments]
        );
    }

    #[test]
    fn test_formality_reduction_count() {
        let changes = report_changes(
            builtin_rules(),
            "Additionally, it rose considerably.",
            "Also, it rose quite a bit.",
        );
        assert_eq!(changes[0].category, ChangeCategory::FormalityReduced);
        assert_eq!(changes[0].count, Some(2));
    }

    #[test]
    fn test_noise_flag_on_new_ellipsis() {
        assert_eq!(
            categories("I think so.", "I believe... no, I think so."),
            vec![ChangeCategory::NaturalNoise]
        );
        assert_eq!(
            categories("Wait... I think so.", "Wait... I believe... no, I think so."),
            vec![ChangeCategory::SubtleAdjustments]
        );
    }

    #[test]
    fn test_enrichment_flag_and_stage_order() {
        assert_eq!(
            categories(
                "Additionally, exercise helps.",
                "In my experience, also, exercise helps. My doctor always insists that sleep helps too."
            ),
            vec![
                ChangeCategory::StructuralVariation,
                ChangeCategory::PersonalReferences,
                ChangeCategory::FormalityReduced,
                ChangeCategory::ContextualEnrichment,
            ]
        );
    }
}
