// Contextual Enrichment
// Exactly one topic-aware anecdote opener per text, placed away from the
// very start when the text is long enough.

use super::pick;
use super::rules::RuleTables;
use super::topics::detect_topics;
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{join_paragraphs, lower_first, split_paragraphs};
use rand::RngCore;
use tracing::debug;

const MIDDLE_PLACEMENT_MIN_SENTENCES: usize = 3;

pub fn enrich_with_context(rules: &RuleTables, text: &str, rng: &mut dyn RngCore) -> String {
    let topics = detect_topics(rules, text);
    let anecdotes = topics
        .first()
        .and_then(|top| rules.anecdotes_for(&top.name))
        .unwrap_or(rules.generic_anecdotes.as_slice());
    debug!(
        topic = topics.first().map(|t| t.name.as_str()).unwrap_or("none"),
        "[HUMANIZER] Enrichment topic"
    );

    let Some(opener) = pick(rng, anecdotes) else {
        return text.to_string();
    };
    let prepend = |s: &str| format!("{}{}", opener, lower_first(s));

    let mut paragraphs = split_paragraphs(text);
    if paragraphs.len() > 1 {
        paragraphs[1] = prepend(&paragraphs[1]);
        return join_paragraphs(&paragraphs);
    }

    let mut sentences = split_sentences(text);
    if sentences.len() > MIDDLE_PLACEMENT_MIN_SENTENCES {
        let mid = sentences.len() / 2;
        sentences[mid] = prepend(&sentences[mid]);
        return sentences.join(" ");
    }

    prepend(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::builtin_rules;
    use crate::services::humanizer::test_rng::{always, never};

    #[test]
    fn test_generic_opener_without_topic() {
        let out = enrich_with_context(builtin_rules(), "Plain words here.", &mut always());
        assert_eq!(out, "Based on my personal experience, plain words here.");
    }

    #[test]
    fn test_top_topic_anecdote() {
        let out = enrich_with_context(builtin_rules(), "Exercise is good. Sleep matters.", &mut always());
        assert_eq!(out, "My doctor always insists that exercise is good. Sleep matters.");
    }

    #[test]
    fn test_middle_sentence_of_long_paragraph() {
        let out = enrich_with_context(
            builtin_rules(),
            "One is here. Two is here. Three is here. Four is here. Five is here.",
            &mut always(),
        );
        assert_eq!(
            out,
            "One is here. Two is here. Based on my personal experience, three is here. Four is here. Five is here."
        );
    }

    #[test]
    fn test_second_paragraph_when_several() {
        let out = enrich_with_context(builtin_rules(), "First para.\n\nSecond para.\n\nThird.", &mut always());
        assert_eq!(out, "First para.\n\nBased on my personal experience, second para.\n\nThird.");
    }

    #[test]
    fn test_never_rng_takes_last_generic_opener() {
        let out = enrich_with_context(builtin_rules(), "Plain words here.", &mut never());
        assert_eq!(out, "After reflecting on this topic for a long time, plain words here.");
    }

    #[test]
    fn test_acronym_start_keeps_case() {
        let out = enrich_with_context(builtin_rules(), "NASA launched it.", &mut always());
        assert_eq!(out, "Based on my personal experience, NASA launched it.");
    }
}
