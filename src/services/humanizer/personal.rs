// Personal References
// First-person openers prepended to sentences that start a thought or carry
// weight; context-specific when the text mentions a known context.

use super::rules::{PersonalReference, RuleTables};
use super::{pick, roll};
use crate::models::Intensity;
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{char_len, lower_first, map_paragraphs};
use rand::RngCore;

const CONTEXT_CHANCE: f64 = 0.7;
const IMPORTANT_MIN_LEN: usize = 80;
const EMPHASIS_WORDS: [&str; 2] = ["important", "noteworthy"];

pub fn add_personal_references(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().reference;
    let lower = text.to_lowercase();
    let detected: Vec<&PersonalReference> = rules
        .personal_references
        .iter()
        .filter(|r| lower.contains(&r.context))
        .collect();

    map_paragraphs(text, |paragraph| {
        reference_paragraph(rules, &detected, paragraph, factor, rng)
    })
}

fn reference_paragraph(
    rules: &RuleTables,
    detected: &[&PersonalReference],
    paragraph: &str,
    factor: f64,
    rng: &mut dyn RngCore,
) -> String {
    let sentences = split_sentences(paragraph);
    let mut out = Vec::with_capacity(sentences.len());

    for (i, sentence) in sentences.iter().enumerate() {
        let opens = i == 0 || sentences[i - 1].ends_with('.');
        let important = char_len(sentence) > IMPORTANT_MIN_LEN || {
            let lower = sentence.to_lowercase();
            EMPHASIS_WORDS.iter().any(|w| lower.contains(w))
        };

        if (opens || important) && roll(rng, factor) {
            let opener = if !detected.is_empty() && roll(rng, CONTEXT_CHANCE) {
                pick(rng, detected).map(|r| r.opener.as_str())
            } else {
                pick(rng, &rules.generic_references).map(String::as_str)
            };
            if let Some(opener) = opener {
                out.push(format!("{}{}", opener, lower_first(sentence)));
                continue;
            }
        }
        out.push(sentence.clone());
    }

    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::builtin_rules;
    use crate::services::humanizer::test_rng::{always, never};

    #[test]
    fn test_generic_opener_without_context() {
        let out = add_personal_references(builtin_rules(), "The sky is blue.", Intensity::Low, &mut always());
        assert_eq!(out, "In my experience, the sky is blue.");
    }

    #[test]
    fn test_context_opener_when_context_mentioned() {
        let out = add_personal_references(
            builtin_rules(),
            "Technology moves fast. Phones change yearly.",
            Intensity::Medium,
            &mut always(),
        );
        assert_eq!(
            out,
            "I remember when I bought my first smartphone, and technology moves fast. \
             I remember when I bought my first smartphone, and phones change yearly."
        );
    }

    #[test]
    fn test_question_does_not_open_next_sentence() {
        let out = add_personal_references(builtin_rules(), "Is it blue? Yes it is.", Intensity::Low, &mut always());
        assert_eq!(out, "In my experience, is it blue? Yes it is.");
    }

    #[test]
    fn test_emphasis_makes_sentence_eligible() {
        let out = add_personal_references(
            builtin_rules(),
            "Is it blue? This is important.",
            Intensity::Low,
            &mut always(),
        );
        assert_eq!(out, "In my experience, is it blue? In my experience, this is important.");
    }

    #[test]
    fn test_never_firing_keeps_text() {
        let text = "Technology moves fast. Phones change yearly.";
        assert_eq!(add_personal_references(builtin_rules(), text, Intensity::High, &mut never()), text);
    }
}
