// Orality Markers
// Spoken-language fillers spliced into sentences, plus parenthetical
// digressions at medium and high intensity.

use super::rules::{MarkerPosition, OralityMarker, RuleTables};
use super::{pick, roll};
use crate::models::Intensity;
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{byte_at_char, char_len, map_paragraphs, split_terminal};
use rand::RngCore;

const DIGRESSION_MIN_LEN: usize = 50;

pub fn add_orality_markers(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    map_paragraphs(text, |paragraph| mark_paragraph(rules, paragraph, intensity, rng))
}

fn mark_paragraph(
    rules: &RuleTables,
    paragraph: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().orality;
    let mut out = Vec::new();

    for sentence in split_sentences(paragraph) {
        let mut sentence = sentence;
        let len = char_len(&sentence);

        if roll(rng, factor) {
            let eligible: Vec<&OralityMarker> = rules
                .orality_markers
                .iter()
                .filter(|m| len > m.position.min_len())
                .collect();
            if let Some(marker) = pick(rng, &eligible) {
                if let Some(spliced) = splice_marker(&sentence, marker) {
                    sentence = spliced;
                }
            }
        }

        if intensity.is_elevated() && roll(rng, factor) && char_len(&sentence) > DIGRESSION_MIN_LEN {
            if let Some(digression) = pick(rng, &rules.digressions) {
                if let Some(at) = digression_point(&sentence) {
                    sentence.insert_str(at, digression);
                }
            }
        }

        out.push(sentence);
    }

    out.join(" ")
}

fn splice_marker(sentence: &str, marker: &OralityMarker) -> Option<String> {
    match marker.position {
        MarkerPosition::Start => {
            let at = sentence.find(' ')?;
            Some(insert_aside(sentence, at, &marker.phrase))
        }
        MarkerPosition::Middle => {
            let mid = byte_at_char(sentence, char_len(sentence) / 2);
            let at = mid + sentence[mid..].find(' ')?;
            Some(insert_aside(sentence, at, &marker.phrase))
        }
        MarkerPosition::End => {
            let (body, terminal) = split_terminal(sentence);
            if terminal.is_empty() || body.trim().is_empty() {
                return None;
            }
            Some(format!("{}, {}{}", body.trim_end(), marker.phrase, terminal))
        }
    }
}

/// Insert `, phrase,` at the space at byte `at`, reusing punctuation already there
fn insert_aside(sentence: &str, at: usize, phrase: &str) -> String {
    let prefix = &sentence[..at];
    let rest = sentence[at..].trim_start();
    if prefix.ends_with(|c: char| matches!(c, ',' | ';' | ':')) {
        format!("{} {}, {}", prefix, phrase, rest)
    } else {
        format!("{}, {}, {}", prefix, phrase, rest)
    }
}

/// Byte offset for a digression: just after the first comma when it sits past
/// the first quarter, else at the first space from one third on.
fn digression_point(sentence: &str) -> Option<usize> {
    let len = char_len(sentence);
    if let Some(comma) = sentence.find(',') {
        if char_len(&sentence[..comma]) > len / 4 {
            return Some(comma + 1);
        }
    }
    let third = byte_at_char(sentence, len / 3);
    sentence[third..]
        .find(' ')
        .map(|off| third + off)
        .filter(|&at| at > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanizer::builtin_rules;
    use crate::services::humanizer::test_rng::{always, never};

    fn marker(phrase: &str, position: MarkerPosition) -> OralityMarker {
        builtin_rules()
            .orality_markers
            .iter()
            .find(|m| m.phrase == phrase && m.position == position)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_start_marker_after_first_word() {
        let out = add_orality_markers(
            builtin_rules(),
            "The committee approved the new budget today.",
            Intensity::Low,
            &mut always(),
        );
        assert_eq!(out, "The, honestly, committee approved the new budget today.");
    }

    #[test]
    fn test_short_sentences_get_no_marker() {
        let text = "Too short here.";
        assert_eq!(add_orality_markers(builtin_rules(), text, Intensity::High, &mut always()), text);
    }

    #[test]
    fn test_middle_marker_at_midpoint_space() {
        let out = splice_marker(
            "The committee approved the new budget today.",
            &marker("so to speak", MarkerPosition::Middle),
        );
        assert_eq!(out.unwrap(), "The committee approved, so to speak, the new budget today.");
    }

    #[test]
    fn test_end_marker_before_terminal() {
        let m = marker("you know", MarkerPosition::End);
        assert_eq!(
            splice_marker("It went well in the end?", &m).unwrap(),
            "It went well in the end, you know?"
        );
        assert_eq!(splice_marker("It went well in the end", &m), None);
    }

    #[test]
    fn test_existing_comma_is_reused() {
        let out = insert_aside("Well, it went fine.", 5, "frankly");
        assert_eq!(out, "Well, frankly, it went fine.");
    }

    #[test]
    fn test_digression_after_late_comma() {
        let mut s = "Over the last decade the city has grown, and traffic has become a real problem.".to_string();
        let at = digression_point(&s).unwrap();
        s.insert_str(at, " (and I find this fascinating)");
        assert_eq!(
            s,
            "Over the last decade the city has grown, (and I find this fascinating) and traffic has become a real problem."
        );
    }

    #[test]
    fn test_early_comma_falls_back_to_space() {
        let s = "Yes, the weather was remarkably pleasant for the entire length of our trip.";
        let at = digression_point(s).unwrap();
        assert_ne!(at, 4);
        assert_eq!(&s[at..at + 1], " ");
    }

    #[test]
    fn test_digression_at_space_past_third() {
        let mut s = "The weather was remarkably pleasant for the entire length of our long trip.".to_string();
        let at = digression_point(&s).unwrap();
        s.insert_str(at, " (which is surprising)");
        assert_eq!(
            s,
            "The weather was remarkably (which is surprising) pleasant for the entire length of our long trip."
        );
    }

    #[test]
    fn test_digressions_only_when_elevated() {
        let text = "The weather was remarkably pleasant for the entire length of our long trip.";
        let low = add_orality_markers(builtin_rules(), text, Intensity::Low, &mut always());
        assert!(!low.contains('('));
        let high = add_orality_markers(builtin_rules(), text, Intensity::High, &mut always());
        assert!(high.contains(" (and I find this fascinating)"));
    }

    #[test]
    fn test_never_firing_keeps_text() {
        let text = "The committee approved the new budget today.\n\nIt was a long meeting, as usual.";
        assert_eq!(add_orality_markers(builtin_rules(), text, Intensity::High, &mut never()), text);
    }
}
