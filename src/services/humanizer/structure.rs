// Structural Variation
// Splits long sentences, merges short neighbours and inverts clauses so
// sentence rhythm is less uniform. Content is re-segmented, never dropped.

use super::rules::RuleTables;
use super::{pick, roll};
use crate::models::Intensity;
use crate::services::sentence_segmenter::split_sentences;
use crate::services::text_processor::{
    byte_at_char, char_len, lower_first, map_paragraphs, split_terminal, upper_first,
};
use rand::RngCore;

const SPLIT_MIN_LEN: usize = 120;
const SPLIT_CHANCE: f64 = 0.6;
const MERGE_MAX_LEN: usize = 60;
const MERGE_CHANCE: f64 = 0.4;
const INVERT_CHANCE: f64 = 0.3;
const INVERT_MIN_HEAD_LEN: usize = 15;

pub fn vary_structure(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().variation;
    map_paragraphs(text, |paragraph| vary_paragraph(rules, paragraph, factor, rng))
}

fn vary_paragraph(rules: &RuleTables, paragraph: &str, factor: f64, rng: &mut dyn RngCore) -> String {
    let sentences = split_sentences(paragraph);
    let mut out: Vec<String> = Vec::with_capacity(sentences.len());

    let mut i = 0;
    while i < sentences.len() {
        let mut sentence = sentences[i].clone();

        if roll(rng, factor) {
            let len = char_len(&sentence);
            let has_next = i + 1 < sentences.len();

            if len > SPLIT_MIN_LEN && roll(rng, SPLIT_CHANCE) {
                if let Some((head, rest)) = split_long(&sentence) {
                    out.push(head);
                    sentence = rest;
                }
            } else if has_next
                && len < MERGE_MAX_LEN
                && char_len(&sentences[i + 1]) < MERGE_MAX_LEN
                && roll(rng, MERGE_CHANCE)
            {
                let connective = pick(rng, &rules.connectives)
                    .map(String::as_str)
                    .unwrap_or("and");
                sentence = merge(&sentence, &sentences[i + 1], connective);
                i += 1;
            } else if sentence.contains(',') && roll(rng, INVERT_CHANCE) {
                if let Some(inverted) = invert_clauses(&sentence) {
                    sentence = inverted;
                }
            }
        }

        out.push(sentence);
        i += 1;
    }

    out.join(" ")
}

/// Byte index of the cut: first `,` past one third, else `;`, else `:`,
/// else the first space at or after the midpoint.
fn find_cut_point(sentence: &str) -> Option<usize> {
    let len = char_len(sentence);
    let third = byte_at_char(sentence, len / 3);
    for punct in [',', ';', ':'] {
        if let Some(off) = sentence[third..].find(punct) {
            return Some(third + off);
        }
    }
    let mid = byte_at_char(sentence, len / 2);
    sentence[mid..].find(' ').map(|off| mid + off)
}

fn split_long(sentence: &str) -> Option<(String, String)> {
    let cut = find_cut_point(sentence)?;
    let head = sentence[..cut].trim_end();
    let rest = sentence[cut + 1..].trim_start();
    if head.is_empty() || rest.is_empty() {
        return None;
    }
    Some((format!("{}.", head), upper_first(rest)))
}

fn merge(first: &str, second: &str, connective: &str) -> String {
    let (body, _) = split_terminal(first);
    format!("{}, {} {}", body.trim_end(), connective, lower_first(second))
}

/// Swap the clauses around the first comma, keeping the terminal punctuation last
fn invert_clauses(sentence: &str) -> Option<String> {
    let (head, tail) = sentence.split_once(',')?;
    if char_len(head) <= INVERT_MIN_HEAD_LEN {
        return None;
    }
    let (tail_body, terminal) = split_terminal(tail.trim());
    let tail_body = tail_body.trim();
    if tail_body.is_empty() {
        return None;
    }
    Some(format!(
        "{}, {}{}",
        upper_first(tail_body),
        lower_first(head.trim()),
        terminal
    ))
}
