// Sentence Segmenter
// Abbreviation-aware splitting shared by every sentence-level stage

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub text: String,
    /// Length in chars
    pub len: usize,
}

fn abbreviation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:\b[A-Za-z]\.){2,}|\b[A-Za-z]+\.[A-Za-z]+\.|\b(?:Mrs|Mr|Ms|Dr|Prof|Sr|Jr|St|vs|etc)\.",
        )
        .expect("abbreviation regex")
    })
}

fn boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[.?!]+["'\u{201D}\u{2019})]?\s+"#).expect("boundary regex")
    })
}

fn starts_sentence(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => true,
        Some('"' | '\'' | '\u{201C}' | '\u{2018}' | '(') => {
            chars.next().map(|c| c.is_uppercase()).unwrap_or(false)
        }
        _ => false,
    }
}

/// Byte ranges of abbreviations whose dots never end a sentence
fn abbreviation_spans(text: &str) -> Vec<(usize, usize)> {
    abbreviation_re()
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Split text into trimmed, non-empty sentences.
/// Text without terminal punctuation comes back as a single sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let spans = abbreviation_spans(text);
    let mut pieces: Vec<&str> = Vec::new();
    let mut last = 0usize;

    for m in boundary_re().find_iter(text) {
        if spans.iter().any(|&(start, end)| (start..end).contains(&m.start())) {
            continue;
        }
        if !starts_sentence(&text[m.end()..]) {
            continue;
        }
        let cut = m.start() + m.as_str().trim_end().len();
        pieces.push(&text[last..cut]);
        last = m.end();
    }
    pieces.push(&text[last..]);

    pieces
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Segment text into sentences with their char lengths
pub fn segment_sentences(text: &str) -> Vec<Sentence> {
    split_sentences(text)
        .into_iter()
        .map(|text| {
            let len = text.chars().count();
            Sentence { text, len }
        })
        .collect()
}
