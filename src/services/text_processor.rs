// Text Processing Service
// Shared helpers for paragraph handling, casing and char-based offsets

use regex::Regex;
use std::sync::OnceLock;

fn repeated_spaces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}").expect("spaces regex"))
}

fn extra_blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank lines regex"))
}

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t]*\n\s*").expect("paragraph regex"))
}

/// Map typographic quotes and exotic spaces to the ASCII forms the rule
/// tables and segmenter expect
fn plain_char(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{3000}' | '\t' | '\u{000B}' | '\u{000C}' => ' ',
        '\r' => '\n',
        c => c,
    }
}

/// Prepare file input for the pipeline: ASCII quotes and spaces, trimmed
/// lines, and paragraphs separated by exactly one blank line
pub fn normalize_punctuation(text: &str) -> String {
    let plain: String = text.replace("\r\n", "\n").chars().map(plain_char).collect();
    let lines: Vec<String> = plain
        .lines()
        .map(|line| repeated_spaces_re().replace_all(line.trim(), " ").into_owned())
        .collect();
    extra_blank_lines_re()
        .replace_all(lines.join("\n").trim(), "\n\n")
        .into_owned()
}

/// Split text into paragraphs on blank lines.
/// Always yields at least one paragraph for non-blank input.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    paragraph_break_re()
        .split(text)
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}

/// Apply `f` to every paragraph and rejoin with blank lines
pub fn map_paragraphs<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let paragraphs: Vec<String> = split_paragraphs(text).iter().map(|p| f(p)).collect();
    join_paragraphs(&paragraphs)
}

/// Length in chars, the unit every stage threshold is expressed in
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `n`th char (or `s.len()` past the end)
pub fn byte_at_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

fn keeps_case(first_word: &str) -> bool {
    let word: String = first_word
        .chars()
        .take_while(|c| c.is_alphanumeric())
        .collect();
    if word == "I" {
        return true;
    }
    // Acronyms and initialisms (AI, NASA, U.S.)
    first_word.chars().filter(|c| c.is_alphabetic()).count() > 1
        && first_word
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase())
}

/// Lower-case the first letter unless the first word is "I" or an acronym
pub fn lower_first(s: &str) -> String {
    let first_word = s.split_whitespace().next().unwrap_or("");
    if keeps_case(first_word) {
        return s.to_string();
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn ends_with_terminal(s: &str) -> bool {
    s.ends_with(|c: char| matches!(c, '.' | '!' | '?'))
}

/// Split off the trailing terminal punctuation run, if any
pub fn split_terminal(s: &str) -> (&str, &str) {
    let body = s.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'));
    (body, &s[body.len()..])
}

/// Case-insensitive whole-word pattern for a literal phrase
pub fn whole_word_pattern(phrase: &str) -> String {
    let escaped = regex::escape(phrase.trim());
    let starts_word = phrase.trim().chars().next().map(is_word_char).unwrap_or(false);
    let ends_word = phrase.trim().chars().last().map(is_word_char).unwrap_or(false);
    format!(
        "(?i){}{}{}",
        if starts_word { r"\b" } else { "" },
        escaped,
        if ends_word { r"\b" } else { "" }
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
