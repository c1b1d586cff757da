// Rule Tables
// Immutable substitution, marker, topic and anecdote tables.
// Parsed and validated once; every regex is compiled here, never per call.

use crate::models::HumanizeError;
use crate::services::text_processor::whole_word_pattern;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use super::{formality, noise};

const BUILTIN_RULES: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/humanizer_rules.json"
));

// ============ Raw file layout ============

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[allow(dead_code)]
    version: u32,
    connectives: Vec<String>,
    colloquialisms: Vec<PhrasePair>,
    idioms: Vec<IdiomEntry>,
    orality_markers: Vec<MarkerEntry>,
    digressions: Vec<String>,
    personal_references: Vec<ReferenceEntry>,
    generic_references: Vec<String>,
    personal_triggers: Vec<String>,
    formality: Vec<PhrasePair>,
    topics: Vec<TopicEntry>,
    anecdotes: HashMap<String, Vec<String>>,
    generic_anecdotes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PhrasePair {
    formal: String,
    colloquial: String,
}

#[derive(Debug, Deserialize)]
struct IdiomEntry {
    context: String,
    idiom: String,
}

#[derive(Debug, Deserialize)]
struct MarkerEntry {
    phrase: String,
    position: MarkerPosition,
}

#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    context: String,
    opener: String,
}

#[derive(Debug, Deserialize)]
struct TopicEntry {
    name: String,
    keywords: Vec<String>,
}

// ============ Compiled tables ============

#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pub formal: String,
    pub colloquial: String,
    pub matcher: Regex,
}

#[derive(Debug, Clone)]
pub struct IdiomRule {
    pub context: String,
    pub idiom: String,
    pub matcher: Regex,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerPosition {
    Start,
    Middle,
    End,
}

impl MarkerPosition {
    /// Minimum sentence length (chars) before a marker at this position is eligible
    pub fn min_len(self) -> usize {
        match self {
            MarkerPosition::Start => 20,
            MarkerPosition::Middle => 40,
            MarkerPosition::End => 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OralityMarker {
    pub phrase: String,
    pub position: MarkerPosition,
    pub matcher: Regex,
}

#[derive(Debug, Clone)]
pub struct PersonalReference {
    pub context: String,
    pub opener: String,
}

#[derive(Debug, Clone)]
pub struct TopicRule {
    pub name: String,
    pub keywords: Vec<Regex>,
}

/// A matcher paired with a pure rewrite of each match
#[derive(Clone)]
pub struct RewriteRule {
    pub name: &'static str,
    pub matcher: Regex,
    pub rewrite: fn(&Captures) -> String,
}

impl std::fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteRule")
            .field("name", &self.name)
            .field("matcher", &self.matcher.as_str())
            .finish()
    }
}

impl RewriteRule {
    pub fn apply_all(&self, text: &str) -> String {
        self.matcher
            .replace_all(text, |caps: &Captures| (self.rewrite)(caps))
            .into_owned()
    }

    pub fn apply_first(&self, text: &str) -> String {
        self.matcher
            .replace(text, |caps: &Captures| (self.rewrite)(caps))
            .into_owned()
    }
}

/// Static description of a rewrite rule before compilation
pub(crate) struct RewriteSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    pub rewrite: fn(&Captures) -> String,
}

#[derive(Debug, Clone)]
pub struct NoiseRules {
    pub self_correction: RewriteRule,
    pub repetition: RewriteRule,
    pub present_tense: Regex,
    pub past_tense: Regex,
}

#[derive(Debug, Clone)]
pub struct RuleTables {
    pub connectives: Vec<String>,
    pub colloquialisms: Vec<SubstitutionRule>,
    pub idioms: Vec<IdiomRule>,
    pub orality_markers: Vec<OralityMarker>,
    pub digressions: Vec<String>,
    pub personal_references: Vec<PersonalReference>,
    pub generic_references: Vec<String>,
    pub personal_triggers: Vec<Regex>,
    pub formality: Vec<SubstitutionRule>,
    pub passive_rules: Vec<RewriteRule>,
    pub noise: NoiseRules,
    pub topics: Vec<TopicRule>,
    pub anecdotes: HashMap<String, Vec<String>>,
    pub generic_anecdotes: Vec<String>,
    /// Phrases whose appearance marks a colloquial substitution
    pub colloquial_markers: Vec<Regex>,
    /// Every opener the enrichment and personal stages can insert
    pub known_openers: Vec<String>,
}

static BUILTIN: OnceLock<RuleTables> = OnceLock::new();

/// Built-in tables, validated on first use. A broken built-in table is fatal.
pub fn builtin_rules() -> &'static RuleTables {
    BUILTIN.get_or_init(|| {
        RuleTables::from_json(BUILTIN_RULES).expect("built-in humanizer_rules.json failed validation")
    })
}

fn invalid(msg: impl Into<String>) -> HumanizeError {
    HumanizeError::InvalidRules(msg.into())
}

fn compile(pattern: &str) -> Result<Regex, HumanizeError> {
    Regex::new(pattern).map_err(|e| invalid(format!("bad pattern {:?}: {}", pattern, e)))
}

fn phrase_matcher(phrase: &str) -> Result<Regex, HumanizeError> {
    compile(&whole_word_pattern(phrase))
}

fn require_items<T>(items: &[T], table: &str) -> Result<(), HumanizeError> {
    if items.is_empty() {
        return Err(invalid(format!("table `{}` is empty", table)));
    }
    Ok(())
}

fn require_text(value: &str, table: &str) -> Result<(), HumanizeError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("table `{}` contains a blank entry", table)));
    }
    Ok(())
}

fn require_texts(values: &[String], table: &str) -> Result<(), HumanizeError> {
    require_items(values, table)?;
    values.iter().try_for_each(|v| require_text(v, table))
}

pub(crate) fn compile_rewrite(spec: &RewriteSpec) -> Result<RewriteRule, HumanizeError> {
    Ok(RewriteRule {
        name: spec.name,
        matcher: compile(spec.pattern)?,
        rewrite: spec.rewrite,
    })
}

fn compile_pairs(pairs: Vec<PhrasePair>, table: &str) -> Result<Vec<SubstitutionRule>, HumanizeError> {
    require_items(&pairs, table)?;
    pairs
        .into_iter()
        .map(|p| {
            require_text(&p.formal, table)?;
            require_text(&p.colloquial, table)?;
            Ok(SubstitutionRule {
                matcher: phrase_matcher(&p.formal)?,
                formal: p.formal,
                colloquial: p.colloquial,
            })
        })
        .collect()
}

impl RuleTables {
    pub fn from_json(raw: &str) -> Result<Self, HumanizeError> {
        let file: RuleFile = serde_json::from_str(raw)
            .map_err(|e| invalid(format!("rule file parse failed: {}", e)))?;
        Self::compile(file)
    }

    pub fn from_path(path: &Path) -> Result<Self, HumanizeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    fn compile(file: RuleFile) -> Result<Self, HumanizeError> {
        require_texts(&file.connectives, "connectives")?;
        require_texts(&file.digressions, "digressions")?;
        require_texts(&file.generic_references, "generic_references")?;
        require_texts(&file.personal_triggers, "personal_triggers")?;
        require_texts(&file.generic_anecdotes, "generic_anecdotes")?;

        let colloquialisms = compile_pairs(file.colloquialisms, "colloquialisms")?;
        let formality = compile_pairs(file.formality, "formality")?;

        // A formality replacement must never reintroduce a formal phrase.
        for rule in &formality {
            if let Some(other) = formality.iter().find(|o| o.matcher.is_match(&rule.colloquial)) {
                return Err(invalid(format!(
                    "formality replacement {:?} contains formal phrase {:?}",
                    rule.colloquial, other.formal
                )));
            }
        }

        require_items(&file.idioms, "idioms")?;
        let idioms = file
            .idioms
            .into_iter()
            .map(|i| {
                require_text(&i.context, "idioms")?;
                require_text(&i.idiom, "idioms")?;
                Ok(IdiomRule {
                    matcher: phrase_matcher(&i.context)?,
                    context: i.context,
                    idiom: i.idiom,
                })
            })
            .collect::<Result<Vec<_>, HumanizeError>>()?;

        require_items(&file.orality_markers, "orality_markers")?;
        let orality_markers = file
            .orality_markers
            .into_iter()
            .map(|m| {
                require_text(&m.phrase, "orality_markers")?;
                Ok(OralityMarker {
                    matcher: phrase_matcher(&m.phrase)?,
                    phrase: m.phrase.trim().to_string(),
                    position: m.position,
                })
            })
            .collect::<Result<Vec<_>, HumanizeError>>()?;

        require_items(&file.personal_references, "personal_references")?;
        let personal_references = file
            .personal_references
            .into_iter()
            .map(|r| {
                require_text(&r.context, "personal_references")?;
                require_text(&r.opener, "personal_references")?;
                Ok(PersonalReference {
                    context: r.context.to_lowercase(),
                    opener: r.opener,
                })
            })
            .collect::<Result<Vec<_>, HumanizeError>>()?;

        let personal_triggers = file
            .personal_triggers
            .iter()
            .map(|t| phrase_matcher(t))
            .collect::<Result<Vec<_>, _>>()?;

        require_items(&file.topics, "topics")?;
        let mut topics = Vec::with_capacity(file.topics.len());
        for topic in file.topics {
            require_text(&topic.name, "topics")?;
            require_texts(&topic.keywords, &format!("topics.{}", topic.name))?;
            let keywords = topic
                .keywords
                .iter()
                .map(|k| phrase_matcher(k))
                .collect::<Result<Vec<_>, _>>()?;
            topics.push(TopicRule { name: topic.name, keywords });
        }

        for (name, openers) in &file.anecdotes {
            if !topics.iter().any(|t| &t.name == name) {
                return Err(invalid(format!("anecdotes reference unknown topic {:?}", name)));
            }
            require_texts(openers, &format!("anecdotes.{}", name))?;
        }

        let passive_rules = formality::passive_specs()
            .iter()
            .map(compile_rewrite)
            .collect::<Result<Vec<_>, _>>()?;
        let noise = noise::compile_noise_rules()?;

        // Text any other stage can insert; a colloquial phrase found in it
        // would be credited to the lexical stage by mistake
        let foreign: Vec<&str> = formality
            .iter()
            .map(|r| r.colloquial.as_str())
            .chain(orality_markers.iter().map(|m| m.phrase.as_str()))
            .chain(file.digressions.iter().map(String::as_str))
            .chain(file.connectives.iter().map(String::as_str))
            .chain(personal_references.iter().map(|r| r.opener.as_str()))
            .chain(file.generic_references.iter().map(String::as_str))
            .chain(file.anecdotes.values().flatten().map(String::as_str))
            .chain(file.generic_anecdotes.iter().map(String::as_str))
            .collect();
        let mut colloquial_markers = Vec::new();
        for phrase in colloquialisms
            .iter()
            .map(|r| r.colloquial.as_str())
            .chain(idioms.iter().map(|i| i.idiom.as_str()))
        {
            let matcher = phrase_matcher(phrase)?;
            if !foreign.iter().any(|f| matcher.is_match(f)) {
                colloquial_markers.push(matcher);
            }
        }

        let known_openers = file
            .anecdotes
            .values()
            .flatten()
            .chain(file.generic_anecdotes.iter())
            .map(|o| o.trim_end().to_string())
            .collect();

        Ok(Self {
            connectives: file.connectives,
            colloquialisms,
            idioms,
            orality_markers,
            digressions: file.digressions,
            personal_references,
            generic_references: file.generic_references,
            personal_triggers,
            formality,
            passive_rules,
            noise,
            topics,
            anecdotes: file.anecdotes,
            generic_anecdotes: file.generic_anecdotes,
            colloquial_markers,
            known_openers,
        })
    }

    pub fn anecdotes_for(&self, topic: &str) -> Option<&[String]> {
        self.anecdotes
            .get(topic)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }
}
