// Humanizer Data Models
// Result records handed to the presentation layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HumanizeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid rule tables: {0}")]
    InvalidRules(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============ Intensity ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Topics ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub relevance: usize,
}

// ============ Change Records ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    StructuralVariation,
    ColloquialExpressions,
    OralityMarkers,
    PersonalReferences,
    FormalityReduced,
    NaturalNoise,
    ContextualEnrichment,
    SubtleAdjustments,
}

impl ChangeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeCategory::StructuralVariation => "structural_variation",
            ChangeCategory::ColloquialExpressions => "colloquial_expressions",
            ChangeCategory::OralityMarkers => "orality_markers",
            ChangeCategory::PersonalReferences => "personal_references",
            ChangeCategory::FormalityReduced => "formality_reduced",
            ChangeCategory::NaturalNoise => "natural_noise",
            ChangeCategory::ContextualEnrichment => "contextual_enrichment",
            ChangeCategory::SubtleAdjustments => "subtle_adjustments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub category: ChangeCategory,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ChangeRecord {
    pub fn flag(category: ChangeCategory) -> Self {
        Self {
            category,
            description: describe(category, None),
            count: None,
        }
    }

    pub fn counted(category: ChangeCategory, count: usize) -> Self {
        Self {
            category,
            description: describe(category, Some(count)),
            count: Some(count),
        }
    }
}

fn describe(category: ChangeCategory, count: Option<usize>) -> String {
    let n = count.unwrap_or(0);
    match category {
        ChangeCategory::StructuralVariation => {
            "Sentence structure was varied to make the rhythm less predictable.".to_string()
        }
        ChangeCategory::ColloquialExpressions => {
            format!("Added {} colloquial expressions to make the text sound more natural.", n)
        }
        ChangeCategory::OralityMarkers => {
            format!("Introduced {} spoken-language markers to simulate natural speech.", n)
        }
        ChangeCategory::PersonalReferences => {
            "Added personal references for a more human, closer tone.".to_string()
        }
        ChangeCategory::FormalityReduced => format!(
            "Reduced excessive formality by replacing {} formal expressions with more natural alternatives.",
            n
        ),
        ChangeCategory::NaturalNoise => {
            "Added small self-corrections to simulate real-time human thinking.".to_string()
        }
        ChangeCategory::ContextualEnrichment => {
            "Enriched the text with a contextual aside to add credibility and relevance.".to_string()
        }
        ChangeCategory::SubtleAdjustments => {
            "Made subtle adjustments to humanize the text while keeping its original meaning.".to_string()
        }
    }
}

// ============ Pipeline Result ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTrace {
    pub stage: String,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizationResult {
    pub original_text: String,
    pub humanized_text: String,
    pub intensity: Intensity,
    pub changes: Vec<ChangeRecord>,
    #[serde(default)]
    pub stages: Vec<StageTrace>,
}
