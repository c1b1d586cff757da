// Formality Reduction
// Formal connectives swapped for plain ones; at medium and high intensity,
// passive constructions collapsed into do-forms.

use super::replace_all_phrases;
use super::roll;
use super::rules::{RewriteSpec, RuleTables};
use crate::models::Intensity;
use crate::services::text_processor::upper_first;
use rand::RngCore;
use regex::Captures;

const PASSIVE_SCALE: f64 = 0.7;

static PASSIVE_SPECS: [RewriteSpec; 6] = [
    RewriteSpec {
        name: "was_by",
        pattern: r"(?i)\b(was) \w+(?:ed|en) by\b",
        rewrite: did_past,
    },
    RewriteSpec {
        name: "were_by",
        pattern: r"(?i)\b(were) \w+(?:ed|en) by\b",
        rewrite: did_past,
    },
    RewriteSpec {
        name: "has_been_by",
        pattern: r"(?i)\b(has) been \w+(?:ed|en) by\b",
        rewrite: has_done,
    },
    RewriteSpec {
        name: "have_been_by",
        pattern: r"(?i)\b(have) been \w+(?:ed|en) by\b",
        rewrite: have_done,
    },
    RewriteSpec {
        name: "is_by",
        pattern: r"(?i)\b(is) \w+(?:ed|en) by\b",
        rewrite: does,
    },
    RewriteSpec {
        name: "are_by",
        pattern: r"(?i)\b(are) \w+(?:ed|en) by\b",
        rewrite: do_plural,
    },
];

/// Passive-voice rewrites, compiled once into `RuleTables::passive_rules`
pub(crate) fn passive_specs() -> &'static [RewriteSpec] {
    &PASSIVE_SPECS
}

/// Keep the auxiliary's capitalization on the replacement
fn active(caps: &Captures, replacement: &str) -> String {
    let capitalized = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.is_uppercase())
        .unwrap_or(false);
    if capitalized {
        upper_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn did_past(caps: &Captures) -> String {
    active(caps, "did")
}

fn has_done(caps: &Captures) -> String {
    active(caps, "has done")
}

fn have_done(caps: &Captures) -> String {
    active(caps, "have done")
}

fn does(caps: &Captures) -> String {
    active(caps, "does")
}

fn do_plural(caps: &Captures) -> String {
    active(caps, "do")
}

pub fn reduce_formality(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().formality;
    let mut result = text.to_string();

    for rule in &rules.formality {
        if roll(rng, factor) {
            result = replace_all_phrases(&rule.matcher, &result, &rule.formal, &rule.colloquial);
        }
    }

    if intensity.is_elevated() {
        for rule in &rules.passive_rules {
            if roll(rng, factor * PASSIVE_SCALE) {
                result = rule.apply_all(&result);
            }
        }
    }

    result
}
