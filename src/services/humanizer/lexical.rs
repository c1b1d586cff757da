// Lexical Substitution
// Swaps formal phrases for colloquial ones; at high intensity also drops
// idioms in place of their context keyword.

use super::rules::RuleTables;
use super::{replace_all_phrases, replace_first_phrase, roll};
use crate::models::Intensity;
use rand::RngCore;

const IDIOM_CHANCE: f64 = 0.3;

pub fn colloquialize(
    rules: &RuleTables,
    text: &str,
    intensity: Intensity,
    rng: &mut dyn RngCore,
) -> String {
    let factor = intensity.profile().lexical;
    let mut result = text.to_string();

    for rule in &rules.colloquialisms {
        if roll(rng, factor) {
            result = replace_all_phrases(&rule.matcher, &result, &rule.formal, &rule.colloquial);
        }
    }

    if intensity == Intensity::High {
        for idiom in &rules.idioms {
            // Only the first occurrence, so the text isn't saturated with one idiom
            if roll(rng, IDIOM_CHANCE) && idiom.matcher.is_match(&result) {
                result = replace_first_phrase(&idiom.matcher, &result, &idiom.context, &idiom.idiom);
            }
        }
    }

    result
}
