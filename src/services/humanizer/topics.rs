// Topic Detection
// Keyword counts per topic, ranked by relevance

use super::rules::RuleTables;
use crate::models::Topic;

/// Topics with at least one whole-word keyword hit, most relevant first.
/// Ties keep table order.
pub fn detect_topics(rules: &RuleTables, text: &str) -> Vec<Topic> {
    let mut topics: Vec<Topic> = rules
        .topics
        .iter()
        .map(|topic| Topic {
            name: topic.name.clone(),
            relevance: topic
                .keywords
                .iter()
                .map(|kw| kw.find_iter(text).count())
                .sum(),
        })
        .filter(|t| t.relevance > 0)
        .collect();

    topics.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    topics
}
