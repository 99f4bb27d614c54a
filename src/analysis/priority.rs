//! Priority rule.

use crate::domain::{KeywordSet, Sentiment};

/// Keywords that make a sender a priority on their own.
pub const PRIORITY_KEYWORDS: [&str; 2] = ["urgente", "entrega"];

/// A sender is a priority when any priority keyword was seen or the dominant
/// sentiment is negative.
pub fn is_priority(keywords: &KeywordSet, sentiment: Sentiment) -> bool {
    PRIORITY_KEYWORDS.iter().any(|k| keywords.contains(k)) || sentiment == Sentiment::Negative
}
