//! Per-sender summary produced by the aggregator.

use serde::{Deserialize, Serialize};

use super::{priority_label, ActionCategory, Language, SenderKey, Sentiment};
use crate::analysis::priority;

/// Deduplicated keyword list that keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keyword; returns false if it was already present.
    pub fn insert(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if self.contains(&keyword) {
            return false;
        }
        self.0.push(keyword);
        true
    }

    /// Adds every keyword of `other` not already present.
    pub fn union_with(&mut self, other: &KeywordSet) {
        for keyword in &other.0 {
            self.insert(keyword.clone());
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k == keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Comma-joined keywords, or the language's empty sentinel.
    pub fn render(&self, language: Language) -> String {
        if self.0.is_empty() {
            super::no_keywords_label(language).to_string()
        } else {
            self.0.join(", ")
        }
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}

/// One row of the summary table.
///
/// The priority flag is not stored: [`SenderSummary::priority_flag`] derives
/// it from the current keywords and sentiment every time it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderSummary {
    /// Grouping identity.
    pub key: SenderKey,
    pub sender_name: String,
    pub sender_email: String,
    /// Number of records in the group, always at least one.
    pub message_count: usize,
    /// Union of the per-message keyword sets.
    pub keywords: KeywordSet,
    /// Dominant label from the primary polarity engine.
    pub sentiment_label: Sentiment,
    /// Dominant label from the secondary engine, when one was configured.
    pub secondary_sentiment: Option<Sentiment>,
    /// Dominant action category.
    pub action_category: ActionCategory,
}

impl SenderSummary {
    pub fn priority_flag(&self) -> bool {
        priority::is_priority(&self.keywords, self.sentiment_label)
    }

    pub fn priority_label(&self, language: Language) -> &'static str {
        priority_label(self.priority_flag(), language)
    }
}
