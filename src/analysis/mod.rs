//! Feature extractors.
//!
//! Stateless functions over the combined `subject + " " + body` text of one
//! record:
//!
//! - [`keywords`]: fixed-vocabulary substring detection
//! - [`sentiment`]: polarity engines and the sentiment threshold policy
//! - [`actions`]: first-match-wins action classification
//! - [`priority`]: the per-sender priority rule

pub mod actions;
pub mod keywords;
pub mod lexicon;
pub mod priority;
pub mod sentiment;

pub use actions::{classify_action, ActionRule, ACTION_RULES, DEFAULT_ACTION};
pub use keywords::{detect_keywords, KEYWORDS};
pub use lexicon::SentimentLexicon;
pub use priority::is_priority;
pub use sentiment::{classify_sentiment, AveragePolarity, CompoundPolarity, PolarityEngine};
