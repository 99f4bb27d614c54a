//! Core categorical types shared by the extractors, aggregator and exporters.
//!
//! Every label type knows how to render itself in the supported output
//! languages and how to read that rendering back, so an exported table can be
//! re-parsed without loss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output language for labels and column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Spanish labels (`Positivo`, `Sí`, `Ninguna`, ...).
    #[default]
    Es,
    /// English labels (`Positive`, `Yes`, `None`, ...).
    En,
}

/// Identity used to group records into one summary row.
///
/// The email component is already lower-cased by the normalizer. The name
/// component is only populated under name-and-address grouping and is
/// case-folded with whitespace collapsed, so `"John  DOE"` and `"john doe"`
/// land in the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderKey {
    /// Folded display name, when grouping by name and address.
    pub name: Option<String>,
    /// Lower-cased address, or the folded header text when no address exists.
    pub email: String,
}

impl SenderKey {
    /// Key for address-only grouping.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Key for name-and-address grouping.
    pub fn by_name_and_email(name: &str, email: impl Into<String>) -> Self {
        Self {
            name: Some(fold_name(name)),
            email: email.into(),
        }
    }
}

impl fmt::Display for SenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Lower-cases a display name and collapses internal whitespace.
pub(crate) fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Sentiment bucket derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Polarity above this value is positive.
    pub const POSITIVE_THRESHOLD: f64 = 0.2;
    /// Polarity below this value is negative.
    pub const NEGATIVE_THRESHOLD: f64 = -0.2;

    /// Buckets a polarity in `[-1, 1]`. Both thresholds are exclusive.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > Self::POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < Self::NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (Sentiment::Positive, Language::Es) => "Positivo",
            (Sentiment::Negative, Language::Es) => "Negativo",
            (Sentiment::Neutral, Language::Es) => "Neutro",
            (Sentiment::Positive, Language::En) => "Positive",
            (Sentiment::Negative, Language::En) => "Negative",
            (Sentiment::Neutral, Language::En) => "Neutral",
        }
    }

    /// Reads back a label written in either language.
    pub fn from_label(label: &str) -> Option<Self> {
        [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
            .into_iter()
            .find(|s| s.label(Language::Es) == label || s.label(Language::En) == label)
    }
}

/// Heuristic triage bucket for a message or sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Read and answer promptly.
    RespondNow,
    /// Hand off to someone else.
    Delegate,
    /// Informational, no action pressure.
    CanWait,
    /// Work the recipient owns.
    OwnTask,
}

impl ActionCategory {
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (ActionCategory::RespondNow, Language::Es) => "Leer y responder",
            (ActionCategory::Delegate, Language::Es) => "Delegar",
            (ActionCategory::CanWait, Language::Es) => "Puede esperar",
            (ActionCategory::OwnTask, Language::Es) => "Tarea propia",
            (ActionCategory::RespondNow, Language::En) => "Respond now",
            (ActionCategory::Delegate, Language::En) => "Delegate",
            (ActionCategory::CanWait, Language::En) => "Can wait",
            (ActionCategory::OwnTask, Language::En) => "Own task",
        }
    }

    /// Reads back a label written in either language.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            ActionCategory::RespondNow,
            ActionCategory::Delegate,
            ActionCategory::CanWait,
            ActionCategory::OwnTask,
        ]
        .into_iter()
        .find(|a| a.label(Language::Es) == label || a.label(Language::En) == label)
    }
}

/// Label for a priority flag.
pub fn priority_label(flag: bool, language: Language) -> &'static str {
    match (flag, language) {
        (true, Language::Es) => "Sí",
        (false, Language::Es) => "No",
        (true, Language::En) => "Yes",
        (false, Language::En) => "No",
    }
}

/// Reads back a priority label written in either language.
pub fn priority_from_label(label: &str) -> Option<bool> {
    match label {
        "Sí" | "Si" | "Yes" => Some(true),
        "No" => Some(false),
        _ => None,
    }
}

/// Sentinel rendered in place of an empty keyword list.
pub fn no_keywords_label(language: Language) -> &'static str {
    match language {
        Language::Es => "Ninguna",
        Language::En => "None",
    }
}
