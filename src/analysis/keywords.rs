//! Keyword detection.
//!
//! Matching is plain substring search over the combined text, so a keyword
//! embedded in a longer word counts (`entrega` matches `entregados`).

use crate::domain::KeywordSet;

/// Fixed vocabulary, in reporting order.
pub const KEYWORDS: [&str; 9] = [
    "urgente",
    "favor",
    "reunión",
    "entrega",
    "plazo",
    "respuesta",
    "pendiente",
    "informe",
    "revisar",
];

/// Returns the vocabulary words occurring in `text`, in vocabulary order.
///
/// `text` is expected to be lower-cased already.
pub fn detect_keywords(text: &str) -> KeywordSet {
    KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| text.contains(*keyword))
        .collect()
}
