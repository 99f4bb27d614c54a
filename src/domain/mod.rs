//! Domain layer types for the digest.
//!
//! This module contains the value types the pipeline passes around: raw and
//! normalized email records, sender identities, categorical labels and the
//! per-sender summary row.

mod email;
mod summary;
mod types;

pub use email::{Address, EmailRecord, RawRow};
pub use summary::{KeywordSet, SenderSummary};
pub(crate) use types::fold_name;
pub use types::{
    no_keywords_label, priority_from_label, priority_label, ActionCategory, Language, SenderKey,
    Sentiment,
};
