//! External service providers.
//!
//! - [`ai`] - LLM providers used for the optional per-sender summaries

pub mod ai;
