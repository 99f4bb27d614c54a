//! inbox-digest - Per-sender triage digest for exported mailboxes
//!
//! This crate reads an Outlook CSV export, normalizes the rows and reduces
//! them to one summary per sender: detected keywords, dominant sentiment, a
//! priority flag and a heuristic action category. Optional AI summaries are
//! generated through an OpenAI-compatible provider.

pub mod analysis;
pub mod app;
pub mod config;
pub mod domain;
pub mod providers;
pub mod services;
pub mod storage;

pub use app::App;
