//! Business services layer.
//!
//! Services sit between the application layer and the infrastructure layer:
//!
//! ```text
//! Application Layer (CLI)
//!          |
//!          v
//!    Services Layer  <-- You are here
//!          |
//!          v
//! Infrastructure (CSV storage, AI providers)
//! ```
//!
//! # Services Overview
//!
//! - [`Normalizer`]: Turns raw export rows into typed records, dropping bad dates
//! - [`SenderAggregator`]: Groups records by sender and reduces per-message features
//! - [`SummaryTable`]: Sorted sender rows, run metrics and filtered projections
//! - [`SummaryService`]: Optional per-sender AI summaries
//! - [`DigestPipeline`]: Runs the synchronous core end to end

pub mod aggregation_service;
pub mod normalizer_service;
pub mod pipeline;
pub mod report_service;
pub mod summary_service;

pub use aggregation_service::{dominant, MessageFeatures, SenderAggregator, SenderGroup};
pub use normalizer_service::{ChronoTimestampParser, NormalizeOutcome, Normalizer, TimestampParser};
pub use pipeline::{DigestPipeline, DigestReport, RunOutcome};
pub use report_service::{
    daily_volume, top_senders, top_terms, CorpusInsights, DailyVolume, ReportExport, RunMetrics,
    SenderRowExport, SenderVolume, SummaryFilter, SummaryTable, TermFrequency,
};
pub use summary_service::{unavailable_label, SummaryBackend, SummaryService};
