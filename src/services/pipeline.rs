//! Single entry point from raw rows to a digest.
//!
//! Runs normalize -> aggregate -> table synchronously and to completion.
//! AI summaries are a separate async pass over the finished report, see
//! [`SummaryService::annotate`](super::SummaryService::annotate).

use crate::config::Settings;
use crate::domain::{EmailRecord, RawRow};
use crate::services::aggregation_service::SenderAggregator;
use crate::services::normalizer_service::{ChronoTimestampParser, Normalizer};
use crate::services::report_service::{CorpusInsights, SummaryTable};

/// A finished run over at least one record.
#[derive(Debug, Clone)]
pub struct DigestReport {
    pub table: SummaryTable,
    pub insights: CorpusInsights,
    /// Normalized records the table was built from, in input order.
    pub records: Vec<EmailRecord>,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No row survived normalization.
    NoData { dropped_rows: usize },
    Report(DigestReport),
}

impl RunOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn report(&self) -> Option<&DigestReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData { .. } => None,
        }
    }
}

/// The triage pipeline; built once, reusable across runs.
pub struct DigestPipeline {
    normalizer: Normalizer<ChronoTimestampParser>,
    aggregator: SenderAggregator,
    top_n: usize,
}

impl DigestPipeline {
    pub fn new(
        normalizer: Normalizer<ChronoTimestampParser>,
        aggregator: SenderAggregator,
        top_n: usize,
    ) -> Self {
        Self {
            normalizer,
            aggregator,
            top_n,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Normalizer::with_date_order(settings.input.date_order),
            SenderAggregator::from_settings(&settings.analysis),
            settings.analysis.top_n,
        )
    }

    /// The aggregator, for passes that need the same sender grouping.
    pub fn aggregator(&self) -> &SenderAggregator {
        &self.aggregator
    }

    pub fn run(&self, rows: &[RawRow]) -> RunOutcome {
        let outcome = self.normalizer.normalize(rows);

        if outcome.records.is_empty() {
            tracing::info!(
                rows = rows.len(),
                dropped = outcome.dropped,
                "No valid records after normalization"
            );
            return RunOutcome::NoData {
                dropped_rows: outcome.dropped,
            };
        }

        let summaries = self.aggregator.aggregate(&outcome.records);
        let table = SummaryTable::build(summaries, outcome.records.len(), outcome.dropped);
        let insights = CorpusInsights::compute(&outcome.records, self.top_n);

        let metrics = table.metrics();
        tracing::info!(
            records = metrics.total_records,
            dropped = metrics.dropped_rows,
            senders = metrics.distinct_senders,
            priority = metrics.priority_senders,
            "Digest complete"
        );

        RunOutcome::Report(DigestReport {
            table,
            insights,
            records: outcome.records,
        })
    }
}
