//! Summary table and run-level statistics.
//!
//! Builds the final table from the aggregator's output and computes:
//! - run metrics (records, drops, senders, priority senders)
//! - filtered projections (priority only, sender name search)
//! - corpus insights (daily volume, top senders, top body terms)

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::analysis::lexicon::tokenize;
use crate::domain::{EmailRecord, Language, SenderKey, SenderSummary};

/// Run-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    /// Records that survived normalization.
    pub total_records: usize,
    /// Rows dropped for an unparseable date.
    pub dropped_rows: usize,
    /// Summary rows.
    pub distinct_senders: usize,
    /// Summary rows whose priority flag is set.
    pub priority_senders: usize,
}

/// Filter over an already-built table.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    /// Only include priority senders.
    pub priority_only: bool,
    /// Case-insensitive substring of the sender name.
    pub name_query: Option<String>,
}

impl SummaryFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters to priority senders.
    pub fn priority(mut self) -> Self {
        self.priority_only = true;
        self
    }

    /// Adds a sender name search. An empty query matches everything.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.name_query = (!query.trim().is_empty()).then_some(query);
        self
    }

    /// Checks if a summary row matches this filter.
    pub fn matches(&self, summary: &SenderSummary) -> bool {
        if self.priority_only && !summary.priority_flag() {
            return false;
        }

        if let Some(ref query) = self.name_query {
            let query_lower = query.to_lowercase();
            if !summary.sender_name.to_lowercase().contains(&query_lower) {
                return false;
            }
        }

        true
    }
}

/// Ordered summary rows plus optional AI summaries keyed by sender.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    rows: Vec<SenderSummary>,
    total_records: usize,
    dropped_rows: usize,
    ai_summaries: HashMap<SenderKey, String>,
}

impl SummaryTable {
    /// Sorts by message count, descending. The sort is stable, so equal
    /// counts keep the aggregator's first-appearance order.
    pub fn build(mut summaries: Vec<SenderSummary>, total_records: usize, dropped_rows: usize) -> Self {
        summaries.sort_by(|a, b| b.message_count.cmp(&a.message_count));

        Self {
            rows: summaries,
            total_records,
            dropped_rows,
            ai_summaries: HashMap::new(),
        }
    }

    pub fn rows(&self) -> &[SenderSummary] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Counters for this run; the priority count is evaluated now.
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            total_records: self.total_records,
            dropped_rows: self.dropped_rows,
            distinct_senders: self.rows.len(),
            priority_senders: self.rows.iter().filter(|s| s.priority_flag()).count(),
        }
    }

    /// Rows matching `filter`, in table order.
    pub fn filter(&self, filter: &SummaryFilter) -> Vec<&SenderSummary> {
        self.rows.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Attaches AI summary text to a sender row.
    pub fn set_ai_summary(&mut self, key: SenderKey, text: impl Into<String>) {
        self.ai_summaries.insert(key, text.into());
    }

    pub fn ai_summary(&self, key: &SenderKey) -> Option<&str> {
        self.ai_summaries.get(key).map(String::as_str)
    }

    pub fn has_ai_summaries(&self) -> bool {
        !self.ai_summaries.is_empty()
    }
}

/// Records per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub count: usize,
}

/// Records per display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderVolume {
    pub name: String,
    pub count: usize,
}

/// Occurrences of one body term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Corpus-wide views used by charts and word clouds downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusInsights {
    pub daily_volume: Vec<DailyVolume>,
    pub top_senders: Vec<SenderVolume>,
    pub top_terms: Vec<TermFrequency>,
}

impl CorpusInsights {
    pub fn compute(records: &[EmailRecord], top_n: usize) -> Self {
        Self {
            daily_volume: daily_volume(records),
            top_senders: top_senders(records, top_n),
            top_terms: top_terms(records, top_n),
        }
    }
}

/// Record count per date, ascending.
pub fn daily_volume(records: &[EmailRecord]) -> Vec<DailyVolume> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        *per_day.entry(record.timestamp.date()).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(date, count)| DailyVolume { date, count })
        .collect()
}

/// Counts in first-appearance order, then a stable sort by count.
fn ranked<'a>(items: impl Iterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// The `n` most frequent display names.
pub fn top_senders(records: &[EmailRecord], n: usize) -> Vec<SenderVolume> {
    ranked(records.iter().map(|r| r.display_name.as_str()), n)
        .into_iter()
        .map(|(name, count)| SenderVolume { name, count })
        .collect()
}

/// Words too common to say anything about a mailbox.
const STOP_WORDS: &[&str] = &[
    // Spanish
    "que", "los", "las", "del", "por", "para", "con", "una", "uno", "unos", "unas", "como",
    "más", "pero", "sus", "les", "este", "esta", "estos", "estas", "ese", "esa", "eso", "hay",
    "ser", "son", "fue", "han", "has", "muy", "sin", "sobre", "también", "hasta", "desde",
    "cuando", "donde", "todo", "todos", "nos", "ya", "usted", "ustedes", "saludos", "hola",
    "gracias", "favor", "quedo", "atento", "atenta", "cordialmente", "estimado", "estimada",
    // English
    "the", "and", "for", "you", "your", "are", "with", "this", "that", "from", "have", "was",
    "will", "not", "but", "all", "can", "our", "please", "thanks", "regards",
];

/// The `n` most frequent body terms: alphabetic, at least three
/// characters, stop words removed.
pub fn top_terms(records: &[EmailRecord], n: usize) -> Vec<TermFrequency> {
    let terms = records.iter().flat_map(|r| {
        tokenize(&r.body).filter(|token| {
            token.chars().count() >= 3
                && token.chars().all(char::is_alphabetic)
                && !STOP_WORDS.contains(token)
        })
    });

    ranked(terms, n)
        .into_iter()
        .map(|(term, count)| TermFrequency { term, count })
        .collect()
}

/// Serializable view of a filtered table.
#[derive(Debug, Serialize)]
pub struct ReportExport {
    pub metrics: RunMetrics,
    pub senders: Vec<SenderRowExport>,
    pub insights: CorpusInsights,
}

/// One sender row with labels rendered in the export language.
#[derive(Debug, Serialize)]
pub struct SenderRowExport {
    pub sender_name: String,
    pub sender_email: String,
    pub message_count: usize,
    pub keywords: Vec<String>,
    pub sentiment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_sentiment: Option<String>,
    pub priority: bool,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

impl ReportExport {
    pub fn new(
        table: &SummaryTable,
        filter: &SummaryFilter,
        insights: &CorpusInsights,
        language: Language,
    ) -> Self {
        let senders = table
            .filter(filter)
            .into_iter()
            .map(|s| SenderRowExport {
                sender_name: s.sender_name.clone(),
                sender_email: s.sender_email.clone(),
                message_count: s.message_count,
                keywords: s.keywords.iter().map(String::from).collect(),
                sentiment: s.sentiment_label.label(language).to_string(),
                secondary_sentiment: s
                    .secondary_sentiment
                    .map(|sentiment| sentiment.label(language).to_string()),
                priority: s.priority_flag(),
                action: s.action_category.label(language).to_string(),
                ai_summary: table.ai_summary(&s.key).map(String::from),
            })
            .collect();

        Self {
            metrics: table.metrics(),
            senders,
            insights: insights.clone(),
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
