//! Sender aggregation.
//!
//! Groups normalized records by [`SenderKey`], runs every extractor on each
//! record and reduces the results to one [`SenderSummary`] per sender:
//! - keywords: union, first-seen order
//! - sentiment and action: most frequent label, ties to the earliest seen
//!
//! The polarity engines are built once per run and injected here; nothing is
//! shared between runs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::{
    classify_action, classify_sentiment, detect_keywords, AveragePolarity, CompoundPolarity,
    PolarityEngine, SentimentLexicon,
};
use crate::config::{AnalysisSettings, SenderGrouping};
use crate::domain::{
    fold_name, ActionCategory, EmailRecord, KeywordSet, SenderKey, SenderSummary, Sentiment,
};

/// Everything the extractors report for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageFeatures {
    pub keywords: KeywordSet,
    pub sentiment: Sentiment,
    pub secondary_sentiment: Option<Sentiment>,
    pub action: ActionCategory,
}

/// Records sharing one sender key, in input order.
#[derive(Debug, Clone)]
pub struct SenderGroup<'a> {
    pub key: SenderKey,
    pub records: Vec<&'a EmailRecord>,
}

impl SenderGroup<'_> {
    /// First explicit display name in the group, else the first fallback name.
    pub fn sender_name(&self) -> String {
        self.records
            .iter()
            .find(|r| r.has_display_name)
            .or_else(|| self.records.first())
            .map(|r| r.display_name.clone())
            .unwrap_or_default()
    }

    pub fn sender_email(&self) -> String {
        self.records
            .first()
            .map(|r| r.email_address.clone())
            .unwrap_or_default()
    }
}

/// Most frequent value; among equal counts the one seen first wins.
pub fn dominant<T: PartialEq + Copy>(labels: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

/// Groups records and builds one summary per sender.
pub struct SenderAggregator {
    grouping: SenderGrouping,
    primary: Arc<dyn PolarityEngine>,
    secondary: Option<Arc<dyn PolarityEngine>>,
}

impl SenderAggregator {
    /// Creates an aggregator with a single polarity engine.
    pub fn new(grouping: SenderGrouping, primary: Arc<dyn PolarityEngine>) -> Self {
        Self {
            grouping,
            primary,
            secondary: None,
        }
    }

    /// Adds a second engine whose dominant label is reported separately.
    pub fn with_secondary(mut self, engine: Arc<dyn PolarityEngine>) -> Self {
        self.secondary = Some(engine);
        self
    }

    /// Builds the bundled engines over one shared lexicon.
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        let lexicon = Arc::new(SentimentLexicon::new());
        let aggregator = Self::new(
            settings.grouping,
            Arc::new(AveragePolarity::new(Arc::clone(&lexicon))),
        );

        if settings.secondary_sentiment {
            aggregator.with_secondary(Arc::new(CompoundPolarity::new(lexicon)))
        } else {
            aggregator
        }
    }

    pub fn grouping(&self) -> SenderGrouping {
        self.grouping
    }

    /// Grouping key for a record.
    ///
    /// A record without an address is keyed by its folded display name so
    /// malformed headers still group consistently.
    pub fn key_for(&self, record: &EmailRecord) -> SenderKey {
        if record.email_address.is_empty() {
            return SenderKey {
                name: Some(fold_name(&record.display_name)),
                email: String::new(),
            };
        }

        match self.grouping {
            SenderGrouping::EmailOnly => SenderKey::by_email(record.email_address.clone()),
            SenderGrouping::NameAndEmail => {
                SenderKey::by_name_and_email(&record.display_name, record.email_address.clone())
            }
        }
    }

    /// Groups records by sender, in order of first appearance.
    pub fn group<'a>(&self, records: &'a [EmailRecord]) -> Vec<SenderGroup<'a>> {
        let mut index: HashMap<SenderKey, usize> = HashMap::new();
        let mut groups: Vec<SenderGroup<'a>> = Vec::new();

        for record in records {
            let key = self.key_for(record);
            match index.get(&key) {
                Some(&i) => groups[i].records.push(record),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(SenderGroup {
                        key,
                        records: vec![record],
                    });
                }
            }
        }

        groups
    }

    /// Runs every extractor on one record.
    pub fn extract(&self, record: &EmailRecord) -> MessageFeatures {
        let text = record.text();
        MessageFeatures {
            keywords: detect_keywords(&text),
            sentiment: classify_sentiment(self.primary.as_ref(), &text),
            secondary_sentiment: self
                .secondary
                .as_ref()
                .map(|engine| classify_sentiment(engine.as_ref(), &text)),
            action: classify_action(&text),
        }
    }

    /// Reduces one group to its summary.
    pub fn summarize(&self, group: &SenderGroup<'_>) -> SenderSummary {
        let features: Vec<MessageFeatures> = group.records.iter().map(|r| self.extract(r)).collect();

        let mut keywords = KeywordSet::new();
        for f in &features {
            keywords.union_with(&f.keywords);
        }

        let sentiment_label =
            dominant(features.iter().map(|f| f.sentiment)).unwrap_or(Sentiment::Neutral);
        let secondary_sentiment = dominant(features.iter().filter_map(|f| f.secondary_sentiment));
        let action_category = dominant(features.iter().map(|f| f.action))
            .unwrap_or(crate::analysis::DEFAULT_ACTION);

        let summary = SenderSummary {
            key: group.key.clone(),
            sender_name: group.sender_name(),
            sender_email: group.sender_email(),
            message_count: group.records.len(),
            keywords,
            sentiment_label,
            secondary_sentiment,
            action_category,
        };

        tracing::debug!(
            sender = %summary.key,
            messages = summary.message_count,
            keywords = summary.keywords.len(),
            sentiment = ?summary.sentiment_label,
            action = ?summary.action_category,
            "Summarized sender"
        );

        summary
    }

    /// One summary per distinct sender, in order of first appearance.
    pub fn aggregate(&self, records: &[EmailRecord]) -> Vec<SenderSummary> {
        self.group(records)
            .iter()
            .map(|group| self.summarize(group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: Option<&str>, email: &str, subject: &str, body: &str) -> EmailRecord {
        let local = email.split('@').next().unwrap_or_default();
        EmailRecord {
            display_name: name.unwrap_or(local).to_string(),
            email_address: email.to_string(),
            has_display_name: name.is_some(),
            subject: subject.to_string(),
            body: body.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    /// Scores by looking for marker words, so tests control sentiment exactly.
    struct MarkerPolarity;

    impl PolarityEngine for MarkerPolarity {
        fn name(&self) -> &str {
            "marker"
        }

        fn polarity(&self, text: &str) -> f64 {
            if text.contains("+pos") {
                0.9
            } else if text.contains("+neg") {
                -0.9
            } else {
                0.0
            }
        }
    }

    fn aggregator(grouping: SenderGrouping) -> SenderAggregator {
        SenderAggregator::new(grouping, Arc::new(MarkerPolarity))
    }

    #[test]
    fn dominant_prefers_first_seen_on_ties() {
        assert_eq!(dominant(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(dominant(["a", "b", "b"]), Some("b"));
        assert_eq!(dominant(Vec::<u8>::new()), None);
    }

    #[test]
    fn groups_bare_and_named_headers_by_address() {
        let records = vec![
            record(Some("John Doe"), "j@x.com", "hola", ""),
            record(None, "j@x.com", "otra", ""),
        ];
        let summaries = aggregator(SenderGrouping::EmailOnly).aggregate(&records);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].sender_name, "John Doe");
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn name_and_email_grouping_splits_names() {
        let records = vec![
            record(Some("John Doe"), "j@x.com", "", ""),
            record(Some("JOHN  doe"), "j@x.com", "", ""),
            record(Some("Jane"), "j@x.com", "", ""),
        ];
        let summaries = aggregator(SenderGrouping::NameAndEmail).aggregate(&records);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].message_count, 2);
        assert_eq!(summaries[1].sender_name, "Jane");
    }

    #[test]
    fn message_counts_cover_every_record() {
        let records = vec![
            record(None, "a@x.com", "", ""),
            record(None, "b@x.com", "", ""),
            record(None, "a@x.com", "", ""),
            record(None, "c@x.com", "", ""),
        ];
        let summaries = aggregator(SenderGrouping::EmailOnly).aggregate(&records);
        let total: usize = summaries.iter().map(|s| s.message_count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn keywords_union_across_messages() {
        let records = vec![
            record(None, "a@x.com", "informe", "favor"),
            record(None, "a@x.com", "plazo", "informe"),
        ];
        let summary = &aggregator(SenderGrouping::EmailOnly).aggregate(&records)[0];
        assert_eq!(
            summary.keywords.iter().collect::<Vec<_>>(),
            vec!["favor", "informe", "plazo"]
        );
    }

    #[test]
    fn empty_keywords_stay_explicit() {
        let records = vec![record(None, "a@x.com", "hola", "que tal")];
        let summary = &aggregator(SenderGrouping::EmailOnly).aggregate(&records)[0];
        assert!(summary.keywords.is_empty());
    }

    #[test]
    fn sentiment_tie_goes_to_first_seen() {
        let records = vec![
            record(None, "a@x.com", "+neg", ""),
            record(None, "a@x.com", "+pos", ""),
        ];
        let summary = &aggregator(SenderGrouping::EmailOnly).aggregate(&records)[0];
        assert_eq!(summary.sentiment_label, Sentiment::Negative);
        assert!(summary.priority_flag());
    }

    #[test]
    fn action_dominant_by_frequency() {
        let records = vec![
            record(None, "a@x.com", "fyi", ""),
            record(None, "a@x.com", "realizar carga", ""),
            record(None, "a@x.com", "realizar cambio", ""),
        ];
        let summary = &aggregator(SenderGrouping::EmailOnly).aggregate(&records)[0];
        assert_eq!(summary.action_category, ActionCategory::OwnTask);
    }

    #[test]
    fn secondary_engine_is_optional() {
        let records = vec![record(None, "a@x.com", "+pos", "")];

        let single = aggregator(SenderGrouping::EmailOnly).aggregate(&records);
        assert_eq!(single[0].secondary_sentiment, None);

        let dual = aggregator(SenderGrouping::EmailOnly)
            .with_secondary(Arc::new(MarkerPolarity))
            .aggregate(&records);
        assert_eq!(dual[0].secondary_sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn scenario_urgent_review_request() {
        let records = vec![record(None, "a@x.com", "favor revisar el informe urgente", "")];
        let summary = &aggregator(SenderGrouping::EmailOnly).aggregate(&records)[0];

        let mut keywords: Vec<_> = summary.keywords.iter().collect();
        keywords.sort_unstable();
        assert_eq!(keywords, vec!["favor", "informe", "revisar", "urgente"]);
        assert_eq!(summary.action_category, ActionCategory::RespondNow);
        assert!(summary.priority_flag());
    }

    #[test]
    fn missing_address_groups_by_name() {
        let records = vec![record(Some("Sistema"), "", "", ""), record(Some("sistema"), "", "", "")];
        let summaries = aggregator(SenderGrouping::EmailOnly).aggregate(&records);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn from_settings_builds_both_engines() {
        let settings = AnalysisSettings::default();
        let aggregator = SenderAggregator::from_settings(&settings);
        let features = aggregator.extract(&record(None, "a@x.com", "excelente, gracias", ""));

        assert_eq!(features.sentiment, Sentiment::Positive);
        assert_eq!(features.secondary_sentiment, Some(Sentiment::Positive));
    }
}
