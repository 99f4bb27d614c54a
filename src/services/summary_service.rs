//! Optional per-sender AI summaries.
//!
//! The summarizer is a boundary: it never fails the run. An unconfigured
//! backend yields a fixed placeholder and a provider error becomes the
//! row-level text `Error: <reason>`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{AiProviderKind, AiSettings};
use crate::domain::{EmailRecord, Language};
use crate::providers::ai::{
    CompletionRequest, FinishReason, LlmProvider, Message, OpenAiCompatibleProvider,
};
use crate::services::aggregation_service::SenderAggregator;
use crate::services::report_service::{SummaryFilter, SummaryTable};

/// Where summaries come from.
#[derive(Clone)]
pub enum SummaryBackend {
    /// No provider; every sender gets the placeholder.
    Unconfigured,
    /// A live LLM provider.
    Provider(Arc<dyn LlmProvider>),
}

impl std::fmt::Debug for SummaryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "Unconfigured"),
            Self::Provider(p) => write!(f, "Provider({}/{})", p.name(), p.model()),
        }
    }
}

/// Placeholder shown when no summarizer is configured.
pub fn unavailable_label(language: Language) -> &'static str {
    match language {
        Language::Es => "Resumen IA no disponible",
        Language::En => "AI summary unavailable",
    }
}

/// Cuts `text` to at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Generates one summary per sender group.
#[derive(Debug)]
pub struct SummaryService {
    backend: SummaryBackend,
    settings: AiSettings,
    language: Language,
}

impl SummaryService {
    pub fn new(backend: SummaryBackend, settings: AiSettings) -> Self {
        Self {
            backend,
            settings,
            language: Language::default(),
        }
    }

    /// Sets the placeholder language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Builds the backend from settings.
    ///
    /// The API key environment variable is read here and nowhere else. A
    /// disabled section or a missing key leaves the service unconfigured.
    pub fn from_settings(settings: &AiSettings) -> Self {
        let backend = if !settings.enabled {
            SummaryBackend::Unconfigured
        } else {
            match settings.provider {
                AiProviderKind::Ollama => SummaryBackend::Provider(Arc::new(
                    OpenAiCompatibleProvider::ollama(settings.base_url.clone(), &settings.model),
                )),
                AiProviderKind::OpenAi => match std::env::var(&settings.api_key_env) {
                    Ok(key) if !key.trim().is_empty() => {
                        let provider = match settings.base_url {
                            Some(ref url) => OpenAiCompatibleProvider::custom(
                                "openai",
                                url,
                                Some(key),
                                &settings.model,
                            ),
                            None => OpenAiCompatibleProvider::openai(key, &settings.model),
                        };
                        SummaryBackend::Provider(Arc::new(provider))
                    }
                    _ => {
                        tracing::warn!(
                            env = %settings.api_key_env,
                            "AI summaries enabled but no API key found"
                        );
                        SummaryBackend::Unconfigured
                    }
                },
            }
        };

        Self::new(backend, settings.clone())
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, SummaryBackend::Provider(_))
    }

    /// Summarizes one block of text. Never fails.
    pub async fn summarize(&self, text: &str) -> String {
        let provider = match self.backend {
            SummaryBackend::Unconfigured => return unavailable_label(self.language).to_string(),
            SummaryBackend::Provider(ref provider) => provider,
        };

        let input = truncate_chars(text, self.settings.max_input_chars);
        let request = CompletionRequest::new(vec![Message::user(input)])
            .with_system_prompt(self.settings.system_prompt.clone())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        match provider.complete(&request).await {
            Ok(response) => {
                if response.finish_reason == FinishReason::Length {
                    tracing::warn!(
                        provider = provider.name(),
                        max_tokens = ?self.settings.max_tokens,
                        "Summary cut off at the token limit"
                    );
                }
                tracing::debug!(tokens = ?response.total_tokens, "Summary generated");
                response.text.trim().to_string()
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), "Summary failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }

    /// Attaches a summary to every sender row in `table` that `filter` keeps.
    ///
    /// `records` and `aggregator` must be the ones the table was built from so
    /// group keys line up with the rows.
    pub async fn annotate(
        &self,
        table: &mut SummaryTable,
        records: &[EmailRecord],
        aggregator: &SenderAggregator,
        filter: &SummaryFilter,
    ) {
        let wanted: HashSet<_> = table
            .filter(filter)
            .into_iter()
            .map(|s| s.key.clone())
            .collect();

        for group in aggregator.group(records) {
            if !wanted.contains(&group.key) {
                continue;
            }

            let text = group
                .records
                .iter()
                .map(|r| r.text())
                .collect::<Vec<_>>()
                .join("\n");

            let summary = self.summarize(&text).await;
            tracing::debug!(sender = %group.key, chars = summary.len(), "Attached AI summary");
            table.set_ai_summary(group.key, summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PolarityEngine;
    use crate::config::SenderGrouping;
    use crate::providers::ai::{CompletionResponse, FinishReason, LlmError, LlmResult};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Echoes the length of its input, or fails for a marker word.
    struct MockProvider {
        prompts: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-1"
        }

        async fn complete(&self, request: &CompletionRequest) -> LlmResult<CompletionResponse> {
            let content = request.messages[0].content.clone();
            self.prompts.lock().unwrap().push(content.clone());

            if content.contains("boom") {
                return Err(LlmError::Unavailable("offline".to_string()));
            }
            if content.contains("largo") {
                return Ok(CompletionResponse {
                    text: "resumen cortado".to_string(),
                    total_tokens: Some(50),
                    finish_reason: FinishReason::Length,
                });
            }

            Ok(CompletionResponse {
                text: format!("  resumen de {} caracteres \n", content.chars().count()),
                total_tokens: Some(10),
                finish_reason: FinishReason::Stop,
            })
        }
    }

    struct Flat;

    impl PolarityEngine for Flat {
        fn name(&self) -> &str {
            "flat"
        }

        fn polarity(&self, _text: &str) -> f64 {
            0.0
        }
    }

    fn record(email: &str, subject: &str) -> EmailRecord {
        EmailRecord {
            display_name: email.to_string(),
            email_address: email.to_string(),
            has_display_name: false,
            subject: subject.to_string(),
            body: String::new(),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn settings(max_input_chars: usize) -> AiSettings {
        AiSettings {
            enabled: true,
            max_input_chars,
            ..AiSettings::default()
        }
    }

    #[tokio::test]
    async fn unconfigured_yields_placeholder() {
        let service = SummaryService::new(SummaryBackend::Unconfigured, AiSettings::default());
        assert!(!service.is_configured());
        assert_eq!(service.summarize("hola").await, "Resumen IA no disponible");

        let service = service.with_language(Language::En);
        assert_eq!(service.summarize("hola").await, "AI summary unavailable");
    }

    #[tokio::test]
    async fn provider_failure_becomes_row_error() {
        let provider = Arc::new(MockProvider::new());
        let service = SummaryService::new(SummaryBackend::Provider(provider), settings(100));

        let text = service.summarize("boom").await;
        assert!(text.starts_with("Error: "));
        assert!(text.contains("offline"));
    }

    #[tokio::test]
    async fn input_is_truncated_by_characters() {
        let provider = Arc::new(MockProvider::new());
        let service =
            SummaryService::new(SummaryBackend::Provider(provider.clone()), settings(5));

        let text = service.summarize("reunión mañana").await;
        assert_eq!(text, "resumen de 5 caracteres");
        assert_eq!(provider.prompts.lock().unwrap()[0], "reuni");
    }

    #[tokio::test]
    async fn annotate_covers_every_sender() {
        let records = vec![
            record("a@x.com", "uno"),
            record("b@x.com", "boom"),
            record("a@x.com", "dos"),
        ];
        let aggregator = SenderAggregator::new(SenderGrouping::EmailOnly, Arc::new(Flat));
        let mut table = SummaryTable::build(aggregator.aggregate(&records), records.len(), 0);

        let provider = Arc::new(MockProvider::new());
        let service = SummaryService::new(SummaryBackend::Provider(provider.clone()), settings(4000));
        service
            .annotate(&mut table, &records, &aggregator, &SummaryFilter::new())
            .await;

        assert!(table.has_ai_summaries());
        for row in table.rows() {
            assert!(table.ai_summary(&row.key).is_some());
        }

        let a = table.rows().iter().find(|r| r.sender_email == "a@x.com").unwrap();
        assert!(table.ai_summary(&a.key).unwrap().starts_with("resumen"));
        let b = table.rows().iter().find(|r| r.sender_email == "b@x.com").unwrap();
        assert!(table.ai_summary(&b.key).unwrap().starts_with("Error: "));

        // One call per sender, not per record
        assert_eq!(provider.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn annotate_skips_rows_outside_filter() {
        let records = vec![
            record("a@x.com", "uno"),
            record("b@x.com", "dos"),
            record("a@x.com", "tres"),
        ];
        let aggregator = SenderAggregator::new(SenderGrouping::EmailOnly, Arc::new(Flat));
        let mut table = SummaryTable::build(aggregator.aggregate(&records), records.len(), 0);

        let provider = Arc::new(MockProvider::new());
        let service = SummaryService::new(SummaryBackend::Provider(provider.clone()), settings(4000));
        let filter = SummaryFilter::new().search("b@");
        service.annotate(&mut table, &records, &aggregator, &filter).await;

        let a = table.rows().iter().find(|r| r.sender_email == "a@x.com").unwrap();
        let b = table.rows().iter().find(|r| r.sender_email == "b@x.com").unwrap();
        assert_eq!(table.ai_summary(&a.key), None);
        assert!(table.ai_summary(&b.key).is_some());
        assert_eq!(provider.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn length_limited_summary_is_kept() {
        let provider = Arc::new(MockProvider::new());
        let service = SummaryService::new(SummaryBackend::Provider(provider), settings(100));

        assert_eq!(service.summarize("un correo largo").await, "resumen cortado");
    }

    #[test]
    fn disabled_settings_are_unconfigured() {
        let service = SummaryService::from_settings(&AiSettings::default());
        assert!(!service.is_configured());

        let ollama = AiSettings {
            enabled: true,
            provider: AiProviderKind::Ollama,
            ..AiSettings::default()
        };
        assert!(SummaryService::from_settings(&ollama).is_configured());
    }
}
