//! Digest settings and configuration types.
//!
//! Settings are persisted to `~/.config/inbox-digest/settings.json` (or the
//! platform equivalent). A missing file means defaults, and every section
//! fills in missing fields from its `Default`, so partial files load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::Language;

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How the input export is read.
    pub input: InputSettings,
    /// Grouping and extractor options.
    pub analysis: AnalysisSettings,
    /// Optional AI summaries.
    pub ai: AiSettings,
    /// Output table options.
    pub export: ExportSettings,
}

impl Settings {
    /// Default settings file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "inbox-digest")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Day/month ordering for ambiguous numeric dates like `03/04/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `dd/mm/yyyy`.
    #[default]
    DayFirst,
    /// `mm/dd/yyyy`.
    MonthFirst,
}

/// Accepted header names for each logical input field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub from: Vec<String>,
    pub subject: Vec<String>,
    pub body: Vec<String>,
    pub date: Vec<String>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            from: names(&["De", "From", "Remitente"]),
            subject: names(&["Asunto", "Subject"]),
            body: names(&["Cuerpo", "Body", "Mensaje"]),
            date: names(&["Fecha", "Date", "Fecha de envío", "Sent", "Received"]),
        }
    }
}

/// How the input export is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Field delimiter.
    pub delimiter: char,
    /// Ordering for ambiguous numeric dates.
    pub date_order: DateOrder,
    /// Header names per field.
    pub columns: ColumnNames,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_order: DateOrder::DayFirst,
            columns: ColumnNames::default(),
        }
    }
}

/// How records are grouped into senders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderGrouping {
    /// Group by lower-cased address only.
    #[default]
    EmailOnly,
    /// Group by folded display name and address.
    NameAndEmail,
}

/// Grouping and extractor options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub grouping: SenderGrouping,
    /// Also score with the compound engine and report it as a second column.
    pub secondary_sentiment: bool,
    /// Entries in the top senders and top terms lists.
    pub top_n: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            grouping: SenderGrouping::EmailOnly,
            secondary_sentiment: true,
            top_n: 10,
        }
    }
}

/// Which AI backend serves summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    OpenAi,
    Ollama,
}

/// Optional per-sender AI summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Master switch; when off the summary column holds a placeholder.
    pub enabled: bool,
    pub provider: AiProviderKind,
    /// Endpoint override (self-hosted or compatible APIs).
    pub base_url: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature (0.0 to 1.0).
    pub temperature: f32,
    /// Maximum tokens in a summary.
    pub max_tokens: Option<usize>,
    /// System prompt for summarization.
    pub system_prompt: String,
    /// Sender text is cut to this many characters before sending.
    pub max_input_chars: usize,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: AiProviderKind::OpenAi,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: Some(200),
            system_prompt: "Resume en dos frases los correos de este remitente e indica si \
                            hay acciones pendientes."
                .to_string(),
            max_input_chars: 4000,
        }
    }
}

/// Output table options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Label and header language.
    pub language: Language,
    /// Whether the sender address column is written.
    pub include_email: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            language: Language::Es,
            include_email: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        assert!(!settings.ai.enabled);
        assert_eq!(settings.input.delimiter, ',');
        assert_eq!(settings.input.date_order, DateOrder::DayFirst);
        assert_eq!(settings.analysis.grouping, SenderGrouping::EmailOnly);
        assert_eq!(settings.export.language, Language::Es);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let json = r#"{ "analysis": { "grouping": "name_and_email" }, "export": { "language": "en" } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.analysis.grouping, SenderGrouping::NameAndEmail);
        assert!(settings.analysis.secondary_sentiment);
        assert_eq!(settings.export.language, Language::En);
        assert!(settings.export.include_email);
        assert_eq!(settings.ai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn settings_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.ai.enabled = true;
        settings.ai.provider = AiProviderKind::Ollama;
        settings.input.date_order = DateOrder::MonthFirst;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.ai.enabled);
        assert_eq!(loaded.ai.provider, AiProviderKind::Ollama);
        assert_eq!(loaded.input.date_order, DateOrder::MonthFirst);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert!(!settings.ai.enabled);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
    }

    #[test]
    fn column_defaults_cover_spanish_and_english() {
        let columns = ColumnNames::default();
        assert!(columns.from.contains(&"De".to_string()));
        assert!(columns.from.contains(&"From".to_string()));
        assert!(columns.date.contains(&"Fecha".to_string()));
    }
}
