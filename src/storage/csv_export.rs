//! Summary table export.
//!
//! Writes the filtered summary table as UTF-8 CSV with a byte-order mark, so
//! spreadsheet tools pick the right encoding for `Sí` and accented names.
//! Optional columns (address, secondary sentiment, AI summary) are present
//! only when there is something to put in them. [`read_summary`] parses an
//! export back in either language.

use std::io::Write;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use thiserror::Error;

use crate::config::ExportSettings;
use crate::domain::{
    no_keywords_label, priority_from_label, ActionCategory, KeywordSet, Language, Sentiment,
};
use crate::services::{SummaryFilter, SummaryTable};

/// Errors that can occur while writing or reading an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed export row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

const BOM: &str = "\u{FEFF}";

/// Columns of an export, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Email,
    Count,
    Keywords,
    Sentiment,
    SecondarySentiment,
    Priority,
    Action,
    AiSummary,
}

impl Column {
    const ALL: [Column; 9] = [
        Column::Name,
        Column::Email,
        Column::Count,
        Column::Keywords,
        Column::Sentiment,
        Column::SecondarySentiment,
        Column::Priority,
        Column::Action,
        Column::AiSummary,
    ];

    fn header(self, language: Language) -> &'static str {
        match (self, language) {
            (Column::Name, Language::Es) => "Nombre Remitente",
            (Column::Email, Language::Es) => "Correo",
            (Column::Count, Language::Es) => "Correos Recibidos",
            (Column::Keywords, Language::Es) => "Palabras Clave",
            (Column::Sentiment, Language::Es) => "Sentimiento",
            (Column::SecondarySentiment, Language::Es) => "Sentimiento Secundario",
            (Column::Priority, Language::Es) => "¿Priorizar Respuesta?",
            (Column::Action, Language::Es) => "Clasificación de Acción",
            (Column::AiSummary, Language::Es) => "Resumen IA",
            (Column::Name, Language::En) => "Sender Name",
            (Column::Email, Language::En) => "Email",
            (Column::Count, Language::En) => "Messages Received",
            (Column::Keywords, Language::En) => "Keywords",
            (Column::Sentiment, Language::En) => "Sentiment",
            (Column::SecondarySentiment, Language::En) => "Secondary Sentiment",
            (Column::Priority, Language::En) => "Prioritize Reply?",
            (Column::Action, Language::En) => "Action",
            (Column::AiSummary, Language::En) => "AI Summary",
        }
    }

    fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| {
            c.header(Language::Es) == header || c.header(Language::En) == header
        })
    }
}

fn columns_for(table: &SummaryTable, settings: &ExportSettings) -> Vec<Column> {
    let has_secondary = table.rows().iter().any(|s| s.secondary_sentiment.is_some());

    Column::ALL
        .into_iter()
        .filter(|column| match column {
            Column::Email => settings.include_email,
            Column::SecondarySentiment => has_secondary,
            Column::AiSummary => table.has_ai_summaries(),
            _ => true,
        })
        .collect()
}

/// Writes the rows of `table` matching `filter`; returns the number written.
pub fn write_summary<W: Write>(
    mut out: W,
    table: &SummaryTable,
    filter: &SummaryFilter,
    settings: &ExportSettings,
) -> Result<usize> {
    let language = settings.language;
    let columns = columns_for(table, settings);

    out.write_all(BOM.as_bytes())?;
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(columns.iter().map(|c| c.header(language)))?;

    let rows = table.filter(filter);
    for summary in &rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| match column {
                Column::Name => summary.sender_name.clone(),
                Column::Email => summary.sender_email.clone(),
                Column::Count => summary.message_count.to_string(),
                Column::Keywords => summary.keywords.render(language),
                Column::Sentiment => summary.sentiment_label.label(language).to_string(),
                Column::SecondarySentiment => summary
                    .secondary_sentiment
                    .map(|s| s.label(language).to_string())
                    .unwrap_or_default(),
                Column::Priority => summary.priority_label(language).to_string(),
                Column::Action => summary.action_category.label(language).to_string(),
                Column::AiSummary => table
                    .ai_summary(&summary.key)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(rows.len())
}

/// Writes the filtered table to `path`.
pub fn export_summary(
    path: &Path,
    table: &SummaryTable,
    filter: &SummaryFilter,
    settings: &ExportSettings,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let written = write_summary(std::io::BufWriter::new(file), table, filter, settings)?;
    tracing::info!(path = %path.display(), rows = written, "Exported summary table");
    Ok(written)
}

/// One sender row read back from an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedRow {
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub message_count: usize,
    pub keywords: KeywordSet,
    pub sentiment: Sentiment,
    pub secondary_sentiment: Option<Sentiment>,
    pub priority: bool,
    pub action: ActionCategory,
    pub ai_summary: Option<String>,
}

fn parse_keywords(cell: &str) -> KeywordSet {
    let cell = cell.trim();
    let sentinel = [Language::Es, Language::En]
        .into_iter()
        .any(|language| cell == no_keywords_label(language));
    if cell.is_empty() || sentinel {
        return KeywordSet::new();
    }
    cell.split(',').map(str::trim).filter(|k| !k.is_empty()).collect()
}

fn parse_row(columns: &[Column], record: &StringRecord, row: usize) -> Result<ExportedRow> {
    let malformed = |reason: String| ExportError::Malformed { row, reason };

    let mut exported = ExportedRow {
        sender_name: String::new(),
        sender_email: None,
        message_count: 0,
        keywords: KeywordSet::new(),
        sentiment: Sentiment::Neutral,
        secondary_sentiment: None,
        priority: false,
        action: ActionCategory::CanWait,
        ai_summary: None,
    };

    for (column, cell) in columns.iter().zip(record.iter()) {
        match column {
            Column::Name => exported.sender_name = cell.to_string(),
            Column::Email => exported.sender_email = Some(cell.to_string()),
            Column::Count => {
                exported.message_count = cell
                    .parse()
                    .map_err(|_| malformed(format!("invalid message count {:?}", cell)))?
            }
            Column::Keywords => exported.keywords = parse_keywords(cell),
            Column::Sentiment => {
                exported.sentiment = Sentiment::from_label(cell)
                    .ok_or_else(|| malformed(format!("unknown sentiment {:?}", cell)))?
            }
            Column::SecondarySentiment => {
                exported.secondary_sentiment = if cell.is_empty() {
                    None
                } else {
                    Some(
                        Sentiment::from_label(cell)
                            .ok_or_else(|| malformed(format!("unknown sentiment {:?}", cell)))?,
                    )
                }
            }
            Column::Priority => {
                exported.priority = priority_from_label(cell)
                    .ok_or_else(|| malformed(format!("unknown priority {:?}", cell)))?
            }
            Column::Action => {
                exported.action = ActionCategory::from_label(cell)
                    .ok_or_else(|| malformed(format!("unknown action {:?}", cell)))?
            }
            Column::AiSummary => exported.ai_summary = Some(cell.to_string()),
        }
    }

    Ok(exported)
}

/// Parses an export produced by [`write_summary`], in either language.
pub fn read_summary(bytes: &[u8]) -> Result<Vec<ExportedRow>> {
    let bytes = bytes.strip_prefix(BOM.as_bytes()).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new().from_reader(bytes);

    let columns = reader
        .headers()?
        .iter()
        .map(|h| {
            Column::from_header(h).ok_or_else(|| ExportError::Malformed {
                row: 0,
                reason: format!("unknown column {:?}", h),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    reader
        .records()
        .enumerate()
        .map(|(i, record)| parse_row(&columns, &record?, i + 1))
        .collect()
}

/// Reads an export file back.
pub fn read_summary_file(path: &Path) -> Result<Vec<ExportedRow>> {
    read_summary(&std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SenderKey, SenderSummary};

    fn summary(name: &str, count: usize, keywords: &[&str], sentiment: Sentiment) -> SenderSummary {
        let email = format!("{}@x.com", name.to_lowercase());
        SenderSummary {
            key: SenderKey::by_email(email.clone()),
            sender_name: name.to_string(),
            sender_email: email,
            message_count: count,
            keywords: keywords.iter().copied().collect(),
            sentiment_label: sentiment,
            secondary_sentiment: Some(Sentiment::Neutral),
            action_category: ActionCategory::RespondNow,
        }
    }

    fn table() -> SummaryTable {
        SummaryTable::build(
            vec![
                summary("Ana", 3, &["urgente", "plazo"], Sentiment::Neutral),
                summary("Luis", 1, &[], Sentiment::Positive),
            ],
            4,
            0,
        )
    }

    fn export(table: &SummaryTable, filter: &SummaryFilter, settings: &ExportSettings) -> Vec<u8> {
        let mut out = Vec::new();
        write_summary(&mut out, table, filter, settings).unwrap();
        out
    }

    #[test]
    fn starts_with_bom_and_spanish_headers() {
        let bytes = export(&table(), &SummaryFilter::new(), &ExportSettings::default());
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with('\u{FEFF}'));
        let header = text.trim_start_matches('\u{FEFF}').lines().next().unwrap();
        assert!(header.starts_with("Nombre Remitente,Correo,Correos Recibidos"));
        assert!(header.contains("¿Priorizar Respuesta?"));
        assert!(!header.contains("Resumen IA"));
        assert!(text.contains("Ninguna"));
        assert!(text.contains(",Sí,"));
    }

    #[test]
    fn round_trip_preserves_rows() {
        let table = table();
        let bytes = export(&table, &SummaryFilter::new(), &ExportSettings::default());
        let rows = read_summary(&bytes).unwrap();

        assert_eq!(rows.len(), 2);
        for (row, written) in rows.iter().zip(table.rows()) {
            assert_eq!(row.sender_name, written.sender_name);
            assert_eq!(row.sender_email.as_deref(), Some(written.sender_email.as_str()));
            assert_eq!(row.message_count, written.message_count);
            assert_eq!(row.keywords, written.keywords);
            assert_eq!(row.sentiment, written.sentiment_label);
            assert_eq!(row.secondary_sentiment, written.secondary_sentiment);
            assert_eq!(row.priority, written.priority_flag());
            assert_eq!(row.action, written.action_category);
        }
    }

    #[test]
    fn english_export_without_email() {
        let settings = ExportSettings {
            language: Language::En,
            include_email: false,
        };
        let bytes = export(&table(), &SummaryFilter::new(), &settings);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Sender Name,Messages Received"));
        assert!(text.contains(",None,"));
        assert!(text.contains("Respond now"));

        let rows = read_summary(text.as_bytes()).unwrap();
        assert_eq!(rows[0].sender_email, None);
        assert!(rows[1].keywords.is_empty());
    }

    #[test]
    fn writes_only_filtered_rows() {
        let mut out = Vec::new();
        let written = write_summary(
            &mut out,
            &table(),
            &SummaryFilter::new().priority(),
            &ExportSettings::default(),
        )
        .unwrap();

        assert_eq!(written, 1);
        let rows = read_summary(&out).unwrap();
        assert_eq!(rows[0].sender_name, "Ana");
    }

    #[test]
    fn ai_summary_column_when_present() {
        let mut table = table();
        let key = table.rows()[0].key.clone();
        table.set_ai_summary(key, "Error: sin conexión");

        let bytes = export(&table, &SummaryFilter::new(), &ExportSettings::default());
        let rows = read_summary(&bytes).unwrap();

        assert_eq!(rows[0].ai_summary.as_deref(), Some("Error: sin conexión"));
        assert_eq!(rows[1].ai_summary.as_deref(), Some(""));
    }

    #[test]
    fn bad_count_is_malformed() {
        let text = "Nombre Remitente,Correos Recibidos\nAna,tres\n";
        let err = read_summary(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::Malformed { row: 1, .. }));
    }

    #[test]
    fn export_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumen.csv");

        let written = export_summary(
            &path,
            &table(),
            &SummaryFilter::new(),
            &ExportSettings::default(),
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(read_summary_file(&path).unwrap().len(), 2);
    }
}
