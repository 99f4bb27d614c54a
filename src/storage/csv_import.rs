//! Outlook CSV import.
//!
//! Reads an exported mailbox into [`RawRow`]s. Exports come either as UTF-8
//! (with or without a byte-order mark) or as Latin-1; bytes that are not valid
//! UTF-8 are decoded as Latin-1. Columns are located by header name using the
//! configured aliases, compared case-insensitively; unknown columns are
//! ignored.

use std::borrow::Cow;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::config::InputSettings;
use crate::domain::RawRow;

/// Errors that can occur while importing a CSV export.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{field}' (accepted headers: {accepted})")]
    MissingColumn { field: &'static str, accepted: String },

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes export bytes: UTF-8 when valid, Latin-1 otherwise.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::warn!("Input is not valid UTF-8, decoding as Latin-1");
            Cow::Owned(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

/// Column positions for the four logical fields.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    from: usize,
    subject: Option<usize>,
    body: Option<usize>,
    date: usize,
}

fn find_column(headers: &StringRecord, names: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        names.iter().any(|name| name.to_lowercase() == header)
    })
}

fn require_column(headers: &StringRecord, names: &[String], field: &'static str) -> Result<usize> {
    find_column(headers, names).ok_or_else(|| ImportError::MissingColumn {
        field,
        accepted: names.join(", "),
    })
}

impl ColumnMap {
    fn resolve(headers: &StringRecord, settings: &InputSettings) -> Result<Self> {
        let columns = &settings.columns;
        let map = Self {
            from: require_column(headers, &columns.from, "from")?,
            subject: find_column(headers, &columns.subject),
            body: find_column(headers, &columns.body),
            date: require_column(headers, &columns.date, "date")?,
        };

        if map.subject.is_none() || map.body.is_none() {
            tracing::debug!(
                subject = map.subject.is_some(),
                body = map.body.is_some(),
                "Optional text columns missing, treating as empty"
            );
        }

        Ok(map)
    }

    fn row(&self, record: &StringRecord) -> RawRow {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        RawRow::new(
            field(Some(self.from)),
            field(self.subject),
            field(self.body),
            field(Some(self.date)),
        )
    }
}

/// Parses export text into raw rows, in file order.
pub fn parse_rows(text: &str, settings: &InputSettings) -> Result<Vec<RawRow>> {
    if !settings.delimiter.is_ascii() {
        return Err(ImportError::InvalidDelimiter(settings.delimiter));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(settings.delimiter as u8)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let columns = ColumnMap::resolve(reader.headers()?, settings)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(columns.row(&record?));
    }

    Ok(rows)
}

/// Reads and parses an export file.
pub fn read_rows(path: &Path, settings: &InputSettings) -> Result<Vec<RawRow>> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let rows = parse_rows(&decode(&bytes), settings)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Imported CSV export");
    Ok(rows)
}
