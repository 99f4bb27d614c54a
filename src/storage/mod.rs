//! File storage for the digest.
//!
//! - [`csv_import`] - reads an Outlook CSV export into raw rows
//! - [`csv_export`] - writes the summary table as UTF-8 CSV and reads it back

pub mod csv_export;
pub mod csv_import;

pub use csv_export::{
    export_summary, read_summary, read_summary_file, write_summary, ExportError, ExportedRow,
};
pub use csv_import::{decode, parse_rows, read_rows, ImportError};
