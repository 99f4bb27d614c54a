//! Configuration and settings management.
//!
//! This module provides the digest settings types and persistence.
//! Settings are stored in the user's config directory as JSON.

mod settings;

pub use settings::{
    AiProviderKind, AiSettings, AnalysisSettings, ColumnNames, DateOrder, ExportSettings,
    InputSettings, Result, SenderGrouping, Settings, SettingsError,
};
