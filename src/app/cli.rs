//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{DateOrder, SenderGrouping, Settings};
use crate::domain::Language;

/// Per-sender triage digest for an Outlook CSV export
#[derive(Debug, Parser)]
#[command(name = "inbox-digest")]
#[command(version)]
#[command(about = "Summarize an exported mailbox by sender: keywords, sentiment, priority and action")]
pub struct Cli {
    /// CSV file exported from Outlook
    pub input: PathBuf,

    /// Write the summary table to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only show and export priority senders
    #[arg(long)]
    pub priority_only: bool,

    /// Only show and export senders whose name contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// How records are grouped into senders
    #[arg(long, value_enum)]
    pub group_by: Option<GroupBy>,

    /// Ordering of ambiguous numeric dates
    #[arg(long, value_enum)]
    pub date_order: Option<DateOrderArg>,

    /// Label and header language
    #[arg(long, value_enum)]
    pub lang: Option<LanguageArg>,

    /// Generate AI summaries per sender
    #[arg(long)]
    pub ai: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Entries in the top senders and top terms lists
    #[arg(long)]
    pub top: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// Sender address only
    Email,
    /// Display name and address
    NameAndEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateOrderArg {
    DayFirst,
    MonthFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    Es,
    En,
}

impl Cli {
    /// Applies flag overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(group_by) = self.group_by {
            settings.analysis.grouping = match group_by {
                GroupBy::Email => SenderGrouping::EmailOnly,
                GroupBy::NameAndEmail => SenderGrouping::NameAndEmail,
            };
        }

        if let Some(order) = self.date_order {
            settings.input.date_order = match order {
                DateOrderArg::DayFirst => DateOrder::DayFirst,
                DateOrderArg::MonthFirst => DateOrder::MonthFirst,
            };
        }

        if let Some(lang) = self.lang {
            settings.export.language = match lang {
                LanguageArg::Es => Language::Es,
                LanguageArg::En => Language::En,
            };
        }

        if let Some(top) = self.top {
            settings.analysis.top_n = top;
        }

        if self.ai {
            settings.ai.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "inbox-digest",
            "correo.csv",
            "--group-by",
            "name-and-email",
            "--date-order",
            "month-first",
            "--priority-only",
            "--search",
            "ana",
            "--top",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.input, PathBuf::from("correo.csv"));
        assert_eq!(cli.group_by, Some(GroupBy::NameAndEmail));
        assert!(cli.priority_only);
        assert_eq!(cli.search.as_deref(), Some("ana"));

        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.analysis.grouping, SenderGrouping::NameAndEmail);
        assert_eq!(settings.input.date_order, DateOrder::MonthFirst);
        assert_eq!(settings.analysis.top_n, 5);
        assert!(!settings.ai.enabled);
    }

    #[test]
    fn no_flags_keep_settings() {
        let cli = Cli::try_parse_from(["inbox-digest", "x.csv"]).unwrap();
        let mut settings = Settings::default();
        cli.apply(&mut settings);

        assert_eq!(settings.analysis.grouping, SenderGrouping::EmailOnly);
        assert_eq!(settings.export.language, Language::Es);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["inbox-digest"]).is_err());
    }
}
