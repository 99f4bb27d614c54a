//! Command-line application: wires settings, storage and services together.

mod cli;
mod report;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::services::{DigestPipeline, ReportExport, RunOutcome, SummaryFilter, SummaryService};
use crate::storage::{export_summary, read_rows};

pub use cli::{Cli, DateOrderArg, GroupBy, LanguageArg};
pub use report::{no_data_message, render_text};

/// Main application entry point
pub struct App;

impl App {
    /// Loads settings, applying CLI overrides.
    fn settings(cli: &Cli) -> Result<Settings> {
        let path = cli.config.clone().or_else(Settings::default_path);
        let mut settings = match path {
            Some(ref path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => Settings::default(),
        };
        cli.apply(&mut settings);
        Ok(settings)
    }

    fn filter(cli: &Cli) -> SummaryFilter {
        let mut filter = SummaryFilter::new();
        if cli.priority_only {
            filter = filter.priority();
        }
        if let Some(ref query) = cli.search {
            filter = filter.search(query.clone());
        }
        filter
    }

    /// Run the digest and print it to stdout.
    pub async fn run(cli: Cli) -> Result<()> {
        let settings = Self::settings(&cli)?;
        let language = settings.export.language;

        let rows = read_rows(&cli.input, &settings.input)
            .with_context(|| format!("Failed to import {}", cli.input.display()))?;

        let pipeline = DigestPipeline::from_settings(&settings);
        let mut report = match pipeline.run(&rows) {
            RunOutcome::NoData { dropped_rows } => {
                if cli.json {
                    let json = serde_json::json!({ "no_data": true, "dropped_rows": dropped_rows });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                } else {
                    println!("{}", no_data_message(language, dropped_rows));
                }
                return Ok(());
            }
            RunOutcome::Report(report) => report,
        };

        let filter = Self::filter(&cli);

        if settings.ai.enabled {
            let summarizer = SummaryService::from_settings(&settings.ai).with_language(language);
            summarizer
                .annotate(&mut report.table, &report.records, pipeline.aggregator(), &filter)
                .await;
        }

        if cli.json {
            let export = ReportExport::new(&report.table, &filter, &report.insights, language);
            println!("{}", export.to_json().context("Failed to serialize report")?);
        } else {
            let text = render_text(&report.table, &report.insights, &filter, language);
            print!("{}", text);
        }

        if let Some(ref output) = cli.output {
            export_summary(output, &report.table, &filter, &settings.export)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }

        Ok(())
    }
}
