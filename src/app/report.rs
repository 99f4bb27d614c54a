//! Plain-text rendering of a digest for the terminal.
//!
//! Sections: run metrics, the (filtered) sender table, daily volume, top
//! senders and top body terms.

use std::fmt::Write;

use crate::domain::{Language, SenderSummary};
use crate::services::{CorpusInsights, RunMetrics, SummaryFilter, SummaryTable};

struct Labels {
    records: &'static str,
    dropped: &'static str,
    senders: &'static str,
    priority: &'static str,
    table: [&'static str; 7],
    secondary_sentiment: &'static str,
    ai_summary: &'static str,
    daily: &'static str,
    top_senders: &'static str,
    top_terms: &'static str,
    no_match: &'static str,
}

fn labels(language: Language) -> Labels {
    match language {
        Language::Es => Labels {
            records: "Correos analizados",
            dropped: "descartados",
            senders: "Remitentes",
            priority: "Prioritarios",
            table: [
                "Remitente",
                "Correo",
                "Correos",
                "Palabras clave",
                "Sentimiento",
                "Prioridad",
                "Acción",
            ],
            secondary_sentiment: "Sentimiento secundario",
            ai_summary: "Resumen IA",
            daily: "Correos por día",
            top_senders: "Principales remitentes",
            top_terms: "Términos frecuentes",
            no_match: "Ningún remitente coincide con el filtro.",
        },
        Language::En => Labels {
            records: "Messages analyzed",
            dropped: "dropped",
            senders: "Senders",
            priority: "Priority",
            table: [
                "Sender",
                "Email",
                "Messages",
                "Keywords",
                "Sentiment",
                "Priority",
                "Action",
            ],
            secondary_sentiment: "Secondary sentiment",
            ai_summary: "AI summary",
            daily: "Messages per day",
            top_senders: "Top senders",
            top_terms: "Top terms",
            no_match: "No sender matches the filter.",
        },
    }
}

/// Message shown when no row survives normalization.
pub fn no_data_message(language: Language, dropped_rows: usize) -> String {
    match language {
        Language::Es => format!(
            "No hay datos válidos para analizar ({} filas descartadas por fecha inválida).",
            dropped_rows
        ),
        Language::En => format!(
            "No valid data to analyze ({} rows dropped for an invalid date).",
            dropped_rows
        ),
    }
}

/// Position of the secondary sentiment column, right after the primary one.
const SECONDARY_AT: usize = 5;

fn row_cells(summary: &SenderSummary, language: Language, with_secondary: bool) -> Vec<String> {
    let mut cells = vec![
        summary.sender_name.clone(),
        summary.sender_email.clone(),
        summary.message_count.to_string(),
        summary.keywords.render(language),
        summary.sentiment_label.label(language).to_string(),
        summary.priority_label(language).to_string(),
        summary.action_category.label(language).to_string(),
    ];
    if with_secondary {
        let secondary = summary
            .secondary_sentiment
            .map(|s| s.label(language).to_string())
            .unwrap_or_default();
        cells.insert(SECONDARY_AT, secondary);
    }
    cells
}

fn render_metrics(out: &mut String, metrics: &RunMetrics, labels: &Labels) {
    let _ = writeln!(
        out,
        "{}: {} ({}: {})",
        labels.records, metrics.total_records, labels.dropped, metrics.dropped_rows
    );
    let _ = writeln!(
        out,
        "{}: {} | {}: {}",
        labels.senders, metrics.distinct_senders, labels.priority, metrics.priority_senders
    );
}

fn render_table(
    out: &mut String,
    table: &SummaryTable,
    filter: &SummaryFilter,
    language: Language,
    labels: &Labels,
) {
    let rows = table.filter(filter);
    if rows.is_empty() {
        let _ = writeln!(out, "{}", labels.no_match);
        return;
    }

    let with_secondary = rows.iter().any(|s| s.secondary_sentiment.is_some());
    let mut headers = labels.table.to_vec();
    if with_secondary {
        headers.insert(SECONDARY_AT, labels.secondary_sentiment);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|s| row_cells(s, language, with_secondary))
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "{}", line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", line(&rule.iter().map(String::as_str).collect::<Vec<_>>()));

    for (summary, row) in rows.iter().zip(&cells) {
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", line(&refs));

        if let Some(text) = table.ai_summary(&summary.key) {
            let _ = writeln!(out, "    {}: {}", labels.ai_summary, text);
        }
    }
}

fn render_insights(out: &mut String, insights: &CorpusInsights, labels: &Labels) {
    let _ = writeln!(out, "\n{}:", labels.daily);
    for day in &insights.daily_volume {
        let _ = writeln!(out, "  {}  {}", day.date.format("%Y-%m-%d"), day.count);
    }

    let _ = writeln!(out, "\n{}:", labels.top_senders);
    for sender in &insights.top_senders {
        let _ = writeln!(out, "  {:>4}  {}", sender.count, sender.name);
    }

    let _ = writeln!(out, "\n{}:", labels.top_terms);
    let terms: Vec<String> = insights
        .top_terms
        .iter()
        .map(|t| format!("{} ({})", t.term, t.count))
        .collect();
    let _ = writeln!(out, "  {}", terms.join(", "));
}

/// Full text report.
pub fn render_text(
    table: &SummaryTable,
    insights: &CorpusInsights,
    filter: &SummaryFilter,
    language: Language,
) -> String {
    let labels = labels(language);
    let mut out = String::new();

    render_metrics(&mut out, &table.metrics(), &labels);
    out.push('\n');
    render_table(&mut out, table, filter, language, &labels);
    render_insights(&mut out, insights, &labels);

    out
}
