//! Renders statistics records as an aligned table, JSON or CSV.

use clap::ValueEnum;

use crate::schema::{ReportRow, StatisticsRecord};

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Fixed-width columns for the terminal.
    #[default]
    Table,
    /// Pretty-printed array including every per-iteration timing.
    Json,
    /// Header plus one row per implementation, without per-iteration timings.
    Csv,
}

const CSV_HEADER: [&str; 10] = [
    "task",
    "slug",
    "description",
    "iterations",
    "mean",
    "median",
    "std_dev",
    "min",
    "max",
    "total",
];

pub fn render(records: &[StatisticsRecord], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Table => Ok(to_table(records)),
        OutputFormat::Json => to_json(records),
        OutputFormat::Csv => Ok(to_csv(records)),
    }
}

pub fn to_table(records: &[StatisticsRecord]) -> String {
    let header = format!(
        "{:<20} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "slug", "mean", "median", "std_dev", "min", "max", "total"
    );
    let rule = "-".repeat(header.len());

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(header);
    lines.push(rule);
    for r in records {
        let s = r.summary();
        lines.push(format!(
            "{:<20} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            r.slug(),
            s.mean,
            s.median,
            s.std_dev,
            s.min,
            s.max,
            s.total
        ));
    }
    lines.join("\n")
}

pub fn to_json(records: &[StatisticsRecord]) -> serde_json::Result<String> {
    let rows: Vec<ReportRow> = records.iter().map(StatisticsRecord::to_row).collect();
    serde_json::to_string_pretty(&rows)
}

/// Quote a field when it holds a delimiter, quote or line break; embedded quotes are doubled.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn to_csv(records: &[StatisticsRecord]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for r in records {
        let s = r.summary();
        let fields = [
            csv_field(r.task()),
            csv_field(r.slug()),
            csv_field(r.description()),
            r.iterations().to_string(),
            s.mean.to_string(),
            s.median.to_string(),
            s.std_dev.to_string(),
            s.min.to_string(),
            s.max.to_string(),
            s.total.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
