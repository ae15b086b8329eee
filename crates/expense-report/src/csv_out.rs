//! CSV output files.
//!
//! Four artifacts per run: `errors.csv`, `warnings.csv`, `clean.csv`, and
//! the flat `summary.csv`. Every file carries a header row and is written
//! even when its body is empty, so downstream tooling can rely on the
//! full set existing.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use expense_model::{RowCandidate, RunReport, Summary, WEEKDAY_LABELS};

use crate::format_stat;

/// Write `errors.csv`: the raw field values of each offending row plus a
/// `; `-joined reason column.
pub fn write_errors_csv(path: &Path, report: &RunReport, input: &[RowCandidate]) -> Result<()> {
    let mut writer = open(path)?;
    writer.write_record(["row", "date", "amount", "merchant", "category", "reason"])?;
    for row in crate::error_rows(report, input) {
        writer.write_record([
            row.row.to_string().as_str(),
            &row.date,
            &row.amount,
            &row.merchant,
            &row.category,
            &row.reason,
        ])?;
    }
    finish(writer, path)
}

/// Write `warnings.csv`, one row per warning issue.
pub fn write_warnings_csv(path: &Path, report: &RunReport) -> Result<()> {
    let mut writer = open(path)?;
    writer.write_record([
        "code", "row", "date", "month", "category", "merchant", "amount", "message",
    ])?;
    for row in crate::warning_rows(report) {
        writer.write_record([
            row.code.as_str(),
            row.row.to_string().as_str(),
            &row.date,
            &row.month,
            &row.category,
            &row.merchant,
            &row.amount,
            &row.message,
        ])?;
    }
    finish(writer, path)
}

/// Write `clean.csv`: the surviving records with their final categories.
pub fn write_clean_csv(path: &Path, report: &RunReport) -> Result<()> {
    let mut writer = open(path)?;
    writer.write_record(["row", "date", "amount", "merchant", "category"])?;
    for record in &report.clean {
        writer.write_record([
            record.row_index.to_string().as_str(),
            record.date.to_string().as_str(),
            record.amount.to_string().as_str(),
            &record.merchant,
            &record.category,
        ])?;
    }
    finish(writer, path)
}

/// Write the flat `summary.csv` of `type,key,value` rows: month totals,
/// category totals, ranked merchants, the seven weekday buckets, then the
/// amount statistics.
pub fn write_summary_csv(path: &Path, summary: &Summary) -> Result<()> {
    let mut writer = open(path)?;
    writer.write_record(["type", "key", "value"])?;

    for (month, total) in &summary.month_totals {
        writer.write_record(["month_total", month, &total.to_string()])?;
    }
    for (category, total) in &summary.category_totals {
        writer.write_record(["category_total", category, &total.to_string()])?;
    }
    for entry in &summary.merchant_top {
        writer.write_record(["merchant_top", &entry.merchant, &entry.total.to_string()])?;
    }
    for (label, total) in WEEKDAY_LABELS.iter().zip(summary.weekday_totals) {
        writer.write_record(["weekday_total", label, &total.to_string()])?;
    }

    writer.write_record(["stats", "count", &summary.count.to_string()])?;
    if let Some(mean) = summary.mean {
        writer.write_record(["stats", "mean", &format_stat(mean)])?;
    }
    if let Some(median) = summary.median {
        writer.write_record(["stats", "median", &format_stat(median)])?;
    }
    if let Some(min) = summary.min {
        writer.write_record(["stats", "min", &min.to_string()])?;
    }
    if let Some(max) = summary.max {
        writer.write_record(["stats", "max", &max.to_string()])?;
    }

    finish(writer, path)
}

fn open(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file {}", path.display()))
}

fn finish(mut writer: csv::Writer<std::fs::File>, path: &Path) -> Result<()> {
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "report file written");
    Ok(())
}
