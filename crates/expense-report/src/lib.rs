//! Report assembly for engine output.
//!
//! Consumes only the engine's output contract ([`RunReport`] plus the
//! original row candidates for raw field echo) and serializes it to CSV
//! files and a self-contained HTML report. No decision logic lives here.

pub mod csv_out;
pub mod html;

use std::collections::BTreeMap;

use expense_model::{Record, RowCandidate, RunReport};

pub use csv_out::{write_clean_csv, write_errors_csv, write_summary_csv, write_warnings_csv};
pub use html::{render_html_report, write_html_report};

/// One row of the errors table: the offending row's raw field values with
/// all of its reasons joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRow {
    pub row: usize,
    pub date: String,
    pub amount: String,
    pub merchant: String,
    pub category: String,
    pub reason: String,
}

/// One row of the warnings table, echoing the clean record the warning
/// attaches to (post-rewrite category).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRow {
    pub code: String,
    pub row: usize,
    pub date: String,
    pub month: String,
    pub category: String,
    pub merchant: String,
    pub amount: String,
    pub message: String,
}

/// Group the error issues by row and attach the raw input fields.
///
/// The engine guarantees the error list is row-ordered, so grouping
/// consecutive issues preserves both row order and per-row detection
/// order in the joined reason string.
pub fn error_rows(report: &RunReport, input: &[RowCandidate]) -> Vec<ErrorRow> {
    let raw_by_row: BTreeMap<usize, &RowCandidate> =
        input.iter().map(|c| (c.row_index(), c)).collect();

    let mut rows: Vec<ErrorRow> = Vec::new();
    for issue in &report.errors {
        if let Some(last) = rows.last_mut()
            && last.row == issue.row_index
        {
            last.reason.push_str("; ");
            last.reason.push_str(&issue.message);
            continue;
        }
        let (date, amount, merchant, category) = match raw_by_row.get(&issue.row_index) {
            Some(RowCandidate::Parsed(raw)) => (
                raw.date.clone(),
                raw.amount.clone(),
                raw.merchant.clone(),
                raw.category.clone(),
            ),
            _ => Default::default(),
        };
        rows.push(ErrorRow {
            row: issue.row_index,
            date,
            amount,
            merchant,
            category,
            reason: issue.message.clone(),
        });
    }
    rows
}

/// Expand the warning issues with the fields of the records they attach
/// to. Warnings only ever point at clean-eligible records, so the lookup
/// resolves from the clean list.
pub fn warning_rows(report: &RunReport) -> Vec<WarningRow> {
    let clean_by_row: BTreeMap<usize, &Record> =
        report.clean.iter().map(|r| (r.row_index, r)).collect();

    report
        .warnings
        .iter()
        .map(|issue| {
            let record = clean_by_row.get(&issue.row_index);
            WarningRow {
                code: issue.code.to_string(),
                row: issue.row_index,
                date: record.map(|r| r.date.to_string()).unwrap_or_default(),
                month: record.map(|r| r.month_key()).unwrap_or_default(),
                category: record.map(|r| r.category.clone()).unwrap_or_default(),
                merchant: record.map(|r| r.merchant.clone()).unwrap_or_default(),
                amount: record.map(|r| r.amount.to_string()).unwrap_or_default(),
                message: issue.message.clone(),
            }
        })
        .collect()
}

/// Render a statistic without a trailing `.0` when it is whole.
pub(crate) fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
