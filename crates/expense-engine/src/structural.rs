//! Structural validation of individual rows.
//!
//! Every check runs independently so a row can carry several error issues
//! at once; a row passing all of them becomes a typed [`Record`].

use chrono::NaiveDate;

use expense_model::{Issue, IssueCode, RawRow, Record};

/// Result of structurally validating one row.
#[derive(Debug)]
pub struct StructuralOutcome {
    /// Present only when no check failed.
    pub record: Option<Record>,
    pub issues: Vec<Issue>,
}

/// Run all structural checks against a raw row.
///
/// Field checks are not short-circuited: a row with an empty merchant and
/// a malformed date reports both problems.
pub fn check_row(row: &RawRow) -> StructuralOutcome {
    let mut issues = Vec::new();

    for (name, value) in [
        ("date", &row.date),
        ("amount", &row.amount),
        ("merchant", &row.merchant),
        ("category", &row.category),
    ] {
        if value.trim().is_empty() {
            issues.push(
                Issue::error(
                    IssueCode::MissingField,
                    row.row_index,
                    format!("empty field: {name}"),
                )
                .with_field(name),
            );
        }
    }

    let date = parse_date(row.date.trim());
    if !row.date.trim().is_empty() && date.is_none() {
        issues.push(
            Issue::error(
                IssueCode::BadDate,
                row.row_index,
                format!("invalid date (expected YYYY-MM-DD): {}", row.date.trim()),
            )
            .with_field("date"),
        );
    }

    let amount = parse_amount(row.amount.trim());
    if !row.amount.trim().is_empty() && amount.is_none() {
        issues.push(
            Issue::error(
                IssueCode::BadAmount,
                row.row_index,
                format!("amount is not a plain integer: {}", row.amount.trim()),
            )
            .with_field("amount"),
        );
    }

    let record = if issues.is_empty() {
        // All four fields present and well-formed at this point.
        date.zip(amount).map(|(date, amount)| Record {
            row_index: row.row_index,
            date,
            amount,
            merchant: row.merchant.trim().to_string(),
            category: row.category.trim().to_string(),
        })
    } else {
        None
    };

    StructuralOutcome { record, issues }
}

/// Parse an exact zero-padded `YYYY-MM-DD` calendar date.
///
/// The shape is checked byte-for-byte before the calendar check, so
/// `2026-1-5` and `20260105` are rejected even though a lenient parser
/// would accept them; `2026-13-01` and `2026-04-31` fail the calendar
/// check itself.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
    {
        return None;
    }
    let year: i32 = value[0..4].parse().ok()?;
    let month: u32 = value[5..7].parse().ok()?;
    let day: u32 = value[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an amount as a plain integer.
///
/// Grouping separators, decimal points, and currency symbols are all
/// rejected rather than cleaned: `"1,200"` is an error, not 1200.
pub fn parse_amount(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}
