//! Cross-row duplicate detection.
//!
//! Needs full-batch visibility: two rows are duplicates when their
//! `(date, amount, merchant)` triples match exactly. Merchant names are
//! compared case-sensitively, so "Amazon" and "amazon" are distinct
//! merchants and never merged.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use expense_model::{Issue, IssueCode, Record};

/// Split structurally-valid records into survivors and duplicate errors.
///
/// For each duplicate group the first occurrence by `row_index` survives
/// and proceeds to policy evaluation; every later occurrence is flagged
/// `duplicate`.
pub fn dedupe(records: Vec<Record>) -> (Vec<Record>, Vec<Issue>) {
    let mut first_seen: BTreeMap<(NaiveDate, i64, String), usize> = BTreeMap::new();
    let mut survivors = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for record in records {
        let key = (record.date, record.amount, record.merchant.clone());
        match first_seen.get(&key) {
            Some(&first_row) => {
                issues.push(Issue::error(
                    IssueCode::Duplicate,
                    record.row_index,
                    format!(
                        "duplicate of row {first_row} (same date, amount, and merchant)"
                    ),
                ));
            }
            None => {
                first_seen.insert(key, record.row_index);
                survivors.push(record);
            }
        }
    }

    (survivors, issues)
}
