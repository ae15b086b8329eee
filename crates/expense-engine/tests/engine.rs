//! Whole-engine behavior over assembled batches.

use expense_engine::run_batch;
use expense_model::{IssueCode, RawRow, RowCandidate, Severity};
use expense_policy::{RuleConfig, parse_rules};

fn parsed(row_index: usize, date: &str, amount: &str, merchant: &str, category: &str) -> RowCandidate {
    RowCandidate::Parsed(RawRow {
        row_index,
        date: date.to_string(),
        amount: amount.to_string(),
        merchant: merchant.to_string(),
        category: category.to_string(),
    })
}

fn audit_config() -> RuleConfig {
    parse_rules(
        r#"{
            "allowed_categories": ["supplies", "travel", "meals", "software"],
            "unknown_category_mode": "warn",
            "fallback_category": "uncategorized",
            "banned_words": ["casino", "bar"],
            "date_range": {"min": "2026-01-01", "max": "2026-12-31"},
            "limits": {
                "daily_total": 30000,
                "monthly_total": 200000,
                "category_daily": {"meals": 8000}
            }
        }"#,
    )
    .unwrap()
}

/// The documented sample_bad.csv mix: 11 rows, 8 error rows, 1 warning,
/// 3 clean rows.
fn sample_bad_batch() -> Vec<RowCandidate> {
    vec![
        parsed(1, "2026-01-10", "1200", "Alpha Stationery", "supplies"),
        parsed(2, "2026-01-11", "500", "", "supplies"),
        parsed(3, "2026/01/12", "800", "Beta Cafe", "meals"),
        parsed(4, "2026-01-12", "1,200", "Gamma Books", "supplies"),
        parsed(5, "2026-01-10", "1200", "Alpha Stationery", "supplies"),
        parsed(6, "2026-01-13", "", "Delta Taxi", "travel"),
        parsed(7, "2026-01-14", "900", "Epsilon Cafe", "snacks"),
        parsed(8, "2026-02-30", "700", "Zeta Mart", "supplies"),
        parsed(9, "2026-01-15", "12.5", "Eta Grocers", "supplies"),
        parsed(10, "", "650", "Theta Tools", "supplies"),
        parsed(11, "2026-01-16", "2400", "Iota Travel", "travel"),
    ]
}

#[test]
fn sample_bad_mix_yields_documented_counts() {
    let report = run_batch(sample_bad_batch(), &audit_config(), 10);
    assert_eq!(report.total_rows, 11);
    assert_eq!(report.error_row_count(), 8);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.clean.len(), 3);
    assert!(report.has_errors());

    assert_eq!(report.warnings[0].code, IssueCode::UnknownCategory);
    assert_eq!(report.warnings[0].row_index, 7);

    let clean_rows: Vec<_> = report.clean.iter().map(|r| r.row_index).collect();
    assert_eq!(clean_rows, vec![1, 7, 11]);
    // The warned row stays clean, with the fallback category applied.
    assert_eq!(report.clean[1].category, "uncategorized");
}

#[test]
fn classification_counts_balance() {
    let report = run_batch(sample_bad_batch(), &audit_config(), 10);
    assert_eq!(
        report.error_row_count() + report.clean.len(),
        report.total_rows
    );
}

#[test]
fn comma_amount_never_reaches_clean_or_aggregation() {
    let report = run_batch(
        vec![parsed(1, "2026-01-10", "1,200", "Alpha", "supplies")],
        &RuleConfig::permissive(),
        10,
    );
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, IssueCode::BadAmount);
    assert!(report.clean.is_empty());
    assert_eq!(report.summary.count, 0);
}

#[test]
fn duplicate_flags_second_row_only() {
    let report = run_batch(
        vec![
            parsed(1, "2026-01-10", "1200", "Alpha", "supplies"),
            parsed(2, "2026-01-10", "1200", "Alpha", "supplies"),
        ],
        &RuleConfig::permissive(),
        10,
    );
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, IssueCode::Duplicate);
    assert_eq!(report.errors[0].row_index, 2);
    assert_eq!(report.clean.len(), 1);
    assert_eq!(report.clean[0].row_index, 1);
}

#[test]
fn merchant_case_differences_stay_clean() {
    let report = run_batch(
        vec![
            parsed(1, "2026-01-10", "1200", "Amazon", "supplies"),
            parsed(2, "2026-01-10", "1200", "amazon", "supplies"),
        ],
        &RuleConfig::permissive(),
        10,
    );
    assert!(report.errors.is_empty());
    assert_eq!(report.clean.len(), 2);
}

#[test]
fn daily_limit_crossing_is_attributed_to_second_row() {
    let config = parse_rules(r#"{"limits": {"daily_total": 30000}}"#).unwrap();
    let report = run_batch(
        vec![
            parsed(1, "2026-01-10", "20000", "Alpha", "supplies"),
            parsed(2, "2026-01-10", "15000", "Beta", "supplies"),
        ],
        &config,
        10,
    );
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, IssueCode::LimitExceeded);
    assert_eq!(report.warnings[0].row_index, 2);
    // Both rows stay clean: limit checks never promote to error.
    assert_eq!(report.clean.len(), 2);
}

#[test]
fn error_mode_category_rows_count_as_errors() {
    let config = parse_rules(
        r#"{"allowed_categories": ["supplies"], "unknown_category_mode": "error"}"#,
    )
    .unwrap();
    let report = run_batch(
        vec![
            parsed(1, "2026-01-10", "100", "Alpha", "snacks"),
            parsed(2, "2026-01-11", "200", "Beta", "supplies"),
        ],
        &config,
        10,
    );
    assert_eq!(report.error_row_count(), 1);
    assert_eq!(report.errors[0].code, IssueCode::UnknownCategory);
    assert_eq!(report.errors[0].severity, Severity::Error);
    assert_eq!(report.clean.len(), 1);
    assert_eq!(report.error_row_count() + report.clean.len(), report.total_rows);
}

#[test]
fn parse_failures_count_as_error_rows() {
    let report = run_batch(
        vec![
            RowCandidate::Failed {
                row_index: 1,
                message: "invalid utf-8".to_string(),
            },
            parsed(2, "2026-01-10", "100", "Alpha", "supplies"),
        ],
        &RuleConfig::permissive(),
        10,
    );
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, IssueCode::BadRow);
    assert_eq!(report.error_row_count() + report.clean.len(), report.total_rows);
}

#[test]
fn issue_lists_are_ordered_by_row_index() {
    // A duplicate of row 1 appears on row 5, after structural errors on
    // rows 2 and 4; the error list must still come out row-ordered.
    let report = run_batch(
        vec![
            parsed(1, "2026-01-10", "1200", "Alpha", "supplies"),
            parsed(2, "bad", "100", "Beta", "supplies"),
            parsed(3, "2026-01-11", "300", "Gamma", "supplies"),
            parsed(4, "2026-01-12", "nope", "Delta", "supplies"),
            parsed(5, "2026-01-10", "1200", "Alpha", "supplies"),
        ],
        &RuleConfig::permissive(),
        10,
    );
    let rows: Vec<_> = report.errors.iter().map(|i| i.row_index).collect();
    assert_eq!(rows, vec![2, 4, 5]);
}

#[test]
fn engine_is_deterministic() {
    let config = audit_config();
    let first = run_batch(sample_bad_batch(), &config, 10);
    let second = run_batch(sample_bad_batch(), &config, 10);
    assert_eq!(first, second);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_field() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("2026-01-10".to_string()),
            Just("2026-13-40".to_string()),
            Just("1200".to_string()),
            Just("1,200".to_string()),
            Just("Alpha".to_string()),
            Just("".to_string()),
            Just("supplies".to_string()),
            Just("snacks".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn errored_rows_plus_clean_always_equals_total(
            fields in proptest::collection::vec((arb_field(), arb_field(), arb_field(), arb_field()), 0..40)
        ) {
            let candidates: Vec<RowCandidate> = fields
                .into_iter()
                .enumerate()
                .map(|(i, (date, amount, merchant, category))| {
                    RowCandidate::Parsed(RawRow {
                        row_index: i + 1,
                        date,
                        amount,
                        merchant,
                        category,
                    })
                })
                .collect();
            let report = run_batch(candidates, &audit_config(), 10);
            prop_assert_eq!(
                report.error_row_count() + report.clean.len(),
                report.total_rows
            );
        }
    }
}
