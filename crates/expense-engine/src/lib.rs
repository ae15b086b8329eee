//! Validation and rule evaluation engine for expense batches.
//!
//! Processes one finite batch to completion: structural validation, then
//! cross-row duplicate detection, then policy rule evaluation with
//! stateful limit tracking, then aggregation. Row-level problems are
//! captured as [`Issue`]s and never abort the batch; the stages run
//! strictly forward and each consumes only the previous stage's output.

pub mod aggregate;
pub mod dedupe;
pub mod rules;
pub mod structural;

use tracing::{debug, info};

use expense_model::{Issue, IssueCode, Record, RowCandidate, RunReport};
use expense_policy::RuleConfig;

pub use aggregate::summarize;
pub use dedupe::dedupe;
pub use rules::{LimitLedger, PolicyOutcome, evaluate_record};
pub use structural::{StructuralOutcome, check_row};

/// Run the whole engine over one batch of row candidates.
///
/// The candidates must arrive in input order; every issue list and the
/// clean list in the returned report are ordered by ascending `row_index`
/// (then detection order within a row). Deterministic: the same input and
/// config always produce the same report.
pub fn run_batch(
    candidates: Vec<RowCandidate>,
    config: &RuleConfig,
    top_n: usize,
) -> RunReport {
    let total_rows = candidates.len();
    let mut errors: Vec<Issue> = Vec::new();
    let mut records: Vec<Record> = Vec::new();

    // Stage 1: structural validation. Parse failures from the row parser
    // are folded in here as error issues.
    for candidate in candidates {
        match candidate {
            RowCandidate::Parsed(row) => {
                let outcome = structural::check_row(&row);
                errors.extend(outcome.issues);
                if let Some(record) = outcome.record {
                    records.push(record);
                }
            }
            RowCandidate::Failed { row_index, message } => {
                errors.push(Issue::error(
                    IssueCode::BadRow,
                    row_index,
                    format!("unreadable row: {message}"),
                ));
            }
        }
    }
    debug!(
        valid = records.len(),
        errored = total_rows - records.len(),
        "structural validation complete"
    );

    // Stage 2: cross-row duplicate detection.
    let (survivors, duplicate_issues) = dedupe::dedupe(records);
    errors.extend(duplicate_issues);

    // Stage 3: policy evaluation, accumulating limits in row order.
    let mut warnings: Vec<Issue> = Vec::new();
    let mut clean: Vec<Record> = Vec::new();
    let mut ledger = rules::LimitLedger::new();
    for record in survivors {
        let outcome = rules::evaluate_record(record, config, &mut ledger);
        for issue in outcome.issues {
            match issue.severity {
                expense_model::Severity::Error => errors.push(issue),
                expense_model::Severity::Warning => warnings.push(issue),
            }
        }
        if let Some(record) = outcome.record {
            clean.push(record);
        }
    }

    // Each stage appends in row order, but stage boundaries can interleave
    // rows (a duplicate on row 2 lands after a structural error on row 9).
    // The stable sort restores the global ordering contract while keeping
    // detection order within each row.
    errors.sort_by_key(|issue| issue.row_index);

    // Stage 4: aggregation over the final clean set.
    let summary = aggregate::summarize(&clean, top_n);

    info!(
        total_rows,
        errors = errors.len(),
        warnings = warnings.len(),
        clean = clean.len(),
        "batch evaluated"
    );

    RunReport {
        total_rows,
        errors,
        warnings,
        clean,
        summary,
    }
}
