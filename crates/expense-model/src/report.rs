use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::issue::Issue;
use crate::record::Record;
use crate::summary::Summary;

/// Complete engine output for one batch run.
///
/// The contract consumed by the report assembler and the CLI: ordered
/// error issues, ordered warning issues, the clean records with their
/// final category values, and the derived summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of data rows in the input (parse failures included).
    pub total_rows: usize,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub clean: Vec<Record>,
    pub summary: Summary,
}

impl RunReport {
    /// True when at least one error issue exists; callers map this to a
    /// non-zero exit status.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of distinct rows carrying at least one error issue.
    ///
    /// A row can fail several structural checks at once, so this counts
    /// rows rather than issues: `error_row_count() + clean.len()` equals
    /// `total_rows`.
    pub fn error_row_count(&self) -> usize {
        self.errors
            .iter()
            .map(|issue| issue.row_index)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
