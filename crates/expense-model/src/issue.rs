use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue severity. Errors disqualify a row from the clean set and
/// aggregation; warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable machine-readable code identifying which check produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Row could not be read from the input at all.
    BadRow,
    /// Required field empty or whitespace-only.
    MissingField,
    /// Date not a valid zero-padded YYYY-MM-DD calendar date.
    BadDate,
    /// Amount not a plain integer.
    BadAmount,
    /// Exact (date, amount, merchant) duplicate of an earlier row.
    Duplicate,
    /// Category not in the allowed set.
    UnknownCategory,
    /// Merchant name contains a banned word.
    BannedWord,
    /// Date outside the configured inclusive range.
    DateOutOfRange,
    /// A running spend total crossed a configured limit.
    LimitExceeded,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::BadRow => "bad_row",
            IssueCode::MissingField => "missing_field",
            IssueCode::BadDate => "bad_date",
            IssueCode::BadAmount => "bad_amount",
            IssueCode::Duplicate => "duplicate",
            IssueCode::UnknownCategory => "unknown_category",
            IssueCode::BannedWord => "banned_word",
            IssueCode::DateOutOfRange => "date_out_of_range",
            IssueCode::LimitExceeded => "limit_exceeded",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected problem, attributed to one input row.
///
/// Produced by exactly one validator or rule and never mutated afterwards.
/// Issue lists are ordered by ascending `row_index`, then by detection
/// order within the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    /// 1-based data-row position in the original input.
    pub row_index: usize,
    /// Offending field name, when the issue concerns a single field.
    pub field: Option<String>,
}

impl Issue {
    pub fn error(code: IssueCode, row_index: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            row_index,
            field: None,
        }
    }

    pub fn warning(code: IssueCode, row_index: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            row_index,
            field: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}
