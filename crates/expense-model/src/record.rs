use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One data row as read from the input, fields still raw strings.
///
/// Absent columns surface as empty strings so the structural validator can
/// report them uniformly as missing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based data-row position in the original input (header excluded).
    pub row_index: usize,
    pub date: String,
    pub amount: String,
    pub merchant: String,
    pub category: String,
}

/// Output of the row parser: either a readable row or an unrecoverable
/// parse failure. Every input row yields exactly one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCandidate {
    Parsed(RawRow),
    Failed { row_index: usize, message: String },
}

impl RowCandidate {
    pub fn row_index(&self) -> usize {
        match self {
            RowCandidate::Parsed(row) => row.row_index,
            RowCandidate::Failed { row_index, .. } => *row_index,
        }
    }
}

/// A structurally-valid expense row with typed fields.
///
/// Owned by the batch it belongs to; `row_index` is immutable once parsed
/// and is the stable ordering and reporting key. `category` may be
/// rewritten once by the policy evaluator's fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub row_index: usize,
    pub date: NaiveDate,
    /// Exact integer count of currency units.
    pub amount: i64,
    pub merchant: String,
    pub category: String,
}

impl Record {
    /// Month bucket key, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
