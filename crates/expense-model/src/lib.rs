//! Shared data model for the expense audit pipeline: raw rows, typed
//! records, issues, and the engine output contract.

pub mod issue;
pub mod record;
pub mod report;
pub mod summary;

pub use issue::{Issue, IssueCode, Severity};
pub use record::{RawRow, Record, RowCandidate};
pub use report::RunReport;
pub use summary::{MerchantTotal, Summary, WEEKDAY_LABELS};
