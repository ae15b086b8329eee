use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Weekday labels in bucket order (Monday first).
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One ranked merchant entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: i64,
}

/// Aggregate statistics over the final clean set.
///
/// Recomputed in full on each run; a pure function of the clean records
/// (post-rewrite categories) plus the top-N cutoff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Per-merchant totals ranked descending, ties broken by merchant name
    /// ascending, truncated to top-N.
    pub merchant_top: Vec<MerchantTotal>,
    /// Per-weekday totals, Monday through Sunday.
    pub weekday_totals: [i64; 7],
    /// Per-month totals keyed by `YYYY-MM`.
    pub month_totals: BTreeMap<String, i64>,
    /// Per-category totals over post-fallback categories.
    pub category_totals: BTreeMap<String, i64>,
    /// Number of clean records.
    pub count: usize,
    /// Arithmetic mean of clean amounts; absent when the clean set is empty.
    pub mean: Option<f64>,
    /// Median of clean amounts (two-midpoint average for even counts).
    pub median: Option<f64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}
