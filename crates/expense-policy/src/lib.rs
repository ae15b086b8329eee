//! Policy rule configuration.
//!
//! Loads the rules JSON document into a raw serde schema, then normalizes
//! it into the validated [`RuleConfig`] the engine consumes. Normalization
//! is deliberately forgiving: an unrecognized mode string falls back to
//! `warn` and an unparseable date bound is dropped, each with a logged
//! warning, so a typo in the config never aborts a run or floods every
//! row with spurious issues.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Fallback category applied when the document does not name one.
pub const DEFAULT_FALLBACK_CATEGORY: &str = "uncategorized";

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How an unknown category is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCategoryMode {
    /// Emit a warning and rewrite the category to the fallback.
    #[default]
    Warn,
    /// Emit an error; the record is excluded from clean and aggregation.
    Error,
    /// No issue, category left unchanged.
    Off,
}

/// Spend limits. Absent limits are unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limits {
    pub daily_total: Option<i64>,
    pub monthly_total: Option<i64>,
    pub category_daily: BTreeMap<String, i64>,
    pub category_monthly: BTreeMap<String, i64>,
}

/// The validated policy document, immutable during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfig {
    /// Allowed categories; an empty set disables the category check.
    pub allowed_categories: BTreeSet<String>,
    pub unknown_category_mode: UnknownCategoryMode,
    pub fallback_category: String,
    pub banned_words: Vec<String>,
    /// Inclusive date range; absent bounds are open.
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub limits: Limits,
}

impl RuleConfig {
    /// Config with no checks enabled; useful as a test baseline.
    pub fn permissive() -> Self {
        Self {
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
            ..Self::default()
        }
    }
}

// Raw schema as written in the JSON document. Every field is optional so
// partial documents load; normalization fills the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRules {
    allowed_categories: Vec<String>,
    unknown_category_mode: Option<String>,
    fallback_category: Option<String>,
    banned_words: Vec<String>,
    date_range: RawDateRange,
    limits: RawLimits,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDateRange {
    min: Option<String>,
    max: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLimits {
    daily_total: Option<i64>,
    monthly_total: Option<i64>,
    category_daily: BTreeMap<String, i64>,
    category_monthly: BTreeMap<String, i64>,
}

/// Load and normalize a rules document from disk.
pub fn load_rules(path: &Path) -> Result<RuleConfig, PolicyError> {
    let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_rules(&text)
}

/// Parse and normalize a rules document from a JSON string.
pub fn parse_rules(text: &str) -> Result<RuleConfig, PolicyError> {
    let raw: RawRules = serde_json::from_str(text)?;
    Ok(normalize(raw))
}

fn normalize(raw: RawRules) -> RuleConfig {
    let unknown_category_mode = match raw.unknown_category_mode.as_deref() {
        None => UnknownCategoryMode::default(),
        Some("warn") => UnknownCategoryMode::Warn,
        Some("error") => UnknownCategoryMode::Error,
        Some("off") => UnknownCategoryMode::Off,
        Some(other) => {
            warn!(mode = other, "unrecognized unknown_category_mode, using warn");
            UnknownCategoryMode::Warn
        }
    };

    RuleConfig {
        allowed_categories: raw
            .allowed_categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        unknown_category_mode,
        fallback_category: raw
            .fallback_category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_CATEGORY.to_string()),
        banned_words: raw
            .banned_words
            .into_iter()
            .filter(|w| !w.trim().is_empty())
            .collect(),
        date_min: parse_bound("min", raw.date_range.min.as_deref()),
        date_max: parse_bound("max", raw.date_range.max.as_deref()),
        limits: Limits {
            daily_total: raw.limits.daily_total,
            monthly_total: raw.limits.monthly_total,
            category_daily: raw.limits.category_daily,
            category_monthly: raw.limits.category_monthly,
        },
    }
}

fn parse_bound(which: &str, value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(bound = which, value, "unparseable date_range bound, ignoring");
            None
        }
    }
}
