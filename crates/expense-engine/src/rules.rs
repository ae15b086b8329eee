//! Policy rule evaluation.
//!
//! Applies the configured organizational rules to one structurally-valid,
//! non-duplicate record at a time. Sub-checks run in a fixed order because
//! the category fallback rewrite must land before limit accumulation:
//! limits are keyed by the post-rewrite category.
//!
//! The running totals live in an explicit [`LimitLedger`] passed into each
//! call, never in ambient state, which keeps the evaluator itself pure and
//! testable per record.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use expense_model::{Issue, IssueCode, Record};
use expense_policy::{RuleConfig, UnknownCategoryMode};

/// Outcome of evaluating one record against the policy.
#[derive(Debug)]
pub struct PolicyOutcome {
    /// The record with its final category, or `None` when an error-mode
    /// category violation excluded it from the clean set.
    pub record: Option<Record>,
    pub issues: Vec<Issue>,
}

/// Running spend totals for limit checks, keyed by day and month, both
/// globally and per category.
///
/// Accumulation must happen in `row_index` order over clean-eligible
/// records only; the engine guarantees that ordering.
#[derive(Debug, Default)]
pub struct LimitLedger {
    day: BTreeMap<NaiveDate, i64>,
    month: BTreeMap<(i32, u32), i64>,
    day_category: BTreeMap<(NaiveDate, String), i64>,
    month_category: BTreeMap<(i32, u32, String), i64>,
}

impl LimitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge an amount to all four buckets, reporting which configured
    /// thresholds this charge pushed from at-or-under to over.
    ///
    /// A sum already over its threshold stays silent: the warning belongs
    /// to the record that caused the crossing, not to every record after
    /// it.
    fn charge(&mut self, record: &Record, config: &RuleConfig) -> Vec<LimitBreach> {
        let month = (record.date.year(), record.date.month());
        let category = record.category.clone();
        let mut breaches = Vec::new();

        let day_sum = self.day.entry(record.date).or_insert(0);
        if let Some(crossed) = cross(*day_sum, record.amount, config.limits.daily_total) {
            breaches.push(LimitBreach::DailyTotal(crossed));
        }
        *day_sum += record.amount;

        let month_sum = self.month.entry(month).or_insert(0);
        if let Some(crossed) = cross(*month_sum, record.amount, config.limits.monthly_total) {
            breaches.push(LimitBreach::MonthlyTotal(crossed));
        }
        *month_sum += record.amount;

        let day_cat_sum = self
            .day_category
            .entry((record.date, category.clone()))
            .or_insert(0);
        let day_cat_limit = config.limits.category_daily.get(&category).copied();
        if let Some(crossed) = cross(*day_cat_sum, record.amount, day_cat_limit) {
            breaches.push(LimitBreach::CategoryDaily(crossed));
        }
        *day_cat_sum += record.amount;

        let month_cat_sum = self
            .month_category
            .entry((month.0, month.1, category.clone()))
            .or_insert(0);
        let month_cat_limit = config.limits.category_monthly.get(&category).copied();
        if let Some(crossed) = cross(*month_cat_sum, record.amount, month_cat_limit) {
            breaches.push(LimitBreach::CategoryMonthly(crossed));
        }
        *month_cat_sum += record.amount;

        breaches
    }
}

/// One threshold crossing: the limit and the new running sum.
#[derive(Debug, Clone, Copy)]
struct Crossed {
    limit: i64,
    total: i64,
}

#[derive(Debug)]
enum LimitBreach {
    DailyTotal(Crossed),
    MonthlyTotal(Crossed),
    CategoryDaily(Crossed),
    CategoryMonthly(Crossed),
}

fn cross(sum: i64, amount: i64, limit: Option<i64>) -> Option<Crossed> {
    let limit = limit?;
    let total = sum + amount;
    (sum <= limit && total > limit).then_some(Crossed { limit, total })
}

/// Evaluate one record against the policy, updating the ledger.
///
/// Check order within the row: category (with fallback rewrite), banned
/// word, date range, limits. A record excluded by an error-mode category
/// violation is not charged to the ledger.
pub fn evaluate_record(
    mut record: Record,
    config: &RuleConfig,
    ledger: &mut LimitLedger,
) -> PolicyOutcome {
    let mut issues = Vec::new();

    // Category check. An empty allowed set means the check is disabled.
    let unknown = !config.allowed_categories.is_empty()
        && !config.allowed_categories.contains(&record.category);
    if unknown {
        match config.unknown_category_mode {
            UnknownCategoryMode::Warn => {
                issues.push(
                    Issue::warning(
                        IssueCode::UnknownCategory,
                        record.row_index,
                        format!(
                            "unknown category {}, falling back to {}",
                            record.category, config.fallback_category
                        ),
                    )
                    .with_field("category"),
                );
                record.category = config.fallback_category.clone();
            }
            UnknownCategoryMode::Error => {
                issues.push(
                    Issue::error(
                        IssueCode::UnknownCategory,
                        record.row_index,
                        format!("unknown category: {}", record.category),
                    )
                    .with_field("category"),
                );
                // Excluded before limit accumulation: the amount does not
                // count toward any running total.
                return PolicyOutcome {
                    record: None,
                    issues,
                };
            }
            UnknownCategoryMode::Off => {}
        }
    }

    // Banned word check: first case-insensitive substring match wins, so a
    // merchant matching several words still gets a single warning.
    let merchant_lower = record.merchant.to_lowercase();
    if let Some(word) = config
        .banned_words
        .iter()
        .find(|word| merchant_lower.contains(&word.to_lowercase()))
    {
        issues.push(
            Issue::warning(
                IssueCode::BannedWord,
                record.row_index,
                format!("merchant contains banned word: {word}"),
            )
            .with_field("merchant"),
        );
    }

    // Date range check, inclusive on both bounds.
    if config.date_min.is_some_and(|min| record.date < min) {
        issues.push(
            Issue::warning(
                IssueCode::DateOutOfRange,
                record.row_index,
                format!(
                    "date {} before range start {}",
                    record.date,
                    config.date_min.unwrap()
                ),
            )
            .with_field("date"),
        );
    } else if config.date_max.is_some_and(|max| record.date > max) {
        issues.push(
            Issue::warning(
                IssueCode::DateOutOfRange,
                record.row_index,
                format!(
                    "date {} after range end {}",
                    record.date,
                    config.date_max.unwrap()
                ),
            )
            .with_field("date"),
        );
    }

    // Limit checks, keyed by the post-rewrite category. Always warnings.
    for breach in ledger.charge(&record, config) {
        issues.push(limit_issue(&record, &breach));
    }

    PolicyOutcome {
        record: Some(record),
        issues,
    }
}

fn limit_issue(record: &Record, breach: &LimitBreach) -> Issue {
    let message = match breach {
        LimitBreach::DailyTotal(c) => format!(
            "daily total {} exceeds limit {} on {}",
            c.total, c.limit, record.date
        ),
        LimitBreach::MonthlyTotal(c) => format!(
            "monthly total {} exceeds limit {} in {}",
            c.total,
            c.limit,
            record.month_key()
        ),
        LimitBreach::CategoryDaily(c) => format!(
            "daily total {} for category {} exceeds limit {} on {}",
            c.total, record.category, c.limit, record.date
        ),
        LimitBreach::CategoryMonthly(c) => format!(
            "monthly total {} for category {} exceeds limit {} in {}",
            c.total,
            record.category,
            c.limit,
            record.month_key()
        ),
    };
    Issue::warning(IssueCode::LimitExceeded, record.row_index, message)
}
