//! Summary aggregation over the final clean set.
//!
//! A pure function of the clean records: no dependency on how the set was
//! assembled beyond the documented ranking and tie-break rules.

use std::collections::BTreeMap;

use chrono::Datelike;

use expense_model::{MerchantTotal, Record, Summary};

/// Compute the summary statistics for a clean set.
pub fn summarize(clean: &[Record], top_n: usize) -> Summary {
    let mut by_merchant: BTreeMap<String, i64> = BTreeMap::new();
    let mut month_totals: BTreeMap<String, i64> = BTreeMap::new();
    let mut category_totals: BTreeMap<String, i64> = BTreeMap::new();
    let mut weekday_totals = [0i64; 7];
    let mut amounts: Vec<i64> = Vec::with_capacity(clean.len());

    for record in clean {
        *by_merchant.entry(record.merchant.clone()).or_insert(0) += record.amount;
        *month_totals.entry(record.month_key()).or_insert(0) += record.amount;
        *category_totals.entry(record.category.clone()).or_insert(0) += record.amount;
        weekday_totals[record.date.weekday().num_days_from_monday() as usize] += record.amount;
        amounts.push(record.amount);
    }

    // BTreeMap iteration is already name-ascending; the stable sort by
    // total descending therefore leaves ties in name order.
    let mut merchant_top: Vec<MerchantTotal> = by_merchant
        .into_iter()
        .map(|(merchant, total)| MerchantTotal { merchant, total })
        .collect();
    merchant_top.sort_by(|a, b| b.total.cmp(&a.total));
    merchant_top.truncate(top_n);

    amounts.sort_unstable();

    Summary {
        merchant_top,
        weekday_totals,
        month_totals,
        category_totals,
        count: clean.len(),
        mean: mean(&amounts),
        median: median(&amounts),
        min: amounts.first().copied(),
        max: amounts.last().copied(),
    }
}

fn mean(sorted: &[i64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let sum: i64 = sorted.iter().sum();
    Some(sum as f64 / sorted.len() as f64)
}

/// Median of a sorted sequence, two-midpoint average for even counts.
fn median(sorted: &[i64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row_index: usize, date: &str, amount: i64, merchant: &str, category: &str) -> Record {
        Record {
            row_index,
            date: date.parse().unwrap(),
            amount,
            merchant: merchant.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn ranks_merchants_descending_with_name_tiebreak() {
        let clean = vec![
            record(1, "2026-01-05", 100, "Zeta", "supplies"),
            record(2, "2026-01-06", 300, "Beta", "supplies"),
            record(3, "2026-01-07", 100, "Alpha", "supplies"),
        ];
        let summary = summarize(&clean, 10);
        let names: Vec<_> = summary
            .merchant_top
            .iter()
            .map(|m| m.merchant.as_str())
            .collect();
        assert_eq!(names, vec!["Beta", "Alpha", "Zeta"]);
    }

    #[test]
    fn truncates_to_top_n() {
        let clean = vec![
            record(1, "2026-01-05", 300, "A", "supplies"),
            record(2, "2026-01-05", 200, "B", "supplies"),
            record(3, "2026-01-05", 100, "C", "supplies"),
        ];
        let summary = summarize(&clean, 2);
        assert_eq!(summary.merchant_top.len(), 2);
        assert_eq!(summary.merchant_top[0].merchant, "A");
    }

    #[test]
    fn weekday_buckets_start_on_monday() {
        // 2026-01-05 is a Monday, 2026-01-11 a Sunday.
        let clean = vec![
            record(1, "2026-01-05", 100, "A", "supplies"),
            record(2, "2026-01-11", 250, "B", "supplies"),
        ];
        let summary = summarize(&clean, 10);
        assert_eq!(summary.weekday_totals[0], 100);
        assert_eq!(summary.weekday_totals[6], 250);
        assert_eq!(summary.weekday_totals[1..6], [0, 0, 0, 0, 0]);
    }

    #[test]
    fn median_even_count_averages_midpoints() {
        let clean: Vec<Record> = [100, 200, 300, 400]
            .iter()
            .enumerate()
            .map(|(i, amount)| record(i + 1, "2026-01-05", *amount, "A", "supplies"))
            .collect();
        let summary = summarize(&clean, 10);
        assert_eq!(summary.median, Some(250.0));
        assert_eq!(summary.mean, Some(250.0));
    }

    #[test]
    fn median_odd_count_is_middle_value() {
        let clean: Vec<Record> = [300, 100, 200]
            .iter()
            .enumerate()
            .map(|(i, amount)| record(i + 1, "2026-01-05", *amount, "A", "supplies"))
            .collect();
        let summary = summarize(&clean, 10);
        assert_eq!(summary.median, Some(200.0));
    }

    #[test]
    fn empty_clean_set_has_no_stats() {
        let summary = summarize(&[], 10);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_none());
        assert!(summary.median.is_none());
        assert!(summary.min.is_none());
        assert!(summary.merchant_top.is_empty());
    }

    #[test]
    fn month_and_category_totals() {
        let clean = vec![
            record(1, "2026-01-05", 100, "A", "supplies"),
            record(2, "2026-02-05", 250, "B", "travel"),
            record(3, "2026-01-20", 50, "C", "supplies"),
        ];
        let summary = summarize(&clean, 10);
        assert_eq!(summary.month_totals.get("2026-01"), Some(&150));
        assert_eq!(summary.month_totals.get("2026-02"), Some(&250));
        assert_eq!(summary.category_totals.get("supplies"), Some(&150));
    }
}
