//! Self-contained HTML report.
//!
//! One file with everything inlined: the count strip, a monthly bar chart
//! and a category pie chart (Chart.js pulled from its CDN, data embedded
//! as JSON), and the errors/warnings/clean tables. Long tables are
//! truncated to the first [`TABLE_ROW_CAP`] rows with a note.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use expense_model::{RowCandidate, RunReport};

use crate::format_stat;

/// Maximum rows rendered per HTML table.
pub const TABLE_ROW_CAP: usize = 200;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

/// Render the full report document as a string.
pub fn render_html_report(report: &RunReport, input: &[RowCandidate], title: &str) -> String {
    let mut page = String::with_capacity(16 * 1024);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape(title)));
    page.push_str("<style>\n");
    page.push_str(STYLE);
    page.push_str("</style>\n");
    page.push_str(&format!("<script src=\"{CHART_JS_CDN}\"></script>\n"));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>{}</h1>\n", escape(title)));

    push_count_strip(&mut page, report);
    push_charts(&mut page, report);
    push_tables(&mut page, report, input);

    page.push_str("</body>\n</html>\n");
    page
}

/// Render and write the report document to `path`.
pub fn write_html_report(
    path: &Path,
    report: &RunReport,
    input: &[RowCandidate],
    title: &str,
) -> Result<()> {
    let page = render_html_report(report, input, title);
    std::fs::write(path, page)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "html report written");
    Ok(())
}

fn push_count_strip(page: &mut String, report: &RunReport) {
    let summary = &report.summary;
    page.push_str("<div class=\"counts\">\n");
    for (label, value) in [
        ("total rows", report.total_rows.to_string()),
        ("error rows", report.error_row_count().to_string()),
        ("warnings", report.warnings.len().to_string()),
        ("clean", report.clean.len().to_string()),
        (
            "mean",
            summary.mean.map(format_stat).unwrap_or_else(|| "-".to_string()),
        ),
        (
            "median",
            summary
                .median
                .map(format_stat)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ] {
        page.push_str(&format!(
            "<div class=\"count\"><span class=\"value\">{}</span><span class=\"label\">{}</span></div>\n",
            escape(&value),
            escape(label)
        ));
    }
    page.push_str("</div>\n");
}

fn push_charts(page: &mut String, report: &RunReport) {
    let summary = &report.summary;
    let month_labels: Vec<&String> = summary.month_totals.keys().collect();
    let month_values: Vec<i64> = summary.month_totals.values().copied().collect();
    let category_labels: Vec<&String> = summary.category_totals.keys().collect();
    let category_values: Vec<i64> = summary.category_totals.values().copied().collect();

    page.push_str("<div class=\"charts\">\n");
    page.push_str("<div class=\"chart\"><h2>Monthly totals</h2><canvas id=\"months\"></canvas></div>\n");
    page.push_str("<div class=\"chart\"><h2>Category split</h2><canvas id=\"categories\"></canvas></div>\n");
    page.push_str("</div>\n");

    // serde_json output of plain strings and integers contains no HTML
    // metacharacters beyond quotes, so it can be embedded directly.
    page.push_str("<script>\n");
    page.push_str(&format!(
        "const monthLabels = {};\nconst monthValues = {};\nconst categoryLabels = {};\nconst categoryValues = {};\n",
        json(&month_labels),
        json(&month_values),
        json(&category_labels),
        json(&category_values),
    ));
    page.push_str(
        r#"new Chart(document.getElementById("months"), {
  type: "bar",
  data: { labels: monthLabels, datasets: [{ label: "total", data: monthValues }] },
  options: { plugins: { legend: { display: false } } },
});
new Chart(document.getElementById("categories"), {
  type: "pie",
  data: { labels: categoryLabels, datasets: [{ data: categoryValues }] },
});
"#,
    );
    page.push_str("</script>\n");
}

fn push_tables(page: &mut String, report: &RunReport, input: &[RowCandidate]) {
    let errors = crate::error_rows(report, input);
    push_table(
        page,
        "Errors",
        &["row", "date", "amount", "merchant", "category", "reason"],
        errors.iter().map(|r| {
            vec![
                r.row.to_string(),
                r.date.clone(),
                r.amount.clone(),
                r.merchant.clone(),
                r.category.clone(),
                r.reason.clone(),
            ]
        }),
        errors.len(),
    );

    let warnings = crate::warning_rows(report);
    push_table(
        page,
        "Warnings",
        &[
            "code", "row", "date", "month", "category", "merchant", "amount", "message",
        ],
        warnings.iter().map(|r| {
            vec![
                r.code.clone(),
                r.row.to_string(),
                r.date.clone(),
                r.month.clone(),
                r.category.clone(),
                r.merchant.clone(),
                r.amount.clone(),
                r.message.clone(),
            ]
        }),
        warnings.len(),
    );

    push_table(
        page,
        "Clean",
        &["row", "date", "amount", "merchant", "category"],
        report.clean.iter().map(|r| {
            vec![
                r.row_index.to_string(),
                r.date.to_string(),
                r.amount.to_string(),
                r.merchant.clone(),
                r.category.clone(),
            ]
        }),
        report.clean.len(),
    );
}

fn push_table(
    page: &mut String,
    heading: &str,
    columns: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
    total: usize,
) {
    page.push_str(&format!("<h2>{} ({})</h2>\n", escape(heading), total));
    page.push_str("<table>\n<thead><tr>");
    for column in columns {
        page.push_str(&format!("<th>{}</th>", escape(column)));
    }
    page.push_str("</tr></thead>\n<tbody>\n");
    for row in rows.take(TABLE_ROW_CAP) {
        page.push_str("<tr>");
        for cell in &row {
            page.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        page.push_str("</tr>\n");
    }
    page.push_str("</tbody>\n</table>\n");
    if total > TABLE_ROW_CAP {
        page.push_str(&format!(
            "<p class=\"note\">showing first {TABLE_ROW_CAP} of {total} rows</p>\n"
        ));
    }
}

fn json<T: serde::Serialize>(value: &T) -> String {
    // Serialization of in-memory strings and integers cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Escape a value for placement in HTML text or attribute position.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"body { font-family: system-ui, sans-serif; margin: 2rem; color: #1a1a2e; }
h1 { font-size: 1.5rem; }
h2 { font-size: 1.1rem; margin-top: 2rem; }
.counts { display: flex; gap: 1rem; flex-wrap: wrap; }
.count { background: #f0f2f8; border-radius: 8px; padding: 0.8rem 1.2rem; text-align: center; }
.count .value { display: block; font-size: 1.4rem; font-weight: 600; }
.count .label { display: block; font-size: 0.8rem; color: #555; }
.charts { display: flex; gap: 2rem; flex-wrap: wrap; margin-top: 1rem; }
.chart { flex: 1 1 320px; max-width: 480px; }
table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
th, td { border: 1px solid #d6d9e0; padding: 0.3rem 0.6rem; text-align: left; }
th { background: #f0f2f8; }
.note { color: #777; font-size: 0.8rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use expense_model::{Issue, IssueCode, RawRow, Record};

    fn one_row_report() -> (RunReport, Vec<RowCandidate>) {
        let input = vec![RowCandidate::Parsed(RawRow {
            row_index: 1,
            date: "2026-01-10".to_string(),
            amount: "1200".to_string(),
            merchant: "Books & <Co>".to_string(),
            category: "supplies".to_string(),
        })];
        let report = RunReport {
            total_rows: 1,
            errors: vec![Issue::error(IssueCode::BadDate, 1, "invalid date")],
            ..Default::default()
        };
        (report, input)
    }

    #[test]
    fn escapes_cell_values() {
        let (report, input) = one_row_report();
        let page = render_html_report(&report, &input, "Expense report");
        assert!(page.contains("Books &amp; &lt;Co&gt;"));
        assert!(!page.contains("<Co>"));
    }

    #[test]
    fn inlines_chart_data_as_json() {
        let clean = vec![Record {
            row_index: 1,
            date: "2026-01-10".parse().unwrap(),
            amount: 1200,
            merchant: "Alpha".to_string(),
            category: "supplies".to_string(),
        }];
        let mut report = RunReport {
            total_rows: 1,
            clean,
            ..Default::default()
        };
        report
            .summary
            .month_totals
            .insert("2026-01".to_string(), 1200);
        report
            .summary
            .category_totals
            .insert("supplies".to_string(), 1200);

        let page = render_html_report(&report, &[], "Expense report");
        assert!(page.contains(r#"const monthLabels = ["2026-01"];"#));
        assert!(page.contains("const monthValues = [1200];"));
        assert!(page.contains(r#"const categoryLabels = ["supplies"];"#));
    }

    #[test]
    fn truncates_long_tables() {
        let input: Vec<RowCandidate> = (1..=TABLE_ROW_CAP + 50)
            .map(|i| {
                RowCandidate::Parsed(RawRow {
                    row_index: i,
                    date: "bad".to_string(),
                    amount: "1".to_string(),
                    merchant: format!("M{i}"),
                    category: "supplies".to_string(),
                })
            })
            .collect();
        let report = RunReport {
            total_rows: input.len(),
            errors: input
                .iter()
                .map(|c| Issue::error(IssueCode::BadDate, c.row_index(), "invalid date"))
                .collect(),
            ..Default::default()
        };
        let page = render_html_report(&report, &input, "Expense report");
        assert!(page.contains(&format!(
            "showing first {TABLE_ROW_CAP} of {} rows",
            input.len()
        )));
        assert!(page.contains("<td>M200</td>"));
        assert!(!page.contains("<td>M201</td>"));
    }
}
