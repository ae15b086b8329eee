use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use expense_model::{Issue, Severity};

use crate::commands::RunResult;

/// Maximum issue rows printed to the console; the CSV files carry the rest.
const ISSUE_TABLE_CAP: usize = 50;

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.out_dir.display());
    for path in &result.written {
        println!("  {}", path.display());
    }

    let report = &result.report;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rows"), header_cell("Count")]);
    apply_count_table_style(&mut table);
    table.add_row(vec![Cell::new("Total"), Cell::new(report.total_rows)]);
    table.add_row(vec![
        Cell::new("Errors"),
        count_cell(report.error_row_count(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Warnings"),
        count_cell(report.warnings.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Clean"),
        Cell::new(report.clean.len())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_issue_table(report.errors.iter().chain(&report.warnings));
}

fn print_issue_table<'a>(issues: impl Iterator<Item = &'a Issue>) {
    let issues: Vec<&Issue> = issues.collect();
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in issues.iter().take(ISSUE_TABLE_CAP) {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.code),
            Cell::new(issue.row_index),
            match &issue.field {
                Some(field) => Cell::new(field),
                None => dim_cell("-"),
            },
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
    if issues.len() > ISSUE_TABLE_CAP {
        println!("... and {} more (see the CSV files)", issues.len() - ISSUE_TABLE_CAP);
    }
}

fn apply_count_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    align_column(table, 1, CellAlignment::Right);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
