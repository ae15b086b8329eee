use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use expense_cli::output::{RunPaths, now_stamp};
use expense_engine::run_batch;
use expense_ingest::read_rows;
use expense_model::{RowCandidate, RunReport};
use expense_policy::load_rules;
use expense_report::{
    write_clean_csv, write_errors_csv, write_html_report, write_summary_csv, write_warnings_csv,
};

use crate::cli::RunArgs;

/// Outcome of one CLI run, for the console summary and exit status.
pub struct RunResult {
    pub report: RunReport,
    pub out_dir: PathBuf,
    pub written: Vec<PathBuf>,
}

/// `check`: evaluate the batch and write only the issue files.
pub fn run_check(args: &RunArgs) -> Result<RunResult> {
    let (report, input, paths) = evaluate(args, "check")?;

    write_errors_csv(&paths.errors_csv, &report, &input)?;
    write_warnings_csv(&paths.warnings_csv, &report)?;

    Ok(RunResult {
        report,
        out_dir: paths.dir,
        written: vec![paths.errors_csv, paths.warnings_csv],
    })
}

/// `report`: evaluate the batch and write the full artifact set.
pub fn run_report(args: &RunArgs) -> Result<RunResult> {
    let (report, input, paths) = evaluate(args, "report")?;

    write_errors_csv(&paths.errors_csv, &report, &input)?;
    write_warnings_csv(&paths.warnings_csv, &report)?;
    write_clean_csv(&paths.clean_csv, &report)?;
    write_summary_csv(&paths.summary_csv, &report.summary)?;
    write_html_report(&paths.report_html, &report, &input, &page_title(args))?;

    Ok(RunResult {
        report,
        out_dir: paths.dir,
        written: vec![
            paths.errors_csv,
            paths.warnings_csv,
            paths.clean_csv,
            paths.summary_csv,
            paths.report_html,
        ],
    })
}

/// Shared front half of both commands: load rules, ingest, evaluate,
/// prepare the destination directory.
fn evaluate(args: &RunArgs, command: &str) -> Result<(RunReport, Vec<RowCandidate>, RunPaths)> {
    let span = info_span!("run", command, input = %args.csv_path.display());
    let _guard = span.enter();

    let config = load_rules(&args.rules)
        .with_context(|| format!("failed to load rules from {}", args.rules.display()))?;
    let input = read_rows(&args.csv_path)
        .with_context(|| format!("failed to read {}", args.csv_path.display()))?;
    info!(rows = input.len(), "input loaded");

    let report = run_batch(input.clone(), &config, args.top_n);

    let stamp = args.timestamp.then(now_stamp);
    let paths = RunPaths::resolve(&args.out, &args.csv_path, stamp.as_deref());
    paths.ensure_dir()?;

    Ok((report, input, paths))
}

fn page_title(args: &RunArgs) -> String {
    let stem = args
        .csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("expenses");
    format!("Expense report: {stem}")
}
