//! CLI argument definitions for the expense tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "expense-tool",
    version,
    about = "Expense record validation and reporting",
    long_about = "Validate expense CSV exports against a rules document.\n\n\
                  Checks row structure, flags duplicates, applies policy rules\n\
                  with running spend limits, and writes CSV and HTML reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a CSV file and write the issue files.
    Check(RunArgs),

    /// Validate a CSV file and write the full report set.
    Report(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the expense CSV file.
    #[arg(value_name = "CSV")]
    pub csv_path: PathBuf,

    /// Path to the rules document.
    #[arg(long = "rules", value_name = "PATH", default_value = "rules.json")]
    pub rules: PathBuf,

    /// Base output directory.
    #[arg(long = "out", value_name = "DIR", default_value = "out")]
    pub out: PathBuf,

    /// Stamp output file names and keep the run under the history bucket.
    #[arg(long = "timestamp")]
    pub timestamp: bool,

    /// Number of merchants in the ranked summary.
    #[arg(long = "top-n", value_name = "N", default_value_t = 10)]
    pub top_n: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
