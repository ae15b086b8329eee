//! Library components for the expense-tool CLI.

pub mod logging;
pub mod output;
