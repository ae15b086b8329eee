//! Output directory layout for report artifacts.
//!
//! Plain runs overwrite `<out>/latest/<input-stem>/`; timestamped runs
//! accumulate under `<out>/history/<input-stem>/` with a
//! `_YYYYMMDD_HHMMSS` stamp in each file name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolved destination paths for one run's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub dir: PathBuf,
    pub errors_csv: PathBuf,
    pub warnings_csv: PathBuf,
    pub clean_csv: PathBuf,
    pub summary_csv: PathBuf,
    pub report_html: PathBuf,
}

impl RunPaths {
    /// Resolve the destination for `input` under `base_out`.
    ///
    /// `stamp` selects the history bucket and is appended to each file
    /// name; `None` selects the overwriting latest bucket.
    pub fn resolve(base_out: &Path, input: &Path, stamp: Option<&str>) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input");
        let bucket = if stamp.is_some() { "history" } else { "latest" };
        let dir = base_out.join(bucket).join(stem);
        Self {
            errors_csv: dir.join(stamped("errors", "csv", stamp)),
            warnings_csv: dir.join(stamped("warnings", "csv", stamp)),
            clean_csv: dir.join(stamped("clean", "csv", stamp)),
            summary_csv: dir.join(stamped("summary", "csv", stamp)),
            report_html: dir.join(stamped("report", "html", stamp)),
            dir,
        }
    }

    /// Create the destination directory, parents included.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory {}", self.dir.display()))
    }
}

/// Current local time formatted as a file-name stamp.
pub fn now_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn stamped(base: &str, ext: &str, stamp: Option<&str>) -> String {
    match stamp {
        Some(stamp) => format!("{base}_{stamp}.{ext}"),
        None => format!("{base}.{ext}"),
    }
}
