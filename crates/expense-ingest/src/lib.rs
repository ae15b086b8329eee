//! Row parser for expense CSV input.
//!
//! Turns a CSV file into an ordered sequence of [`RowCandidate`]s: one
//! `Parsed` candidate with header-addressed, trimmed string fields per
//! readable row, or one `Failed` candidate per row the reader could not
//! decode. Classification of field contents is the engine's job; this
//! crate only gets rows off disk.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use expense_model::{RawRow, RowCandidate};

/// Column names the input must carry (order does not matter).
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "amount", "merchant", "category"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read CSV header: {0}")]
    Header(csv::Error),
}

/// Positions of the known columns within the header row.
///
/// Columns absent from the header resolve every field to an empty string,
/// which the structural validator then reports as `missing_field`.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnIndex {
    date: Option<usize>,
    amount: Option<usize>,
    merchant: Option<usize>,
    category: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut index = Self::default();
        for (pos, name) in headers.iter().enumerate() {
            match name.trim() {
                "date" => index.date = index.date.or(Some(pos)),
                "amount" => index.amount = index.amount.or(Some(pos)),
                "merchant" => index.merchant = index.merchant.or(Some(pos)),
                "category" => index.category = index.category.or(Some(pos)),
                _ => {}
            }
        }
        index
    }
}

/// Read all data rows from a CSV file.
///
/// Rows are numbered 1..n in input order, header excluded. Short records
/// yield empty strings for the missing trailing fields; per-record reader
/// errors become `RowCandidate::Failed` so one bad row never aborts the
/// batch.
pub fn read_rows(path: &Path) -> Result<Vec<RowCandidate>, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_rows_from_reader(file)
}

/// Read all data rows from any reader; used directly by tests.
pub fn read_rows_from_reader<R: Read>(reader: R) -> Result<Vec<RowCandidate>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(IngestError::Header)?.clone();
    let columns = ColumnIndex::from_headers(&headers);

    let mut candidates = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let row_index = idx + 1;
        match result {
            Ok(record) => candidates.push(RowCandidate::Parsed(RawRow {
                row_index,
                date: field(&record, columns.date),
                amount: field(&record, columns.amount),
                merchant: field(&record, columns.merchant),
                category: field(&record, columns.category),
            })),
            Err(error) => {
                debug!(row_index, %error, "unreadable row");
                candidates.push(RowCandidate::Failed {
                    row_index,
                    message: error.to_string(),
                });
            }
        }
    }
    debug!(rows = candidates.len(), "ingest complete");
    Ok(candidates)
}

fn field(record: &csv::StringRecord, position: Option<usize>) -> String {
    position
        .and_then(|pos| record.get(pos))
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parsed(candidates: &[RowCandidate]) -> Vec<&RawRow> {
        candidates
            .iter()
            .filter_map(|c| match c {
                RowCandidate::Parsed(row) => Some(row),
                RowCandidate::Failed { .. } => None,
            })
            .collect()
    }

    #[test]
    fn reads_rows_with_one_based_indices() {
        let input = "date,amount,merchant,category\n\
                     2026-01-10,1200,Alpha,supplies\n\
                     2026-01-11,500,Beta,travel\n";
        let rows = read_rows_from_reader(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        let parsed = parsed(&rows);
        assert_eq!(parsed[0].row_index, 1);
        assert_eq!(parsed[0].merchant, "Alpha");
        assert_eq!(parsed[1].row_index, 2);
        assert_eq!(parsed[1].date, "2026-01-11");
    }

    #[test]
    fn short_rows_yield_empty_fields() {
        let input = "date,amount,merchant,category\n2026-01-10,1200\n";
        let rows = read_rows_from_reader(input.as_bytes()).unwrap();
        let parsed = parsed(&rows);
        assert_eq!(parsed[0].merchant, "");
        assert_eq!(parsed[0].category, "");
    }

    #[test]
    fn missing_column_yields_empty_fields() {
        let input = "date,amount,merchant\n2026-01-10,1200,Alpha\n";
        let rows = read_rows_from_reader(input.as_bytes()).unwrap();
        let parsed = parsed(&rows);
        assert_eq!(parsed[0].category, "");
        assert_eq!(parsed[0].merchant, "Alpha");
    }

    #[test]
    fn fields_are_trimmed() {
        let input = "date,amount,merchant,category\n 2026-01-10 , 1200 , Alpha , supplies \n";
        let rows = read_rows_from_reader(input.as_bytes()).unwrap();
        let parsed = parsed(&rows);
        assert_eq!(parsed[0].date, "2026-01-10");
        assert_eq!(parsed[0].amount, "1200");
    }

    #[test]
    fn unreadable_row_becomes_failed_candidate() {
        let mut input: Vec<u8> = b"date,amount,merchant,category\n".to_vec();
        input.extend_from_slice(b"2026-01-10,1200,Alpha,supplies\n");
        input.extend_from_slice(b"2026-01-11,500,Caf\xff,travel\n");
        let rows = read_rows_from_reader(input.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[1], RowCandidate::Failed { row_index: 2, .. }));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "date,amount,merchant,category\n2026-01-10,1200,Alpha,supplies\n"
        )
        .unwrap();
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
