//! The record source: loads one batch of chargeback rows from delimited
//! text.
//!
//! A batch couples the ordered header list with rows of raw string cells.
//! Rows are squared off to the header width (missing trailing cells become
//! empty strings, surplus cells are dropped) so downstream stages can index
//! by column without bounds anxiety. The source knows nothing about roles,
//! dates, or amounts.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::info;

use crate::{error::ReportError, io_utils};

/// One data row, decoded and squared to the header width.
pub type Row = Vec<String>;

/// All records of one input, plus the headers they were read under.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RecordBatch {
    #[cfg(test)]
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                cells.resize(headers.len(), String::new());
                cells
            })
            .collect();
        Self { headers, rows }
    }
}

/// Reads the whole input into memory. A batch without a single data row is a
/// fatal error — every report mode needs records to work from.
pub fn read_records(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<RecordBatch> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        let mut cells = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", row_idx + 2))?;
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(ReportError::EmptyInput.into());
    }
    info!("loaded {} row(s) from {}", rows.len(), path.display());
    Ok(RecordBatch { headers, rows })
}
