//! CSV response parser
//!
//! Turns the body of a `csv=true` request into one map per row, keyed by the
//! header line. Values are kept as the strings the server sent.

use crate::error::{OpenF1Error, Result};
use csv::ReaderBuilder;
use std::collections::BTreeMap;

/// One CSV row, column name → raw value
pub type CsvRow = BTreeMap<String, String>;

/// Parse CSV text with a header row
///
/// ```csv
/// session_key,driver_number,lap_number
/// 9161,1,1
/// 9161,1,2
/// ```
///
/// Blank input yields no rows. A row whose width differs from the header is
/// a validation error naming its line.
pub fn parse_csv_response(text: &str) -> Result<Vec<CsvRow>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| csv_error("Malformed CSV header", e))?
        .clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        // +2 for the header and 1-based lines
        let record = record.map_err(|e| csv_error(&format!("Malformed CSV at line {}", index + 2), e))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }

    Ok(rows)
}

fn csv_error(message: &str, err: csv::Error) -> OpenF1Error {
    OpenF1Error::Validation {
        message: format!("{}: {}", message, err),
        field: None,
        value: None,
    }
}
