use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::date::parse_timestamp;

/// Tokens the loggers write in place of a value. `Ó` is what the sonic's `M` missing code
/// turns into when a corrupted byte is decoded as Latin-1.
pub const MISSING_MARKERS: [&str; 2] = ["M", "Ó"];

#[derive(Clone, Debug, Error, Serialize, Deserialize)]
pub enum DataRecordParsingError {
    #[error("Not enough fields in row: expected {expected}, found {found}")]
    MissingFields { expected: usize, found: usize },
    #[error("Invalid data encountered while parsing data")]
    InvalidData,
    #[error("Data parse failure: {0}")]
    ParseFailure(String),
}

pub trait ParseableDataRecord {
    fn from_data_row(row: &[&str]) -> Result<Self, DataRecordParsingError>
    where
        Self: Sized;
}

pub fn is_missing(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw.trim())
}

/// Parses a numeric field, mapping the missing markers to NaN
pub fn parse_value(raw: &str) -> Result<f64, DataRecordParsingError> {
    if is_missing(raw) {
        return Ok(f64::NAN);
    }

    raw.trim()
        .parse::<f64>()
        .map_err(|e| DataRecordParsingError::ParseFailure(format!("{raw:?}: {e}")))
}

/// Parses a timestamp field, mapping the missing markers to `None`
pub fn parse_time_value(raw: &str) -> Result<Option<DateTime<Utc>>, DataRecordParsingError> {
    if is_missing(raw) {
        return Ok(None);
    }

    parse_timestamp(raw)
        .map(Some)
        .ok_or_else(|| DataRecordParsingError::ParseFailure(format!("{raw:?} is not a timestamp")))
}

pub fn require_fields(row: &[&str], expected: usize) -> Result<(), DataRecordParsingError> {
    if row.len() < expected {
        Err(DataRecordParsingError::MissingFields {
            expected,
            found: row.len(),
        })
    } else {
        Ok(())
    }
}
