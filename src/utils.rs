//! Utility functions for dates and columnar tables

use arrow::array::{RecordBatch, StringArray};
use arrow::error::ArrowError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{DashError, Result};

/// Timestamp layouts SQLite date functions accept besides a bare date
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Timestamps carrying a UTC offset; the date is read in that offset
const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Parse an order date stored as `YYYY-MM-DD` or a SQLite timestamp.
///
/// Zoned timestamps keep the calendar date they were written with, matching
/// the grouping key of the daily query.
pub fn parse_order_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let err = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => return Ok(date),
        Err(e) => e,
    };

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .or_else(|| {
                    ZONED_FORMATS
                        .iter()
                        .find_map(|fmt| DateTime::parse_from_str(trimmed, fmt).ok())
                })
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| DashError::Parse {
            value: value.to_string(),
            source: err,
        })
}

/// Days since 1970-01-01, the Arrow `Date32` representation
pub fn days_since_epoch(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01
    (date - NaiveDate::default()).num_days() as i32
}

fn column_index(batch: &RecordBatch, name: &str) -> std::result::Result<usize, ArrowError> {
    batch
        .schema()
        .fields()
        .iter()
        .position(|f| f.name() == name)
        .ok_or_else(|| ArrowError::SchemaError(format!("Column {} not found", name)))
}

/// Get a Utf8 column by name
pub fn get_string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let idx = column_index(batch, name)?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ArrowError::SchemaError(format!("Column {} is not Utf8", name)).into())
}
