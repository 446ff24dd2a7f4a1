// src/repositories/sql.rs
//
// Column conversion helpers shared by the SQLite repositories.
// Parse failures are explicit errors, never silent defaults.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;

use crate::domain::{format_calendar_date, parse_calendar_date};

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

pub(crate) fn timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("Invalid timestamp '{}': {}", raw, e)))
}

pub(crate) fn date(column: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    parse_calendar_date(raw)
        .ok_or_else(|| conversion_error(column, format!("Invalid date '{}'", raw)))
}

pub(crate) fn optional_date(column: usize, raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| date(column, &s))
        .transpose()
}

pub(crate) fn required<T>(column: usize, name: &str, value: Option<T>) -> rusqlite::Result<T> {
    value.ok_or_else(|| conversion_error(column, format!("Column {} is NULL", name)))
}

pub(crate) fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_calendar_date)
}

/// Stored positions must be positive and fit in u32; anything else reads
/// back as missing.
pub(crate) fn position(raw: Option<i64>) -> Option<u32> {
    raw.and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0)
}
