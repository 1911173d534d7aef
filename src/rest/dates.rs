//! Date handling for entity fields.
//!
//! The API writes dates as `YYYY-MM-DD` and timestamps as
//! `YYYY-MM-DD HH:MM:SS`. Unknown dates come back as `0000-00-00`, which is
//! read as null.

use chrono::{NaiveDate, NaiveDateTime};

use crate::rest::ResourceError;

/// Wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn is_unset(raw: &str) -> bool {
    raw.is_empty() || raw.starts_with("0000-00-00")
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedRecord`] if `raw` is neither a valid
/// date nor an unset marker.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ResourceError> {
    if is_unset(raw) {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|e| ResourceError::malformed(format!("invalid date '{raw}': {e}")))
}

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Errors
///
/// Returns [`ResourceError::MalformedRecord`] if `raw` is neither a valid
/// timestamp nor an unset marker.
pub fn parse_datetime(raw: &str) -> Result<Option<NaiveDateTime>, ResourceError> {
    if is_unset(raw) {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .map(Some)
        .map_err(|e| ResourceError::malformed(format!("invalid timestamp '{raw}': {e}")))
}

/// Formats a date the way the API writes it.
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a timestamp the way the API writes it.
#[must_use]
pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}
