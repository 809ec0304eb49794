use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::utils::constants::DATE_FORMATS;

/// Parse a trip timestamp, trying each format in turn.
///
/// Empty values and values no format accepts yield `None`. Offsets in RFC 3339
/// values are dropped and the wall-clock time kept, so a trip that started at
/// 08:00 local time stays on its local calendar date. A bare date means midnight.
pub fn parse_timestamp<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format.as_ref()) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }

    parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a calendar date, also accepting a full timestamp and keeping its date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| parse_timestamp_prefix(value))
}

// "2022-04-01 00:00:00" style values in a date column
fn parse_timestamp_prefix(value: &str) -> Option<NaiveDate> {
    let head = value.split(|c| c == ' ' || c == 'T').next()?;
    if head.len() == value.len() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(head, format).ok())
}
