//! Shared parsing and formatting utilities.
//!
//! The type classifier, format standardization and the CSV boundary all need
//! to agree on what "looks like a number" and "looks like a date", so the
//! rules live here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Temporal Formats
// =============================================================================

// Shape patterns - a value must match one of these before chrono is tried.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}([ T]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?)?(Z|[+-]\d{2}:?\d{2})?$")
            .expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}( \d{1,2}:\d{2}(:\d{2})?)?$")
            .expect("Invalid regex: MM/DD/YYYY"),
        Regex::new(r"^\d{1,2}-[A-Za-z]{3}-\d{4}$").expect("Invalid regex: DD-Mon-YYYY"),
    ]
});

/// Accepted date-and-time formats, tried in order.
pub const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accepted date-only formats. Parsed values land on midnight.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Check whether a string has the shape of one of the accepted date formats.
pub fn looks_like_date(s: &str) -> bool {
    let trimmed = s.trim();
    DATE_SHAPES.iter().any(|re| re.is_match(trimmed))
}

/// Try to parse a string as a timestamp under the accepted formats.
///
/// Values carrying a UTC offset (RFC 3339) are normalized to UTC.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::utils::parse_temporal_string;
///
/// assert!(parse_temporal_string("2021-01-01").is_some());
/// assert!(parse_temporal_string("03/15/2022 10:30").is_some());
/// assert!(parse_temporal_string("20210101").is_none());
/// ```
pub fn parse_temporal_string(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if !looks_like_date(trimmed) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(trimmed, fmt)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

/// Render a timestamp the way the CSV export writes it.
///
/// Midnight values are written as plain dates so date columns round-trip
/// without gaining a time component.
pub fn format_temporal(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Try to parse a string as a plain number.
///
/// Only finite values count: `"nan"`, `"inf"` and overflowing literals are
/// rejected so that words never classify a column as numeric.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Tests
// =============================================================================
