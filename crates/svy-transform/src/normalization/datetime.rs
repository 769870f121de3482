//! Calendar timestamp parsing and epoch rebasing.
//!
//! Date-kind cells arrive as free text, are parsed as UTC wall-clock
//! timestamps, and leave as milliseconds since 1960-01-01 — the numeric
//! time system of the target format. The rebasing is plain UTC arithmetic;
//! timezone-aware input is out of scope.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Milliseconds between 1960-01-01 and 1970-01-01 (3653 days, UTC).
/// Added to a Unix-epoch timestamp to rebase it onto the 1960 epoch.
pub const EPOCH_OFFSET_MS: i64 = 315_619_200_000;

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    for fmt in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    None
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

    for fmt in &formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d);
        }
    }

    None
}

/// Parse a cell as a UTC calendar timestamp. Date-only input is midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    try_parse_datetime(trimmed).or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Milliseconds since the 1960-01-01 epoch for a parsed timestamp.
pub fn rebased_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis() + EPOCH_OFFSET_MS
}

/// Parse and rebase in one step.
pub fn rebase_timestamp(value: &str) -> Option<i64> {
    parse_timestamp(value).map(rebased_millis)
}
