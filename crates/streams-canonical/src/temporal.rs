//! Timestamps and durations.
//!
//! Documents carry timestamps as ISO-8601 strings in UTC with a `Z` suffix.
//! Sub-second precision is kept only when present. Parsing is forgiving
//! about the input shape (RFC 3339 with any offset, RFC 2822, naive
//! date-times and bare dates are all read as UTC instants) so the rendered
//! form is always the single canonical one.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::validation::ValidationError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A span of `n` seconds, or `None` when it does not fit a [`Duration`].
pub fn seconds(n: i64) -> Option<Duration> {
    Duration::try_seconds(n)
}

/// A span of `n` minutes, or `None` on overflow.
pub fn minutes(n: i64) -> Option<Duration> {
    Duration::try_minutes(n)
}

/// A span of `n` hours, or `None` on overflow.
pub fn hours(n: i64) -> Option<Duration> {
    Duration::try_hours(n)
}

/// Parses `text` into a UTC instant.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ValidationError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::Timestamp(text.to_string()))
}

/// Renders an instant as `YYYY-MM-DDTHH:MM:SS[.fff]Z`.
pub fn to_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
