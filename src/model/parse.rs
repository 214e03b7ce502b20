//! Wire value parsing
//!
//! The backend serializes decimals and datetimes as strings. Nothing is
//! validated ahead of use: a value that does not parse becomes `NaN`, a
//! timestamp that does not parse becomes `None`, and callers carry those
//! through instead of failing.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a string-encoded decimal
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"12.5 USD"` parses as `12.5`. Input without a numeric prefix
/// yields `NaN`.
pub fn parse_value(raw: &str) -> f64 {
    let s = raw.trim_start();
    let prefix = numeric_prefix(s);
    if prefix.is_empty() {
        return f64::NAN;
    }
    prefix.parse::<f64>().unwrap_or(f64::NAN)
}

/// Longest prefix of `s` shaped like a decimal literal
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return &s[..end + "Infinity".len()];
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Parse a wire timestamp
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00.123456Z`, offsets allowed) and
/// naive ISO-8601 datetimes, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a wire timestamp to Unix milliseconds
pub fn parse_epoch_millis(raw: &str) -> Option<i64> {
    parse_timestamp(raw).map(|dt| dt.timestamp_millis())
}
