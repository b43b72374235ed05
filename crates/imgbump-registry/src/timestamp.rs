//! Best-effort ordering of registry timestamps
//!
//! Registries are not consistent about timestamp formats. Both sides are
//! parsed against a list of known formats and compared as instants; if
//! either side does not parse, the raw strings are compared instead. That
//! fallback is only correct for lexically sortable formats (ISO 8601), so
//! recency ordering is not guaranteed across mixed or unknown formats.
//! Comparison itself never fails.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::cmp::Ordering;

/// Zone-less layouts, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// RFC 1123 with a zone name chrono's RFC 2822 parser does not accept
const RFC1123_UTC: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Parse a timestamp in any of the known registry formats
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // RFC 1123 with numeric zone ("Wed, 25 Dec 2024 14:43:12 -0000") and
    // with GMT/UT names
    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // RFC 3339, with or without fractional seconds
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, RFC1123_UTC) {
        return Some(ts.and_utc());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.and_utc())
}

/// Order two timestamps, falling back to string comparison
pub fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
