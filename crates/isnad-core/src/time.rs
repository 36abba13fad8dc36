//! ISO-8601 UTC timestamp helpers.
//!
//! `Attestation.timestamp` and the other record types' timestamps are
//! ISO-8601 UTC strings rather than raw epoch millis, so records are
//! human-readable on the wire and sortable as strings.

use chrono::{DateTime, Utc};

/// Current time as an ISO-8601 UTC string (e.g. `2026-08-01T12:00:00Z`).
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Parse an ISO-8601 UTC string into a `DateTime<Utc>`.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Seconds elapsed between two ISO-8601 timestamps (`until - since`),
/// or `None` if either fails to parse.
pub fn seconds_between(since: &str, until: &str) -> Option<i64> {
    let since = parse_iso8601(since)?;
    let until = parse_iso8601(until)?;
    Some((until - since).num_seconds())
}
