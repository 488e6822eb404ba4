//! Timestamp column encoding.

use chrono::SecondsFormat;

use coachhub_domain::time::Timestamp;

/// Encode a timestamp as fixed-width RFC 3339 text (microseconds, UTC).
///
/// Fixed width keeps lexicographic order equal to chronological order, so
/// cooldown cutoffs can be compared with plain `>` in SQL.
pub(crate) fn encode(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a timestamp column written by [`encode`].
pub(crate) fn decode(text: &str) -> Result<Timestamp, chrono::ParseError> {
    chrono::DateTime::parse_from_rfc3339(text).map(|dt| dt.to_utc())
}
