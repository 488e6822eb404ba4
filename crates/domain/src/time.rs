//! Time and timestamp helpers.

use chrono::{DateTime, Duration, Utc};

/// UTC timestamp used for `last_run_at`, ledger entries, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// The start of a cooldown window: `reference` minus `days` whole days.
///
/// The window is half-open on the old side — a ledger entry stamped exactly
/// at the returned instant lies *outside* the window (strict `>` compare).
#[must_use]
pub fn cooldown_cutoff(reference: Timestamp, days: u32) -> Timestamp {
    reference - Duration::days(i64::from(days))
}
