//! Dispatch ledger port — append and query the automation log.

use std::future::Future;

use coachhub_domain::automation::{AutomationKind, AutomationLogEntry};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::time::Timestamp;

/// Filter for audit queries over the ledger.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub kind: Option<AutomationKind>,
    pub recipient: Option<String>,
    /// Newest-first row cap; adapters apply a sane default when `None`.
    pub limit: Option<u32>,
}

/// Repository for the append-only [`AutomationLogEntry`] ledger.
///
/// Entries are never updated or deleted; the ledger is the sole source of
/// truth for cooldown deduplication.
pub trait AutomationLogRepository {
    /// Append one entry.
    fn append(
        &self,
        entry: AutomationLogEntry,
    ) -> impl Future<Output = Result<AutomationLogEntry, CoachHubError>> + Send;

    /// Query entries, newest first.
    fn query(
        &self,
        filter: LogQuery,
    ) -> impl Future<Output = Result<Vec<AutomationLogEntry>, CoachHubError>> + Send;

    /// Was a `Sent` entry recorded for `(kind, recipient)` within the last
    /// `cooldown_days` days before `now`?
    ///
    /// The window is half-open: an entry stamped exactly `cooldown_days`
    /// before `now` is *outside* it (strict `created_at > cutoff`).
    fn was_recently_notified(
        &self,
        kind: AutomationKind,
        recipient: &str,
        cooldown_days: u32,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, CoachHubError>> + Send;
}
