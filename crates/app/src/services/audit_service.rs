//! Audit service — read-only queries over the dispatch ledger.

use coachhub_domain::automation::AutomationLogEntry;
use coachhub_domain::error::CoachHubError;

use crate::ports::{AutomationLogRepository, LogQuery};

/// Hard cap on audit page size, applied over whatever the caller asks for.
const MAX_AUDIT_LIMIT: u32 = 500;

/// Default page size when the caller does not specify one.
const DEFAULT_AUDIT_LIMIT: u32 = 100;

/// Application service exposing the ledger to the administrative surface.
pub struct AutomationAuditService<L> {
    log_repo: L,
}

impl<L: AutomationLogRepository> AutomationAuditService<L> {
    /// Create a new service backed by the given ledger repository.
    pub fn new(log_repo: L) -> Self {
        Self { log_repo }
    }

    /// Recent ledger entries matching `filter`, newest first.
    ///
    /// The limit is clamped to [`MAX_AUDIT_LIMIT`] and defaults to
    /// [`DEFAULT_AUDIT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn recent_entries(
        &self,
        mut filter: LogQuery,
    ) -> Result<Vec<AutomationLogEntry>, CoachHubError> {
        let limit = filter.limit.unwrap_or(DEFAULT_AUDIT_LIMIT).min(MAX_AUDIT_LIMIT);
        filter.limit = Some(limit);
        self.log_repo.query(filter).await
    }
}
