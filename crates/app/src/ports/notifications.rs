//! Notification store port — the portal-facing feed.

use std::future::Future;

use coachhub_domain::error::CoachHubError;
use coachhub_domain::id::NotificationId;
use coachhub_domain::notification::NotificationRecord;

/// Persistence for [`NotificationRecord`]s.
///
/// Written by the dispatcher (one record per delivered message), read by
/// the portal feed endpoints.
pub trait NotificationStore {
    /// Persist one record.
    fn save(
        &self,
        record: NotificationRecord,
    ) -> impl Future<Output = Result<NotificationRecord, CoachHubError>> + Send;

    /// Most recent records for one recipient, newest first.
    fn recent_for(
        &self,
        recipient: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<NotificationRecord>, CoachHubError>> + Send;

    /// Mark one record as read.
    fn mark_read(
        &self,
        id: NotificationId,
    ) -> impl Future<Output = Result<(), CoachHubError>> + Send;
}
