//! Notification dispatcher port — the delivery boundary.

use std::future::Future;

use coachhub_domain::error::DispatchError;
use coachhub_domain::payload::NotificationPayload;

/// Delivers one rendered notification to one recipient.
///
/// Implementations perform the actual transport (SMTP) and durably record
/// a portal-facing `NotificationRecord` on success. The runner never
/// retries within a tick: a failure surfaces as a `Failed` ledger entry
/// and the next tick is the de facto retry.
pub trait NotificationDispatcher {
    fn send(
        &self,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}
