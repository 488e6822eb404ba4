//! Event publisher port — fire-and-forget observer events.

use std::future::Future;

use coachhub_domain::error::CoachHubError;
use coachhub_domain::event::AutomationEvent;

/// Publishes [`AutomationEvent`]s to in-process observers.
///
/// Publishing is best-effort: dispatch correctness rests on the ledger,
/// never on event delivery.
pub trait EventPublisher {
    fn publish(
        &self,
        event: AutomationEvent,
    ) -> impl Future<Output = Result<(), CoachHubError>> + Send;
}

// A shared bus publishes like the bus itself; lets the composition root
// hand one bus to the runner, the services, and the HTTP state.
impl<T: EventPublisher + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        event: AutomationEvent,
    ) -> impl Future<Output = Result<(), CoachHubError>> + Send {
        (**self).publish(event)
    }
}
