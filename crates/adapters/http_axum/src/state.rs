//! Shared application state for axum handlers.

use std::sync::Arc;

use coachhub_app::event_bus::InProcessEventBus;
use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};
use coachhub_app::runner::AutomationRunner;
use coachhub_app::services::audit_service::AutomationAuditService;
use coachhub_app::services::settings_service::AutomationSettingsService;

/// The event publisher type shared across the process: one broadcast bus,
/// cloned by `Arc` into the runner, the services, and this state.
pub type SharedBus = Arc<InProcessEventBus>;

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do
/// not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<SR, LR, RS, D, C, NS> {
    /// Settings read/write service.
    pub settings_service: Arc<AutomationSettingsService<SR, SharedBus>>,
    /// Dispatch-ledger audit service.
    pub audit_service: Arc<AutomationAuditService<LR>>,
    /// The tick core, shared with the scheduler loop.
    pub runner: Arc<AutomationRunner<SR, LR, RS, D, SharedBus, C>>,
    /// Portal notification feed.
    pub notification_store: Arc<NS>,
    /// Broadcast bus backing the SSE stream.
    pub event_bus: SharedBus,
}

impl<SR, LR, RS, D, C, NS> Clone for AppState<SR, LR, RS, D, C, NS> {
    fn clone(&self) -> Self {
        Self {
            settings_service: Arc::clone(&self.settings_service),
            audit_service: Arc::clone(&self.audit_service),
            runner: Arc::clone(&self.runner),
            notification_store: Arc::clone(&self.notification_store),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<SR, LR, RS, D, C, NS> AppState<SR, LR, RS, D, C, NS>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    /// Create a new application state.
    ///
    /// The runner arrives pre-wrapped in an `Arc` because the scheduler
    /// loop shares it; everything else is wrapped here.
    pub fn new(
        settings_service: AutomationSettingsService<SR, SharedBus>,
        audit_service: AutomationAuditService<LR>,
        runner: Arc<AutomationRunner<SR, LR, RS, D, SharedBus, C>>,
        notification_store: Arc<NS>,
        event_bus: SharedBus,
    ) -> Self {
        Self {
            settings_service: Arc::new(settings_service),
            audit_service: Arc::new(audit_service),
            runner,
            notification_store,
            event_bus,
        }
    }
}
