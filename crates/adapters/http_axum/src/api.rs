//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod log;
#[allow(clippy::missing_errors_doc)]
pub mod notifications;
#[allow(clippy::missing_errors_doc)]
pub mod run;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<SR, LR, RS, D, C, NS>() -> Router<AppState<SR, LR, RS, D, C, NS>>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    Router::new()
        // Automation settings
        .route(
            "/automation-settings",
            get(settings::list::<SR, LR, RS, D, C, NS>)
                .post(settings::save::<SR, LR, RS, D, C, NS>),
        )
        .route(
            "/automation-settings/{kind}",
            get(settings::get_one::<SR, LR, RS, D, C, NS>),
        )
        // Dispatch ledger
        .route("/automation-log", get(log::list::<SR, LR, RS, D, C, NS>))
        // Forced out-of-band tick
        .route("/run-automations", post(run::run_now::<SR, LR, RS, D, C, NS>))
        // Portal notification feed
        .route(
            "/notifications/{email}",
            get(notifications::list_for::<SR, LR, RS, D, C, NS>),
        )
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read::<SR, LR, RS, D, C, NS>),
        )
        // Event stream
        .route("/events/stream", get(sse::stream::<SR, LR, RS, D, C, NS>))
}
