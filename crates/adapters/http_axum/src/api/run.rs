//! Forced out-of-band tick endpoint.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};
use coachhub_domain::automation::TickReport;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the run endpoint.
pub enum RunResponse {
    Ok(Json<TickReport>),
}

impl IntoResponse for RunResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/run-automations` — run one tick now and return its report.
///
/// Serialises on the runner's internal guard, so a forced tick never
/// overlaps a scheduled one.
pub async fn run_now<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
) -> Result<RunResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let report = state.runner.tick().await?;
    Ok(RunResponse::Ok(Json(report)))
}
