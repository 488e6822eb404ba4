//! JSON REST handlers for the dispatch ledger.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, LogQuery,
    NotificationDispatcher, NotificationStore, RecipientSource,
};
use coachhub_domain::automation::{AutomationKind, AutomationLogEntry};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `GET /api/automation-log`.
#[derive(Deserialize)]
pub struct LogParams {
    pub kind: Option<String>,
    pub recipient: Option<String>,
    pub limit: Option<u32>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AutomationLogEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/automation-log` — ledger history, newest first.
pub async fn list<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
    Query(params): Query<LogParams>,
) -> Result<ListResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let kind = params
        .kind
        .map(|k| AutomationKind::from_str(&k))
        .transpose()
        .map_err(coachhub_domain::error::CoachHubError::from)?;

    let entries = state
        .audit_service
        .recent_entries(LogQuery {
            kind,
            recipient: params.recipient,
            limit: params.limit,
        })
        .await?;
    Ok(ListResponse::Ok(Json(entries)))
}
