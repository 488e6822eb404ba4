//! Portal notification feed handlers.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};
use coachhub_domain::error::{CoachHubError, NotFoundError};
use coachhub_domain::id::NotificationId;
use coachhub_domain::notification::NotificationRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Default page size for the feed.
const DEFAULT_FEED_LIMIT: u32 = 50;

/// Query parameters for the feed endpoint.
#[derive(Deserialize)]
pub struct FeedParams {
    pub limit: Option<u32>,
}

/// Possible responses from the feed endpoint.
pub enum FeedResponse {
    Ok(Json<Vec<NotificationRecord>>),
}

impl IntoResponse for FeedResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the mark-read endpoint.
pub enum MarkReadResponse {
    NoContent,
}

impl IntoResponse for MarkReadResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/notifications/:email` — recent notifications for one client.
pub async fn list_for<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
    Path(email): Path<String>,
    Query(params): Query<FeedParams>,
) -> Result<FeedResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let records = state
        .notification_store
        .recent_for(&email, params.limit.unwrap_or(DEFAULT_FEED_LIMIT))
        .await?;
    Ok(FeedResponse::Ok(Json(records)))
}

/// `POST /api/notifications/:id/read` — mark one notification as read.
pub async fn mark_read<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
    Path(id): Path<String>,
) -> Result<MarkReadResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let id = NotificationId::from_str(&id).map_err(|_| {
        ApiError::from(CoachHubError::NotFound(NotFoundError {
            entity: "NotificationRecord",
            id,
        }))
    })?;
    state.notification_store.mark_read(id).await?;
    Ok(MarkReadResponse::NoContent)
}
