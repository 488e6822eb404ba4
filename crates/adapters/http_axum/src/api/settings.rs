//! JSON REST handlers for automation settings.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};
use coachhub_domain::automation::{AutomationKind, AutomationSetting};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for saving (upserting) an automation setting.
#[derive(Deserialize)]
pub struct SaveSettingRequest {
    pub kind: String,
    pub enabled: bool,
    pub cooldown_days: u32,
    pub config: Option<serde_json::Value>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<AutomationSetting>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<AutomationSetting>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the save endpoint.
pub enum SaveResponse {
    Created(Json<AutomationSetting>),
}

impl IntoResponse for SaveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/automation-settings` — list all saved settings.
pub async fn list<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
) -> Result<ListResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let settings = state.settings_service.list_settings().await?;
    Ok(ListResponse::Ok(Json(settings)))
}

/// `GET /api/automation-settings/:kind` — get the setting for one kind.
pub async fn get_one<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
    Path(kind): Path<String>,
) -> Result<GetResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let kind = AutomationKind::from_str(&kind)
        .map_err(coachhub_domain::error::CoachHubError::from)?;
    let setting = state.settings_service.get_setting(kind).await?;
    Ok(GetResponse::Ok(Json(setting)))
}

/// `POST /api/automation-settings` — upsert the setting for a kind.
pub async fn save<SR, LR, RS, D, C, NS>(
    State(state): State<AppState<SR, LR, RS, D, C, NS>>,
    Json(req): Json<SaveSettingRequest>,
) -> Result<SaveResponse, ApiError>
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    let kind = AutomationKind::from_str(&req.kind)
        .map_err(coachhub_domain::error::CoachHubError::from)?;

    let mut builder = AutomationSetting::builder(kind)
        .enabled(req.enabled)
        .cooldown_days(req.cooldown_days);
    if let Some(config) = req.config {
        builder = builder.config(config);
    }
    let setting = builder.build()?;

    let saved = state.settings_service.save_setting(setting).await?;
    Ok(SaveResponse::Created(Json(saved)))
}
