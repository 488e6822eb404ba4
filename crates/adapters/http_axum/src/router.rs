//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use coachhub_app::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, NotificationDispatcher,
    NotificationStore, RecipientSource,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the API under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<SR, LR, RS, D, C, NS>(state: AppState<SR, LR, RS, D, C, NS>) -> Router
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    C: Clock + 'static,
    NS: NotificationStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, SharedBus};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use coachhub_app::event_bus::InProcessEventBus;
    use coachhub_app::ports::{LogQuery, SystemClock};
    use coachhub_app::runner::AutomationRunner;
    use coachhub_app::services::audit_service::AutomationAuditService;
    use coachhub_app::services::settings_service::AutomationSettingsService;
    use coachhub_domain::automation::{AutomationKind, AutomationLogEntry, AutomationSetting};
    use coachhub_domain::error::{CoachHubError, DispatchError};
    use coachhub_domain::id::NotificationId;
    use coachhub_domain::notification::NotificationRecord;
    use coachhub_domain::payload::NotificationPayload;
    use coachhub_domain::recipient::RecipientSnapshot;
    use coachhub_domain::time::Timestamp;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubSettingsRepo;
    struct StubLogRepo;
    struct StubRecipientSource;
    struct StubDispatcher;
    struct StubNotificationStore;

    impl AutomationSettingsRepository for StubSettingsRepo {
        async fn upsert(
            &self,
            setting: AutomationSetting,
        ) -> Result<AutomationSetting, CoachHubError> {
            Ok(setting)
        }
        async fn get_by_kind(
            &self,
            _kind: AutomationKind,
        ) -> Result<Option<AutomationSetting>, CoachHubError> {
            Ok(None)
        }
        async fn get_all(&self) -> Result<Vec<AutomationSetting>, CoachHubError> {
            Ok(vec![])
        }
        async fn update_last_run(
            &self,
            _kind: AutomationKind,
            _at: Timestamp,
        ) -> Result<(), CoachHubError> {
            Ok(())
        }
    }

    impl AutomationLogRepository for StubLogRepo {
        async fn append(
            &self,
            entry: AutomationLogEntry,
        ) -> Result<AutomationLogEntry, CoachHubError> {
            Ok(entry)
        }
        async fn query(&self, _filter: LogQuery) -> Result<Vec<AutomationLogEntry>, CoachHubError> {
            Ok(vec![])
        }
        async fn was_recently_notified(
            &self,
            _kind: AutomationKind,
            _recipient: &str,
            _cooldown_days: u32,
            _now: Timestamp,
        ) -> Result<bool, CoachHubError> {
            Ok(false)
        }
    }

    impl RecipientSource for StubRecipientSource {
        async fn eligible_recipients(
            &self,
            _kind: AutomationKind,
            _setting: &AutomationSetting,
            _now: Timestamp,
        ) -> Result<Vec<RecipientSnapshot>, CoachHubError> {
            Ok(vec![])
        }
    }

    impl NotificationDispatcher for StubDispatcher {
        async fn send(
            &self,
            _recipient: &str,
            _payload: &NotificationPayload,
        ) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    impl NotificationStore for StubNotificationStore {
        async fn save(
            &self,
            record: NotificationRecord,
        ) -> Result<NotificationRecord, CoachHubError> {
            Ok(record)
        }
        async fn recent_for(
            &self,
            _recipient: &str,
            _limit: u32,
        ) -> Result<Vec<NotificationRecord>, CoachHubError> {
            Ok(vec![])
        }
        async fn mark_read(&self, _id: NotificationId) -> Result<(), CoachHubError> {
            Ok(())
        }
    }

    fn test_state() -> AppState<
        StubSettingsRepo,
        StubLogRepo,
        StubRecipientSource,
        StubDispatcher,
        SystemClock,
        StubNotificationStore,
    > {
        let bus: SharedBus = Arc::new(InProcessEventBus::new(16));
        let runner = Arc::new(AutomationRunner::new(
            StubSettingsRepo,
            StubLogRepo,
            StubRecipientSource,
            StubDispatcher,
            Arc::clone(&bus),
            SystemClock,
            "https://portal.example.com",
        ));
        AppState::new(
            AutomationSettingsService::new(StubSettingsRepo, Arc::clone(&bus)),
            AutomationAuditService::new(StubLogRepo),
            runner,
            Arc::new(StubNotificationStore),
            bus,
        )
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_empty_settings_list() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/automation-settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_reject_unknown_kind_with_bad_request() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/automation-settings")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"kind":"birthday_greeting","enabled":true,"cooldown_days":7}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_missing_setting() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/automation-settings/login_reminder")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_run_forced_tick_and_return_report() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/run-automations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
