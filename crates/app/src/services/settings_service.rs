//! Settings service — administrative use-cases for automation settings.

use coachhub_domain::automation::{AutomationKind, AutomationSetting};
use coachhub_domain::error::{CoachHubError, NotFoundError};
use coachhub_domain::event::{AutomationEvent, AutomationEventType};

use crate::ports::{AutomationSettingsRepository, EventPublisher};

/// Application service for reading and writing per-kind automation settings.
pub struct AutomationSettingsService<R, P> {
    repo: R,
    publisher: P,
}

impl<R, P> AutomationSettingsService<R, P>
where
    R: AutomationSettingsRepository,
    P: EventPublisher,
{
    /// Create a new service backed by the given repository.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// Upsert the setting row for a kind after validating invariants.
    ///
    /// Changes take effect at the next scheduler tick — settings are read
    /// fresh each tick, never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, setting), fields(kind = %setting.kind))]
    pub async fn save_setting(
        &self,
        setting: AutomationSetting,
    ) -> Result<AutomationSetting, CoachHubError> {
        setting.validate()?;
        let saved = self.repo.upsert(setting).await?;

        let event = AutomationEvent::new(
            AutomationEventType::SettingsUpdated,
            serde_json::json!({
                "kind": saved.kind,
                "enabled": saved.enabled,
                "cooldown_days": saved.cooldown_days,
            }),
        );
        let _ = self.publisher.publish(event).await;

        Ok(saved)
    }

    /// Look up the setting for one kind, returning an error if none saved.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::NotFound`] when no row for `kind` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_setting(
        &self,
        kind: AutomationKind,
    ) -> Result<AutomationSetting, CoachHubError> {
        self.repo.get_by_kind(kind).await?.ok_or_else(|| {
            NotFoundError {
                entity: "AutomationSetting",
                id: kind.to_string(),
            }
            .into()
        })
    }

    /// List all saved settings.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_settings(&self) -> Result<Vec<AutomationSetting>, CoachHubError> {
        self.repo.get_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coachhub_domain::automation::MAX_COOLDOWN_DAYS;
    use coachhub_domain::error::ValidationError;
    use coachhub_domain::time::Timestamp;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    struct InMemorySettingsRepo {
        store: Mutex<HashMap<AutomationKind, AutomationSetting>>,
    }

    impl Default for InMemorySettingsRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl AutomationSettingsRepository for InMemorySettingsRepo {
        fn upsert(
            &self,
            setting: AutomationSetting,
        ) -> impl Future<Output = Result<AutomationSetting, CoachHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(setting.kind, setting.clone());
            async { Ok(setting) }
        }

        fn get_by_kind(
            &self,
            kind: AutomationKind,
        ) -> impl Future<Output = Result<Option<AutomationSetting>, CoachHubError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&kind).cloned();
            async { Ok(result) }
        }

        fn get_all(
            &self,
        ) -> impl Future<Output = Result<Vec<AutomationSetting>, CoachHubError>> + Send {
            let store = self.store.lock().unwrap();
            let mut result: Vec<AutomationSetting> = store.values().cloned().collect();
            result.sort_by_key(|s| s.kind);
            async { Ok(result) }
        }

        fn update_last_run(
            &self,
            kind: AutomationKind,
            at: Timestamp,
        ) -> impl Future<Output = Result<(), CoachHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            if let Some(setting) = store.get_mut(&kind) {
                setting.last_run_at = Some(at);
            }
            async { Ok(()) }
        }
    }

    struct NullPublisher;

    impl EventPublisher for NullPublisher {
        fn publish(
            &self,
            _event: AutomationEvent,
        ) -> impl Future<Output = Result<(), CoachHubError>> + Send {
            async { Ok(()) }
        }
    }

    fn make_service() -> AutomationSettingsService<InMemorySettingsRepo, NullPublisher> {
        AutomationSettingsService::new(InMemorySettingsRepo::default(), NullPublisher)
    }

    fn valid_setting(kind: AutomationKind) -> AutomationSetting {
        AutomationSetting::builder(kind)
            .enabled(true)
            .cooldown_days(7)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_save_and_retrieve_setting() {
        let svc = make_service();
        svc.save_setting(valid_setting(AutomationKind::LoginReminder))
            .await
            .unwrap();

        let fetched = svc.get_setting(AutomationKind::LoginReminder).await.unwrap();
        assert!(fetched.enabled);
        assert_eq!(fetched.cooldown_days, 7);
    }

    #[tokio::test]
    async fn should_reject_setting_with_oversized_cooldown() {
        let svc = make_service();
        let mut setting = valid_setting(AutomationKind::LoginReminder);
        setting.cooldown_days = MAX_COOLDOWN_DAYS + 1;

        let result = svc.save_setting(setting).await;
        assert!(matches!(
            result,
            Err(CoachHubError::Validation(ValidationError::CooldownTooLarge(_)))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_setting_missing() {
        let svc = make_service();
        let result = svc.get_setting(AutomationKind::WeeklySummary).await;
        assert!(matches!(result, Err(CoachHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_all_saved_settings() {
        let svc = make_service();
        svc.save_setting(valid_setting(AutomationKind::LoginReminder))
            .await
            .unwrap();
        svc.save_setting(valid_setting(AutomationKind::HomeworkAlert))
            .await
            .unwrap();

        let all = svc.list_settings().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_overwrite_existing_setting_on_second_save() {
        let svc = make_service();
        svc.save_setting(valid_setting(AutomationKind::LoginReminder))
            .await
            .unwrap();

        let mut updated = valid_setting(AutomationKind::LoginReminder);
        updated.enabled = false;
        updated.cooldown_days = 14;
        svc.save_setting(updated).await.unwrap();

        let fetched = svc.get_setting(AutomationKind::LoginReminder).await.unwrap();
        assert!(!fetched.enabled);
        assert_eq!(fetched.cooldown_days, 14);
        assert_eq!(svc.list_settings().await.unwrap().len(), 1);
    }
}
