//! `SQLite` implementation of [`AutomationSettingsRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use coachhub_app::ports::AutomationSettingsRepository;
use coachhub_domain::automation::{AutomationKind, AutomationSetting};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::id::SettingId;
use coachhub_domain::time::Timestamp;

use crate::error::StorageError;
use crate::timefmt;

struct Wrapper(AutomationSetting);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationSetting> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let kind: String = row.try_get("kind")?;
        let enabled: bool = row.try_get("enabled")?;
        let cooldown_days: i64 = row.try_get("cooldown_days")?;
        let config_json: String = row.try_get("config")?;
        let last_run_at: Option<String> = row.try_get("last_run_at")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let id = SettingId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let kind =
            AutomationKind::from_str(&kind).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let cooldown_days =
            u32::try_from(cooldown_days).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let config: serde_json::Value = serde_json::from_str(&config_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let last_run_at = last_run_at
            .map(|s| timefmt::decode(&s).map_err(|err| sqlx::Error::Decode(Box::new(err))))
            .transpose()?;
        let created_at =
            timefmt::decode(&created_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let updated_at =
            timefmt::decode(&updated_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(AutomationSetting {
            id,
            kind,
            enabled,
            cooldown_days,
            config,
            last_run_at,
            created_at,
            updated_at,
        }))
    }
}

/// `SQLite`-backed automation settings repository.
pub struct SqliteAutomationSettingsRepository {
    pool: SqlitePool,
}

impl SqliteAutomationSettingsRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationSettingsRepository for SqliteAutomationSettingsRepository {
    async fn upsert(&self, setting: AutomationSetting) -> Result<AutomationSetting, CoachHubError> {
        let config_json = serde_json::to_string(&setting.config).map_err(StorageError::from)?;

        // On conflict the existing row keeps its id, created_at and
        // last_run_at; only the administrator-editable fields change.
        sqlx::query(
            "INSERT INTO automation_settings (id, kind, enabled, cooldown_days, config, last_run_at, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (kind) DO UPDATE SET \
                 enabled = excluded.enabled, \
                 cooldown_days = excluded.cooldown_days, \
                 config = excluded.config, \
                 updated_at = excluded.updated_at",
        )
        .bind(setting.id.to_string())
        .bind(setting.kind.as_str())
        .bind(setting.enabled)
        .bind(i64::from(setting.cooldown_days))
        .bind(&config_json)
        .bind(setting.last_run_at.map(timefmt::encode))
        .bind(timefmt::encode(setting.created_at))
        .bind(timefmt::encode(setting.updated_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        let stored = self.get_by_kind(setting.kind).await?;
        stored.ok_or_else(|| {
            CoachHubError::Storage("upserted setting row disappeared".into())
        })
    }

    async fn get_by_kind(
        &self,
        kind: AutomationKind,
    ) -> Result<Option<AutomationSetting>, CoachHubError> {
        let row: Option<Wrapper> =
            sqlx::query_as("SELECT * FROM automation_settings WHERE kind = ?")
                .bind(kind.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<AutomationSetting>, CoachHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM automation_settings ORDER BY kind")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update_last_run(
        &self,
        kind: AutomationKind,
        at: Timestamp,
    ) -> Result<(), CoachHubError> {
        sqlx::query(
            "UPDATE automation_settings SET last_run_at = ?, updated_at = ? WHERE kind = ?",
        )
        .bind(timefmt::encode(at))
        .bind(timefmt::encode(at))
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteAutomationSettingsRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAutomationSettingsRepository::new(db.pool().clone())
    }

    fn valid_setting(kind: AutomationKind) -> AutomationSetting {
        AutomationSetting::builder(kind)
            .enabled(true)
            .cooldown_days(7)
            .config(serde_json::json!({"message": "hello"}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_setting() {
        let repo = setup().await;
        let setting = valid_setting(AutomationKind::LoginReminder);
        let id = setting.id;

        repo.upsert(setting).await.unwrap();
        let fetched = repo
            .get_by_kind(AutomationKind::LoginReminder)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, id);
        assert!(fetched.enabled);
        assert_eq!(fetched.cooldown_days, 7);
        assert_eq!(fetched.config["message"], "hello");
    }

    #[tokio::test]
    async fn should_return_none_when_setting_not_found() {
        let repo = setup().await;
        let result = repo.get_by_kind(AutomationKind::WeeklySummary).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_keep_one_row_per_kind_across_upserts() {
        let repo = setup().await;
        let first = valid_setting(AutomationKind::LoginReminder);
        let first_id = first.id;
        repo.upsert(first).await.unwrap();

        let mut second = valid_setting(AutomationKind::LoginReminder);
        second.enabled = false;
        second.cooldown_days = 14;
        let updated = repo.upsert(second).await.unwrap();

        // The existing row's identity survives the upsert.
        assert_eq!(updated.id, first_id);
        assert!(!updated.enabled);
        assert_eq!(updated.cooldown_days, 14);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_preserve_last_run_across_settings_upsert() {
        let repo = setup().await;
        repo.upsert(valid_setting(AutomationKind::LoginReminder))
            .await
            .unwrap();
        let ran_at = coachhub_domain::time::now();
        repo.update_last_run(AutomationKind::LoginReminder, ran_at)
            .await
            .unwrap();

        // An admin edit must not erase the scheduler's bookkeeping.
        repo.upsert(valid_setting(AutomationKind::LoginReminder))
            .await
            .unwrap();

        let fetched = repo
            .get_by_kind(AutomationKind::LoginReminder)
            .await
            .unwrap()
            .unwrap();
        let stored = fetched.last_run_at.unwrap();
        assert_eq!(stored.timestamp_micros(), ran_at.timestamp_micros());
    }

    #[tokio::test]
    async fn should_list_settings_ordered_by_kind() {
        let repo = setup().await;
        repo.upsert(valid_setting(AutomationKind::WeeklySummary))
            .await
            .unwrap();
        repo.upsert(valid_setting(AutomationKind::HomeworkAlert))
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, AutomationKind::HomeworkAlert);
        assert_eq!(all[1].kind, AutomationKind::WeeklySummary);
    }

    #[tokio::test]
    async fn should_update_last_run_timestamp() {
        let repo = setup().await;
        repo.upsert(valid_setting(AutomationKind::HomeworkAlert))
            .await
            .unwrap();

        let at = coachhub_domain::time::now();
        repo.update_last_run(AutomationKind::HomeworkAlert, at)
            .await
            .unwrap();

        let fetched = repo
            .get_by_kind(AutomationKind::HomeworkAlert)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            fetched.last_run_at.unwrap().timestamp_micros(),
            at.timestamp_micros()
        );
    }
}
