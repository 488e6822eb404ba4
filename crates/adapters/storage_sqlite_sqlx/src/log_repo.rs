//! `SQLite` implementation of [`AutomationLogRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, SqlitePool};

use coachhub_app::ports::{AutomationLogRepository, LogQuery};
use coachhub_domain::automation::{AutomationKind, AutomationLogEntry, DispatchStatus};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::id::LogEntryId;
use coachhub_domain::time::{Timestamp, cooldown_cutoff};

use crate::error::StorageError;
use crate::timefmt;

/// Newest-first row cap applied when a query specifies no limit.
const DEFAULT_QUERY_LIMIT: u32 = 100;

struct Wrapper(AutomationLogEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let kind: String = row.try_get("kind")?;
        let recipient: String = row.try_get("recipient")?;
        let status: String = row.try_get("status")?;
        let details_json: String = row.try_get("details")?;
        let created_at: String = row.try_get("created_at")?;

        let id = LogEntryId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let kind =
            AutomationKind::from_str(&kind).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let status =
            DispatchStatus::from_str(&status).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let details: serde_json::Value = serde_json::from_str(&details_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at =
            timefmt::decode(&created_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(AutomationLogEntry {
            id,
            kind,
            recipient,
            status,
            details,
            created_at,
        }))
    }
}

/// `SQLite`-backed dispatch ledger.
pub struct SqliteAutomationLogRepository {
    pool: SqlitePool,
}

impl SqliteAutomationLogRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationLogRepository for SqliteAutomationLogRepository {
    async fn append(&self, entry: AutomationLogEntry) -> Result<AutomationLogEntry, CoachHubError> {
        let details_json = serde_json::to_string(&entry.details).map_err(StorageError::from)?;

        sqlx::query(
            "INSERT INTO automation_log (id, kind, recipient, status, details, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(entry.kind.as_str())
        .bind(&entry.recipient)
        .bind(entry.status.as_str())
        .bind(&details_json)
        .bind(timefmt::encode(entry.created_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(entry)
    }

    async fn query(&self, filter: LogQuery) -> Result<Vec<AutomationLogEntry>, CoachHubError> {
        let mut builder = QueryBuilder::new("SELECT * FROM automation_log WHERE 1 = 1");
        if let Some(kind) = filter.kind {
            builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(recipient) = &filter.recipient {
            builder.push(" AND recipient = ").push_bind(recipient.clone());
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(filter.limit.unwrap_or(DEFAULT_QUERY_LIMIT)));

        let rows: Vec<Wrapper> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn was_recently_notified(
        &self,
        kind: AutomationKind,
        recipient: &str,
        cooldown_days: u32,
        now: Timestamp,
    ) -> Result<bool, CoachHubError> {
        // Strict `>`: an entry stamped exactly cooldown_days ago lies
        // outside the window and does not block a new send.
        let cutoff = timefmt::encode(cooldown_cutoff(now, cooldown_days));
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM automation_log \
             WHERE kind = ? AND recipient = ? AND status = 'sent' AND created_at > ?",
        )
        .bind(kind.as_str())
        .bind(recipient)
        .bind(&cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use chrono::Duration;
    use coachhub_domain::time::now;

    async fn setup() -> SqliteAutomationLogRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteAutomationLogRepository::new(db.pool().clone())
    }

    fn sent_at(kind: AutomationKind, recipient: &str, at: Timestamp) -> AutomationLogEntry {
        AutomationLogEntry::sent(kind, recipient, serde_json::json!({"days_inactive": 10}), at)
            .unwrap()
    }

    #[tokio::test]
    async fn should_append_and_query_entries_newest_first() {
        let repo = setup().await;
        let base = now();
        repo.append(sent_at(
            AutomationKind::LoginReminder,
            "a@x.com",
            base - Duration::hours(2),
        ))
        .await
        .unwrap();
        repo.append(sent_at(AutomationKind::LoginReminder, "b@x.com", base))
            .await
            .unwrap();

        let entries = repo.query(LogQuery::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].recipient, "b@x.com");
        assert_eq!(entries[1].recipient, "a@x.com");
    }

    #[tokio::test]
    async fn should_filter_by_kind_and_recipient() {
        let repo = setup().await;
        let base = now();
        repo.append(sent_at(AutomationKind::LoginReminder, "a@x.com", base))
            .await
            .unwrap();
        repo.append(sent_at(AutomationKind::HomeworkAlert, "a@x.com", base))
            .await
            .unwrap();
        repo.append(sent_at(AutomationKind::LoginReminder, "b@x.com", base))
            .await
            .unwrap();

        let entries = repo
            .query(LogQuery {
                kind: Some(AutomationKind::LoginReminder),
                recipient: Some("a@x.com".to_string()),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, AutomationKind::LoginReminder);
        assert_eq!(entries[0].recipient, "a@x.com");
    }

    #[tokio::test]
    async fn should_apply_query_limit() {
        let repo = setup().await;
        let base = now();
        for i in 0..5 {
            repo.append(sent_at(
                AutomationKind::LoginReminder,
                &format!("client{i}@x.com"),
                base - Duration::minutes(i),
            ))
            .await
            .unwrap();
        }

        let entries = repo
            .query(LogQuery {
                limit: Some(3),
                ..LogQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn should_preserve_details_through_roundtrip() {
        let repo = setup().await;
        let entry = AutomationLogEntry::failed(
            AutomationKind::HomeworkAlert,
            "a@x.com",
            "smtp timeout",
            now(),
        )
        .unwrap();
        repo.append(entry).await.unwrap();

        let entries = repo.query(LogQuery::default()).await.unwrap();
        assert_eq!(entries[0].status, DispatchStatus::Failed);
        assert_eq!(entries[0].details["error"], "smtp timeout");
    }

    #[tokio::test]
    async fn should_detect_recent_sent_entry_within_window() {
        let repo = setup().await;
        let base = now();
        repo.append(sent_at(
            AutomationKind::LoginReminder,
            "a@x.com",
            base - Duration::days(2),
        ))
        .await
        .unwrap();

        let recent = repo
            .was_recently_notified(AutomationKind::LoginReminder, "a@x.com", 7, base)
            .await
            .unwrap();
        assert!(recent);
    }

    #[tokio::test]
    async fn should_not_count_entry_exactly_cooldown_days_old() {
        let repo = setup().await;
        let base = now();
        repo.append(sent_at(
            AutomationKind::LoginReminder,
            "a@x.com",
            base - Duration::days(7),
        ))
        .await
        .unwrap();

        let recent = repo
            .was_recently_notified(AutomationKind::LoginReminder, "a@x.com", 7, base)
            .await
            .unwrap();
        assert!(!recent);
    }

    #[tokio::test]
    async fn should_ignore_failed_entries_for_dedup() {
        let repo = setup().await;
        let base = now();
        repo.append(
            AutomationLogEntry::failed(AutomationKind::LoginReminder, "a@x.com", "boom", base)
                .unwrap(),
        )
        .await
        .unwrap();

        let recent = repo
            .was_recently_notified(AutomationKind::LoginReminder, "a@x.com", 7, base)
            .await
            .unwrap();
        assert!(!recent);
    }

    #[tokio::test]
    async fn should_scope_dedup_to_kind_and_recipient() {
        let repo = setup().await;
        let base = now();
        repo.append(sent_at(AutomationKind::LoginReminder, "a@x.com", base))
            .await
            .unwrap();

        let other_kind = repo
            .was_recently_notified(AutomationKind::HomeworkAlert, "a@x.com", 7, base)
            .await
            .unwrap();
        let other_recipient = repo
            .was_recently_notified(AutomationKind::LoginReminder, "b@x.com", 7, base)
            .await
            .unwrap();
        assert!(!other_kind);
        assert!(!other_recipient);
    }
}
