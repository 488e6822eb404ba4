//! `SQLite` implementation of [`NotificationStore`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use coachhub_app::ports::NotificationStore;
use coachhub_domain::error::{CoachHubError, NotFoundError};
use coachhub_domain::id::NotificationId;
use coachhub_domain::notification::NotificationRecord;

use crate::error::StorageError;
use crate::timefmt;

struct Wrapper(NotificationRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let recipient: String = row.try_get("recipient")?;
        let kind: String = row.try_get("kind")?;
        let subject: String = row.try_get("subject")?;
        let message: String = row.try_get("message")?;
        let link: Option<String> = row.try_get("link")?;
        let link_text: Option<String> = row.try_get("link_text")?;
        let read: bool = row.try_get("read")?;
        let sent_at: String = row.try_get("sent_at")?;

        let id =
            NotificationId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let sent_at =
            timefmt::decode(&sent_at).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(NotificationRecord {
            id,
            recipient,
            kind,
            subject,
            message,
            link,
            link_text,
            read,
            sent_at,
        }))
    }
}

/// `SQLite`-backed notification feed.
pub struct SqliteNotificationStore {
    pool: SqlitePool,
}

impl SqliteNotificationStore {
    /// Create a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl NotificationStore for SqliteNotificationStore {
    async fn save(&self, record: NotificationRecord) -> Result<NotificationRecord, CoachHubError> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient, kind, subject, message, link, link_text, read, sent_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(&record.recipient)
        .bind(&record.kind)
        .bind(&record.subject)
        .bind(&record.message)
        .bind(&record.link)
        .bind(&record.link_text)
        .bind(record.read)
        .bind(timefmt::encode(record.sent_at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(record)
    }

    async fn recent_for(
        &self,
        recipient: &str,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, CoachHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT * FROM notifications WHERE recipient = ? ORDER BY sent_at DESC LIMIT ?",
        )
        .bind(recipient)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), CoachHubError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "NotificationRecord",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
