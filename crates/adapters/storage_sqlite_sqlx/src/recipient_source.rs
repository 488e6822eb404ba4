//! `SQLite` implementation of [`RecipientSource`] plus the writers that
//! maintain the eligibility signals (client directory, login tracking,
//! homework progress).

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use coachhub_app::ports::RecipientSource;
use coachhub_domain::automation::{AutomationKind, AutomationSetting};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::recipient::RecipientSnapshot;
use coachhub_domain::time::{Timestamp, cooldown_cutoff};

use crate::error::StorageError;
use crate::timefmt;

struct Wrapper(RecipientSnapshot);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let email: String = row.try_get("email")?;
        let full_name: Option<String> = row.try_get("full_name")?;
        let last_login: Option<String> = row.try_get("last_login")?;
        let login_count: Option<i64> = row.try_get("login_count")?;

        let last_login = last_login
            .map(|s| timefmt::decode(&s).map_err(|err| sqlx::Error::Decode(Box::new(err))))
            .transpose()?;
        let login_count = login_count
            .map(u32::try_from)
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .unwrap_or(0);

        Ok(Self(RecipientSnapshot {
            email,
            full_name,
            last_login,
            login_count,
        }))
    }
}

/// `SQLite`-backed eligibility snapshots.
///
/// Each kind has a native filtered query; the runner never scans and
/// filters client rows in memory.
pub struct SqliteRecipientSource {
    pool: SqlitePool,
}

impl SqliteRecipientSource {
    /// Create a new source backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a client (idempotent on email).
    ///
    /// # Errors
    ///
    /// Returns a storage error if the insert fails.
    pub async fn register_client(
        &self,
        email: &str,
        full_name: Option<&str>,
        is_admin: bool,
    ) -> Result<(), CoachHubError> {
        sqlx::query(
            "INSERT INTO clients (id, email, full_name, is_admin, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (email) DO UPDATE SET \
                 full_name = excluded.full_name, \
                 is_admin = excluded.is_admin",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(full_name)
        .bind(is_admin)
        .bind(timefmt::encode(coachhub_domain::time::now()))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    /// Record a login, bumping the counter and the last-login timestamp.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the upsert fails.
    pub async fn record_login(&self, email: &str, at: Timestamp) -> Result<(), CoachHubError> {
        sqlx::query(
            "INSERT INTO login_tracking (email, last_login, login_count) VALUES (?, ?, 1) \
             ON CONFLICT (email) DO UPDATE SET \
                 last_login = excluded.last_login, \
                 login_count = login_tracking.login_count + 1",
        )
        .bind(email)
        .bind(timefmt::encode(at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    /// Upsert a client's progress on one homework item.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the upsert fails.
    pub async fn record_homework_progress(
        &self,
        email: &str,
        homework_type: &str,
        progress: u32,
        at: Timestamp,
    ) -> Result<(), CoachHubError> {
        sqlx::query(
            "INSERT INTO homework (id, client_email, homework_type, progress, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT (client_email, homework_type) DO UPDATE SET \
                 progress = excluded.progress, \
                 updated_at = excluded.updated_at",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(homework_type)
        .bind(i64::from(progress))
        .bind(timefmt::encode(at))
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }

    /// Clients with no login inside the threshold window (or no login at
    /// all), oldest first, never-logged-in first of all.
    async fn inactive_clients(
        &self,
        threshold_days: u32,
        now: Timestamp,
    ) -> Result<Vec<RecipientSnapshot>, CoachHubError> {
        let cutoff = timefmt::encode(cooldown_cutoff(now, threshold_days));
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT c.email, c.full_name, lt.last_login, lt.login_count \
             FROM clients c \
             LEFT JOIN login_tracking lt ON lt.email = c.email \
             WHERE c.is_admin = 0 \
               AND (lt.last_login IS NULL OR lt.last_login < ?) \
             ORDER BY lt.last_login ASC NULLS FIRST",
        )
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    /// Clients with at least one unfinished homework item untouched for
    /// the threshold window.
    async fn stalled_homework_clients(
        &self,
        threshold_days: u32,
        now: Timestamp,
    ) -> Result<Vec<RecipientSnapshot>, CoachHubError> {
        let cutoff = timefmt::encode(cooldown_cutoff(now, threshold_days));
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT c.email, c.full_name, lt.last_login, lt.login_count \
             FROM clients c \
             JOIN homework h ON h.client_email = c.email \
             LEFT JOIN login_tracking lt ON lt.email = c.email \
             WHERE c.is_admin = 0 \
               AND h.progress < 100 \
               AND h.updated_at < ? \
             GROUP BY c.email \
             ORDER BY c.email",
        )
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl RecipientSource for SqliteRecipientSource {
    async fn eligible_recipients(
        &self,
        kind: AutomationKind,
        setting: &AutomationSetting,
        now: Timestamp,
    ) -> Result<Vec<RecipientSnapshot>, CoachHubError> {
        match kind {
            AutomationKind::LoginReminder => {
                self.inactive_clients(setting.cooldown_days, now).await
            }
            AutomationKind::HomeworkAlert => {
                self.stalled_homework_clients(setting.cooldown_days, now).await
            }
            // Announced kind with no recipient rule yet; ticks see an
            // empty snapshot rather than an error.
            AutomationKind::WeeklySummary => Ok(Vec::new()),
        }
    }
}
