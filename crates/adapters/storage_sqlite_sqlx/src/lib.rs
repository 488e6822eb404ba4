//! # coachhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the storage port traits defined in `coachhub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Timestamps are stored as fixed-width RFC 3339 text (microsecond
//! precision, UTC) so that string comparison in SQL matches chronological
//! order.
//!
//! ## Dependency rule
//! Depends on `coachhub-app` (for port traits) and `coachhub-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

mod error;
mod log_repo;
mod notification_store;
mod pool;
mod recipient_source;
mod settings_repo;
mod timefmt;

pub use error::StorageError;
pub use log_repo::SqliteAutomationLogRepository;
pub use notification_store::SqliteNotificationStore;
pub use pool::{Config, Database};
pub use recipient_source::SqliteRecipientSource;
pub use settings_repo::SqliteAutomationSettingsRepository;
