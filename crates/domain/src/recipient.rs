//! Recipient snapshots — the ephemeral eligibility view computed per tick.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// One eligible recipient plus the signal used to test eligibility.
///
/// Not persisted by the scheduler; produced by the persistence collaborator
/// each tick and discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientSnapshot {
    /// Recipient identity.
    pub email: String,
    pub full_name: Option<String>,
    /// `None` when the client has never logged in.
    pub last_login: Option<Timestamp>,
    pub login_count: u32,
}

impl RecipientSnapshot {
    /// Friendly salutation name: the full name when present, otherwise the
    /// local part of the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    /// Whole days since the last login, relative to `now`. `None` when the
    /// client has never logged in.
    #[must_use]
    pub fn days_inactive(&self, now: Timestamp) -> Option<i64> {
        self.last_login.map(|ts| (now - ts).num_days())
    }
}
