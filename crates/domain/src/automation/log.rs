//! The dispatch ledger — append-only records of notification attempts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AutomationKind;
use crate::error::{CoachHubError, ValidationError};
use crate::id::LogEntryId;
use crate::time::Timestamp;

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Accepted by the mail transport. Only `Sent` entries count for
    /// cooldown deduplication.
    Sent,
    /// The dispatcher reported a failure; retried implicitly next tick.
    Failed,
    /// Suppressed because the recipient was recently notified.
    Skipped,
}

impl DispatchStatus {
    /// The stable storage key for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// One row of the dispatch ledger.
///
/// Entries are created exactly once per dispatch attempt and never updated
/// or deleted. The ledger answers "was `kind` sent to `recipient` within
/// the last `cooldown_days` days?".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: LogEntryId,
    pub kind: AutomationKind,
    /// Recipient identity (email address).
    pub recipient: String,
    pub status: DispatchStatus,
    /// Free-form structured detail (inactivity duration, error text, …).
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

impl AutomationLogEntry {
    /// Create a new ledger entry stamped `at`.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] when `recipient` is empty.
    pub fn new(
        kind: AutomationKind,
        recipient: impl Into<String>,
        status: DispatchStatus,
        details: serde_json::Value,
        at: Timestamp,
    ) -> Result<Self, CoachHubError> {
        let recipient = recipient.into();
        if recipient.is_empty() {
            return Err(ValidationError::EmptyRecipient.into());
        }
        Ok(Self {
            id: LogEntryId::new(),
            kind,
            recipient,
            status,
            details,
            created_at: at,
        })
    }

    /// A successful dispatch record.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] when `recipient` is empty.
    pub fn sent(
        kind: AutomationKind,
        recipient: impl Into<String>,
        details: serde_json::Value,
        at: Timestamp,
    ) -> Result<Self, CoachHubError> {
        Self::new(kind, recipient, DispatchStatus::Sent, details, at)
    }

    /// A failed dispatch record carrying the error detail.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] when `recipient` is empty.
    pub fn failed(
        kind: AutomationKind,
        recipient: impl Into<String>,
        error: &str,
        at: Timestamp,
    ) -> Result<Self, CoachHubError> {
        Self::new(
            kind,
            recipient,
            DispatchStatus::Failed,
            serde_json::json!({ "error": error }),
            at,
        )
    }
}
