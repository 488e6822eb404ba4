//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`CoachHubError`] via `#[from]` or an explicit boxing `From` impl.

/// Top-level error type shared by services and adapters.
#[derive(Debug, thiserror::Error)]
pub enum CoachHubError {
    /// A domain invariant was violated.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The automation kind string is not one of the known kinds.
    #[error("unknown automation kind: {0}")]
    UnknownKind(String),

    /// The dispatch status string is not one of the known statuses.
    #[error("unknown dispatch status: {0}")]
    UnknownStatus(String),

    /// A recipient identity (email) was empty.
    #[error("recipient must not be empty")]
    EmptyRecipient,

    /// The cooldown exceeds the supported maximum.
    #[error("cooldown of {0} days exceeds the maximum of 365")]
    CooldownTooLarge(u32),
}

/// A lookup that found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"AutomationSetting"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// A notification delivery failure reported by the dispatcher.
///
/// Contained at the recipient level: the runner converts it into a
/// `Failed` ledger entry instead of propagating it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("dispatch failed: {reason}")]
pub struct DispatchError {
    /// Human-readable failure detail, recorded in the ledger.
    pub reason: String,
}

impl DispatchError {
    /// Build a dispatch error from any displayable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
