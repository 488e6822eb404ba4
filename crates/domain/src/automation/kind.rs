//! The closed set of automation kinds the scheduler knows how to run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An automation's identifier/category.
///
/// The string forms (`login_reminder`, …) are the stable keys used in
/// storage, the ledger, and the administrative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationKind {
    /// Nudge clients who have not logged in for the cooldown period.
    LoginReminder,
    /// Alert clients with untouched homework.
    HomeworkAlert,
    /// Weekly progress summary. Announced but computes an empty recipient
    /// set until a summary rule exists.
    WeeklySummary,
}

impl AutomationKind {
    /// All kinds, in the order the runner evaluates them.
    pub const ALL: [Self; 3] = [Self::LoginReminder, Self::HomeworkAlert, Self::WeeklySummary];

    /// The stable storage/API key for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginReminder => "login_reminder",
            Self::HomeworkAlert => "homework_alert",
            Self::WeeklySummary => "weekly_summary",
        }
    }
}

impl fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutomationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login_reminder" => Ok(Self::LoginReminder),
            "homework_alert" => Ok(Self::HomeworkAlert),
            "weekly_summary" => Ok(Self::WeeklySummary),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}
