//! Notification payloads — tagged variants, one per message shape.
//!
//! The dispatcher renders these into subject + body. Keeping the payload a
//! closed enum (rather than free-form template strings) lets the dispatch
//! boundary validate shape before rendering.

use serde::{Deserialize, Serialize};

use crate::automation::AutomationKind;

/// Everything the dispatcher needs to render and deliver one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Gentle nudge after a period of inactivity.
    LoginReminder {
        client_name: String,
        days_inactive: u32,
        /// Optional message override from the automation's config.
        message: Option<String>,
        portal_url: String,
    },
    /// New homework is waiting in the portal.
    HomeworkReady {
        client_name: String,
        message: Option<String>,
        portal_url: String,
    },
    /// Free-form administrative message.
    Custom {
        client_name: String,
        subject: String,
        message: String,
        link: Option<String>,
        link_text: Option<String>,
    },
}

impl NotificationPayload {
    /// The automation kind this payload belongs to, used for ledger and
    /// notification-record tagging. `Custom` maps to no scheduled kind and
    /// is tagged as a weekly-summary-style one-off by callers.
    #[must_use]
    pub fn kind(&self) -> Option<AutomationKind> {
        match self {
            Self::LoginReminder { .. } => Some(AutomationKind::LoginReminder),
            Self::HomeworkReady { .. } => Some(AutomationKind::HomeworkAlert),
            Self::Custom { .. } => None,
        }
    }

    /// The salutation name embedded in the payload.
    #[must_use]
    pub fn client_name(&self) -> &str {
        match self {
            Self::LoginReminder { client_name, .. }
            | Self::HomeworkReady { client_name, .. }
            | Self::Custom { client_name, .. } => client_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_login_reminder_payload_to_its_kind() {
        let payload = NotificationPayload::LoginReminder {
            client_name: "Jo".to_string(),
            days_inactive: 10,
            message: None,
            portal_url: "https://portal.example.com".to_string(),
        };
        assert_eq!(payload.kind(), Some(AutomationKind::LoginReminder));
        assert_eq!(payload.client_name(), "Jo");
    }

    #[test]
    fn should_map_custom_payload_to_no_kind() {
        let payload = NotificationPayload::Custom {
            client_name: "Jo".to_string(),
            subject: "Hello".to_string(),
            message: "Welcome".to_string(),
            link: None,
            link_text: None,
        };
        assert_eq!(payload.kind(), None);
    }

    #[test]
    fn should_roundtrip_payload_through_serde_with_type_tag() {
        let payload = NotificationPayload::HomeworkReady {
            client_name: "Jo".to_string(),
            message: Some("Chapter 3 is up".to_string()),
            portal_url: "https://portal.example.com".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "homework_ready");
        let parsed: NotificationPayload = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, payload);
    }
}
