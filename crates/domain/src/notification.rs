//! Notification records — the durable, portal-facing feed.
//!
//! Owned by the dispatcher: one record per delivered message, shown to the
//! client in the portal. Distinct from the dispatch ledger, which exists
//! for deduplication and audit.

use serde::{Deserialize, Serialize};

use crate::id::NotificationId;
use crate::time::Timestamp;

/// One delivered message as the client sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    /// Recipient identity (email address).
    pub recipient: String,
    /// Stable kind/type tag (`login_reminder`, `homework_ready`, `custom`).
    pub kind: String,
    pub subject: String,
    pub message: String,
    pub link: Option<String>,
    pub link_text: Option<String>,
    pub read: bool,
    pub sent_at: Timestamp,
}

impl NotificationRecord {
    /// A fresh unread record stamped `at`.
    #[must_use]
    pub fn new(
        recipient: impl Into<String>,
        kind: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient: recipient.into(),
            kind: kind.into(),
            subject: subject.into(),
            message: message.into(),
            link: None,
            link_text: None,
            read: false,
            sent_at: at,
        }
    }

    /// Attach a call-to-action link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>, text: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self.link_text = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_create_unread_record() {
        let record = NotificationRecord::new(
            "jo@example.com",
            "login_reminder",
            "Your toolkit is waiting",
            "Come back when you are ready.",
            now(),
        );
        assert!(!record.read);
        assert!(record.link.is_none());
        assert_eq!(record.recipient, "jo@example.com");
    }

    #[test]
    fn should_attach_link_and_text() {
        let record = NotificationRecord::new("jo@example.com", "custom", "Hi", "Hello", now())
            .with_link("https://portal.example.com", "Open portal");
        assert_eq!(record.link.as_deref(), Some("https://portal.example.com"));
        assert_eq!(record.link_text.as_deref(), Some("Open portal"));
    }
}
