//! Event — an immutable record of something the scheduler did.
//!
//! Events are produced when a dispatch is recorded, a tick completes, or
//! settings change, and are broadcast to in-process observers (SSE stream,
//! logs). They are fire-and-forget: losing one never affects dispatch
//! correctness, which rests on the ledger alone.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::Timestamp;

/// Category of an automation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationEventType {
    DispatchSent,
    DispatchFailed,
    TickCompleted,
    SettingsUpdated,
}

/// An immutable event with structured JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationEvent {
    pub id: EventId,
    pub event_type: AutomationEventType,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl AutomationEvent {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: AutomationEventType, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            data,
            timestamp: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_new_events_with_fresh_id_and_time() {
        let a = AutomationEvent::new(AutomationEventType::TickCompleted, serde_json::json!({}));
        let b = AutomationEvent::new(AutomationEventType::TickCompleted, serde_json::json!({}));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn should_roundtrip_event_through_serde_json() {
        let event = AutomationEvent::new(
            AutomationEventType::DispatchSent,
            serde_json::json!({"kind": "login_reminder", "recipient": "jo@example.com"}),
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: AutomationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.event_type, AutomationEventType::DispatchSent);
        assert_eq!(parsed.data["recipient"], "jo@example.com");
    }
}
