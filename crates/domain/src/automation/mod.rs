//! Automation — per-kind settings, the dispatch ledger, and tick reports.
//!
//! An automation is a recurring, cooldown-gated notification rule: each
//! enabled [`AutomationKind`] is evaluated once per scheduler tick against
//! its [`AutomationSetting`], and every dispatch attempt is recorded in the
//! append-only ledger ([`AutomationLogEntry`]), which doubles as the
//! deduplication source of truth.

mod kind;
mod log;
mod report;

pub use kind::AutomationKind;
pub use log::{AutomationLogEntry, DispatchStatus};
pub use report::{KindReport, TickReport};

use serde::{Deserialize, Serialize};

use crate::error::{CoachHubError, ValidationError};
use crate::id::SettingId;
use crate::time::Timestamp;

/// Upper bound on the cooldown an administrator can configure.
pub const MAX_COOLDOWN_DAYS: u32 = 365;

/// Per-kind automation configuration, one row per kind.
///
/// Mutated only by administrator action; read fresh on every scheduler
/// tick (settings are never cached between ticks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSetting {
    pub id: SettingId,
    pub kind: AutomationKind,
    pub enabled: bool,
    /// Minimum gap, in days, between two dispatches to the same recipient.
    /// For login reminders this doubles as the inactivity threshold.
    pub cooldown_days: u32,
    /// Opaque kind-specific configuration (message override, portal link, …).
    pub config: serde_json::Value,
    /// When the scheduler last *considered* this kind — set after each tick
    /// that processed it, regardless of per-recipient outcomes.
    pub last_run_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AutomationSetting {
    /// Create a builder for constructing an [`AutomationSetting`].
    #[must_use]
    pub fn builder(kind: AutomationKind) -> AutomationSettingBuilder {
        AutomationSettingBuilder::new(kind)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] when `cooldown_days` exceeds
    /// [`MAX_COOLDOWN_DAYS`].
    pub fn validate(&self) -> Result<(), CoachHubError> {
        if self.cooldown_days > MAX_COOLDOWN_DAYS {
            return Err(ValidationError::CooldownTooLarge(self.cooldown_days).into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`AutomationSetting`].
#[derive(Debug)]
pub struct AutomationSettingBuilder {
    id: Option<SettingId>,
    kind: AutomationKind,
    enabled: Option<bool>,
    cooldown_days: Option<u32>,
    config: Option<serde_json::Value>,
    last_run_at: Option<Timestamp>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

impl AutomationSettingBuilder {
    fn new(kind: AutomationKind) -> Self {
        Self {
            id: None,
            kind,
            enabled: None,
            cooldown_days: None,
            config: None,
            last_run_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: SettingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn cooldown_days(mut self, days: u32) -> Self {
        self.cooldown_days = Some(days);
        self
    }

    #[must_use]
    pub fn config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn last_run_at(mut self, ts: Timestamp) -> Self {
        self.last_run_at = Some(ts);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    #[must_use]
    pub fn updated_at(mut self, ts: Timestamp) -> Self {
        self.updated_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationSetting`].
    ///
    /// Defaults: disabled, 7-day cooldown, empty `{}` config, timestamps
    /// set to now.
    ///
    /// # Errors
    ///
    /// Returns [`CoachHubError::Validation`] if invariants fail.
    pub fn build(self) -> Result<AutomationSetting, CoachHubError> {
        let now = crate::time::now();
        let setting = AutomationSetting {
            id: self.id.unwrap_or_default(),
            kind: self.kind,
            enabled: self.enabled.unwrap_or(false),
            cooldown_days: self.cooldown_days.unwrap_or(7),
            config: self.config.unwrap_or_else(|| serde_json::json!({})),
            last_run_at: self.last_run_at,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        };
        setting.validate()?;
        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_disabled_with_week_cooldown() {
        let setting = AutomationSetting::builder(AutomationKind::LoginReminder)
            .build()
            .unwrap();
        assert!(!setting.enabled);
        assert_eq!(setting.cooldown_days, 7);
        assert_eq!(setting.config, serde_json::json!({}));
        assert!(setting.last_run_at.is_none());
    }

    #[test]
    fn should_build_enabled_setting_with_custom_cooldown() {
        let setting = AutomationSetting::builder(AutomationKind::HomeworkAlert)
            .enabled(true)
            .cooldown_days(3)
            .config(serde_json::json!({"message": "check in"}))
            .build()
            .unwrap();
        assert!(setting.enabled);
        assert_eq!(setting.cooldown_days, 3);
        assert_eq!(setting.config["message"], "check in");
    }

    #[test]
    fn should_accept_zero_day_cooldown() {
        let setting = AutomationSetting::builder(AutomationKind::LoginReminder)
            .cooldown_days(0)
            .build()
            .unwrap();
        assert_eq!(setting.cooldown_days, 0);
    }

    #[test]
    fn should_reject_cooldown_above_maximum() {
        let result = AutomationSetting::builder(AutomationKind::LoginReminder)
            .cooldown_days(MAX_COOLDOWN_DAYS + 1)
            .build();
        assert!(matches!(
            result,
            Err(CoachHubError::Validation(ValidationError::CooldownTooLarge(_)))
        ));
    }

    #[test]
    fn should_set_custom_id_via_builder() {
        let id = SettingId::new();
        let setting = AutomationSetting::builder(AutomationKind::WeeklySummary)
            .id(id)
            .build()
            .unwrap();
        assert_eq!(setting.id, id);
    }

    #[test]
    fn should_roundtrip_setting_through_serde_json() {
        let setting = AutomationSetting::builder(AutomationKind::LoginReminder)
            .enabled(true)
            .cooldown_days(14)
            .build()
            .unwrap();
        let json = serde_json::to_string(&setting).unwrap();
        let parsed: AutomationSetting = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, setting.id);
        assert_eq!(parsed.kind, setting.kind);
        assert_eq!(parsed.cooldown_days, 14);
        assert!(parsed.enabled);
    }
}
