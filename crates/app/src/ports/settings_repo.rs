//! Automation settings port — persistence for per-kind configuration.

use std::future::Future;

use coachhub_domain::automation::{AutomationKind, AutomationSetting};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::time::Timestamp;

/// Repository for the one-row-per-kind [`AutomationSetting`] table.
pub trait AutomationSettingsRepository {
    /// Insert or update the setting row for its kind.
    fn upsert(
        &self,
        setting: AutomationSetting,
    ) -> impl Future<Output = Result<AutomationSetting, CoachHubError>> + Send;

    /// Get the setting row for one kind, if an administrator saved one.
    fn get_by_kind(
        &self,
        kind: AutomationKind,
    ) -> impl Future<Output = Result<Option<AutomationSetting>, CoachHubError>> + Send;

    /// Get all saved settings, ordered by kind.
    fn get_all(&self)
    -> impl Future<Output = Result<Vec<AutomationSetting>, CoachHubError>> + Send;

    /// Record that the scheduler considered `kind` at `at`.
    fn update_last_run(
        &self,
        kind: AutomationKind,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), CoachHubError>> + Send;
}
