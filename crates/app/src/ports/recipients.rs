//! Recipient source port — per-kind eligibility snapshots.

use std::future::Future;

use coachhub_domain::automation::{AutomationKind, AutomationSetting};
use coachhub_domain::error::CoachHubError;
use coachhub_domain::recipient::RecipientSnapshot;
use coachhub_domain::time::Timestamp;

/// Computes the eligible-recipient snapshot for one automation kind.
///
/// The rule is kind-specific and evaluated by the persistence collaborator
/// with a native filtered query (e.g. "clients with no login for N days").
/// The returned order carries no guarantee; the runner treats recipients
/// independently.
pub trait RecipientSource {
    fn eligible_recipients(
        &self,
        kind: AutomationKind,
        setting: &AutomationSetting,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<RecipientSnapshot>, CoachHubError>> + Send;
}
