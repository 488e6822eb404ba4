//! Per-tick outcome reporting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AutomationKind;
use crate::time::Timestamp;

/// Counters for one automation kind within one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindReport {
    pub sent: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Present when the kind failed wholesale (e.g. the recipient snapshot
    /// could not be fetched) — per-recipient counters stay zero then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KindReport {
    /// A report for a kind that failed before any recipient was processed.
    #[must_use]
    pub fn errored(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Outcome of one full scheduler tick across all enabled kinds.
///
/// Disabled kinds do not appear; a kind that was considered appears even
/// when every counter is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub timestamp: Timestamp,
    pub kinds: BTreeMap<AutomationKind, KindReport>,
}

impl TickReport {
    /// An empty report stamped `at`.
    #[must_use]
    pub fn new(at: Timestamp) -> Self {
        Self {
            timestamp: at,
            kinds: BTreeMap::new(),
        }
    }

    /// Total messages accepted by the transport this tick.
    #[must_use]
    pub fn total_sent(&self) -> u32 {
        self.kinds.values().map(|r| r.sent).sum()
    }

    /// Total failures this tick, counting a wholesale kind failure as one.
    #[must_use]
    pub fn total_failed(&self) -> u32 {
        self.kinds
            .values()
            .map(|r| r.failed + u32::from(r.error.is_some()))
            .sum()
    }
}
