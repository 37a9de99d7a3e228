//! Ephemeral rule findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calwatch_core::types::id::{AssetId, RecordId};

use crate::notification::{NotificationKind, NotificationPayload, Priority};

/// An ephemeral detection produced by a compliance rule.
///
/// Findings are produced fresh on every scan, never persisted and never
/// mutated; they are compared against existing notifications for
/// deduplication and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// The rule category that produced this finding.
    pub kind: NotificationKind,
    /// Severity assigned by the rule.
    pub severity: Priority,
    /// The asset the condition was detected on.
    pub asset_id: AssetId,
    /// The record the rule evaluated, if any.
    pub record_id: Option<RecordId>,
    /// The `now` the rule set was evaluated with.
    pub computed_at: DateTime<Utc>,
    /// Snapshot data carried into the notification on acceptance.
    pub payload: NotificationPayload,
}

impl Finding {
    /// Build a finding from a payload, deriving kind and references from it.
    pub fn new(severity: Priority, computed_at: DateTime<Utc>, payload: NotificationPayload) -> Self {
        Self {
            kind: payload.kind(),
            severity,
            asset_id: payload.asset().asset_id,
            record_id: payload.record().map(|r| r.record_id),
            computed_at,
            payload,
        }
    }

    /// The dedup key for this finding.
    pub fn dedup_key(&self) -> (NotificationKind, AssetId) {
        (self.kind, self.asset_id)
    }
}
