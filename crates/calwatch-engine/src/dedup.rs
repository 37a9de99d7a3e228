//! Finding deduplication against existing notifications.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use calwatch_core::types::id::AssetId;

use calwatch_entity::finding::Finding;
use calwatch_entity::notification::{Notification, NotificationKind};

/// Per-pass suppression index over the notification store's prior contents.
///
/// Built once from the store state as it existed before the pass began, so
/// a pass never deduplicates against store mutations happening under it —
/// its output is independent of internal rule evaluation order.
///
/// A finding is discarded when an **unread** notification with the same
/// `(kind, asset_id)` was created within the rolling window. Severity
/// escalation within the same kind does not bypass the window; an
/// escalation that changes kind (expiring-soon to expired) passes through
/// because the key differs.
#[derive(Debug)]
pub struct DedupIndex {
    /// Keys of unread notifications younger than the window, plus keys
    /// already claimed during the current pass.
    recent_unread: HashSet<(NotificationKind, AssetId)>,
}

impl DedupIndex {
    /// Build the index from a store snapshot.
    pub fn from_snapshot(
        notifications: &[Notification],
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        let recent_unread = notifications
            .iter()
            .filter(|n| n.is_unread() && n.age_at(now) < window)
            .map(|n| (n.kind, n.asset_id))
            .collect();
        Self { recent_unread }
    }

    /// Whether this finding should become a new notification.
    pub fn accepts(&self, finding: &Finding) -> bool {
        !self.recent_unread.contains(&finding.dedup_key())
    }

    /// Accept a finding and claim its key for the rest of the pass.
    ///
    /// Two findings with the same `(kind, asset_id)` in one pass (say, two
    /// calibration records both expiring soon) would otherwise both clear
    /// the snapshot check and break the one-unread-per-key invariant;
    /// claiming lets only the first through.
    pub fn claim(&mut self, finding: &Finding) -> bool {
        self.accepts(finding) && self.recent_unread.insert(finding.dedup_key())
    }
}
