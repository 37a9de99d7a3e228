//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calwatch_core::types::id::{AssetId, NotificationId, RecordId};

use crate::finding::Finding;

use super::kind::NotificationKind;
use super::payload::NotificationPayload;
use super::priority::Priority;

/// A persisted, user-facing notification derived from an accepted finding.
///
/// Immutable except for the `read` flag; `created_at` never changes after
/// creation and defines the store's newest-first iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier, assigned at creation.
    pub id: NotificationId,
    /// Rule category.
    pub kind: NotificationKind,
    /// Rendered headline.
    pub title: String,
    /// Rendered body text.
    pub message: String,
    /// Priority level.
    pub priority: Priority,
    /// The asset the notification refers to (weak reference).
    pub asset_id: AssetId,
    /// The record involved, if the rule evaluated one (weak reference).
    pub record_id: Option<RecordId>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Snapshot data for UI detail display.
    pub payload: NotificationPayload,
}

impl Notification {
    /// Convert an accepted finding into a notification.
    ///
    /// Assigns a fresh id, stamps `created_at`, and starts unread. `title`
    /// and `message` come from the formatter; they are display strings, not
    /// structurally meaningful.
    pub fn from_finding(
        finding: Finding,
        title: String,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind: finding.kind,
            title,
            message,
            priority: finding.severity,
            asset_id: finding.asset_id,
            record_id: finding.record_id,
            created_at,
            read: false,
            payload: finding.payload,
        }
    }

    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Age of the notification relative to `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }
}
