//! Engine events published after state changes.
//!
//! Events are dispatched through the in-process event bus and consumed by
//! subscribed UI components, replacing the fixed-interval poll with push.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{AssetId, NotificationId};

/// Events emitted by the compliance engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineEvent {
    /// A scan pass finished.
    ScanCompleted {
        /// When the pass finished.
        at: DateTime<Utc>,
        /// Number of raw findings produced by the rule set.
        findings: usize,
        /// Number of findings accepted and inserted as notifications.
        inserted: usize,
        /// Number of notifications removed by the retention sweep.
        swept: usize,
    },
    /// A scan pass aborted before completion.
    ScanFailed {
        /// When the failure was observed.
        at: DateTime<Utc>,
        /// Failure description.
        message: String,
    },
    /// A finding was accepted and persisted as a notification.
    NotificationCreated {
        /// The new notification.
        id: NotificationId,
        /// Rule category, e.g. `"expired"`.
        kind: String,
        /// Priority level, e.g. `"critical"`.
        priority: String,
        /// The asset the notification refers to.
        asset_id: AssetId,
    },
    /// The engine configuration was updated.
    ConfigUpdated {
        /// Whether automatic scanning is now enabled.
        enabled: bool,
    },
}
