//! Typed notification payloads.
//!
//! Each variant carries only the snapshot data its rule actually needs,
//! keyed by kind, so UI rendering gets compile-time exhaustiveness instead
//! of an untyped JSON blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calwatch_core::types::id::{AssetId, RecordId};

use crate::asset::{Asset, AssetState};
use crate::record::{ComplianceRecord, RecordKind};

use super::kind::NotificationKind;

/// Snapshot of an asset at detection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// The asset's identifier.
    pub asset_id: AssetId,
    /// The asset's name at detection time.
    pub name: String,
    /// The asset's lifecycle state at detection time.
    pub state: AssetState,
}

impl From<&Asset> for AssetSnapshot {
    fn from(asset: &Asset) -> Self {
        Self {
            asset_id: asset.id,
            name: asset.name.clone(),
            state: asset.state,
        }
    }
}

/// Snapshot of a compliance record at detection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// The record's identifier.
    pub record_id: RecordId,
    /// The asset the record belongs to.
    pub asset_id: AssetId,
    /// The record's kind.
    pub kind: RecordKind,
    /// The timestamp the rule evaluated (validity end or scheduled date).
    pub due: DateTime<Utc>,
}

impl RecordSnapshot {
    /// Build a snapshot from a record, using its rule-relevant timestamp.
    ///
    /// Returns `None` if the record has no relevant timestamp at all.
    pub fn from_record(record: &ComplianceRecord) -> Option<Self> {
        Some(Self {
            record_id: record.id,
            asset_id: record.asset_id,
            kind: record.kind,
            due: record.relevant_timestamp()?,
        })
    }
}

/// Detail payload attached to a notification, keyed by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NotificationPayload {
    /// A calibration/inspection record's validity has lapsed.
    Expired {
        /// The affected asset.
        asset: AssetSnapshot,
        /// The lapsed record.
        record: RecordSnapshot,
    },
    /// A record's validity ends within the lookahead window.
    ExpiringSoon {
        /// The affected asset.
        asset: AssetSnapshot,
        /// The record approaching expiry.
        record: RecordSnapshot,
        /// Whole days remaining until expiry.
        days_remaining: i64,
    },
    /// An active asset has no still-valid calibration record.
    AssetUncalibrated {
        /// The affected asset.
        asset: AssetSnapshot,
    },
    /// A maintenance entry is due within the lookahead window.
    MaintenanceDue {
        /// The affected asset.
        asset: AssetSnapshot,
        /// The maintenance entry.
        record: RecordSnapshot,
        /// Whole days remaining until the scheduled date.
        days_remaining: i64,
    },
    /// An audit entry is due within the lookahead window.
    AuditUpcoming {
        /// The affected asset.
        asset: AssetSnapshot,
        /// The audit entry.
        record: RecordSnapshot,
        /// Whole days remaining until the scheduled date.
        days_remaining: i64,
    },
}

impl NotificationPayload {
    /// The notification kind this payload belongs to.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Expired { .. } => NotificationKind::Expired,
            Self::ExpiringSoon { .. } => NotificationKind::ExpiringSoon,
            Self::AssetUncalibrated { .. } => NotificationKind::AssetUncalibrated,
            Self::MaintenanceDue { .. } => NotificationKind::MaintenanceDue,
            Self::AuditUpcoming { .. } => NotificationKind::AuditUpcoming,
        }
    }

    /// The asset snapshot carried by this payload.
    pub fn asset(&self) -> &AssetSnapshot {
        match self {
            Self::Expired { asset, .. }
            | Self::ExpiringSoon { asset, .. }
            | Self::AssetUncalibrated { asset }
            | Self::MaintenanceDue { asset, .. }
            | Self::AuditUpcoming { asset, .. } => asset,
        }
    }

    /// The record snapshot carried by this payload, if any.
    pub fn record(&self) -> Option<&RecordSnapshot> {
        match self {
            Self::Expired { record, .. }
            | Self::ExpiringSoon { record, .. }
            | Self::MaintenanceDue { record, .. }
            | Self::AuditUpcoming { record, .. } => Some(record),
            Self::AssetUncalibrated { .. } => None,
        }
    }
}
