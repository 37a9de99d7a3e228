//! # calwatch-entity
//!
//! Domain entity models for Calwatch: tracked assets and their compliance
//! records (read-only inputs from the external store), ephemeral findings,
//! and persisted notifications.

pub mod asset;
pub mod finding;
pub mod notification;
pub mod record;

pub use asset::{Asset, AssetState};
pub use finding::Finding;
pub use notification::{
    AssetSnapshot, Notification, NotificationKind, NotificationPayload, Priority, RecordSnapshot,
};
pub use record::{ComplianceRecord, RecordKind, RecordResult};
