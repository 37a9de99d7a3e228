//! Shared types used across Calwatch crates.

pub mod id;

pub use id::{AssetId, NotificationId, RecordId};
