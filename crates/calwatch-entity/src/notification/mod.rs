//! Persisted notification entity.

pub mod kind;
pub mod model;
pub mod payload;
pub mod priority;

pub use kind::NotificationKind;
pub use model::Notification;
pub use payload::{AssetSnapshot, NotificationPayload, RecordSnapshot};
pub use priority::Priority;
