//! Compliance record entity.

pub mod kind;
pub mod model;

pub use kind::RecordKind;
pub use model::{ComplianceRecord, RecordResult};
