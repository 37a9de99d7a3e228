//! # calwatch-engine
//!
//! The compliance scanning & alerting engine:
//! - a pure rule set mapping asset/record snapshots to findings
//! - a deduplicator suppressing repeat findings within a rolling window
//! - a scan pass converting accepted findings into persisted notifications
//! - a scheduler driving periodic and on-demand scans
//! - an event bus pushing engine events to subscribed UI components

pub mod bus;
pub mod dedup;
pub mod formatter;
pub mod rules;
pub mod scanner;
pub mod scheduler;
pub mod source;

pub use bus::EventBus;
pub use dedup::DedupIndex;
pub use scanner::{ScanOutcome, Scanner};
pub use scheduler::{ScanScheduler, SchedulerState};
pub use source::{ComplianceDataSource, JsonFileSource, RecordFilter};

/// Rolling window within which a repeated `(kind, asset)` finding is
/// suppressed rather than re-notified.
pub const DEDUP_WINDOW_HOURS: i64 = 24;

/// Retention horizon for the notification sweep, in days.
pub const RETENTION_DAYS: i64 = 30;
