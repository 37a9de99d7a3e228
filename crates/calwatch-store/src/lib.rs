//! # calwatch-store
//!
//! Durable local state for Calwatch:
//! - [`NotificationStore`] — the notification collection of record, with
//!   read/unread lifecycle, newest-first ordering, stats, and retention sweep
//! - [`SettingsStore`] — the singleton user-editable engine configuration
//! - pluggable [`StateStore`](calwatch_core::traits::StateStore) backends
//!   (JSON file, in-memory)
//!
//! In-memory state is authoritative; persistence failures are surfaced to
//! the caller but never lose the in-memory change.

pub mod notification;
pub mod persistence;
pub mod settings;

pub use notification::{NotificationFilter, NotificationStats, NotificationStore};
pub use persistence::{FileStateStore, MemoryStateStore};
pub use settings::SettingsStore;
