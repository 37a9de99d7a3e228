//! Durable state backends.

pub mod file;
pub mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

/// Storage key for the notification collection document.
pub const NOTIFICATIONS_KEY: &str = "notifications.json";

/// Storage key for the singleton engine configuration document.
pub const SETTINGS_KEY: &str = "settings.json";
