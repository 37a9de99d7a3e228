//! Durable local state persistence trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for durable local state backends.
///
/// The engine persists each state document (the notification collection, the
/// singleton configuration record) as an opaque byte blob under a stable
/// key. The trait is defined here in `calwatch-core` and implemented in
/// `calwatch-store`.
#[async_trait]
pub trait StateStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "file", "memory").
    fn backend_type(&self) -> &str;

    /// Read the document stored under `key`, or `None` if absent.
    async fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Write a document under `key`, replacing any previous contents.
    ///
    /// A successful return means the document is durable; a failed write
    /// must leave any previous durable contents intact.
    async fn write(&self, key: &str, data: &[u8]) -> AppResult<()>;

    /// Delete the document under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
