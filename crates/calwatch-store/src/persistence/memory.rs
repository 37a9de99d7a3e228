//! In-memory state backend for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use calwatch_core::error::AppError;
use calwatch_core::result::AppResult;
use calwatch_core::traits::state::StateStore;

/// In-memory state store.
///
/// Used in tests and wherever durability is not required. Can be switched
/// into a failing mode to exercise persistence-error paths.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    /// Key → document contents.
    documents: RwLock<HashMap<String, Vec<u8>>>,
    /// When set, every write fails with a persistence error.
    fail_writes: AtomicBool,
}

impl MemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, data: &[u8]) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::persistence(format!(
                "Simulated write failure for key: {key}"
            )));
        }
        self.documents
            .write()
            .await
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.documents.write().await.remove(key);
        Ok(())
    }
}
