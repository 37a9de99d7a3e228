//! JSON-file state backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use calwatch_core::error::{AppError, ErrorKind};
use calwatch_core::result::AppResult;
use calwatch_core::traits::state::StateStore;

/// File-backed state store.
///
/// Each document lives as one file under the root directory. Writes go to a
/// temp file first and are renamed into place, so a crash mid-write leaves
/// the previous durable contents intact.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    /// Root directory for all state documents.
    root: PathBuf,
}

impl FileStateStore {
    /// Create a new file state store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to create state root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to an absolute path within the root.
    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    fn backend_type(&self) -> &str {
        "file"
    }

    async fn read(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let full_path = self.resolve(key);
        match fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to read state document: {key}"),
                e,
            )),
        }
    }

    async fn write(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        let tmp_path = full_path.with_extension("tmp");
        fs::write(&tmp_path, data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to write state document: {key}"),
                e,
            )
        })?;
        fs::rename(&tmp_path, &full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to commit state document: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote state document");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Persistence,
                format!("Failed to delete state document: {key}"),
                e,
            )),
        }
    }
}
