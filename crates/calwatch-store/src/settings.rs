//! Singleton engine configuration store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use calwatch_core::config::{EngineConfig, EngineConfigPatch};
use calwatch_core::result::AppResult;
use calwatch_core::traits::state::StateStore;

use crate::persistence::SETTINGS_KEY;

/// Holds the user-editable engine configuration.
///
/// The configuration is loaded once at engine start, mutated only through
/// [`SettingsStore::update`] (validate, merge, persist), and published on a
/// watch channel so the scheduler applies new thresholds on its next pass.
#[derive(Debug)]
pub struct SettingsStore {
    /// Persistence backend.
    backend: Arc<dyn StateStore>,
    /// Current configuration snapshot.
    current: RwLock<EngineConfig>,
    /// Publishes every applied configuration change.
    tx: watch::Sender<EngineConfig>,
    /// Set when in-memory config is ahead of durable state.
    dirty: AtomicBool,
}

impl SettingsStore {
    /// Create a settings store seeded with the bootstrap configuration.
    pub fn new(backend: Arc<dyn StateStore>, initial: EngineConfig) -> Self {
        let (tx, _) = watch::channel(initial.clone());
        Self {
            backend,
            current: RwLock::new(initial),
            tx,
            dirty: AtomicBool::new(false),
        }
    }

    /// Restore a previously persisted configuration, if any.
    ///
    /// A stored record wins over the bootstrap value, since it reflects the
    /// user's latest edits.
    pub async fn load(&self) -> AppResult<bool> {
        let Some(data) = self.backend.read(SETTINGS_KEY).await? else {
            return Ok(false);
        };
        let stored: EngineConfig = serde_json::from_slice(&data)?;
        *self.current.write().await = stored.clone();
        let _ = self.tx.send(stored);
        debug!("Restored engine configuration from durable state");
        Ok(true)
    }

    /// Return the current configuration snapshot.
    pub async fn get(&self) -> EngineConfig {
        self.current.read().await.clone()
    }

    /// Subscribe to configuration changes.
    pub fn subscribe(&self) -> watch::Receiver<EngineConfig> {
        self.tx.subscribe()
    }

    /// Validate and apply a partial update, persisting synchronously.
    ///
    /// Out-of-range values are rejected with no partial merge applied. On a
    /// persistence failure the merged configuration still takes effect in
    /// memory (and is signalled to the scheduler); the error is returned and
    /// the next successful persist flushes the pending change.
    pub async fn update(&self, patch: &EngineConfigPatch) -> AppResult<EngineConfig> {
        patch.validate()?;

        let merged = {
            let mut current = self.current.write().await;
            let merged = current.merged_with(patch);
            *current = merged.clone();
            merged
        };
        let _ = self.tx.send(merged.clone());
        info!(enabled = merged.enabled, "Engine configuration updated");

        self.persist(&merged).await?;
        Ok(merged)
    }

    /// Write the configuration document to the backend.
    async fn persist(&self, config: &EngineConfig) -> AppResult<()> {
        let data = serde_json::to_vec(config)?;
        match self.backend.write(SETTINGS_KEY, &data).await {
            Ok(()) => {
                self.dirty.store(false, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.dirty.store(true, Ordering::SeqCst);
                warn!(error = %e, "Configuration persist failed; in-memory value remains authoritative");
                Err(e)
            }
        }
    }
}
