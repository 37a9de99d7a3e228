//! Query/command façade over the engine.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use calwatch_core::config::{EngineConfig, EngineConfigPatch};
use calwatch_core::events::EngineEvent;
use calwatch_core::result::AppResult;
use calwatch_core::types::id::NotificationId;

use calwatch_entity::notification::{Notification, Priority};

use calwatch_engine::scanner::ScanOutcome;
use calwatch_engine::{EventBus, ScanScheduler};

use calwatch_store::{NotificationFilter, NotificationStats, NotificationStore, SettingsStore};

/// The engine surface consumed by the UI layer.
///
/// The UI never writes to the notification store directly; every mutation
/// goes through here.
#[derive(Debug, Clone)]
pub struct ComplianceApi {
    /// Notification collection of record.
    notifications: Arc<NotificationStore>,
    /// Engine configuration.
    settings: Arc<SettingsStore>,
    /// Scheduler, for manual scan triggers.
    scheduler: Arc<ScanScheduler>,
    /// Event bus, for UI push updates.
    bus: Arc<EventBus>,
}

impl ComplianceApi {
    /// Create the façade over the engine's components.
    pub fn new(
        notifications: Arc<NotificationStore>,
        settings: Arc<SettingsStore>,
        scheduler: Arc<ScanScheduler>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            notifications,
            settings,
            scheduler,
            bus,
        }
    }

    /// All notifications, newest first.
    pub async fn get_all(&self) -> Vec<Notification> {
        self.notifications.list(&NotificationFilter::default()).await
    }

    /// Unread notifications, newest first.
    pub async fn get_unread(&self) -> Vec<Notification> {
        self.notifications
            .list(&NotificationFilter {
                unread_only: true,
                ..Default::default()
            })
            .await
    }

    /// Notifications at or above the given priority, newest first.
    pub async fn get_by_priority(&self, min: Priority) -> Vec<Notification> {
        self.notifications
            .list(&NotificationFilter {
                min_priority: Some(min),
                ..Default::default()
            })
            .await
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.notifications.mark_read(id).await
    }

    /// Mark all notifications read. Returns how many changed.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        self.notifications.mark_all_read().await
    }

    /// Delete one notification permanently.
    pub async fn delete(&self, id: NotificationId) -> AppResult<()> {
        self.notifications.delete(id).await
    }

    /// Run a scan now and wait for it to complete.
    ///
    /// Always permitted, even while automatic scanning is disabled. Fails
    /// with a clear error if the pass aborts or one is already in flight.
    pub async fn trigger_manual_scan(&self) -> AppResult<ScanOutcome> {
        info!("Manual scan requested");
        self.scheduler.trigger_manual().await
    }

    /// Aggregated notification counts.
    pub async fn get_stats(&self) -> NotificationStats {
        self.notifications.stats().await
    }

    /// Current engine configuration snapshot.
    pub async fn get_config(&self) -> EngineConfig {
        self.settings.get().await
    }

    /// Apply a partial configuration update.
    ///
    /// Takes effect on the next scan pass; already-created notifications
    /// are not revisited.
    pub async fn update_config(&self, patch: &EngineConfigPatch) -> AppResult<EngineConfig> {
        let merged = self.settings.update(patch).await?;
        self.bus.publish(EngineEvent::ConfigUpdated {
            enabled: merged.enabled,
        });
        Ok(merged)
    }

    /// Subscribe to engine events for push-based UI refresh.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.bus.subscribe()
    }
}
