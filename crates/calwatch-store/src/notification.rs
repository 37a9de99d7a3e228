//! Notification collection of record.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use calwatch_core::result::AppResult;
use calwatch_core::traits::state::StateStore;
use calwatch_core::types::id::{AssetId, NotificationId};

use calwatch_entity::notification::{Notification, NotificationKind, Priority};

use crate::persistence::NOTIFICATIONS_KEY;

/// Optional predicate for [`NotificationStore::list`].
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Only unread notifications.
    pub unread_only: bool,
    /// Only notifications at or above this priority.
    pub min_priority: Option<Priority>,
    /// Only notifications of this kind.
    pub kind: Option<NotificationKind>,
    /// Only notifications for this asset.
    pub asset_id: Option<AssetId>,
}

impl NotificationFilter {
    fn matches(&self, notification: &Notification) -> bool {
        if self.unread_only && notification.read {
            return false;
        }
        if let Some(min) = self.min_priority {
            if !notification.priority.at_least(min) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if notification.kind != kind {
                return false;
            }
        }
        if let Some(asset_id) = self.asset_id {
            if notification.asset_id != asset_id {
                return false;
            }
        }
        true
    }
}

/// Aggregated counts over the current store contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    /// Total notification count.
    pub total: usize,
    /// Unread notification count.
    pub unread: usize,
    /// Count of low-priority notifications.
    pub low: usize,
    /// Count of medium-priority notifications.
    pub medium: usize,
    /// Count of high-priority notifications.
    pub high: usize,
    /// Count of critical-priority notifications.
    pub critical: usize,
}

/// Durable notification collection with newest-first iteration order.
///
/// The in-memory collection is authoritative; every mutation is followed by
/// a full-snapshot persist through the [`StateStore`] backend. A failed
/// persist keeps the in-memory change, marks the store dirty, and returns
/// the error to the caller; the next successful persist flushes everything
/// pending.
#[derive(Debug)]
pub struct NotificationStore {
    /// Persistence backend.
    backend: Arc<dyn StateStore>,
    /// Notifications, newest-first by `created_at`.
    inner: RwLock<Vec<Notification>>,
    /// Set when in-memory state is ahead of durable state.
    dirty: AtomicBool,
}

impl NotificationStore {
    /// Create an empty store on top of a persistence backend.
    pub fn new(backend: Arc<dyn StateStore>) -> Self {
        Self {
            backend,
            inner: RwLock::new(Vec::new()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Restore prior contents from the backend, if any.
    pub async fn load(&self) -> AppResult<usize> {
        let Some(data) = self.backend.read(NOTIFICATIONS_KEY).await? else {
            return Ok(0);
        };
        let mut notifications: Vec<Notification> = serde_json::from_slice(&data)?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let count = notifications.len();
        *self.inner.write().await = notifications;
        debug!(count, "Restored notifications from durable state");
        Ok(count)
    }

    /// Insert a notification, keeping newest-first order, and persist.
    ///
    /// No uniqueness check happens here; deduplication is the caller's
    /// responsibility.
    pub async fn insert(&self, notification: Notification) -> AppResult<()> {
        {
            let mut inner = self.inner.write().await;
            let pos = inner
                .iter()
                .position(|n| n.created_at <= notification.created_at)
                .unwrap_or(inner.len());
            inner.insert(pos, notification);
        }
        self.persist().await
    }

    /// List notifications matching the filter, newest first.
    pub async fn list(&self, filter: &NotificationFilter) -> Vec<Notification> {
        self.inner
            .read()
            .await
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect()
    }

    /// Look up a notification by id.
    pub async fn get(&self, id: NotificationId) -> Option<Notification> {
        self.inner.read().await.iter().find(|n| n.id == id).cloned()
    }

    /// Mark one notification read. Unknown ids are a no-op, not an error.
    pub async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        let changed = {
            let mut inner = self.inner.write().await;
            match inner.iter_mut().find(|n| n.id == id) {
                Some(n) if !n.read => {
                    n.read = true;
                    true
                }
                _ => false,
            }
        };
        if changed || self.dirty.load(Ordering::SeqCst) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&self) -> AppResult<usize> {
        let changed = {
            let mut inner = self.inner.write().await;
            let mut changed = 0;
            for n in inner.iter_mut().filter(|n| !n.read) {
                n.read = true;
                changed += 1;
            }
            changed
        };
        if changed > 0 || self.dirty.load(Ordering::SeqCst) {
            self.persist().await?;
        }
        Ok(changed)
    }

    /// Remove a notification permanently. Unknown ids are a no-op.
    pub async fn delete(&self, id: NotificationId) -> AppResult<()> {
        let changed = {
            let mut inner = self.inner.write().await;
            let before = inner.len();
            inner.retain(|n| n.id != id);
            inner.len() != before
        };
        if changed || self.dirty.load(Ordering::SeqCst) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Remove all notifications older than the retention horizon,
    /// regardless of read state. Returns the number removed.
    pub async fn sweep_expired(
        &self,
        retention_days: i64,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        let horizon = now - Duration::days(retention_days);
        let removed = {
            let mut inner = self.inner.write().await;
            let before = inner.len();
            inner.retain(|n| n.created_at >= horizon);
            before - inner.len()
        };
        if removed > 0 {
            debug!(removed, retention_days, "Swept expired notifications");
        }
        if removed > 0 || self.dirty.load(Ordering::SeqCst) {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Aggregate counts over the current contents.
    pub async fn stats(&self) -> NotificationStats {
        let inner = self.inner.read().await;
        let mut stats = NotificationStats {
            total: inner.len(),
            unread: 0,
            low: 0,
            medium: 0,
            high: 0,
            critical: 0,
        };
        for n in inner.iter() {
            if !n.read {
                stats.unread += 1;
            }
            match n.priority {
                Priority::Low => stats.low += 1,
                Priority::Medium => stats.medium += 1,
                Priority::High => stats.high += 1,
                Priority::Critical => stats.critical += 1,
            }
        }
        stats
    }

    /// Snapshot the full current contents, newest first.
    ///
    /// The scan pass captures this once before evaluating rules, so that
    /// deduplication within a pass never sees the pass's own insertions.
    pub async fn snapshot(&self) -> Vec<Notification> {
        self.inner.read().await.clone()
    }

    /// Persist now if an earlier failed persist left memory ahead of the
    /// durable copy. Called on shutdown.
    pub async fn flush(&self) -> AppResult<()> {
        if self.dirty.load(Ordering::SeqCst) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Serialize and write the full collection to the backend.
    async fn persist(&self) -> AppResult<()> {
        let data = {
            let inner = self.inner.read().await;
            serde_json::to_vec(&*inner)?
        };
        match self.backend.write(NOTIFICATIONS_KEY, &data).await {
            Ok(()) => {
                self.dirty.store(false, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.dirty.store(true, Ordering::SeqCst);
                warn!(error = %e, "Notification persist failed; in-memory state remains authoritative");
                Err(e)
            }
        }
    }
}
