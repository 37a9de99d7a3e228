//! One full scan pass: query, evaluate, deduplicate, insert, sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use calwatch_core::events::EngineEvent;
use calwatch_core::result::AppResult;

use calwatch_entity::notification::Notification;

use calwatch_store::{NotificationStore, SettingsStore};

use crate::bus::EventBus;
use crate::dedup::DedupIndex;
use crate::formatter::NotificationFormatter;
use crate::rules::{self, RuleContext};
use crate::source::{ComplianceDataSource, RecordFilter};
use crate::{DEDUP_WINDOW_HOURS, RETENTION_DAYS};

/// Result of one completed scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Raw findings produced by the rule set.
    pub findings: usize,
    /// Findings accepted and inserted as notifications.
    pub inserted: usize,
    /// Notifications removed by the retention sweep.
    pub swept: usize,
    /// Persistence failures encountered and deferred during the pass.
    pub persist_errors: usize,
}

/// Executes scan passes against the external store.
///
/// The scanner holds no scheduling state; the [`ScanScheduler`]
/// (`crate::scheduler`) decides when a pass runs.
#[derive(Debug)]
pub struct Scanner {
    /// Read access to the external asset/record store.
    source: Arc<dyn ComplianceDataSource>,
    /// Notification collection of record.
    notifications: Arc<NotificationStore>,
    /// Engine configuration.
    settings: Arc<SettingsStore>,
    /// Event bus for scan/notification events.
    bus: Arc<EventBus>,
}

impl Scanner {
    /// Create a scanner over its collaborators.
    pub fn new(
        source: Arc<dyn ComplianceDataSource>,
        notifications: Arc<NotificationStore>,
        settings: Arc<SettingsStore>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            source,
            notifications,
            settings,
            bus,
        }
    }

    /// Run one full pass at the given instant.
    ///
    /// Data-source failures abort the pass and propagate. Persistence
    /// failures do not: the in-memory store remains authoritative, the
    /// failure is counted in the outcome, and the store retries on its next
    /// successful write.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> AppResult<ScanOutcome> {
        let config = self.settings.get().await;

        // Dedup decisions are made against the store as it existed before
        // this pass began.
        let prior = self.notifications.snapshot().await;

        let (assets, records) = match self.query_source().await {
            Ok(data) => data,
            Err(e) => {
                self.bus.publish(EngineEvent::ScanFailed {
                    at: now,
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let ctx = RuleContext {
            now,
            lookahead: config.lookahead_days.clone(),
        };
        let findings = rules::evaluate_all(&assets, &records, &ctx);
        let mut index = DedupIndex::from_snapshot(&prior, now, Duration::hours(DEDUP_WINDOW_HOURS));

        let mut inserted = 0;
        let mut persist_errors = 0;
        for finding in findings.iter().filter(|f| index.claim(f)) {
            let title = NotificationFormatter::title(&finding.payload);
            let message = NotificationFormatter::message(&finding.payload);
            let notification = Notification::from_finding(finding.clone(), title, message, now);
            let event = EngineEvent::NotificationCreated {
                id: notification.id,
                kind: notification.kind.as_str().to_string(),
                priority: notification.priority.as_str().to_string(),
                asset_id: notification.asset_id,
            };

            if let Err(e) = self.notifications.insert(notification).await {
                // The notification exists in memory; the durable copy is
                // behind and will be flushed by the next successful persist.
                warn!(error = %e, "Deferred notification persist during scan");
                persist_errors += 1;
            }
            inserted += 1;
            self.bus.publish(event);
        }

        let swept = match self.notifications.sweep_expired(RETENTION_DAYS, now).await {
            Ok(swept) => swept,
            Err(e) => {
                warn!(error = %e, "Deferred retention sweep persist during scan");
                persist_errors += 1;
                0
            }
        };

        let outcome = ScanOutcome {
            findings: findings.len(),
            inserted,
            swept,
            persist_errors,
        };
        if inserted > 0 {
            info!(
                findings = outcome.findings,
                inserted, swept, "Scan pass inserted new notifications"
            );
        } else {
            debug!(findings = outcome.findings, swept, "Scan pass found nothing new");
        }
        self.bus.publish(EngineEvent::ScanCompleted {
            at: now,
            findings: outcome.findings,
            inserted,
            swept,
        });

        Ok(outcome)
    }

    async fn query_source(
        &self,
    ) -> AppResult<(
        Vec<calwatch_entity::asset::Asset>,
        Vec<calwatch_entity::record::ComplianceRecord>,
    )> {
        let assets = self.source.list_active_assets().await?;
        let records = self.source.list_records(&RecordFilter::default()).await?;
        Ok((assets, records))
    }
}
