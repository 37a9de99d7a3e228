//! Scan scheduling: periodic ticks, manual triggers, single-flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Semaphore, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use calwatch_core::config::EngineConfig;
use calwatch_core::error::AppError;
use calwatch_core::result::AppResult;

use calwatch_store::SettingsStore;

use crate::scanner::{ScanOutcome, Scanner};

/// Fixed period between automatic scan passes.
///
/// Configuration moves rule thresholds, not the tick cadence.
pub const SCAN_TICK: Duration = Duration::from_secs(5 * 60);

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick or trigger.
    Idle,
    /// A scan pass is in flight.
    Scanning,
    /// Automatic scanning is switched off; manual scans still run.
    Disabled,
}

/// Drives periodic and on-demand scan passes.
///
/// At most one pass is in flight at a time. A tick that fires while a pass
/// is running is dropped, not queued — the next tick re-evaluates full
/// current state, so nothing is lost, only deferred. Disabling the engine
/// stops future automatic passes without interrupting one in progress.
#[derive(Debug)]
pub struct ScanScheduler {
    /// Pass executor.
    scanner: Arc<Scanner>,
    /// Configuration change feed.
    config_rx: watch::Receiver<EngineConfig>,
    /// Single-flight guard: one permit, held for the duration of a pass.
    in_flight: Arc<Semaphore>,
}

impl ScanScheduler {
    /// Create a scheduler over a scanner and the settings store.
    pub fn new(scanner: Arc<Scanner>, settings: &SettingsStore) -> Self {
        Self {
            scanner,
            config_rx: settings.subscribe(),
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    /// Current observable state.
    pub fn state(&self) -> SchedulerState {
        if self.in_flight.available_permits() == 0 {
            SchedulerState::Scanning
        } else if !self.config_rx.borrow().enabled {
            SchedulerState::Disabled
        } else {
            SchedulerState::Idle
        }
    }

    /// Run the scheduling loop until the cancel signal flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let mut config_rx = self.config_rx.clone();
        let mut interval = time::interval_at(time::Instant::now() + SCAN_TICK, SCAN_TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            tick_seconds = SCAN_TICK.as_secs(),
            enabled = config_rx.borrow().enabled,
            "Scan scheduler started"
        );

        loop {
            tokio::select! {
                result = cancel.changed() => {
                    // A dropped sender is a shutdown too, not a loop-again.
                    if result.is_err() || *cancel.borrow() {
                        info!("Scan scheduler received shutdown signal");
                        break;
                    }
                }
                result = config_rx.changed() => {
                    if result.is_err() {
                        // Settings store dropped; nothing left to schedule for.
                        break;
                    }
                    let enabled = config_rx.borrow().enabled;
                    info!(enabled, "Scheduler applied configuration change");
                }
                _ = interval.tick() => {
                    if !config_rx.borrow().enabled {
                        debug!("Tick ignored: automatic scanning is disabled");
                        continue;
                    }
                    match self.try_scan().await {
                        Ok(Some(outcome)) => {
                            debug!(?outcome, "Automatic scan pass completed");
                        }
                        Ok(None) => {
                            debug!("Tick dropped: a scan pass is already in flight");
                        }
                        // A waiting user gets manual-scan errors returned;
                        // nobody waits on a tick, so log and let the next
                        // tick retry.
                        Err(e) => {
                            error!(error = %e, "Automatic scan pass failed");
                        }
                    }
                }
            }
        }

        info!("Scan scheduler stopped");
    }

    /// Run a scan now, regardless of the `enabled` flag.
    ///
    /// Completes after the pass finishes; errors from the pass propagate.
    /// If a pass is already in flight the trigger is rejected rather than
    /// queued, so a manual scan can never double-insert a finding.
    pub async fn trigger_manual(&self) -> AppResult<ScanOutcome> {
        match self.in_flight.clone().try_acquire_owned() {
            Ok(_permit) => self.scanner.run_pass(Utc::now()).await,
            Err(_) => Err(AppError::service_unavailable(
                "A scan is already in progress",
            )),
        }
    }

    /// Attempt an automatic pass; `None` means another pass holds the slot.
    async fn try_scan(&self) -> AppResult<Option<ScanOutcome>> {
        match self.in_flight.clone().try_acquire_owned() {
            Ok(_permit) => self.scanner.run_pass(Utc::now()).await.map(Some),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use calwatch_core::error::ErrorKind;
    use calwatch_core::types::id::AssetId;
    use calwatch_entity::asset::{Asset, AssetState};
    use calwatch_entity::record::ComplianceRecord;
    use calwatch_store::persistence::MemoryStateStore;
    use calwatch_store::NotificationStore;

    use crate::bus::EventBus;
    use crate::source::{ComplianceDataSource, RecordFilter};

    use super::*;

    /// Data source that waits on a gate before answering, to hold a scan
    /// pass in flight from a test.
    #[derive(Debug)]
    struct GatedSource {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl ComplianceDataSource for GatedSource {
        async fn list_active_assets(&self) -> calwatch_core::AppResult<Vec<Asset>> {
            let _permit = self.gate.acquire().await.map_err(|_| {
                calwatch_core::AppError::data_source("gate closed")
            })?;
            Ok(vec![Asset {
                id: AssetId::new(),
                name: "Gated asset".to_string(),
                state: AssetState::Active,
            }])
        }

        async fn list_records(
            &self,
            _filter: &RecordFilter,
        ) -> calwatch_core::AppResult<Vec<ComplianceRecord>> {
            Ok(Vec::new())
        }
    }

    fn harness(
        gate: Arc<Semaphore>,
    ) -> (
        Arc<SettingsStore>,
        Arc<NotificationStore>,
        Arc<ScanScheduler>,
    ) {
        let backend = Arc::new(MemoryStateStore::new());
        let settings = Arc::new(SettingsStore::new(backend.clone(), EngineConfig::default()));
        let notifications = Arc::new(NotificationStore::new(backend));
        let scanner = Arc::new(Scanner::new(
            Arc::new(GatedSource { gate }),
            notifications.clone(),
            settings.clone(),
            Arc::new(EventBus::default()),
        ));
        let scheduler = Arc::new(ScanScheduler::new(scanner, &settings));
        (settings, notifications, scheduler)
    }

    #[tokio::test]
    async fn test_manual_scan_runs_while_disabled() {
        let gate = Arc::new(Semaphore::new(10));
        let (settings, _notifications, scheduler) = harness(gate);

        settings
            .update(&calwatch_core::config::EngineConfigPatch {
                enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(scheduler.state(), SchedulerState::Disabled);

        let outcome = scheduler.trigger_manual().await.unwrap();
        assert_eq!(outcome.findings, 1);
    }

    #[tokio::test]
    async fn test_second_trigger_rejected_while_scanning() {
        let gate = Arc::new(Semaphore::new(0));
        let (_settings, _notifications, scheduler) = harness(gate.clone());

        let first = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.trigger_manual().await })
        };
        // Let the first trigger take the in-flight slot and block on the gate.
        tokio::task::yield_now().await;
        assert_eq!(scheduler.state(), SchedulerState::Scanning);

        let err = scheduler.trigger_manual().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);

        gate.add_permits(1);
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.findings, 1);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_data_source_failure_returns_to_idle() {
        let gate = Arc::new(Semaphore::new(0));
        let (_settings, _notifications, scheduler) = harness(gate.clone());
        gate.close();

        let err = scheduler.trigger_manual().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DataSource);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_runs_automatic_pass() {
        let gate = Arc::new(Semaphore::new(10));
        let (_settings, notifications, scheduler) = harness(gate);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let run = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(cancel_rx).await })
        };

        // The paused clock only advances while every task is idle, so by the
        // time this sleep wakes, the tick at SCAN_TICK has fired and its pass
        // has run to completion.
        time::sleep(SCAN_TICK + Duration::from_secs(1)).await;
        assert_eq!(notifications.stats().await.total, 1);

        let _ = cancel_tx.send(true);
        run.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_ignored_while_disabled() {
        let gate = Arc::new(Semaphore::new(10));
        let (settings, notifications, scheduler) = harness(gate);
        settings
            .update(&calwatch_core::config::EngineConfigPatch {
                enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let run = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(cancel_rx).await })
        };

        // Several ticks come and go without a single pass running.
        time::sleep(SCAN_TICK * 3 + Duration::from_secs(1)).await;
        assert_eq!(notifications.stats().await.total, 0);
        assert_eq!(scheduler.state(), SchedulerState::Disabled);

        let _ = cancel_tx.send(true);
        run.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exits_when_cancel_sender_dropped() {
        let gate = Arc::new(Semaphore::new(10));
        let (_settings, _notifications, scheduler) = harness(gate);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let run = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(cancel_rx).await })
        };

        drop(cancel_tx);
        run.await.unwrap();
    }
}
