//! Shared fixtures for the integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use calwatch_api::ComplianceApi;
use calwatch_core::AppResult;
use calwatch_core::config::EngineConfig;
use calwatch_core::types::id::{AssetId, RecordId};
use calwatch_engine::{ComplianceDataSource, EventBus, RecordFilter, ScanScheduler, Scanner};
use calwatch_entity::asset::{Asset, AssetState};
use calwatch_entity::record::{ComplianceRecord, RecordKind, RecordResult};
use calwatch_store::persistence::MemoryStateStore;
use calwatch_store::{NotificationStore, SettingsStore};

/// Mutable in-memory stand-in for the external asset/record store.
#[derive(Debug, Default)]
pub struct FixtureSource {
    assets: RwLock<Vec<Asset>>,
    records: RwLock<Vec<ComplianceRecord>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_asset(&self, name: &str) -> AssetId {
        let asset = Asset {
            id: AssetId::new(),
            name: name.to_string(),
            state: AssetState::Active,
        };
        let id = asset.id;
        self.assets.write().await.push(asset);
        id
    }

    pub async fn add_record(
        &self,
        asset_id: AssetId,
        kind: RecordKind,
        timestamp: DateTime<Utc>,
    ) -> RecordId {
        let record = ComplianceRecord {
            id: RecordId::new(),
            asset_id,
            kind,
            valid_until: kind.establishes_validity().then_some(timestamp),
            scheduled_for: (!kind.establishes_validity()).then_some(timestamp),
            result: RecordResult::Passed,
        };
        let id = record.id;
        self.records.write().await.push(record);
        id
    }
}

#[async_trait]
impl ComplianceDataSource for FixtureSource {
    async fn list_active_assets(&self) -> AppResult<Vec<Asset>> {
        Ok(self
            .assets
            .read()
            .await
            .iter()
            .filter(|a| a.state.is_scannable())
            .cloned()
            .collect())
    }

    async fn list_records(&self, _filter: &RecordFilter) -> AppResult<Vec<ComplianceRecord>> {
        Ok(self.records.read().await.clone())
    }
}

/// A fully wired engine over in-memory persistence and a fixture source.
pub struct Harness {
    pub source: Arc<FixtureSource>,
    pub backend: Arc<MemoryStateStore>,
    pub notifications: Arc<NotificationStore>,
    pub settings: Arc<SettingsStore>,
    pub scanner: Arc<Scanner>,
    pub scheduler: Arc<ScanScheduler>,
    pub api: ComplianceApi,
}

impl Harness {
    pub fn new() -> Self {
        let source = Arc::new(FixtureSource::new());
        let backend = Arc::new(MemoryStateStore::new());
        let settings = Arc::new(SettingsStore::new(backend.clone(), EngineConfig::default()));
        let notifications = Arc::new(NotificationStore::new(backend.clone()));
        let bus = Arc::new(EventBus::default());
        let scanner = Arc::new(Scanner::new(
            source.clone(),
            notifications.clone(),
            settings.clone(),
            bus.clone(),
        ));
        let scheduler = Arc::new(ScanScheduler::new(scanner.clone(), &settings));
        let api = ComplianceApi::new(
            notifications.clone(),
            settings.clone(),
            scheduler.clone(),
            bus,
        );

        Self {
            source,
            backend,
            notifications,
            settings,
            scanner,
            scheduler,
            api,
        }
    }
}

/// A timestamp `days` ahead of (or, negative, behind) `now`.
pub fn days_from(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now + Duration::days(days)
}
