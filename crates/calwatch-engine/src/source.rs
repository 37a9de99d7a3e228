//! External asset/record store collaborator.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use calwatch_core::error::{AppError, ErrorKind};
use calwatch_core::result::AppResult;
use calwatch_core::types::id::AssetId;

use calwatch_entity::asset::Asset;
use calwatch_entity::record::ComplianceRecord;

/// Filter for compliance record queries.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Only records belonging to this asset.
    pub asset_id: Option<AssetId>,
    /// Only records whose relevant timestamp is at or after this instant.
    pub valid_after: Option<DateTime<Utc>>,
    /// Only records whose relevant timestamp is at or before this instant.
    pub valid_before: Option<DateTime<Utc>>,
}

impl RecordFilter {
    fn matches(&self, record: &ComplianceRecord) -> bool {
        if let Some(asset_id) = self.asset_id {
            if record.asset_id != asset_id {
                return false;
            }
        }
        let ts = record.relevant_timestamp();
        if let Some(after) = self.valid_after {
            if !ts.map(|t| t >= after).unwrap_or(false) {
                return false;
            }
        }
        if let Some(before) = self.valid_before {
            if !ts.map(|t| t <= before).unwrap_or(false) {
                return false;
            }
        }
        true
    }
}

/// Read access to the external asset/record store.
///
/// The engine only queries; it never writes asset or record data. Query
/// failures surface as [`ErrorKind::DataSource`] and abort the scan pass
/// that issued them.
#[async_trait]
pub trait ComplianceDataSource: Send + Sync + std::fmt::Debug + 'static {
    /// List all assets currently in the `active` lifecycle state.
    async fn list_active_assets(&self) -> AppResult<Vec<Asset>>;

    /// List compliance records matching the filter.
    async fn list_records(&self, filter: &RecordFilter) -> AppResult<Vec<ComplianceRecord>>;
}

/// Data-source adapter over an exported JSON snapshot directory.
///
/// Expects `assets.json` and `records.json` in the source directory, as
/// exported from the backing asset database.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    /// Directory holding the snapshot files.
    dir: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, name: &str) -> AppResult<T> {
        let path = self.dir.join(name);
        let data = fs::read(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::DataSource,
                format!("Failed to read snapshot file: {}", path.display()),
                e,
            )
        })?;
        serde_json::from_slice(&data).map_err(|e| {
            AppError::with_source(
                ErrorKind::DataSource,
                format!("Malformed snapshot file: {}", path.display()),
                e,
            )
        })
    }
}

#[async_trait]
impl ComplianceDataSource for JsonFileSource {
    async fn list_active_assets(&self) -> AppResult<Vec<Asset>> {
        let assets: Vec<Asset> = self.read_json("assets.json").await?;
        Ok(assets
            .into_iter()
            .filter(|a| a.state.is_scannable())
            .collect())
    }

    async fn list_records(&self, filter: &RecordFilter) -> AppResult<Vec<ComplianceRecord>> {
        let records: Vec<ComplianceRecord> = self.read_json("records.json").await?;
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }
}
