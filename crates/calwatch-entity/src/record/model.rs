//! Compliance record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use calwatch_core::types::id::{AssetId, RecordId};

use super::kind::RecordKind;

/// Outcome classification of a compliance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordResult {
    /// The check passed.
    Passed,
    /// The check passed with remarks.
    Conditional,
    /// The check failed.
    Failed,
}

/// A timestamped compliance record belonging to exactly one asset.
///
/// Records are owned by the external asset/record store. Calibration and
/// inspection records carry `valid_until`; maintenance and audit records
/// carry `scheduled_for`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Unique record identifier.
    pub id: RecordId,
    /// The asset this record belongs to.
    pub asset_id: AssetId,
    /// Record kind.
    pub kind: RecordKind,
    /// End of validity, for calibration/inspection records.
    pub valid_until: Option<DateTime<Utc>>,
    /// Planned date, for maintenance/audit records.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Outcome classification.
    pub result: RecordResult,
}

impl ComplianceRecord {
    /// The timestamp the rule set evaluates for this record's kind.
    pub fn relevant_timestamp(&self) -> Option<DateTime<Utc>> {
        if self.kind.establishes_validity() {
            self.valid_until
        } else {
            self.scheduled_for
        }
    }

    /// Whether this record still establishes validity at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.kind.establishes_validity()
            && self.valid_until.map(|until| until >= now).unwrap_or(false)
    }
}
