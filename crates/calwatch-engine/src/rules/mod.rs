//! Compliance rule set.
//!
//! Pure evaluation, no side effects: given the current time and a batch of
//! assets and compliance records, each rule family maps to zero or more
//! findings. Rules are independent — no rule sees another's output — and
//! deterministic: identical inputs and `now` yield identical findings.

pub mod calibration;
pub mod expiry;
pub mod schedule;

use chrono::{DateTime, Utc};

use calwatch_core::config::LookaheadConfig;

use calwatch_entity::asset::Asset;
use calwatch_entity::finding::Finding;
use calwatch_entity::record::ComplianceRecord;

/// Evaluation context shared by all rule families.
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// The instant the scan pass is evaluating against.
    pub now: DateTime<Utc>,
    /// Configured lookahead windows, in days.
    pub lookahead: LookaheadConfig,
}

/// Run every rule family over the batch and return the union of findings.
///
/// Only assets in the `active` state are evaluated; records belonging to
/// other assets in the batch are ignored for that asset.
pub fn evaluate_all(
    assets: &[Asset],
    records: &[ComplianceRecord],
    ctx: &RuleContext,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for asset in assets.iter().filter(|a| a.state.is_scannable()) {
        let asset_records: Vec<&ComplianceRecord> = records
            .iter()
            .filter(|r| r.asset_id == asset.id)
            .collect();

        findings.extend(expiry::evaluate(asset, &asset_records, ctx));
        findings.extend(calibration::evaluate(asset, &asset_records, ctx));
        findings.extend(schedule::evaluate(asset, &asset_records, ctx));
    }

    findings
}
