//! Calibration coverage rule: active assets with no calibration history.

use calwatch_entity::asset::Asset;
use calwatch_entity::finding::Finding;
use calwatch_entity::notification::{AssetSnapshot, NotificationPayload, Priority};
use calwatch_entity::record::ComplianceRecord;

use super::RuleContext;

/// Evaluate the uncalibrated-asset rule for one asset.
///
/// Fires when the full record history contains no validity-establishing
/// record at all. An asset whose calibrations exist but have all lapsed is
/// the expired rule's territory — "no record" and "expired record" are
/// distinct conditions and must not be conflated.
pub fn evaluate(asset: &Asset, records: &[&ComplianceRecord], ctx: &RuleContext) -> Vec<Finding> {
    let has_history = records
        .iter()
        .any(|r| r.kind.establishes_validity() && r.valid_until.is_some());

    if has_history {
        return Vec::new();
    }

    vec![Finding::new(
        Priority::High,
        ctx.now,
        NotificationPayload::AssetUncalibrated {
            asset: AssetSnapshot::from(asset),
        },
    )]
}

#[cfg(test)]
mod tests {
    use calwatch_entity::notification::NotificationKind;
    use calwatch_entity::record::RecordKind;
    use chrono::Utc;

    use crate::rules::fixtures::*;

    use super::*;

    #[test]
    fn test_no_history_fires_uncalibrated() {
        let now = Utc::now();
        let a = asset("E2");

        let findings = evaluate(&a, &[], &ctx(now));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, NotificationKind::AssetUncalibrated);
        assert_eq!(findings[0].severity, Priority::High);
        assert!(findings[0].record_id.is_none());
    }

    #[test]
    fn test_expired_history_does_not_fire_uncalibrated() {
        let now = Utc::now();
        let a = asset("E1");
        let lapsed = record_for(&a, RecordKind::Calibration, now, -152);

        assert!(evaluate(&a, &[&lapsed], &ctx(now)).is_empty());
    }

    #[test]
    fn test_maintenance_only_history_still_fires() {
        let now = Utc::now();
        let a = asset("Compressor");
        // Maintenance entries do not establish calibration validity.
        let maint = record_for(&a, RecordKind::Maintenance, now, 10);

        let findings = evaluate(&a, &[&maint], &ctx(now));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, NotificationKind::AssetUncalibrated);
    }
}
