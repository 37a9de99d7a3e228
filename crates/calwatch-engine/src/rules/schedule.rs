//! Maintenance-due and audit-upcoming rules for scheduled records.

use chrono::{DateTime, Duration, Utc};

use calwatch_entity::asset::Asset;
use calwatch_entity::finding::Finding;
use calwatch_entity::notification::{AssetSnapshot, NotificationPayload, Priority, RecordSnapshot};
use calwatch_entity::record::{ComplianceRecord, RecordKind};

use super::RuleContext;

/// Remaining days at or below which a scheduled entry is `high` priority.
const URGENT_SCHEDULE_DAYS: i64 = 7;

/// Evaluate the maintenance-due and audit-upcoming rules for one asset.
///
/// Both follow the same two-parameter shape: a lookahead window and a
/// severity ladder over the days remaining.
pub fn evaluate(asset: &Asset, records: &[&ComplianceRecord], ctx: &RuleContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    for record in records {
        let (kind, window_days) = match record.kind {
            RecordKind::Maintenance => (record.kind, ctx.lookahead.maintenance_pending),
            RecordKind::Audit => (record.kind, ctx.lookahead.audit_upcoming),
            _ => continue,
        };
        let Some(scheduled_for) = record.scheduled_for else {
            continue;
        };
        let Some(days_remaining) = within_window(scheduled_for, ctx.now, window_days) else {
            continue;
        };

        let severity = if days_remaining <= URGENT_SCHEDULE_DAYS {
            Priority::High
        } else {
            Priority::Medium
        };
        let Some(snapshot) = RecordSnapshot::from_record(record) else {
            continue;
        };
        let payload = match kind {
            RecordKind::Maintenance => NotificationPayload::MaintenanceDue {
                asset: AssetSnapshot::from(asset),
                record: snapshot,
                days_remaining,
            },
            _ => NotificationPayload::AuditUpcoming {
                asset: AssetSnapshot::from(asset),
                record: snapshot,
                days_remaining,
            },
        };
        findings.push(Finding::new(severity, ctx.now, payload));
    }

    findings
}

/// Days remaining if `scheduled_for` falls inside `[now, now + window]`.
fn within_window(
    scheduled_for: DateTime<Utc>,
    now: DateTime<Utc>,
    window_days: u32,
) -> Option<i64> {
    if scheduled_for < now {
        return None;
    }
    if scheduled_for > now + Duration::days(i64::from(window_days)) {
        return None;
    }
    Some((scheduled_for - now).num_days())
}

#[cfg(test)]
mod tests {
    use calwatch_entity::notification::NotificationKind;

    use crate::rules::fixtures::*;

    use super::*;

    #[test]
    fn test_maintenance_inside_window() {
        let now = Utc::now();
        let a = asset("Pump");
        let rec = record_for(&a, RecordKind::Maintenance, now, 3);

        let findings = evaluate(&a, &[&rec], &ctx(now));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, NotificationKind::MaintenanceDue);
        assert_eq!(findings[0].severity, Priority::High);
    }

    #[test]
    fn test_audit_uses_its_own_window() {
        let now = Utc::now();
        let a = asset("Site office");
        // Day 10 is outside the default 7-day maintenance window but inside
        // the default 14-day audit window.
        let audit = record_for(&a, RecordKind::Audit, now, 10);
        let maint = record_for(&a, RecordKind::Maintenance, now, 10);

        let findings = evaluate(&a, &[&audit, &maint], &ctx(now));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, NotificationKind::AuditUpcoming);
        assert_eq!(findings[0].severity, Priority::Medium);
    }

    #[test]
    fn test_past_schedule_is_quiet() {
        let now = Utc::now();
        let a = asset("Crane");
        let overdue = record_for(&a, RecordKind::Maintenance, now, -1);

        assert!(evaluate(&a, &[&overdue], &ctx(now)).is_empty());
    }
}
