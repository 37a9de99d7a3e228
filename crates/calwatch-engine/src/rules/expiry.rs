//! Expired and expiring-soon rules for validity-establishing records.

use chrono::Duration;

use calwatch_entity::asset::Asset;
use calwatch_entity::finding::Finding;
use calwatch_entity::notification::{AssetSnapshot, NotificationPayload, Priority, RecordSnapshot};
use calwatch_entity::record::ComplianceRecord;

use super::RuleContext;

/// Remaining days at or below which an approaching expiry is `high`
/// rather than `medium` priority.
const URGENT_EXPIRY_DAYS: i64 = 7;

/// Evaluate the expired and expiring-soon rules for one asset.
///
/// *Expired* fires when the asset has validity-establishing records and the
/// most recent of them (greatest `valid_until`) lapsed before `now` — which
/// means no record in the full history is still valid. An older record with
/// a later validity end counts; the latest record by issue date is not
/// special.
///
/// *Expiring soon* fires once per record whose validity ends within
/// `[now, now + lookahead.expiring_soon]`.
pub fn evaluate(asset: &Asset, records: &[&ComplianceRecord], ctx: &RuleContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    let freshest = records
        .iter()
        .filter(|r| r.kind.establishes_validity())
        .filter_map(|r| r.valid_until.map(|ts| (*r, ts)))
        .max_by_key(|(_, ts)| *ts);

    if let Some((record, valid_until)) = freshest {
        if valid_until < ctx.now {
            if let Some(snapshot) = RecordSnapshot::from_record(record) {
                findings.push(Finding::new(
                    Priority::Critical,
                    ctx.now,
                    NotificationPayload::Expired {
                        asset: AssetSnapshot::from(asset),
                        record: snapshot,
                    },
                ));
            }
        }
    }

    let window_end = ctx.now + Duration::days(i64::from(ctx.lookahead.expiring_soon));
    for record in records.iter().filter(|r| r.kind.establishes_validity()) {
        let Some(valid_until) = record.valid_until else {
            continue;
        };
        if valid_until < ctx.now || valid_until > window_end {
            continue;
        }
        let days_remaining = (valid_until - ctx.now).num_days();
        let severity = if days_remaining <= URGENT_EXPIRY_DAYS {
            Priority::High
        } else {
            Priority::Medium
        };
        if let Some(snapshot) = RecordSnapshot::from_record(record) {
            findings.push(Finding::new(
                severity,
                ctx.now,
                NotificationPayload::ExpiringSoon {
                    asset: AssetSnapshot::from(asset),
                    record: snapshot,
                    days_remaining,
                },
            ));
        }
    }

    findings
}
