//! Scan pass behavior: rule scenarios, deduplication, retention.

mod helpers;

use chrono::{Duration, TimeZone, Utc};

use calwatch_core::config::{EngineConfigPatch, LookaheadPatch};
use calwatch_core::traits::StateStore;
use calwatch_entity::notification::{NotificationKind, Priority};
use calwatch_entity::record::RecordKind;

use helpers::{Harness, days_from};

#[tokio::test]
async fn test_expiry_detection_scenario() {
    let h = Harness::new();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let valid_until = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let e1 = h.source.add_asset("E1").await;
    let record_id = h
        .source
        .add_record(e1, RecordKind::Calibration, valid_until)
        .await;

    let outcome = h.scanner.run_pass(now).await.unwrap();
    assert_eq!(outcome.findings, 1);
    assert_eq!(outcome.inserted, 1);

    let all = h.api.get_all().await;
    assert_eq!(all.len(), 1);
    let n = &all[0];
    assert_eq!(n.kind, NotificationKind::Expired);
    assert_eq!(n.priority, Priority::Critical);
    assert_eq!(n.asset_id, e1);
    assert_eq!(n.record_id, Some(record_id));
    assert!(n.is_unread());
    assert_eq!(n.created_at, now);
}

#[tokio::test]
async fn test_uncalibrated_is_not_conflated_with_expired() {
    let h = Harness::new();
    let now = Utc::now();

    // E2 has never had a compliance record.
    let e2 = h.source.add_asset("E2").await;

    h.scanner.run_pass(now).await.unwrap();

    let all = h.api.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, NotificationKind::AssetUncalibrated);
    assert_eq!(all[0].asset_id, e2);
    assert!(all[0].record_id.is_none());
}

#[tokio::test]
async fn test_two_expiring_records_yield_one_notification() {
    let h = Harness::new();
    let now = Utc::now();

    // Both certificates end inside the lookahead window; same kind, same
    // asset, one pass.
    let asset = h.source.add_asset("Dual-cert rig").await;
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(now, 5))
        .await;
    h.source
        .add_record(asset, RecordKind::Inspection, days_from(now, 12))
        .await;

    let outcome = h.scanner.run_pass(now).await.unwrap();
    assert_eq!(outcome.findings, 2);
    assert_eq!(outcome.inserted, 1);

    let all = h.api.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].kind, NotificationKind::ExpiringSoon);
}

#[tokio::test]
async fn test_rescan_within_window_is_suppressed() {
    let h = Harness::new();
    let t0 = Utc::now();

    let asset = h.source.add_asset("Total station").await;
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(t0, -100))
        .await;

    let first = h.scanner.run_pass(t0).await.unwrap();
    assert_eq!(first.inserted, 1);

    let second = h
        .scanner
        .run_pass(t0 + Duration::hours(23) + Duration::minutes(59))
        .await
        .unwrap();
    assert_eq!(second.findings, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(h.api.get_all().await.len(), 1);
}

#[tokio::test]
async fn test_rescan_after_window_realerts() {
    let h = Harness::new();
    let t0 = Utc::now();

    let asset = h.source.add_asset("Total station").await;
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(t0, -100))
        .await;

    h.scanner.run_pass(t0).await.unwrap();
    let later = h
        .scanner
        .run_pass(t0 + Duration::hours(24) + Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(later.inserted, 1);
    assert_eq!(h.api.get_all().await.len(), 2);
}

#[tokio::test]
async fn test_read_notification_does_not_suppress_rescan() {
    let h = Harness::new();
    let t0 = Utc::now();

    let asset = h.source.add_asset("Level").await;
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(t0, -5))
        .await;

    h.scanner.run_pass(t0).await.unwrap();
    h.api.mark_all_read().await.unwrap();

    let second = h.scanner.run_pass(t0 + Duration::hours(1)).await.unwrap();
    assert_eq!(second.inserted, 1);
}

#[tokio::test]
async fn test_lookahead_change_applies_on_next_pass() {
    let h = Harness::new();
    let now = Utc::now();

    let asset = h.source.add_asset("Scanner").await;
    // Valid for another 20 days: inside the default 30-day window, outside
    // a 10-day one.
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(now, 20))
        .await;

    let with_default = h.scanner.run_pass(now).await.unwrap();
    assert_eq!(with_default.inserted, 1);
    assert_eq!(
        h.api.get_all().await[0].kind,
        NotificationKind::ExpiringSoon
    );

    h.api
        .update_config(&EngineConfigPatch {
            lookahead_days: Some(LookaheadPatch {
                expiring_soon: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    // Outside the dedup window so suppression cannot mask the rule change.
    let with_shrunk = h
        .scanner
        .run_pass(now + Duration::hours(25))
        .await
        .unwrap();
    assert_eq!(with_shrunk.findings, 0);
    assert_eq!(with_shrunk.inserted, 0);
}

#[tokio::test]
async fn test_retention_sweep_runs_with_each_pass() {
    let h = Harness::new();
    let now = Utc::now();

    // Seed an aged notification directly, then scan with an empty fleet.
    let asset = h.source.add_asset("Old pump").await;
    h.source
        .add_record(asset, RecordKind::Calibration, days_from(now, -100))
        .await;
    h.scanner.run_pass(days_from(now, -40)).await.unwrap();
    assert_eq!(h.api.get_all().await.len(), 1);

    let outcome = h.scanner.run_pass(now).await.unwrap();
    assert_eq!(outcome.swept, 1);

    // The aged notification is gone; only this pass's re-alert remains.
    let remaining = h.api.get_all().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].created_at, now);
}

#[tokio::test]
async fn test_persist_failure_defers_but_keeps_notifications() {
    let h = Harness::new();
    let now = Utc::now();

    h.source.add_asset("Uncovered asset").await;
    h.backend.set_fail_writes(true);

    let outcome = h.scanner.run_pass(now).await.unwrap();
    assert_eq!(outcome.inserted, 1);
    assert!(outcome.persist_errors > 0);

    // In-memory state is authoritative despite the failed persist.
    assert_eq!(h.api.get_all().await.len(), 1);

    // Once the backend recovers, the next write flushes the pending change.
    h.backend.set_fail_writes(false);
    h.notifications.flush().await.unwrap();
    let data = h
        .backend
        .read(calwatch_store::persistence::NOTIFICATIONS_KEY)
        .await
        .unwrap()
        .unwrap();
    let persisted: Vec<calwatch_entity::Notification> = serde_json::from_slice(&data).unwrap();
    assert_eq!(persisted.len(), 1);
}
