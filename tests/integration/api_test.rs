//! End-to-end tests for the query/command façade.

mod helpers;

use chrono::Utc;

use calwatch_core::config::{ChannelsPatch, EngineConfigPatch, LookaheadPatch};
use calwatch_core::error::ErrorKind;
use calwatch_core::events::EngineEvent;
use calwatch_core::types::id::NotificationId;
use calwatch_entity::notification::Priority;
use calwatch_entity::record::RecordKind;

use helpers::{Harness, days_from};

#[tokio::test]
async fn test_read_lifecycle_through_facade() {
    let h = Harness::new();
    h.source.add_asset("Theodolite").await;
    h.source.add_asset("Laser tracker").await;

    h.api.trigger_manual_scan().await.unwrap();
    assert_eq!(h.api.get_unread().await.len(), 2);

    let first = h.api.get_all().await[0].id;
    h.api.mark_read(first).await.unwrap();
    assert_eq!(h.api.get_unread().await.len(), 1);
    assert_eq!(h.api.get_all().await.len(), 2);

    let changed = h.api.mark_all_read().await.unwrap();
    assert_eq!(changed, 1);
    assert!(h.api.get_unread().await.is_empty());

    let stats = h.api.get_stats().await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.unread, 0);
}

#[tokio::test]
async fn test_delete_is_permanent_and_tolerant_of_unknown_ids() {
    let h = Harness::new();
    h.source.add_asset("Micrometer").await;
    h.api.trigger_manual_scan().await.unwrap();

    let id = h.api.get_all().await[0].id;
    h.api.delete(id).await.unwrap();
    assert!(h.api.get_all().await.is_empty());

    // Deleting again, or deleting something that never existed, is a no-op.
    h.api.delete(id).await.unwrap();
    h.api.delete(NotificationId::new()).await.unwrap();
}

#[tokio::test]
async fn test_priority_filter_is_at_least() {
    let h = Harness::new();
    let now = Utc::now();

    // Uncalibrated asset yields a high-priority notification, an expired
    // record a critical one.
    h.source.add_asset("Never calibrated").await;
    let expired = h.source.add_asset("Long expired").await;
    h.source
        .add_record(expired, RecordKind::Calibration, days_from(now, -200))
        .await;

    h.api.trigger_manual_scan().await.unwrap();

    assert_eq!(h.api.get_by_priority(Priority::Critical).await.len(), 1);
    assert_eq!(h.api.get_by_priority(Priority::High).await.len(), 2);
    assert_eq!(h.api.get_by_priority(Priority::Low).await.len(), 2);

    let stats = h.api.get_stats().await;
    assert_eq!(stats.critical, 1);
    assert_eq!(stats.high, 1);
}

#[tokio::test]
async fn test_config_update_merges_and_persists_siblings() {
    let h = Harness::new();

    let merged = h
        .api
        .update_config(&EngineConfigPatch {
            channels: Some(ChannelsPatch {
                email: Some(true),
                ..Default::default()
            }),
            lookahead_days: Some(LookaheadPatch {
                audit_upcoming: Some(21),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(merged.channels.email);
    assert!(merged.channels.in_app);
    assert_eq!(merged.lookahead_days.audit_upcoming, 21);
    assert_eq!(merged.lookahead_days.expiring_soon, 30);

    let current = h.api.get_config().await;
    assert_eq!(current, merged);
}

#[tokio::test]
async fn test_invalid_config_update_is_rejected_atomically() {
    let h = Harness::new();
    let before = h.api.get_config().await;

    let err = h
        .api
        .update_config(&EngineConfigPatch {
            enabled: Some(false),
            lookahead_days: Some(LookaheadPatch {
                expiring_soon: Some(-1),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    // The valid `enabled` part of the patch must not have been applied.
    assert_eq!(h.api.get_config().await, before);
}

#[tokio::test]
async fn test_manual_scan_allowed_while_disabled() {
    let h = Harness::new();
    h.source.add_asset("Flow meter").await;

    h.api
        .update_config(&EngineConfigPatch {
            enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let outcome = h.api.trigger_manual_scan().await.unwrap();
    assert_eq!(outcome.inserted, 1);
    assert_eq!(h.api.get_unread().await.len(), 1);
}

#[tokio::test]
async fn test_subscribers_see_scan_and_config_events() {
    let h = Harness::new();
    let asset = h.source.add_asset("Pressure gauge").await;
    let mut events = h.api.subscribe();

    h.api.trigger_manual_scan().await.unwrap();

    match events.recv().await.unwrap() {
        EngineEvent::NotificationCreated {
            kind,
            priority,
            asset_id,
            ..
        } => {
            assert_eq!(kind, "asset-uncalibrated");
            assert_eq!(priority, "high");
            assert_eq!(asset_id, asset);
        }
        other => panic!("expected NotificationCreated, got {other:?}"),
    }
    match events.recv().await.unwrap() {
        EngineEvent::ScanCompleted {
            findings, inserted, ..
        } => {
            assert_eq!(findings, 1);
            assert_eq!(inserted, 1);
        }
        other => panic!("expected ScanCompleted, got {other:?}"),
    }

    h.api
        .update_config(&EngineConfigPatch {
            enabled: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    match events.recv().await.unwrap() {
        EngineEvent::ConfigUpdated { enabled } => assert!(!enabled),
        other => panic!("expected ConfigUpdated, got {other:?}"),
    }
}
