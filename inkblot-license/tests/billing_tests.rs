mod common;

use common::{fresh, harness_with, purchased, restored, store_started_days_ago, FakeBilling};
use inkblot_license::{
    BillingFallback, GateState, LicenseConfig, MemoryTrialStore, NoBilling, TransactionEvent,
    TransactionState, TrialStore, UNLOCKED_KEY,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;

fn expired_with(billing: Arc<FakeBilling>) -> common::Harness {
    let h = harness_with(
        store_started_days_ago(4, false),
        billing,
        LicenseConfig::default(),
    );
    h.gate.launch().unwrap();
    h
}

// ── Purchase without billing ─────────────────────────────────────

#[tokio::test]
async fn purchase_without_billing_unlocks_immediately() {
    let h = harness_with(
        store_started_days_ago(4, false),
        Arc::new(NoBilling),
        LicenseConfig::default(),
    );
    h.gate.launch().unwrap();
    assert_eq!(h.gate.state(), GateState::TrialExpired);

    let report = h.gate.purchase().await;

    assert!(report.success);
    assert!(!report.pending);
    assert!(report.error.is_none());
    assert_eq!(h.gate.state(), GateState::Unlocked);
    assert_eq!(h.store.get(UNLOCKED_KEY).unwrap().as_deref(), Some("true"));
}

#[tokio::test]
async fn purchase_without_billing_can_report_error_instead() {
    let config = LicenseConfig {
        billing_fallback: BillingFallback::ReportError,
        ..Default::default()
    };
    let h = harness_with(store_started_days_ago(4, false), Arc::new(NoBilling), config);
    h.gate.launch().unwrap();

    let report = h.gate.purchase().await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("not available"));
    assert_eq!(h.gate.state(), GateState::TrialExpired);
    assert_eq!(h.store.get(UNLOCKED_KEY).unwrap(), None);
}

#[tokio::test]
async fn purchase_during_trial_without_billing_unlocks() {
    let h = fresh();
    h.gate.launch().unwrap();
    assert!(h.gate.purchase().await.success);
    assert_eq!(h.gate.state(), GateState::Unlocked);
}

// ── Purchase with billing ────────────────────────────────────────

#[tokio::test]
async fn purchase_with_billing_is_pending_until_completion() {
    let billing = Arc::new(FakeBilling::available());
    let h = expired_with(billing.clone());

    let report = h.gate.purchase().await;

    assert!(report.success);
    assert!(report.pending);
    assert_eq!(billing.payments(), vec![LicenseConfig::default().product_id]);
    assert_eq!(h.gate.state(), GateState::TrialExpired);

    let unlocked = h.gate.handle_transaction(&purchased("tx-1")).await.unwrap();
    assert!(unlocked);
    assert_eq!(h.gate.state(), GateState::Unlocked);
    assert_eq!(billing.finished(), vec!["tx-1".to_string()]);
}

#[tokio::test]
async fn purchase_reports_missing_product() {
    let billing = Arc::new(FakeBilling {
        available: true,
        ..Default::default()
    });
    let h = expired_with(billing.clone());

    let report = h.gate.purchase().await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("product not found"));
    assert!(billing.payments().is_empty());
}

#[tokio::test]
async fn purchase_when_unlocked_skips_billing() {
    let billing = Arc::new(FakeBilling::available());
    let h = harness_with(
        store_started_days_ago(4, true),
        billing.clone(),
        LicenseConfig::default(),
    );
    h.gate.launch().unwrap();

    let report = h.gate.purchase().await;
    assert!(report.success);
    assert!(!report.pending);
    assert!(billing.payments().is_empty());
}

// ── Transactions ─────────────────────────────────────────────────

#[tokio::test]
async fn failed_transaction_is_finished_without_unlock() {
    let billing = Arc::new(FakeBilling::available());
    let h = expired_with(billing.clone());

    let mut event = TransactionEvent::new(
        "tx-9",
        LicenseConfig::default().product_id,
        TransactionState::Failed,
    );
    event.error = Some("card declined".into());

    assert!(!h.gate.handle_transaction(&event).await.unwrap());
    assert_eq!(h.gate.state(), GateState::TrialExpired);
    assert_eq!(billing.finished(), vec!["tx-9".to_string()]);
}

#[tokio::test]
async fn in_flight_transactions_are_not_finished() {
    let billing = Arc::new(FakeBilling::available());
    let h = expired_with(billing.clone());

    for state in [TransactionState::Purchasing, TransactionState::Deferred] {
        let event = TransactionEvent::new("tx-2", LicenseConfig::default().product_id, state);
        assert!(!h.gate.handle_transaction(&event).await.unwrap());
    }
    assert!(billing.finished().is_empty());
    assert_eq!(h.gate.state(), GateState::TrialExpired);
}

#[tokio::test]
async fn foreign_product_is_ignored() {
    let billing = Arc::new(FakeBilling::available());
    let h = expired_with(billing.clone());

    let event = TransactionEvent::new("tx-3", "com.other.app.pro", TransactionState::Purchased);
    assert!(!h.gate.handle_transaction(&event).await.unwrap());
    assert_eq!(h.gate.state(), GateState::TrialExpired);
    assert!(billing.finished().is_empty());
}

#[tokio::test]
async fn duplicate_completion_events_collapse() {
    let billing = Arc::new(FakeBilling::available());
    let h = expired_with(billing.clone());
    let mut rx = h.gate.subscribe();

    assert!(h.gate.handle_transaction(&purchased("tx-1")).await.unwrap());
    assert!(rx.has_changed().unwrap());
    let _ = rx.borrow_and_update();

    assert!(!h.gate.handle_transaction(&purchased("tx-1")).await.unwrap());
    assert!(!h.gate.handle_transaction(&restored("tx-1")).await.unwrap());

    assert!(!rx.has_changed().unwrap());
    assert_eq!(billing.finished(), vec!["tx-1".to_string()]);
}

// ── Restore ──────────────────────────────────────────────────────

#[tokio::test]
async fn restore_without_billing_reports_error() {
    let h = fresh();
    h.gate.launch().unwrap();

    let report = h.gate.restore().await;
    assert!(!report.success);
    assert!(report.error.is_some());
    assert_eq!(h.gate.state(), GateState::TrialActive);
}

#[tokio::test]
async fn restore_replays_prior_purchase() {
    let (tx, mut rx) = mpsc::channel(8);
    let billing = Arc::new(FakeBilling::available().with_history(vec![restored("tx-old")]));
    billing.connect(tx);
    let h = expired_with(billing.clone());

    let report = h.gate.restore().await;
    assert!(report.success);
    assert!(report.error.is_none());
    assert_eq!(h.gate.state(), GateState::TrialExpired);

    let event = rx.recv().await.unwrap();
    assert!(h.gate.handle_transaction(&event).await.unwrap());
    assert_eq!(h.gate.state(), GateState::Unlocked);
    assert_eq!(billing.finished(), vec!["tx-old".to_string()]);
}

#[tokio::test]
async fn repeated_restore_when_unlocked_changes_nothing() {
    let (tx, mut rx) = mpsc::channel(8);
    let billing = Arc::new(FakeBilling::available().with_history(vec![restored("tx-old")]));
    billing.connect(tx);
    let h = harness_with(
        store_started_days_ago(4, true),
        billing.clone(),
        LicenseConfig::default(),
    );
    h.gate.launch().unwrap();
    let mut state_rx = h.gate.subscribe();

    for _ in 0..3 {
        assert!(h.gate.restore().await.success);
        let event = rx.recv().await.unwrap();
        assert!(!h.gate.handle_transaction(&event).await.unwrap());
    }

    assert_eq!(billing.restores.load(Ordering::SeqCst), 3);
    assert_eq!(h.gate.state(), GateState::Unlocked);
    assert!(!state_rx.has_changed().unwrap());
    assert_eq!(billing.finished(), vec!["tx-old".to_string()]);
}

#[tokio::test]
async fn unlock_persists_across_gate_instances() {
    let store = Arc::new(MemoryTrialStore::new());
    let gate = inkblot_license::LicenseGate::new(
        LicenseConfig::default(),
        store.clone(),
        Arc::new(inkblot_license::ManualClock::new(common::NOW_MS)),
        Arc::new(NoBilling),
    );
    gate.launch().unwrap();
    gate.purchase().await;

    let later = inkblot_license::ManualClock::new(common::NOW_MS + 30 * common::DAY_MS);
    let reopened = inkblot_license::LicenseGate::new(
        LicenseConfig::default(),
        store,
        Arc::new(later),
        Arc::new(NoBilling),
    );
    assert_eq!(reopened.launch().unwrap(), GateState::Unlocked);
}

#[test]
fn transaction_state_classification() {
    assert!(TransactionState::Purchased.grants_product());
    assert!(TransactionState::Restored.grants_product());
    assert!(!TransactionState::Failed.grants_product());
    assert!(TransactionState::Failed.is_terminal());
    assert!(!TransactionState::Purchasing.is_terminal());
    assert!(!TransactionState::Deferred.is_terminal());
}
