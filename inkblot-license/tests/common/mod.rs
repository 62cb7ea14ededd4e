//! Shared test helpers for license gate tests.

#![allow(dead_code)]

use async_trait::async_trait;
use inkblot_license::{
    BillingClient, LicenseConfig, LicenseError, LicenseGate, LicenseResult, ManualClock,
    MemoryTrialStore, NoBilling, Product, TransactionEvent, TransactionState, TRIAL_START_KEY,
    UNLOCKED_KEY,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A fixed "now" so assertions on stamped values are exact.
pub const NOW_MS: i64 = 1_760_000_000_000;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Scriptable billing collaborator.
#[derive(Default)]
pub struct FakeBilling {
    pub available: bool,
    pub product: Option<Product>,
    /// Transactions replayed by `restore_completed`.
    pub history: Vec<TransactionEvent>,
    pub events: Mutex<Option<mpsc::Sender<TransactionEvent>>>,
    pub payments: Mutex<Vec<String>>,
    pub restores: AtomicUsize,
    pub finished: Mutex<Vec<String>>,
}

impl FakeBilling {
    pub fn available() -> Self {
        Self {
            available: true,
            product: Some(Product {
                id: LicenseConfig::default().product_id,
                title: "Unlock InkBlot".into(),
                formatted_price: "$0.99".into(),
            }),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<TransactionEvent>) -> Self {
        self.history = history;
        self
    }

    pub fn connect(&self, tx: mpsc::Sender<TransactionEvent>) {
        *self.events.lock().unwrap() = Some(tx);
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub fn payments(&self) -> Vec<String> {
        self.payments.lock().unwrap().clone()
    }

    fn sender(&self) -> Option<mpsc::Sender<TransactionEvent>> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingClient for FakeBilling {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn product(&self, product_id: &str) -> LicenseResult<Option<Product>> {
        Ok(self.product.clone().filter(|p| p.id == product_id))
    }

    async fn add_payment(&self, product: &Product) -> LicenseResult<()> {
        self.payments.lock().unwrap().push(product.id.clone());
        Ok(())
    }

    async fn restore_completed(&self) -> LicenseResult<()> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = self.sender() {
            for event in &self.history {
                tx.send(event.clone())
                    .await
                    .map_err(|e| LicenseError::Billing(e.to_string()))?;
            }
        }
        Ok(())
    }

    async fn finish(&self, transaction_id: &str) -> LicenseResult<()> {
        self.finished.lock().unwrap().push(transaction_id.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub gate: Arc<LicenseGate>,
    pub store: Arc<MemoryTrialStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness_with(
    store: MemoryTrialStore,
    billing: Arc<dyn BillingClient>,
    config: LicenseConfig,
) -> Harness {
    let store = Arc::new(store);
    let clock = Arc::new(ManualClock::new(NOW_MS));
    let gate = Arc::new(LicenseGate::new(
        config,
        store.clone(),
        clock.clone(),
        billing,
    ));
    Harness { gate, store, clock }
}

/// Fresh install, no billing.
pub fn fresh() -> Harness {
    harness_with(
        MemoryTrialStore::new(),
        Arc::new(NoBilling),
        LicenseConfig::default(),
    )
}

/// Store whose trial started `days` ago, optionally unlocked.
pub fn store_started_days_ago(days: i64, unlocked: bool) -> MemoryTrialStore {
    let start = (NOW_MS - days * DAY_MS).to_string();
    let store = MemoryTrialStore::with_entries([(TRIAL_START_KEY, start.as_str())]);
    if unlocked {
        use inkblot_license::TrialStore;
        store.set(UNLOCKED_KEY, "true").unwrap();
    }
    store
}

pub fn purchased(id: &str) -> TransactionEvent {
    TransactionEvent::new(id, LicenseConfig::default().product_id, TransactionState::Purchased)
}

pub fn restored(id: &str) -> TransactionEvent {
    TransactionEvent::new(id, LicenseConfig::default().product_id, TransactionState::Restored)
}
