//! The license gate state machine.
//!
//! States:
//! - `TrialActive`: inside the trial window, editing enabled
//! - `TrialExpired`: window elapsed and not unlocked, editing disabled, paywall shown
//! - `Unlocked`: purchased or restored, terminal
//!
//! The current state is published on a `watch` channel; consumers such as the
//! document controller hold a receiver and consult it before every mutation.

use crate::billing::{BillingClient, TransactionEvent};
use crate::clock::Clock;
use crate::config::{BillingFallback, LicenseConfig};
use crate::error::{LicenseError, LicenseResult};
use crate::record::TrialRecord;
use crate::store::{TrialStore, UNLOCKED_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Returns true while `now_ms` is within `trial_duration_ms` of `start_ms`.
///
/// The boundary instant itself still counts as active.
#[must_use]
pub fn trial_active(now_ms: i64, start_ms: i64, trial_duration_ms: i64) -> bool {
    now_ms.saturating_sub(start_ms) <= trial_duration_ms
}

/// The gate's externally visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Inside the trial window.
    TrialActive,
    /// Trial window elapsed without a purchase.
    TrialExpired,
    /// Purchased or restored.
    Unlocked,
}

impl GateState {
    /// Returns true if the editing surface accepts input.
    #[must_use]
    pub fn editing_enabled(&self) -> bool {
        !matches!(self, Self::TrialExpired)
    }

    /// Returns true if the paywall overlay should be shown.
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        matches!(self, Self::TrialExpired)
    }

    /// Returns true once a purchase or restore has completed.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

/// Outcome of a purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReport {
    pub success: bool,
    /// The store accepted the payment; unlock follows on a completion event.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PurchaseReport {
    fn completed() -> Self {
        Self {
            success: true,
            pending: false,
            error: None,
        }
    }

    fn pending() -> Self {
        Self {
            success: true,
            pending: true,
            error: None,
        }
    }

    fn failed(err: &LicenseError) -> Self {
        Self {
            success: false,
            pending: false,
            error: Some(err.to_string()),
        }
    }
}

/// Outcome of a restore request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decides whether editing is enabled, based on the trial record and purchases.
pub struct LicenseGate {
    config: LicenseConfig,
    store: Arc<dyn TrialStore>,
    clock: Arc<dyn Clock>,
    billing: Arc<dyn BillingClient>,
    state_tx: watch::Sender<GateState>,
    /// Transactions already acknowledged with the store.
    finished: Mutex<HashSet<String>>,
}

impl LicenseGate {
    /// Creates a gate. Nothing is read or written until [`launch`](Self::launch).
    pub fn new(
        config: LicenseConfig,
        store: Arc<dyn TrialStore>,
        clock: Arc<dyn Clock>,
        billing: Arc<dyn BillingClient>,
    ) -> Self {
        let (state_tx, _) = watch::channel(GateState::TrialActive);
        Self {
            config,
            store,
            clock,
            billing,
            state_tx,
            finished: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LicenseConfig {
        &self.config
    }

    /// Returns the last published state.
    pub fn state(&self) -> GateState {
        *self.state_tx.borrow()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state_tx.subscribe()
    }

    /// Loads the trial record, stamping the trial start if this is the first launch.
    pub fn trial_record(&self) -> LicenseResult<TrialRecord> {
        TrialRecord::load_or_stamp(self.store.as_ref(), self.clock.now_ms())
    }

    /// First evaluation at application start.
    pub fn launch(&self) -> LicenseResult<GateState> {
        let state = self.evaluate()?;
        info!("License gate started in state {:?}", state);
        Ok(state)
    }

    /// Re-derives the state from the trial record and publishes it if it changed.
    pub fn evaluate(&self) -> LicenseResult<GateState> {
        let now = self.clock.now_ms();
        let record = TrialRecord::load_or_stamp(self.store.as_ref(), now)?;
        let next = record.state_at(now, self.config.trial_duration_ms);

        self.publish(next);
        let current = self.state();
        if current.is_unlocked()
            && !next.is_unlocked()
            && !TrialRecord::read_unlocked(self.store.as_ref())?
        {
            warn!("Unlock flag missing from trial store, rewriting it");
            self.store.set(UNLOCKED_KEY, "true")?;
        }
        Ok(current)
    }

    /// Publishes `next`, returning true if it replaced the current state.
    ///
    /// `Unlocked` is never replaced; the check runs under the channel's lock.
    fn publish(&self, next: GateState) -> bool {
        self.state_tx.send_if_modified(|current| {
            if *current == next || (current.is_unlocked() && !next.is_unlocked()) {
                return false;
            }
            info!("License state {:?} -> {:?}", current, next);
            *current = next;
            true
        })
    }

    /// Persists the unlock flag and publishes `Unlocked`.
    ///
    /// Returns true only on the call that actually changed anything.
    fn unlock(&self, reason: &str) -> LicenseResult<bool> {
        let persisted = TrialRecord::read_unlocked(self.store.as_ref())?;
        if !persisted {
            self.store.set(UNLOCKED_KEY, "true")?;
        }
        let published = self.publish(GateState::Unlocked);
        let changed = !persisted || published;
        if changed {
            info!("Editor unlocked ({})", reason);
        } else {
            debug!("Already unlocked, ignoring {}", reason);
        }
        Ok(changed)
    }

    /// Starts a purchase.
    ///
    /// Without billing the configured [`BillingFallback`] applies. With
    /// billing the report is `pending` and the unlock arrives later as a
    /// transaction event.
    pub async fn purchase(&self) -> PurchaseReport {
        if self.state().is_unlocked() {
            debug!("Purchase requested while already unlocked");
            return PurchaseReport::completed();
        }

        if !self.billing.is_available() {
            return match self.config.billing_fallback {
                BillingFallback::UnlockImmediately => {
                    match self.unlock("billing unavailable, fallback unlock") {
                        Ok(_) => PurchaseReport::completed(),
                        Err(e) => {
                            warn!("Fallback unlock failed: {}", e);
                            PurchaseReport::failed(&e)
                        }
                    }
                }
                BillingFallback::ReportError => {
                    warn!("Purchase requested but billing is unavailable");
                    PurchaseReport::failed(&LicenseError::BillingUnavailable)
                }
            };
        }

        match self.request_payment().await {
            Ok(()) => PurchaseReport::pending(),
            Err(e) => {
                warn!("Purchase request failed: {}", e);
                PurchaseReport::failed(&e)
            }
        }
    }

    async fn request_payment(&self) -> LicenseResult<()> {
        let product = self
            .billing
            .product(&self.config.product_id)
            .await?
            .ok_or_else(|| LicenseError::ProductNotFound(self.config.product_id.clone()))?;
        debug!("Adding payment for {} ({})", product.id, product.formatted_price);
        self.billing.add_payment(&product).await
    }

    /// Asks the store to replay past purchases. Unlocking happens when the
    /// replayed transactions arrive.
    pub async fn restore(&self) -> RestoreReport {
        if !self.billing.is_available() {
            return RestoreReport {
                success: false,
                error: Some(LicenseError::BillingUnavailable.to_string()),
            };
        }

        match self.billing.restore_completed().await {
            Ok(()) => RestoreReport {
                success: true,
                error: None,
            },
            Err(e) => {
                warn!("Restore request failed: {}", e);
                RestoreReport {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Applies a "transaction updated" event.
    ///
    /// Purchased and restored transactions for our product unlock the editor.
    /// Every terminal transaction for our product is finished with the store
    /// exactly once. Returns true if this event performed the unlock.
    pub async fn handle_transaction(&self, event: &TransactionEvent) -> LicenseResult<bool> {
        if event.product_id != self.config.product_id {
            debug!("Ignoring transaction for foreign product {}", event.product_id);
            return Ok(false);
        }

        let unlocked = if event.state.grants_product() {
            self.unlock(&format!("transaction {} {:?}", event.transaction_id, event.state))?
        } else {
            if let Some(reason) = &event.error {
                warn!("Transaction {} {:?}: {}", event.transaction_id, event.state, reason);
            }
            false
        };

        if event.state.is_terminal() {
            self.finish_once(&event.transaction_id).await?;
        }

        Ok(unlocked)
    }

    async fn finish_once(&self, transaction_id: &str) -> LicenseResult<()> {
        let first = self
            .finished
            .lock()
            .map_err(|_| LicenseError::Storage("finished set lock poisoned".to_string()))?
            .insert(transaction_id.to_string());
        if !first {
            debug!("Transaction {} already finished", transaction_id);
            return Ok(());
        }

        if let Err(e) = self.billing.finish(transaction_id).await {
            // Let a later replay retry the acknowledgement.
            if let Ok(mut finished) = self.finished.lock() {
                finished.remove(transaction_id);
            }
            return Err(e);
        }
        debug!("Finished transaction {}", transaction_id);
        Ok(())
    }
}
