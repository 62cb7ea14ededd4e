//! Trial window and purchase gate for InkBlot.
//!
//! This module handles:
//! - Stamping the trial start the first time the editor launches
//! - Deciding whether editing is enabled (trial active, expired, or unlocked)
//! - Purchase and restore through a platform billing collaborator
//! - Periodic re-evaluation so expiry is noticed while the app is running
//!
//! # Design Principles
//!
//! - **Local only**: the trial record is two key-value entries on disk
//! - **Unlock is permanent**: once unlocked there is no path back to a locked state
//! - **Polling, not push**: expiry is detected on the next evaluation tick
//! - **Event-driven billing**: purchase completions arrive on a channel and are
//!   applied independently of the call that started them
//!
//! # Trial Record
//!
//! Two keys are persisted:
//! - `inkblot_trial_start`: epoch milliseconds, written once
//! - `inkblot_unlocked`: `"true"` or absent

mod billing;
mod clock;
mod config;
mod error;
mod gate;
mod paywall;
mod record;
mod store;
mod task;

pub use billing::{BillingClient, NoBilling, Product, TransactionEvent, TransactionState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    BillingFallback, LicenseConfig, DEFAULT_DISPLAY_PRICE, DEFAULT_PRODUCT_ID, POLL_INTERVAL_SECS,
    TRIAL_DURATION_MS,
};
pub use error::{LicenseError, LicenseResult};
pub use gate::{trial_active, GateState, LicenseGate, PurchaseReport, RestoreReport};
pub use paywall::{Paywall, PaywallAction};
pub use record::TrialRecord;
pub use store::{FileTrialStore, MemoryTrialStore, TrialStore, TRIAL_START_KEY, UNLOCKED_KEY};
pub use task::GateTaskHandle;
