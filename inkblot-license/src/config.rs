//! Gate configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trial window in milliseconds (3 days).
pub const TRIAL_DURATION_MS: i64 = 3 * 24 * 60 * 60 * 1000;

/// Re-evaluation cadence in seconds.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// The single in-app purchase that lifts the trial restriction.
pub const DEFAULT_PRODUCT_ID: &str = "com.eregionlabs.inkblot.unlock";

/// Price shown on the paywall before the store reports a localized one.
pub const DEFAULT_DISPLAY_PRICE: &str = "$0.99";

/// What a purchase does when the build has no billing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFallback {
    /// Unlock straight away. Used by development and direct-download builds.
    UnlockImmediately,
    /// Stay locked and report a non-fatal error. Used by store builds.
    ReportError,
}

impl Default for BillingFallback {
    fn default() -> Self {
        Self::UnlockImmediately
    }
}

/// Configuration for the license gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
    /// Length of the trial window (ms).
    pub trial_duration_ms: i64,
    /// How often the gate re-evaluates (seconds).
    pub poll_interval_secs: u64,
    /// Billing product identifier.
    pub product_id: String,
    /// Price text for the paywall.
    pub display_price: String,
    /// Behavior when billing is unavailable.
    pub billing_fallback: BillingFallback,
}

impl LicenseConfig {
    /// Returns the poll interval as a `Duration`, never shorter than one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            trial_duration_ms: TRIAL_DURATION_MS,
            poll_interval_secs: POLL_INTERVAL_SECS,
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            display_price: DEFAULT_DISPLAY_PRICE.to_string(),
            billing_fallback: BillingFallback::default(),
        }
    }
}
