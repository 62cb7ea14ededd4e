//! The persisted trial record and the state derived from it.

use crate::error::LicenseResult;
use crate::gate::{trial_active, GateState};
use crate::store::{TrialStore, TRIAL_START_KEY, UNLOCKED_KEY};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Snapshot of the two persisted trial entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    /// When the trial started (epoch milliseconds).
    pub trial_start_epoch_ms: i64,
    /// Whether a purchase or restore has completed.
    pub unlocked: bool,
}

impl TrialRecord {
    /// Start reported for a stored value with no leading integer.
    pub const UNREADABLE_START: i64 = i64::MIN;

    /// Loads the record, stamping the trial start with `now_ms` if none exists.
    ///
    /// The start is written only when absent. A stored value is read by its
    /// leading integer (`"1700000000000.5"` reads as `1700000000000`); a value
    /// with no leading integer reads as [`UNREADABLE_START`](Self::UNREADABLE_START),
    /// which counts as expired, and is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn load_or_stamp(store: &dyn TrialStore, now_ms: i64) -> LicenseResult<Self> {
        let trial_start_epoch_ms = match store.get(TRIAL_START_KEY)? {
            Some(raw) => parse_leading_int(&raw).unwrap_or_else(|| {
                warn!("Unreadable trial start {:?}, treating the trial as expired", raw);
                Self::UNREADABLE_START
            }),
            None => Self::stamp(store, now_ms)?,
        };

        Ok(Self {
            trial_start_epoch_ms,
            unlocked: Self::read_unlocked(store)?,
        })
    }

    /// Reads the unlock flag. Anything other than `"true"` counts as locked.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn read_unlocked(store: &dyn TrialStore) -> LicenseResult<bool> {
        Ok(store.get(UNLOCKED_KEY)?.as_deref() == Some("true"))
    }

    fn stamp(store: &dyn TrialStore, now_ms: i64) -> LicenseResult<i64> {
        store.set(TRIAL_START_KEY, &now_ms.to_string())?;
        info!("Trial started at {}", now_ms);
        Ok(now_ms)
    }

    /// Milliseconds elapsed since the trial started.
    #[must_use]
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.trial_start_epoch_ms)
    }

    /// Milliseconds left in the trial window, zero once it has elapsed.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: i64, trial_duration_ms: i64) -> i64 {
        trial_duration_ms.saturating_sub(self.elapsed_ms(now_ms)).max(0)
    }

    /// Derives the gate state at `now_ms`.
    #[must_use]
    pub fn state_at(&self, now_ms: i64, trial_duration_ms: i64) -> GateState {
        if self.unlocked {
            GateState::Unlocked
        } else if trial_active(now_ms, self.trial_start_epoch_ms, trial_duration_ms) {
            GateState::TrialActive
        } else {
            GateState::TrialExpired
        }
    }
}

/// Leading optionally-signed decimal integer of `raw`, after leading whitespace.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['+', '-']));
    let digits = raw[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len() - sign_len);
    if digits == 0 {
        return None;
    }
    raw[..sign_len + digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_leading_int;

    #[test]
    fn leading_integer_is_kept() {
        assert_eq!(parse_leading_int("1760000000000"), Some(1_760_000_000_000));
        assert_eq!(parse_leading_int("  123.5"), Some(123));
        assert_eq!(parse_leading_int("42ms"), Some(42));
        assert_eq!(parse_leading_int("-7"), Some(-7));
        assert_eq!(parse_leading_int("+7"), Some(7));
    }

    #[test]
    fn no_leading_integer() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("NaN"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x12"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }
}
