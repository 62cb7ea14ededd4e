mod common;

use common::{harness_with, NOW_MS};
use inkblot_license::{
    trial_active, GateState, LicenseConfig, MemoryTrialStore, NoBilling, TrialStore,
    TRIAL_DURATION_MS, TRIAL_START_KEY, UNLOCKED_KEY,
};
use proptest::prelude::*;
use std::sync::Arc;

fn gate_at(elapsed_ms: i64, unlocked: bool) -> GateState {
    let start = (NOW_MS - elapsed_ms).to_string();
    let store = MemoryTrialStore::with_entries([(TRIAL_START_KEY, start.as_str())]);
    if unlocked {
        store.set(UNLOCKED_KEY, "true").unwrap();
    }
    let h = harness_with(store, Arc::new(NoBilling), LicenseConfig::default());
    h.gate.launch().unwrap()
}

proptest! {
    #[test]
    fn within_trial_editing_is_enabled(elapsed in 0..=TRIAL_DURATION_MS) {
        let state = gate_at(elapsed, false);
        prop_assert_eq!(state, GateState::TrialActive);
        prop_assert!(state.editing_enabled());
        prop_assert!(!state.overlay_visible());
    }

    #[test]
    fn after_trial_editing_is_disabled(extra in 1i64..(365 * 24 * 60 * 60 * 1000)) {
        let state = gate_at(TRIAL_DURATION_MS + extra, false);
        prop_assert_eq!(state, GateState::TrialExpired);
        prop_assert!(!state.editing_enabled());
        prop_assert!(state.overlay_visible());
    }

    #[test]
    fn unlocked_is_always_enabled(elapsed in 0i64..(10 * 365 * 24 * 60 * 60 * 1000)) {
        let state = gate_at(elapsed, true);
        prop_assert_eq!(state, GateState::Unlocked);
        prop_assert!(state.editing_enabled());
        prop_assert!(!state.overlay_visible());
    }

    #[test]
    fn predicate_is_monotonic(start in 0i64..NOW_MS, a in 0i64..NOW_MS, b in 0i64..NOW_MS) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        if trial_active(start + late, start, TRIAL_DURATION_MS) {
            prop_assert!(trial_active(start + early, start, TRIAL_DURATION_MS));
        }
    }

    #[test]
    fn stored_trial_start_is_never_rewritten(raw in "\\PC{0,24}") {
        let store = MemoryTrialStore::with_entries([(TRIAL_START_KEY, raw.as_str())]);
        let h = harness_with(store, Arc::new(NoBilling), LicenseConfig::default());
        h.gate.launch().unwrap();
        h.gate.evaluate().unwrap();
        prop_assert_eq!(h.store.get(TRIAL_START_KEY).unwrap(), Some(raw));
    }
}
