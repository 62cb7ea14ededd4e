//! Paywall view model.

use crate::config::LicenseConfig;
use crate::gate::GateState;
use serde::{Deserialize, Serialize};

/// Actions offered by the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaywallAction {
    Purchase,
    Restore,
}

/// What the blocking overlay should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paywall {
    pub visible: bool,
    pub price: String,
    pub actions: Vec<PaywallAction>,
}

impl Paywall {
    /// Builds the overlay for a gate state.
    #[must_use]
    pub fn for_state(state: GateState, config: &LicenseConfig) -> Self {
        let visible = state.overlay_visible();
        Self {
            visible,
            price: config.display_price.clone(),
            actions: if visible {
                vec![PaywallAction::Purchase, PaywallAction::Restore]
            } else {
                Vec::new()
            },
        }
    }
}
