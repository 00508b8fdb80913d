// crates/form-validator/src/settings.rs
// ============================================================================
// Module: Validator Settings
// Description: Timing and structural limits for a validator.
// Purpose: Carry debounce delays and the tree depth bound.
// Dependencies: form-logic, std::time
// ============================================================================

//! ## Overview
//! Settings are plain values. `form-validator-config` builds them from TOML;
//! code can construct them directly.

use std::time::Duration;

use form_logic::DEFAULT_MAX_TREE_DEPTH;

/// Default debounce delay for local rules
pub const DEFAULT_INPUT_DELAY: Duration = Duration::from_millis(300);

/// Default debounce delay for network rules
pub const DEFAULT_NETWORK_INPUT_DELAY: Duration = Duration::from_millis(1000);

/// Validator timing and limits
///
/// # Invariants
/// - `max_tree_depth` is at least 1 for any tree to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Debounce delay for local rules
    pub input_delay: Duration,
    /// Debounce delay for network rules
    pub network_input_delay: Duration,
    /// Maximum accepted depth of the form tree
    pub max_tree_depth: usize,
}

impl ValidatorSettings {
    /// Returns the debounce delay for a rule
    #[must_use]
    pub const fn delay_for(&self, network: bool) -> Duration {
        if network { self.network_input_delay } else { self.input_delay }
    }
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            input_delay: DEFAULT_INPUT_DELAY,
            network_input_delay: DEFAULT_NETWORK_INPUT_DELAY,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}
