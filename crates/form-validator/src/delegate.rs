// crates/form-validator/src/delegate.rs
// ============================================================================
// Module: Validator Delegate
// Description: Notifications produced by the registry.
// Purpose: Report unit and form validation progress to the form's owner.
// Dependencies: form-logic, crate::error
// ============================================================================

//! ## Overview
//! Every method has an empty default, so a delegate implements only the
//! notifications it cares about. Disabled units produce no unit
//! notifications.

use form_logic::ValidationResult;

use crate::error::ValidatorError;

/// Receiver of validation lifecycle notifications
pub trait ValidatorDelegate<K> {
    /// A unit is about to invoke its rule
    fn will_validate(&mut self, _identifier: &K) {}

    /// A unit produced a result; `error` carries a transport failure
    fn did_validate(
        &mut self,
        _identifier: &K,
        _result: ValidationResult,
        _error: Option<&ValidatorError>,
    ) {
    }

    /// The form-level result was recomputed
    fn did_validate_form(&mut self, _result: ValidationResult) {}
}

/// Sink for unit lifecycle signals raised while a unit validates
pub(crate) trait UnitSignals<K> {
    /// A unit is about to invoke its rule for `generation`
    fn will_validate(&mut self, identifier: &K, generation: u64);

    /// A unit settled on `result` for `generation`
    fn did_validate(
        &mut self,
        identifier: &K,
        generation: u64,
        result: ValidationResult,
        error: Option<&ValidatorError>,
    );
}
