// crates/form-validator/src/component.rs
// ============================================================================
// Module: Validatable Components
// Description: Capability consumed from UI components bound to units.
// Purpose: Read live and default values and fire optional lifecycle hooks.
// Dependencies: crate::error, form-logic, serde_json
// ============================================================================

//! ## Overview
//! Units read field values through [`ValidatableComponent`] and never own the
//! component: the registry stores a `Weak` reference, so a dropped component
//! simply reads as "no value". Lifecycle hooks are an optional capability
//! discovered through [`ValidatableComponent::hooks`].
//!
//! [`FieldCell`] is an in-memory component for headless forms and tests.

use std::cell::Cell;
use std::cell::RefCell;

use form_logic::ValidationResult;
use serde_json::Map;
use serde_json::Value;

use crate::error::ValidatorError;

/// Value read from a component
pub type FieldValue = Value;

/// Returns the empty value of the same JSON kind as `value`
#[must_use]
pub fn type_default(value: &FieldValue) -> FieldValue {
    match value {
        Value::Null => Value::Null,
        Value::Bool(_) => Value::Bool(false),
        Value::Number(_) => Value::from(0),
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
    }
}

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// Value source bound to a validation unit
pub trait ValidatableComponent {
    /// Returns the live value, or `None` before the component has one
    fn current_value(&self) -> Option<FieldValue>;

    /// Returns the value the component holds when untouched
    fn default_value(&self) -> FieldValue;

    /// Returns the lifecycle hooks, when the component has any
    fn hooks(&self) -> Option<&dyn ComponentHooks> {
        None
    }
}

/// Optional lifecycle hooks fired by the owning unit
pub trait ComponentHooks {
    /// Called before the rule is invoked
    fn will_validate(&self) {}

    /// Called once a result is known; `error` carries a transport failure
    fn did_validate(&self, _result: ValidationResult, _error: Option<&ValidatorError>) {}
}

// ============================================================================
// SECTION: In-Memory Component
// ============================================================================

/// In-memory component holding a value and recording hook calls
///
/// # Invariants
/// - `validation_count` counts `will_validate` calls only.
#[derive(Debug, Default)]
pub struct FieldCell {
    /// Current value, `None` until first set.
    value: RefCell<Option<FieldValue>>,
    /// Default value reported to the unit.
    default: FieldValue,
    /// Number of rule invocations announced.
    validation_count: Cell<usize>,
    /// Last result delivered through `did_validate`.
    last_result: Cell<Option<ValidationResult>>,
    /// Last transport error message delivered through `did_validate`.
    last_error: RefCell<Option<String>>,
}

impl FieldCell {
    /// Creates an empty cell with the given default value
    pub fn new(default: impl Into<FieldValue>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    /// Creates a cell that already holds `value`
    pub fn with_value(default: impl Into<FieldValue>, value: impl Into<FieldValue>) -> Self {
        let cell = Self::new(default);
        cell.set_value(value);
        cell
    }

    /// Replaces the current value
    pub fn set_value(&self, value: impl Into<FieldValue>) {
        *self.value.borrow_mut() = Some(value.into());
    }

    /// Clears the current value
    pub fn clear_value(&self) {
        *self.value.borrow_mut() = None;
    }

    /// Returns the number of rule invocations announced to this cell
    #[must_use]
    pub fn validation_count(&self) -> usize {
        self.validation_count.get()
    }

    /// Returns the last result delivered to this cell
    #[must_use]
    pub fn last_result(&self) -> Option<ValidationResult> {
        self.last_result.get()
    }

    /// Returns the last transport error delivered to this cell
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }
}

impl ValidatableComponent for FieldCell {
    fn current_value(&self) -> Option<FieldValue> {
        self.value.borrow().clone()
    }

    fn default_value(&self) -> FieldValue {
        self.default.clone()
    }

    fn hooks(&self) -> Option<&dyn ComponentHooks> {
        Some(self)
    }
}

impl ComponentHooks for FieldCell {
    fn will_validate(&self) {
        self.validation_count.set(self.validation_count.get() + 1);
    }

    fn did_validate(&self, result: ValidationResult, error: Option<&ValidatorError>) {
        self.last_result.set(Some(result));
        *self.last_error.borrow_mut() = error.map(ToString::to_string);
    }
}
