// crates/form-validator/src/error.rs
// ============================================================================
// Module: Validator Errors
// Description: Recoverable registry and rule failures.
// Purpose: Report caller misuse and transport failures through `Result`.
// Dependencies: form-logic, thiserror
// ============================================================================

//! ## Overview
//! Nothing in the validator is fatal. Registry misuse (duplicate or unknown
//! identifiers, removing a unit the form rule still reads) comes back as a
//! [`ValidatorError`]; transport failures of asynchronous rules are wrapped
//! in [`ValidatorError::NetworkValidationFailed`] and delivered alongside an
//! `INVALID` result instead of being returned.

use form_logic::TreeError;
use thiserror::Error;

/// Transport or runtime failure reported by an asynchronous rule
///
/// # Invariants
/// - `message` is human-readable and never empty by convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuleError {
    /// Failure description.
    message: String,
}

impl RuleError {
    /// Creates a rule error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure description
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Registry and validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    /// A unit with this identifier is already registered
    #[error("validation `{0}` is already registered")]
    DuplicateIdentifier(String),
    /// The unit is still referenced by the form tree or validation block
    #[error("validation `{0}` is still referenced by the form rule")]
    ValidationInUse(String),
    /// No unit is registered under this identifier
    #[error("unknown validation `{0}`")]
    UnknownIdentifier(String),
    /// The form tree references an identifier with no registered unit
    #[error("form tree references unknown validation `{0}`")]
    UnknownIdentifierInTree(String),
    /// The form tree violates structural limits
    #[error("invalid form tree: {0}")]
    InvalidTree(#[from] TreeError),
    /// An asynchronous rule failed to reach a verdict
    #[error("network validation failed: {0}")]
    NetworkValidationFailed(#[from] RuleError),
}
