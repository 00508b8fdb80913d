// crates/form-logic/src/resolver.rs
// ============================================================================
// Module: Result Resolver
// Description: Precedence table folding a result mask into one result.
// Purpose: Encode AND/OR semantics for form-level validation.
// Dependencies: crate::result, serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Resolution works on the union of every child's result. `INVALID` absorbs
//! under both operations and `PENDING` postpones the verdict. After that the
//! operations diverge: AND treats an untouched field as a failure, OR only
//! needs one positively valid child.

use serde::Deserialize;
use serde::Serialize;

use crate::result::ValidationResult;

// ============================================================================
// SECTION: Logic Operation
// ============================================================================

/// Group operation applied to a mask of child results
///
/// # Invariants
/// - Closed set of supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOperation {
    /// Every child must be positively valid
    And,
    /// At least one child must be positively valid
    Or,
}

impl LogicOperation {
    /// Returns a stable label for the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a result mask into a single result for the given operation
///
/// An empty mask resolves to `VALID` under AND and `UNVALIDATED` under OR.
#[must_use]
pub const fn resolve(mask: ValidationResult, operation: LogicOperation) -> ValidationResult {
    if mask.contains(ValidationResult::INVALID) {
        return ValidationResult::INVALID;
    }
    if mask.contains(ValidationResult::PENDING) {
        return ValidationResult::PENDING;
    }

    match operation {
        LogicOperation::And => {
            if mask.contains(ValidationResult::UNVALIDATED) {
                ValidationResult::INVALID
            } else if mask.bits() == ValidationResult::DEFAULT_VALID.bits() {
                ValidationResult::DEFAULT_VALID
            } else {
                ValidationResult::VALID
            }
        }
        LogicOperation::Or => {
            if mask.contains(ValidationResult::VALID) {
                ValidationResult::VALID
            } else if mask.contains(ValidationResult::DEFAULT_VALID) {
                ValidationResult::DEFAULT_VALID
            } else {
                ValidationResult::UNVALIDATED
            }
        }
    }
}

/// Folds child results into a mask and resolves it
#[must_use]
pub fn resolve_all<I>(results: I, operation: LogicOperation) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    resolve(results.into_iter().collect(), operation)
}
