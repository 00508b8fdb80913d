// crates/form-logic/src/traits.rs
// ============================================================================
// Module: Evaluation Traits
// Description: Leaf evaluation and trace contracts for logic trees.
// Purpose: Let callers plug cached unit results or live validators into trees.
// Dependencies: crate::{resolver, result}, std::collections
// ============================================================================

//! ## Overview
//! Trees never own validation state. Leaves are resolved through a
//! [`LeafEvaluator`], and every evaluation step can be observed through an
//! [`EvaluationTrace`] without changing the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::hash::Hash;

use crate::resolver::LogicOperation;
use crate::result::ValidationResult;

// ============================================================================
// SECTION: Leaf Evaluation
// ============================================================================

/// Resolves a leaf identifier into a single validation result
pub trait LeafEvaluator<K> {
    /// Evaluates the leaf referenced by `identifier`
    ///
    /// Implementations return `UNVALIDATED` for identifiers they do not know.
    /// `revalidate` asks the implementation to bypass any cached result.
    fn evaluate_leaf(&mut self, identifier: &K, revalidate: bool) -> ValidationResult;
}

impl<K, S> LeafEvaluator<K> for HashMap<K, ValidationResult, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn evaluate_leaf(&mut self, identifier: &K, _revalidate: bool) -> ValidationResult {
        self.get(identifier).copied().unwrap_or(ValidationResult::UNVALIDATED)
    }
}

impl<K: Ord> LeafEvaluator<K> for BTreeMap<K, ValidationResult> {
    fn evaluate_leaf(&mut self, identifier: &K, _revalidate: bool) -> ValidationResult {
        self.get(identifier).copied().unwrap_or(ValidationResult::UNVALIDATED)
    }
}

impl<K, F> LeafEvaluator<K> for F
where
    F: FnMut(&K, bool) -> ValidationResult,
{
    fn evaluate_leaf(&mut self, identifier: &K, revalidate: bool) -> ValidationResult {
        (self)(identifier, revalidate)
    }
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook for tree evaluation
pub trait EvaluationTrace<K> {
    /// Called after a leaf has been evaluated
    fn on_leaf_evaluated(&mut self, identifier: &K, result: ValidationResult);

    /// Called after a group has folded its children
    fn on_group_resolved(
        &mut self,
        _operation: LogicOperation,
        _mask: ValidationResult,
        _result: ValidationResult,
    ) {
    }
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl<K> EvaluationTrace<K> for NoopTrace {
    fn on_leaf_evaluated(&mut self, _identifier: &K, _result: ValidationResult) {}
}
