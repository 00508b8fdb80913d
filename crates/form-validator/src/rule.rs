// crates/form-validator/src/rule.rs
// ============================================================================
// Module: Validation Rules
// Description: Rule capability plus closure-wrapping adapters.
// Purpose: Let fields supply synchronous predicates or asynchronous checks
//          that report back through a completion handle.
// Dependencies: crate::{component, error}, form-logic, tokio
// ============================================================================

//! ## Overview
//! A [`ValidationRule`] receives the field value and a [`Completion`]. A
//! synchronous rule answers directly and ignores the completion. An
//! asynchronous rule answers [`RuleOutcome::Pending`] and finishes the
//! completion later, from any thread.
//!
//! Completions are tagged with the unit generation they were created for, so
//! a rule never has to know whether it was superseded. A completion dropped
//! without being finished reports itself as abandoned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::future::Future;

use form_logic::ValidationResult;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::component::FieldValue;
use crate::error::RuleError;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Immediate answer of a rule invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleOutcome {
    /// The value is acceptable
    Valid,
    /// The value is rejected
    Invalid,
    /// The rule could not judge the value
    Unvalidated,
    /// The verdict arrives later through the completion
    Pending,
}

impl RuleOutcome {
    /// Returns the single-bit result for this outcome
    #[must_use]
    pub const fn into_result(self) -> ValidationResult {
        match self {
            Self::Valid => ValidationResult::VALID,
            Self::Invalid => ValidationResult::INVALID,
            Self::Unvalidated => ValidationResult::UNVALIDATED,
            Self::Pending => ValidationResult::PENDING,
        }
    }
}

impl From<bool> for RuleOutcome {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }
}

impl From<Option<bool>> for RuleOutcome {
    fn from(verdict: Option<bool>) -> Self {
        verdict.map_or(Self::Unvalidated, Self::from)
    }
}

/// Final report delivered through a [`Completion`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionVerdict {
    /// The rule finished with a verdict or a transport error
    Finished(Result<bool, RuleError>),
    /// The completion was dropped without a verdict
    Abandoned,
}

// ============================================================================
// SECTION: Completion Handle
// ============================================================================

/// Delivery callback carried by a completion.
type Deliver = Box<dyn FnOnce(CompletionVerdict) + Send>;

/// One-shot handle an asynchronous rule uses to report its verdict
///
/// # Invariants
/// - Exactly one verdict is delivered per handle: the first `finish`, or
///   `Abandoned` on drop.
pub struct Completion {
    /// Pending delivery callback; `None` once delivered or when detached.
    deliver: Option<Deliver>,
}

impl Completion {
    /// Creates a completion that hands its verdict to `deliver`
    pub fn new(deliver: impl FnOnce(CompletionVerdict) + Send + 'static) -> Self {
        Self {
            deliver: Some(Box::new(deliver)),
        }
    }

    /// Creates a completion whose verdict goes nowhere
    #[must_use]
    pub fn detached() -> Self {
        Self {
            deliver: None,
        }
    }

    /// Reports a valid value
    pub fn succeed(self) {
        self.finish(Ok(true));
    }

    /// Reports an invalid value
    pub fn fail(self) {
        self.finish(Ok(false));
    }

    /// Reports a transport failure
    pub fn error(self, error: RuleError) {
        self.finish(Err(error));
    }

    /// Reports a verdict or a transport failure
    pub fn finish(mut self, outcome: Result<bool, RuleError>) {
        if let Some(deliver) = self.deliver.take() {
            deliver(CompletionVerdict::Finished(outcome));
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(deliver) = self.deliver.take() {
            deliver(CompletionVerdict::Abandoned);
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").field("armed", &self.deliver.is_some()).finish()
    }
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

/// Cancels an in-flight asynchronous check when invoked
pub struct CancelHandle(Box<dyn FnOnce()>);

impl CancelHandle {
    /// Wraps a cancellation callback
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self(Box::new(cancel))
    }

    /// Requests cancellation
    pub fn cancel(self) {
        (self.0)();
    }
}

impl<T: 'static> From<JoinHandle<T>> for CancelHandle {
    fn from(handle: JoinHandle<T>) -> Self {
        Self::new(move || handle.abort())
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CancelHandle")
    }
}

// ============================================================================
// SECTION: Rule Capability
// ============================================================================

/// Validation capability supplied by a field
pub trait ValidationRule {
    /// Judges `value`, or returns [`RuleOutcome::Pending`] and finishes
    /// `completion` later
    fn validate(&mut self, value: &FieldValue, completion: Completion) -> RuleOutcome;

    /// Cancels the in-flight check, if any
    fn cancel(&mut self) {}

    /// Returns true for rules that hit the network and use the longer
    /// debounce delay
    fn is_network(&self) -> bool {
        false
    }
}

// ============================================================================
// SECTION: Predicate Adapter
// ============================================================================

/// Synchronous rule wrapping a predicate closure
///
/// The closure may return `bool` or `Option<bool>`; `None` means the value
/// could not be judged.
pub struct PredicateRule<F> {
    /// Wrapped predicate.
    predicate: F,
}

impl<F> PredicateRule<F> {
    /// Wraps `predicate`
    pub const fn new(predicate: F) -> Self {
        Self {
            predicate,
        }
    }
}

impl<F, R> ValidationRule for PredicateRule<F>
where
    F: FnMut(&FieldValue) -> R,
    R: Into<RuleOutcome>,
{
    fn validate(&mut self, value: &FieldValue, _completion: Completion) -> RuleOutcome {
        (self.predicate)(value).into()
    }
}

// ============================================================================
// SECTION: Callback Adapter
// ============================================================================

/// Asynchronous rule handing the completion to a closure
///
/// The closure starts the check and may return a [`CancelHandle`] used when
/// the check is superseded.
pub struct CallbackRule<F> {
    /// Closure starting the check.
    start: F,
    /// Cancellation for the check in flight.
    in_flight: Option<CancelHandle>,
}

impl<F> CallbackRule<F> {
    /// Wraps `start`
    pub const fn new(start: F) -> Self {
        Self {
            start,
            in_flight: None,
        }
    }
}

impl<F> ValidationRule for CallbackRule<F>
where
    F: FnMut(&FieldValue, Completion) -> Option<CancelHandle>,
{
    fn validate(&mut self, value: &FieldValue, completion: Completion) -> RuleOutcome {
        self.in_flight = (self.start)(value, completion);
        RuleOutcome::Pending
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
    }

    fn is_network(&self) -> bool {
        true
    }
}

// ============================================================================
// SECTION: Network Adapter
// ============================================================================

/// Asynchronous rule spawning a future on the ambient tokio runtime
///
/// Cancelling aborts the spawned task. Without a runtime the rule finishes
/// immediately with a [`RuleError`].
pub struct NetworkRule<F> {
    /// Factory producing the check future.
    check: F,
    /// Task running the current check.
    task: Option<JoinHandle<()>>,
}

impl<F> NetworkRule<F> {
    /// Wraps a factory of check futures
    pub const fn new(check: F) -> Self {
        Self {
            check,
            task: None,
        }
    }
}

impl<F, Fut> ValidationRule for NetworkRule<F>
where
    F: FnMut(FieldValue) -> Fut,
    Fut: Future<Output = Result<bool, RuleError>> + Send + 'static,
{
    fn validate(&mut self, value: &FieldValue, completion: Completion) -> RuleOutcome {
        match Handle::try_current() {
            Ok(runtime) => {
                let check = (self.check)(value.clone());
                self.task = Some(runtime.spawn(async move {
                    completion.finish(check.await);
                }));
            }
            Err(_) => {
                completion.error(RuleError::new("no async runtime available for network rule"));
            }
        }
        RuleOutcome::Pending
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_network(&self) -> bool {
        true
    }
}
