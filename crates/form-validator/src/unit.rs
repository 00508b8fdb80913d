// crates/form-validator/src/unit.rs
// ============================================================================
// Module: Validation Unit
// Description: Per-field rule, cached result, and async task lifecycle.
// Purpose: Evaluate one field, caching results and discarding superseded
//          asynchronous verdicts.
// Dependencies: crate::{component, delegate, error, event, rule}, form-logic,
//               tokio::sync::mpsc
// ============================================================================

//! ## Overview
//! A [`ValidationUnit`] owns one field's rule and its cached result. Every
//! re-evaluation bumps the unit's generation; asynchronous verdicts carry the
//! generation they were started for and are applied only while it is still
//! current. Generations come from a counter shared by every unit of one
//! validator, so a unit re-registered under an old identifier never reuses a
//! generation an earlier unit handed out.
//!
//! # Invariants
//! - The cached result always holds exactly one flag.
//! - `in_flight` is true only while the cached result is `PENDING`.
//! - A verdict for an older generation never replaces the cached result.
//! - An abandoned check settles the unit; cached folds do not restart it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use std::rc::Weak;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use form_logic::ValidationResult;
use tokio::sync::mpsc::UnboundedSender;

use crate::component::FieldValue;
use crate::component::ValidatableComponent;
use crate::component::type_default;
use crate::delegate::UnitSignals;
use crate::error::RuleError;
use crate::error::ValidatorError;
use crate::event::ValidationEvent;
use crate::rule::Completion;
use crate::rule::CompletionVerdict;
use crate::rule::RuleOutcome;
use crate::rule::ValidationRule;

// ============================================================================
// SECTION: Registration Spec
// ============================================================================

/// Everything needed to register a unit
pub struct ValidationSpec<K> {
    /// Unit identifier.
    identifier: K,
    /// Rule judging the field.
    rule: Box<dyn ValidationRule>,
    /// Component events that schedule revalidation.
    events: ValidationEvent,
    /// Value used until a component supplies one.
    initial_value: Option<FieldValue>,
    /// Whether an untouched default value counts as passing.
    allow_default: bool,
}

impl<K> ValidationSpec<K> {
    /// Creates a spec reacting to every event, with no initial value and
    /// defaults disallowed
    pub fn new(identifier: K, rule: impl ValidationRule + 'static) -> Self {
        Self {
            identifier,
            rule: Box::new(rule),
            events: ValidationEvent::ALL,
            initial_value: None,
            allow_default: false,
        }
    }

    /// Sets the events that schedule revalidation
    #[must_use]
    pub const fn validate_on(mut self, events: ValidationEvent) -> Self {
        self.events = events;
        self
    }

    /// Seeds the value used before a component is bound
    #[must_use]
    pub fn initial_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    /// Lets an untouched default value count as passing
    #[must_use]
    pub const fn allow_default(mut self, allow: bool) -> Self {
        self.allow_default = allow;
        self
    }

    /// Returns the identifier this spec registers
    pub const fn identifier(&self) -> &K {
        &self.identifier
    }
}

// ============================================================================
// SECTION: Completion Messages
// ============================================================================

/// Verdict marshalled back to the owner context.
#[derive(Debug)]
pub(crate) struct CompletionMessage<K> {
    /// Unit the verdict belongs to.
    pub(crate) identifier: K,
    /// Generation the check was started for.
    pub(crate) generation: u64,
    /// Reported verdict.
    pub(crate) verdict: CompletionVerdict,
}

/// Channel end handed to completions.
pub(crate) type CompletionSender<K> = UnboundedSender<CompletionMessage<K>>;

/// Generation source shared by the units of one validator.
pub(crate) type GenerationCounter = Rc<Cell<u64>>;

/// The rule call that received the completion has not returned yet.
const IN_CALL: u8 = 0;
/// The completion was dropped before the rule call returned.
const DROPPED_IN_CALL: u8 = 1;
/// The rule call returned; verdicts travel through the channel.
const RELEASED: u8 = 2;

// ============================================================================
// SECTION: Validation Unit
// ============================================================================

/// Validation state and rule for one form field
pub struct ValidationUnit<K> {
    /// Unit identifier.
    identifier: K,
    /// Rule judging the field.
    rule: Box<dyn ValidationRule>,
    /// Component events that schedule revalidation.
    events: ValidationEvent,
    /// Whether the unit validates at all.
    enabled: bool,
    /// Whether an untouched default value counts as passing.
    allow_default: bool,
    /// Value used until a component supplies one.
    initial_value: Option<FieldValue>,
    /// Non-owning reference to the bound component.
    component: Option<Weak<dyn ValidatableComponent>>,
    /// Cached single-flag result.
    result: ValidationResult,
    /// Set when the cached result no longer reflects the bound component.
    stale: bool,
    /// Current evaluation generation.
    generation: u64,
    /// Counter the next generation is drawn from.
    generations: GenerationCounter,
    /// Whether an asynchronous check for `generation` is outstanding.
    in_flight: bool,
    /// Set when the check for `generation` was abandoned.
    abandoned: bool,
    /// Transport error from the last asynchronous check.
    last_error: Option<RuleError>,
    /// Channel carrying asynchronous verdicts to the owner.
    completions: CompletionSender<K>,
}

impl<K: Clone + Send + 'static> ValidationUnit<K> {
    /// Creates an unvalidated unit from a registration spec
    pub(crate) fn new(
        spec: ValidationSpec<K>,
        completions: CompletionSender<K>,
        generations: GenerationCounter,
    ) -> Self {
        Self {
            identifier: spec.identifier,
            rule: spec.rule,
            events: spec.events,
            enabled: true,
            allow_default: spec.allow_default,
            initial_value: spec.initial_value,
            component: None,
            result: ValidationResult::UNVALIDATED,
            stale: false,
            generation: 0,
            generations,
            in_flight: false,
            abandoned: false,
            last_error: None,
            completions,
        }
    }

    /// Evaluates the unit, reusing the cached result unless `revalidate` is
    /// set or the cache cannot be trusted
    pub(crate) fn validate(
        &mut self,
        revalidate: bool,
        signals: &mut dyn UnitSignals<K>,
    ) -> ValidationResult {
        if !self.enabled {
            return self.result;
        }
        if !revalidate
            && !self.stale
            && (self.abandoned || self.result != ValidationResult::UNVALIDATED)
        {
            return self.result;
        }
        self.stale = false;

        let component = self.live_component();
        if self.component.is_some() && component.is_none() {
            return self.settle_without_rule(ValidationResult::UNVALIDATED);
        }
        let value =
            component.as_ref().and_then(|c| c.current_value()).or_else(|| self.initial_value.clone());
        let Some(value) = value else {
            return self.settle_without_rule(ValidationResult::UNVALIDATED);
        };

        if self.allow_default && value == Self::default_for(component.as_ref(), &value) {
            let result = self.settle_without_rule(ValidationResult::DEFAULT_VALID);
            self.signal_did_validate(component.as_ref(), None, signals);
            return result;
        }

        self.supersede();
        let generation = self.generation;
        signals.will_validate(&self.identifier, generation);
        if let Some(hooks) = component.as_ref().and_then(|c| c.hooks()) {
            hooks.will_validate();
        }

        let (completion, handoff) = self.completion_for(generation);
        let outcome = self.rule.validate(&value, completion);
        let dropped_in_call = handoff.swap(RELEASED, Ordering::AcqRel) == DROPPED_IN_CALL;
        match outcome {
            RuleOutcome::Pending if dropped_in_call => {
                self.result = ValidationResult::UNVALIDATED;
                self.abandoned = true;
                self.signal_did_validate(component.as_ref(), None, signals);
            }
            RuleOutcome::Pending => {
                self.result = ValidationResult::PENDING;
                self.in_flight = true;
            }
            _ => {
                self.result = outcome.into_result();
                self.signal_did_validate(component.as_ref(), None, signals);
            }
        }
        self.result
    }

    /// Applies an asynchronous verdict; returns false when it was superseded
    pub(crate) fn apply_completion(
        &mut self,
        generation: u64,
        verdict: CompletionVerdict,
        signals: &mut dyn UnitSignals<K>,
    ) -> bool {
        if !self.in_flight || generation != self.generation {
            return false;
        }
        self.in_flight = false;

        let (result, error) = match verdict {
            CompletionVerdict::Finished(Ok(true)) => (ValidationResult::VALID, None),
            CompletionVerdict::Finished(Ok(false)) => (ValidationResult::INVALID, None),
            CompletionVerdict::Finished(Err(error)) => (ValidationResult::INVALID, Some(error)),
            CompletionVerdict::Abandoned => (ValidationResult::UNVALIDATED, None),
        };
        self.abandoned = result == ValidationResult::UNVALIDATED;
        self.result = result;
        self.last_error.clone_from(&error);

        let error = error.map(ValidatorError::NetworkValidationFailed);
        let component = self.live_component();
        self.signal_did_validate(component.as_ref(), error.as_ref(), signals);
        true
    }

    /// Marks an unvalidated unit default-valid when its value is the default
    pub(crate) fn evaluate_default_validity(&mut self) -> ValidationResult {
        if self.result != ValidationResult::UNVALIDATED || !self.allow_default {
            return self.result;
        }
        let component = self.live_component();
        let value =
            component.as_ref().and_then(|c| c.current_value()).or_else(|| self.initial_value.clone());
        if let Some(value) = value
            && value == Self::default_for(component.as_ref(), &value)
        {
            self.result = ValidationResult::DEFAULT_VALID;
        }
        self.result
    }

    /// Cancels in-flight work and forgets the cached result
    pub(crate) fn reset(&mut self) {
        self.supersede();
        self.result = ValidationResult::UNVALIDATED;
        self.last_error = None;
        self.stale = false;
    }

    /// Binds or unbinds the component and marks the cache stale
    pub(crate) fn set_component(&mut self, component: Option<Weak<dyn ValidatableComponent>>) {
        self.component = component;
        self.stale = true;
    }

    /// Enables or disables validation
    pub(crate) const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    /// Cancels any in-flight check and starts a new generation
    fn supersede(&mut self) {
        if self.in_flight {
            self.rule.cancel();
            self.in_flight = false;
        }
        self.abandoned = false;
        let next = self.generations.get().wrapping_add(1);
        self.generations.set(next);
        self.generation = next;
    }

    /// Settles on `result` without invoking the rule
    fn settle_without_rule(&mut self, result: ValidationResult) -> ValidationResult {
        self.supersede();
        self.last_error = None;
        self.result = result;
        result
    }

    /// Builds the completion handle for `generation` and the hand-off state
    /// read once the rule call returns
    ///
    /// A drop during the call is reported through the hand-off state instead
    /// of the channel.
    fn completion_for(&self, generation: u64) -> (Completion, Arc<AtomicU8>) {
        let handoff = Arc::new(AtomicU8::new(IN_CALL));
        let state = Arc::clone(&handoff);
        let sender = self.completions.clone();
        let identifier = self.identifier.clone();
        let completion = Completion::new(move |verdict| {
            if matches!(verdict, CompletionVerdict::Abandoned)
                && state
                    .compare_exchange(IN_CALL, DROPPED_IN_CALL, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            {
                return;
            }
            let _ = sender.send(CompletionMessage {
                identifier,
                generation,
                verdict,
            });
        });
        (completion, handoff)
    }

    /// Returns the bound component if it is still alive
    fn live_component(&self) -> Option<Rc<dyn ValidatableComponent>> {
        self.component.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the default the value is compared against
    fn default_for(
        component: Option<&Rc<dyn ValidatableComponent>>,
        value: &FieldValue,
    ) -> FieldValue {
        component.map_or_else(|| type_default(value), |c| c.default_value())
    }

    /// Signals did-validate to the component hooks and, when enabled, the owner
    fn signal_did_validate(
        &self,
        component: Option<&Rc<dyn ValidatableComponent>>,
        error: Option<&ValidatorError>,
        signals: &mut dyn UnitSignals<K>,
    ) {
        if let Some(hooks) = component.and_then(|c| c.hooks()) {
            hooks.did_validate(self.result, error);
        }
        if self.enabled {
            signals.did_validate(&self.identifier, self.generation, self.result, error);
        }
    }
}

// ============================================================================
// SECTION: Accessors
// ============================================================================

impl<K> ValidationUnit<K> {
    /// Returns the unit identifier
    pub const fn identifier(&self) -> &K {
        &self.identifier
    }

    /// Returns the cached result
    #[must_use]
    pub const fn result(&self) -> ValidationResult {
        self.result
    }

    /// Returns the events that schedule revalidation
    #[must_use]
    pub const fn events(&self) -> ValidationEvent {
        self.events
    }

    /// Returns whether the unit validates
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether an untouched default value counts as passing
    #[must_use]
    pub const fn allows_default(&self) -> bool {
        self.allow_default
    }

    /// Returns the seeded initial value
    #[must_use]
    pub const fn initial_value(&self) -> Option<&FieldValue> {
        self.initial_value.as_ref()
    }

    /// Returns the current evaluation generation
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns whether an asynchronous check is outstanding
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Returns whether the check for the current generation was abandoned
    #[must_use]
    pub const fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Returns whether the cache awaits revalidation after a rebinding
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns whether the rule uses the network debounce delay
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.rule.is_network()
    }

    /// Returns the transport error from the last asynchronous check
    #[must_use]
    pub const fn last_error(&self) -> Option<&RuleError> {
        self.last_error.as_ref()
    }

    /// Returns whether a component is bound and still alive
    #[must_use]
    pub fn has_component(&self) -> bool {
        self.component.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}
