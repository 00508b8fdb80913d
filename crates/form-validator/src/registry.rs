// crates/form-validator/src/registry.rs
// ============================================================================
// Module: Validator Registry
// Description: Owner of units and the form rule; drives revalidation.
// Purpose: Register units, fold their results into a form verdict, debounce
//          component events, and marshal asynchronous verdicts.
// Dependencies: crate::{audit, component, debounce, delegate, error, event,
//               identifier, settings, unit}, form-logic, tokio
// ============================================================================

//! ## Overview
//! The [`Validator`] is the single owner context of a form. All unit and
//! result mutation happens through `&mut Validator`; asynchronous rules only
//! send verdicts over a channel, which the owner drains with
//! [`Validator::process_completions`] or [`Validator::tick`].
//!
//! The form verdict comes from one of three form rules:
//! - no rule: the AND of every unit;
//! - a [`LogicNode`] tree;
//! - a custom block built from [`Validator::validation_is_valid`].
//!
//! Units not referenced by the tree or block are ANDed with its result.
//!
//! # Invariants
//! - Units referenced by the form rule cannot be removed.
//! - A superseded asynchronous verdict never replaces a later result.
//! - Disabled units keep their cached result in the fold and emit no unit
//!   notifications.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::rc::Rc;
use std::rc::Weak;
use std::sync::Arc;

use form_logic::LeafEvaluator;
use form_logic::LogicNode;
use form_logic::LogicOperation;
use form_logic::TreeValidator;
use form_logic::ValidationResult;
use form_logic::resolve;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use crate::audit::AuditEventKind;
use crate::audit::NoopAuditSink;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditSink;
use crate::component::ValidatableComponent;
use crate::debounce::DebounceQueue;
use crate::delegate::UnitSignals;
use crate::delegate::ValidatorDelegate;
use crate::error::ValidatorError;
use crate::event::ValidationEvent;
use crate::identifier::Identifier;
use crate::rule::CompletionVerdict;
use crate::settings::ValidatorSettings;
use crate::unit::CompletionMessage;
use crate::unit::CompletionSender;
use crate::unit::GenerationCounter;
use crate::unit::ValidationSpec;
use crate::unit::ValidationUnit;

// ============================================================================
// SECTION: Form Rules
// ============================================================================

/// Custom top-level predicate over cached unit results
pub type FormPredicate<K> = Box<dyn Fn(&Validator<K>) -> bool>;

/// How unit results combine into the form verdict.
enum FormRule<K> {
    /// AND of every registered unit.
    AllUnits,
    /// Explicit logic tree.
    Tree(LogicNode<K>),
    /// Custom predicate block.
    Block(FormPredicate<K>),
}

// ============================================================================
// SECTION: Signals
// ============================================================================

/// Routes unit signals to the audit sink and the delegate.
struct Signals<'a, K> {
    /// Delegate receiving unit notifications.
    delegate: Option<&'a mut (dyn ValidatorDelegate<K> + 'static)>,
    /// Audit sink receiving every signal.
    audit: &'a dyn ValidationAuditSink,
}

impl<'a, K> Signals<'a, K> {
    /// Borrows the delegate and audit sink for one evaluation.
    fn new(
        delegate: &'a mut Option<Box<dyn ValidatorDelegate<K>>>,
        audit: &'a Arc<dyn ValidationAuditSink>,
    ) -> Self {
        Self {
            delegate: delegate.as_deref_mut(),
            audit: audit.as_ref(),
        }
    }
}

impl<K: Identifier> UnitSignals<K> for Signals<'_, K> {
    fn will_validate(&mut self, identifier: &K, generation: u64) {
        self.audit.record(
            &ValidationAuditEvent::new(AuditEventKind::UnitWillValidate)
                .with_identifier(identifier)
                .with_generation(generation),
        );
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.will_validate(identifier);
        }
    }

    fn did_validate(
        &mut self,
        identifier: &K,
        generation: u64,
        result: ValidationResult,
        error: Option<&ValidatorError>,
    ) {
        let mut event = ValidationAuditEvent::new(AuditEventKind::UnitValidated)
            .with_identifier(identifier)
            .with_generation(generation)
            .with_result(result);
        if let Some(error) = error {
            event = event.with_error(error);
        }
        self.audit.record(&event);
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.did_validate(identifier, result, error);
        }
    }
}

// ============================================================================
// SECTION: Leaf Evaluation
// ============================================================================

/// Evaluates tree leaves against the unit map.
struct UnitEvaluator<'a, K> {
    /// Units keyed by identifier.
    units: &'a mut HashMap<K, ValidationUnit<K>>,
    /// Signal routing for validated units.
    signals: Signals<'a, K>,
    /// Units already evaluated during this fold.
    visited: HashSet<K>,
}

impl<K: Identifier> LeafEvaluator<K> for UnitEvaluator<'_, K> {
    fn evaluate_leaf(&mut self, identifier: &K, revalidate: bool) -> ValidationResult {
        let Some(unit) = self.units.get_mut(identifier) else {
            self.signals.audit.record(
                &ValidationAuditEvent::new(AuditEventKind::UnknownIdentifier)
                    .with_identifier(identifier),
            );
            return ValidationResult::UNVALIDATED;
        };
        if !self.visited.insert(identifier.clone()) {
            return unit.result();
        }
        unit.validate(revalidate, &mut self.signals)
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Registry of validation units for one form
///
/// # Invariants
/// - `order` lists every key of `units` exactly once, in insertion order.
pub struct Validator<K> {
    /// Units keyed by identifier.
    units: HashMap<K, ValidationUnit<K>>,
    /// Insertion order used for deterministic iteration.
    order: Vec<K>,
    /// Rule combining unit results.
    form_rule: FormRule<K>,
    /// Cached form verdict.
    form_result: ValidationResult,
    /// Whether form-level folds run at all.
    should_validate: bool,
    /// Timing and limits.
    settings: ValidatorSettings,
    /// Notification receiver.
    delegate: Option<Box<dyn ValidatorDelegate<K>>>,
    /// Audit sink.
    audit: Arc<dyn ValidationAuditSink>,
    /// Sender cloned into every completion.
    completion_tx: CompletionSender<K>,
    /// Receiver drained by the owner.
    completion_rx: UnboundedReceiver<CompletionMessage<K>>,
    /// Generation source shared by every unit, including re-registered ones.
    generations: GenerationCounter,
    /// Pending debounced revalidations.
    debounce: DebounceQueue<K>,
    /// Identifiers the block read during its last evaluation.
    block_references: RefCell<HashSet<K>>,
    /// Set while the block runs so reads are recorded.
    evaluating_block: Cell<bool>,
}

impl<K: Identifier> Default for Validator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Identifier> Validator<K> {
    /// Creates an empty validator with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ValidatorSettings::default())
    }

    /// Creates an empty validator with the given settings
    #[must_use]
    pub fn with_settings(settings: ValidatorSettings) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            units: HashMap::new(),
            order: Vec::new(),
            form_rule: FormRule::AllUnits,
            form_result: ValidationResult::UNVALIDATED,
            should_validate: true,
            settings,
            delegate: None,
            audit: Arc::new(NoopAuditSink),
            completion_tx,
            completion_rx,
            generations: GenerationCounter::default(),
            debounce: DebounceQueue::new(),
            block_references: RefCell::new(HashSet::new()),
            evaluating_block: Cell::new(false),
        }
    }

    /// Replaces the audit sink, builder style
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ValidationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the audit sink
    pub fn set_audit_sink(&mut self, audit: Arc<dyn ValidationAuditSink>) {
        self.audit = audit;
    }

    /// Installs or clears the delegate
    pub fn set_delegate(&mut self, delegate: Option<Box<dyn ValidatorDelegate<K>>>) {
        self.delegate = delegate;
    }

    /// Returns the active settings
    #[must_use]
    pub const fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a unit
    ///
    /// A unit seeded with an initial value immediately checks whether that
    /// value counts as default-valid.
    ///
    /// # Errors
    /// Returns [`ValidatorError::DuplicateIdentifier`] when the identifier is
    /// taken.
    pub fn add_validation(&mut self, spec: ValidationSpec<K>) -> Result<(), ValidatorError> {
        let identifier = spec.identifier().clone();
        if self.units.contains_key(&identifier) {
            return Err(ValidatorError::DuplicateIdentifier(identifier.to_string()));
        }
        let mut unit = ValidationUnit::new(
            spec,
            self.completion_tx.clone(),
            Rc::clone(&self.generations),
        );
        if unit.initial_value().is_some() {
            unit.evaluate_default_validity();
        }
        self.record(
            ValidationAuditEvent::new(AuditEventKind::ValidationAdded)
                .with_identifier(&identifier)
                .with_result(unit.result()),
        );
        self.units.insert(identifier.clone(), unit);
        self.order.push(identifier);
        Ok(())
    }

    /// Removes a unit, cancelling its in-flight work and pending timer
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent and
    /// [`ValidatorError::ValidationInUse`] while the form rule references it.
    pub fn remove_validation(&mut self, identifier: &K) -> Result<(), ValidatorError> {
        if !self.units.contains_key(identifier) {
            return Err(unknown(identifier));
        }
        if self.is_referenced(identifier) {
            self.record(
                ValidationAuditEvent::new(AuditEventKind::RemovalRejected)
                    .with_identifier(identifier),
            );
            return Err(ValidatorError::ValidationInUse(identifier.to_string()));
        }
        if let Some(mut unit) = self.units.remove(identifier) {
            unit.reset();
        }
        self.order.retain(|existing| existing != identifier);
        self.debounce.cancel(identifier);
        self.record(
            ValidationAuditEvent::new(AuditEventKind::ValidationRemoved).with_identifier(identifier),
        );
        Ok(())
    }

    /// Enables or disables a unit
    ///
    /// Disabling drops the unit's pending timer; its cached result stays in
    /// the fold.
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent.
    pub fn set_should_validate(
        &mut self,
        enabled: bool,
        identifier: &K,
    ) -> Result<(), ValidatorError> {
        let unit = self.units.get_mut(identifier).ok_or_else(|| unknown(identifier))?;
        unit.set_enabled(enabled);
        if !enabled {
            self.debounce.cancel(identifier);
        }
        Ok(())
    }

    /// Enables or disables form-level folds
    ///
    /// While disabled, units still validate but the form result is neither
    /// recomputed nor announced.
    pub const fn set_form_should_validate(&mut self, enabled: bool) {
        self.should_validate = enabled;
    }

    /// Returns whether form-level folds run
    #[must_use]
    pub const fn form_should_validate(&self) -> bool {
        self.should_validate
    }

    /// Binds a component to a unit without taking ownership of it
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent.
    pub fn set_component<C>(&mut self, identifier: &K, component: &Rc<C>) -> Result<(), ValidatorError>
    where
        C: ValidatableComponent + 'static,
    {
        let weak = Rc::downgrade(component);
        let weak: Weak<dyn ValidatableComponent> = weak;
        self.unit_mut(identifier)?.set_component(Some(weak));
        Ok(())
    }

    /// Unbinds the component of a unit
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent.
    pub fn clear_component(&mut self, identifier: &K) -> Result<(), ValidatorError> {
        self.unit_mut(identifier)?.set_component(None);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Form rule
    // ------------------------------------------------------------------------

    /// Installs a form tree, or reverts to the AND of all units
    ///
    /// Replaces any validation block.
    ///
    /// # Errors
    /// Returns [`ValidatorError::InvalidTree`] when the tree exceeds the
    /// configured depth or has empty groups.
    pub fn set_tree(&mut self, tree: Option<LogicNode<K>>) -> Result<(), ValidatorError> {
        match tree {
            Some(tree) => {
                TreeValidator::with_max_depth(self.settings.max_tree_depth).validate(&tree)?;
                self.form_rule = FormRule::Tree(tree);
            }
            None => self.form_rule = FormRule::AllUnits,
        }
        self.block_references.borrow_mut().clear();
        Ok(())
    }

    /// Returns the installed form tree
    #[must_use]
    pub const fn tree(&self) -> Option<&LogicNode<K>> {
        match &self.form_rule {
            FormRule::Tree(tree) => Some(tree),
            FormRule::AllUnits | FormRule::Block(_) => None,
        }
    }

    /// Reports the first tree leaf with no registered unit
    ///
    /// Such leaves evaluate as `UNVALIDATED`; this is a diagnostic only.
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifierInTree`] naming the leaf.
    pub fn check_tree(&self) -> Result<(), ValidatorError> {
        if let FormRule::Tree(tree) = &self.form_rule
            && let Some(missing) =
                tree.identifiers().into_iter().find(|leaf| !self.units.contains_key(*leaf))
        {
            return Err(ValidatorError::UnknownIdentifierInTree(missing.to_string()));
        }
        Ok(())
    }

    /// Installs a custom form predicate, or reverts to the AND of all units
    ///
    /// The block should read units only through
    /// [`Validator::validation_is_valid`]; the identifiers it reads are
    /// protected from removal. Replaces any form tree.
    pub fn set_validation_block(&mut self, block: Option<FormPredicate<K>>) {
        self.block_references.borrow_mut().clear();
        match block {
            Some(block) => {
                self.form_rule = FormRule::Block(block);
                self.capture_block_references();
            }
            None => self.form_rule = FormRule::AllUnits,
        }
    }

    /// Returns whether the unit's cached result is passing
    ///
    /// Intended for use inside a validation block.
    pub fn validation_is_valid(&self, identifier: &K) -> bool {
        if self.evaluating_block.get() {
            self.block_references.borrow_mut().insert(identifier.clone());
        }
        self.units.get(identifier).is_some_and(|unit| unit.result().is_passing())
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Revalidates every unit and recomputes the form result
    ///
    /// Announces did-validate-form unless form-level folds are disabled, in
    /// which case the cached form result is returned.
    pub fn validate(&mut self) -> ValidationResult {
        if !self.should_validate {
            self.validate_units(true);
            return self.form_result;
        }
        let result = self.fold(true);
        self.publish_form_result(result);
        result
    }

    /// Revalidates one unit immediately and re-folds the form
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent.
    pub fn validate_unit(&mut self, identifier: &K) -> Result<ValidationResult, ValidatorError> {
        let result = self.revalidate_unit(identifier).ok_or_else(|| unknown(identifier))?;
        self.refold();
        Ok(result)
    }

    /// Reports a component event, scheduling a debounced revalidation when
    /// the unit reacts to it; returns whether a deadline was scheduled
    ///
    /// A later event for the same unit replaces the pending deadline.
    ///
    /// # Errors
    /// Returns [`ValidatorError::UnknownIdentifier`] when absent.
    pub fn notify_event(
        &mut self,
        identifier: &K,
        event: ValidationEvent,
    ) -> Result<bool, ValidatorError> {
        let unit = self.units.get(identifier).ok_or_else(|| unknown(identifier))?;
        if !unit.is_enabled() || !unit.events().matches(event) {
            return Ok(false);
        }
        let deadline = Instant::now() + self.settings.delay_for(unit.is_network());
        self.debounce.schedule(identifier.clone(), deadline);
        self.record(
            ValidationAuditEvent::new(AuditEventKind::RevalidationScheduled)
                .with_identifier(identifier),
        );
        Ok(true)
    }

    /// Revalidates every unit whose deadline has passed; returns how many
    pub fn fire_due_timers(&mut self) -> usize {
        let due = self.debounce.take_due(Instant::now());
        for identifier in &due {
            if self.revalidate_unit(identifier).is_some() {
                self.refold();
            }
        }
        due.len()
    }

    /// Applies every queued asynchronous verdict; returns how many were
    /// current
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.completion_rx.try_recv() {
            if self.apply_completion(message) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next verdict or deadline and handles it
    ///
    /// Returns false without waiting when nothing is outstanding. A verdict
    /// already queued is applied before yielding to the runtime once.
    pub async fn tick(&mut self) -> bool {
        if let Ok(message) = self.completion_rx.try_recv() {
            self.apply_completion(message);
            tokio::task::yield_now().await;
            return true;
        }
        let deadline = self.debounce.next_deadline();
        if deadline.is_none() && !self.has_in_flight() {
            return false;
        }
        let received = match deadline {
            Some(deadline) => {
                tokio::select! {
                    message = self.completion_rx.recv() => message,
                    () = tokio::time::sleep_until(deadline) => None,
                }
            }
            None => self.completion_rx.recv().await,
        };
        match received {
            Some(message) => {
                self.apply_completion(message);
            }
            None => {
                self.fire_due_timers();
            }
        }
        true
    }

    /// Handles verdicts and deadlines until nothing is outstanding
    pub async fn run_until_idle(&mut self) {
        while self.tick().await {}
    }

    /// Returns whether a deadline or asynchronous check is outstanding
    #[must_use]
    pub fn has_outstanding_work(&self) -> bool {
        !self.debounce.is_empty() || self.has_in_flight()
    }

    /// Cancels all work and returns every unit to `UNVALIDATED`
    pub fn reset(&mut self) {
        for unit in self.units.values_mut() {
            unit.reset();
        }
        self.debounce.clear();
        self.form_result = ValidationResult::UNVALIDATED;
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Returns the cached form result
    #[must_use]
    pub const fn form_result(&self) -> ValidationResult {
        self.form_result
    }

    /// Returns a unit by identifier
    #[must_use]
    pub fn unit(&self, identifier: &K) -> Option<&ValidationUnit<K>> {
        self.units.get(identifier)
    }

    /// Returns the cached result of a unit
    #[must_use]
    pub fn result_of(&self, identifier: &K) -> Option<ValidationResult> {
        self.units.get(identifier).map(ValidationUnit::result)
    }

    /// Returns registered identifiers in insertion order
    pub fn identifiers(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Returns the number of registered units
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true when no unit is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    // ------------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------------

    /// Returns a unit mutably or an unknown-identifier error.
    fn unit_mut(&mut self, identifier: &K) -> Result<&mut ValidationUnit<K>, ValidatorError> {
        self.units.get_mut(identifier).ok_or_else(|| unknown(identifier))
    }

    /// Records an audit event.
    fn record(&self, event: ValidationAuditEvent) {
        self.audit.record(&event);
    }

    /// Returns true when the form rule references `identifier`.
    fn is_referenced(&self, identifier: &K) -> bool {
        match &self.form_rule {
            FormRule::AllUnits => false,
            FormRule::Tree(tree) => tree.references(identifier),
            FormRule::Block(_) => self.block_references.borrow().contains(identifier),
        }
    }

    /// Returns true when any unit awaits an asynchronous verdict.
    fn has_in_flight(&self) -> bool {
        self.units.values().any(ValidationUnit::is_in_flight)
    }

    /// Revalidates one unit without folding.
    fn revalidate_unit(&mut self, identifier: &K) -> Option<ValidationResult> {
        let Self {
            units,
            delegate,
            audit,
            ..
        } = self;
        let unit = units.get_mut(identifier)?;
        let mut signals = Signals::new(delegate, audit);
        Some(unit.validate(true, &mut signals))
    }

    /// Evaluates every unit in insertion order without folding.
    fn validate_units(&mut self, revalidate: bool) {
        let Self {
            units,
            order,
            delegate,
            audit,
            ..
        } = self;
        let mut signals = Signals::new(delegate, audit);
        for identifier in order.iter() {
            if let Some(unit) = units.get_mut(identifier) {
                unit.validate(revalidate, &mut signals);
            }
        }
    }

    /// Applies one asynchronous verdict and re-folds when it was current.
    fn apply_completion(&mut self, message: CompletionMessage<K>) -> bool {
        let CompletionMessage {
            identifier,
            generation,
            verdict,
        } = message;
        let finished = matches!(verdict, CompletionVerdict::Finished(_));
        let applied = {
            let Self {
                units,
                delegate,
                audit,
                ..
            } = self;
            let Some(unit) = units.get_mut(&identifier) else {
                return false;
            };
            let mut signals = Signals::new(delegate, audit);
            unit.apply_completion(generation, verdict, &mut signals)
        };
        if applied {
            self.refold();
        } else if finished {
            self.record(
                ValidationAuditEvent::new(AuditEventKind::CompletionSuperseded)
                    .with_identifier(&identifier)
                    .with_generation(generation),
            );
        }
        applied
    }

    /// Re-folds from cached results and announces the form result.
    fn refold(&mut self) {
        if self.should_validate {
            let result = self.fold(false);
            self.publish_form_result(result);
        }
    }

    /// Folds unit results through the form rule and caches the verdict.
    fn fold(&mut self, revalidate: bool) -> ValidationResult {
        let result = if matches!(self.form_rule, FormRule::Block(_)) {
            self.validate_units(revalidate);
            self.resolve_block()
        } else {
            self.fold_tree(revalidate)
        };
        self.form_result = result;
        result
    }

    /// Folds the tree, ANDing units it does not reference.
    fn fold_tree(&mut self, revalidate: bool) -> ValidationResult {
        let Self {
            units,
            order,
            form_rule,
            delegate,
            audit,
            ..
        } = self;
        let tree = if let FormRule::Tree(tree) = form_rule { Some(&*tree) } else { None };
        let mut evaluator = UnitEvaluator {
            units,
            signals: Signals::new(delegate, audit),
            visited: HashSet::new(),
        };

        let tree_result = tree.map(|tree| tree.evaluate(&mut evaluator, revalidate));
        let mut leftovers = ValidationResult::EMPTY;
        let mut has_leftovers = false;
        for identifier in order.iter() {
            if tree.is_none_or(|tree| !tree.references(identifier)) {
                leftovers |= evaluator.evaluate_leaf(identifier, revalidate);
                has_leftovers = true;
            }
        }

        match tree_result {
            Some(result) if !has_leftovers => result,
            Some(result) => resolve(result | leftovers, LogicOperation::And),
            None => resolve(leftovers, LogicOperation::And),
        }
    }

    /// Runs `block`, recording the identifiers it reads; returns its verdict.
    fn run_block(&self, block: &FormPredicate<K>) -> bool {
        self.block_references.borrow_mut().clear();
        self.evaluating_block.set(true);
        let passed = block(self);
        self.evaluating_block.set(false);
        passed
    }

    /// Records the identifiers the installed block reads without touching
    /// the form result.
    fn capture_block_references(&self) {
        if let FormRule::Block(block) = &self.form_rule {
            self.run_block(block);
        }
    }

    /// Runs the block against cached results, ANDing units it did not read.
    fn resolve_block(&self) -> ValidationResult {
        let FormRule::Block(block) = &self.form_rule else {
            return self.form_result;
        };
        let passed = self.run_block(block);

        let references = self.block_references.borrow();
        let block_result = if passed {
            ValidationResult::VALID
        } else if references.iter().any(|identifier| {
            self.units.get(identifier).is_some_and(ValidationUnit::is_in_flight)
        }) {
            ValidationResult::PENDING
        } else {
            ValidationResult::INVALID
        };

        let mut leftovers = ValidationResult::EMPTY;
        let mut has_leftovers = false;
        for identifier in self.order.iter().filter(|identifier| !references.contains(*identifier)) {
            leftovers |= self.units.get(identifier).map_or(ValidationResult::UNVALIDATED, ValidationUnit::result);
            has_leftovers = true;
        }
        if has_leftovers { resolve(block_result | leftovers, LogicOperation::And) } else { block_result }
    }

    /// Records and announces a recomputed form result.
    fn publish_form_result(&mut self, result: ValidationResult) {
        self.record(ValidationAuditEvent::new(AuditEventKind::FormValidated).with_result(result));
        if let Some(delegate) = self.delegate.as_deref_mut() {
            delegate.did_validate_form(result);
        }
    }
}

/// Builds an unknown-identifier error.
fn unknown<K: Identifier>(identifier: &K) -> ValidatorError {
    ValidatorError::UnknownIdentifier(identifier.to_string())
}
