// crates/form-validator/src/lib.rs
// ============================================================================
// Module: Form Validator Root
// Description: Public API surface for the validation runtime.
// Purpose: Wire units, rules, the registry, and audit sinks together.
// Dependencies: crate::{audit, component, debounce, delegate, error, event,
//               identifier, registry, rule, settings, unit}
// ============================================================================

//! ## Overview
//! `form-validator` is the stateful half of the form validator. A
//! [`Validator`] owns one [`ValidationUnit`] per field, folds their results
//! through a form rule built from `form-logic`, debounces component events,
//! and applies asynchronous verdicts on the owner's context.
//!
//! ```
//! use form_validator::PredicateRule;
//! use form_validator::ValidationResult;
//! use form_validator::ValidationSpec;
//! use form_validator::Validator;
//!
//! let mut validator = Validator::<&str>::new();
//! let rule = PredicateRule::new(|value: &serde_json::Value| value.as_str().is_some_and(|s| s.contains('@')));
//! validator
//!     .add_validation(ValidationSpec::new("email", rule).initial_value("a@b.c"))
//!     .unwrap();
//! assert_eq!(validator.validate(), ValidationResult::VALID);
//! ```

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod audit;
pub mod component;
mod debounce;
pub mod delegate;
pub mod error;
pub mod event;
pub mod identifier;
pub mod registry;
pub mod rule;
pub mod settings;
pub mod unit;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEventKind;
pub use audit::FileAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use audit::ValidationAuditSink;
pub use component::ComponentHooks;
pub use component::FieldCell;
pub use component::FieldValue;
pub use component::ValidatableComponent;
pub use delegate::ValidatorDelegate;
pub use error::RuleError;
pub use error::ValidatorError;
pub use event::ValidationEvent;
pub use form_logic::LogicNode;
pub use form_logic::LogicOperation;
pub use form_logic::ValidationResult;
pub use identifier::Identifier;
pub use registry::FormPredicate;
pub use registry::Validator;
pub use rule::CallbackRule;
pub use rule::CancelHandle;
pub use rule::Completion;
pub use rule::CompletionVerdict;
pub use rule::NetworkRule;
pub use rule::PredicateRule;
pub use rule::RuleOutcome;
pub use rule::ValidationRule;
pub use settings::DEFAULT_INPUT_DELAY;
pub use settings::DEFAULT_NETWORK_INPUT_DELAY;
pub use settings::ValidatorSettings;
pub use unit::ValidationSpec;
pub use unit::ValidationUnit;
