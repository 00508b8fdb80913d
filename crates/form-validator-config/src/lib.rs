// crates/form-validator-config/src/lib.rs
// ============================================================================
// Module: Form Validator Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for form-validator.toml semantics.
// Dependencies: form-logic, form-validator, serde, toml
// ============================================================================

//! ## Overview
//! `form-validator-config` loads `form-validator.toml`, validates it against
//! hard limits, and turns it into [`form_validator::ValidatorSettings`], an
//! audit sink, and an optional form tree.
//!
//! Config inputs are untrusted: files are size-bounded, paths are
//! length-bounded, and tree expressions go through the bounded DSL parser.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
