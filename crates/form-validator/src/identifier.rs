// crates/form-validator/src/identifier.rs
// ============================================================================
// Module: Validation Identifiers
// Description: Bound set for caller-supplied unit identifiers.
// Purpose: Name the capabilities every identifier type must provide.
// Dependencies: std::{fmt, hash}
// ============================================================================

//! ## Overview
//! Identifiers are opaque keys chosen by the caller: strings, integers, or
//! enum tags. They key the unit map, appear as tree leaves, and travel with
//! asynchronous completions, so they must be cheap to clone and `Send`.

use std::fmt;
use std::hash::Hash;

/// Opaque, comparable key naming one validation unit
pub trait Identifier: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + 'static {}

impl<T> Identifier for T where T: Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + 'static {}
