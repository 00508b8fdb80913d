// crates/form-logic/src/error.rs
// ============================================================================
// Module: Tree Error Definitions
// Description: Structured diagnostics for logic tree construction.
// Purpose: Report structural limit violations and encoding failures.
// Dependencies: serde::{Deserialize, Serialize}, std::fmt
// ============================================================================

//! ## Overview
//! Tree errors are recoverable construction-time diagnostics. Evaluation
//! itself never fails: unknown leaves resolve to `UNVALIDATED`.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::resolver::LogicOperation;

/// Errors raised while validating or decoding a logic tree
///
/// # Invariants
/// - None. Variants capture structured construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeError {
    /// Tree nesting exceeds the configured depth
    TooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Depth encountered while validating
        actual_depth: usize,
    },

    /// A group has no children while empty groups are disallowed
    EmptyGroup {
        /// Operation of the empty group
        operation: LogicOperation,
    },

    /// The encoded tree could not be decoded or encoded
    Encoding(String),

    /// Any other structural problem
    InvalidStructure(String),
}

// ============================================================================
// SECTION: Display Implementation
// ============================================================================

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => {
                write!(f, "logic tree too deep: {actual_depth} levels (max {max_depth})")
            }
            Self::EmptyGroup {
                operation,
            } => {
                write!(f, "empty `{}` group not allowed", operation.as_str())
            }
            Self::Encoding(msg) => write!(f, "logic tree encoding error: {msg}"),
            Self::InvalidStructure(msg) => write!(f, "invalid logic tree structure: {msg}"),
        }
    }
}

impl std::error::Error for TreeError {}

impl TreeError {
    /// Creates an invalid structure error
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure(message.into())
    }
}

/// Convenient Result type for tree operations
pub type TreeResult<T = ()> = Result<T, TreeError>;
