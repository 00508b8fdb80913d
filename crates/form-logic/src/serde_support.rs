// crates/form-logic/src/serde_support.rs
// ============================================================================
// Module: Tree Serde Support
// Description: Structural validation and RON/JSON encoding for logic trees.
// Purpose: Load authored trees with fail-closed structure checks.
// Dependencies: crate::{error, node}, ron, serde, serde_json
// ============================================================================

//! ## Overview
//! Trees authored outside the program are untrusted. [`TreeValidator`]
//! bounds their depth and rejects empty groups, and [`TreeSerializer`]
//! applies the same checks whenever a tree is encoded or decoded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::TreeError;
use crate::node::LogicNode;
use crate::resolver::LogicOperation;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum depth accepted for a logic tree
pub const DEFAULT_MAX_TREE_DEPTH: usize = 32;

// ============================================================================
// SECTION: Validator Configuration
// ============================================================================

/// Structural limits applied to logic trees
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Maximum allowed depth; a single leaf has depth 1
    pub max_depth: usize,

    /// Whether `And`/`Or` groups may be empty
    pub allow_empty_groups: bool,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_TREE_DEPTH,
            allow_empty_groups: false,
        }
    }
}

// ============================================================================
// SECTION: Tree Validator
// ============================================================================

/// Validator for logic tree structure
///
/// # Invariants
/// - Uses the stored [`TreeLimits`] for all validation decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeValidator {
    /// Structural limits.
    limits: TreeLimits,
}

impl TreeValidator {
    /// Creates a validator with the given limits
    #[must_use]
    pub const fn new(limits: TreeLimits) -> Self {
        Self {
            limits,
        }
    }

    /// Creates a validator with default limits and the given depth bound
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(TreeLimits {
            max_depth,
            ..TreeLimits::default()
        })
    }

    /// Returns the active limits
    #[must_use]
    pub const fn limits(&self) -> TreeLimits {
        self.limits
    }

    /// Validates a logic tree
    ///
    /// # Errors
    /// Returns [`TreeError`] when the tree violates structural limits.
    pub fn validate<K>(&self, tree: &LogicNode<K>) -> Result<(), TreeError> {
        self.validate_node(tree, 1)
    }

    /// Validates a node at the given depth
    fn validate_node<K>(&self, node: &LogicNode<K>, depth: usize) -> Result<(), TreeError> {
        if depth > self.limits.max_depth {
            return Err(TreeError::TooDeep {
                max_depth: self.limits.max_depth,
                actual_depth: depth,
            });
        }

        match node {
            LogicNode::Leaf(_) => Ok(()),
            LogicNode::And(children) | LogicNode::Or(children) => {
                if children.is_empty() && !self.limits.allow_empty_groups {
                    return Err(TreeError::EmptyGroup {
                        operation: node.operation().unwrap_or(LogicOperation::And),
                    });
                }
                for child in children {
                    self.validate_node(child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// SECTION: Tree Serializer
// ============================================================================

/// Encodes and decodes logic trees with structural validation
///
/// # Invariants
/// - Every encoded or decoded tree passes the stored validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSerializer {
    /// Validator applied on both encode and decode.
    validator: TreeValidator,
}

impl TreeSerializer {
    /// Creates a serializer using the given validator
    #[must_use]
    pub const fn new(validator: TreeValidator) -> Self {
        Self {
            validator,
        }
    }

    /// Serializes a tree to pretty RON
    ///
    /// # Errors
    /// Returns [`TreeError`] if validation or encoding fails.
    pub fn to_ron<K: Serialize>(&self, tree: &LogicNode<K>) -> Result<String, TreeError> {
        self.validator.validate(tree)?;
        ron::ser::to_string_pretty(tree, ron::ser::PrettyConfig::default())
            .map_err(|err| TreeError::Encoding(err.to_string()))
    }

    /// Deserializes a tree from RON
    ///
    /// # Errors
    /// Returns [`TreeError`] if parsing or validation fails.
    pub fn from_ron<K>(&self, input: &str) -> Result<LogicNode<K>, TreeError>
    where
        K: for<'de> Deserialize<'de>,
    {
        let tree: LogicNode<K> =
            ron::from_str(input).map_err(|err| TreeError::Encoding(err.to_string()))?;
        self.validator.validate(&tree)?;
        Ok(tree)
    }

    /// Serializes a tree to pretty JSON
    ///
    /// # Errors
    /// Returns [`TreeError`] if validation or encoding fails.
    pub fn to_json<K: Serialize>(&self, tree: &LogicNode<K>) -> Result<String, TreeError> {
        self.validator.validate(tree)?;
        serde_json::to_string_pretty(tree).map_err(|err| TreeError::Encoding(err.to_string()))
    }

    /// Deserializes a tree from JSON
    ///
    /// # Errors
    /// Returns [`TreeError`] if parsing or validation fails.
    pub fn from_json<K>(&self, input: &str) -> Result<LogicNode<K>, TreeError>
    where
        K: for<'de> Deserialize<'de>,
    {
        let tree: LogicNode<K> =
            serde_json::from_str(input).map_err(|err| TreeError::Encoding(err.to_string()))?;
        self.validator.validate(&tree)?;
        Ok(tree)
    }
}
