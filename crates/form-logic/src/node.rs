// crates/form-logic/src/node.rs
// ============================================================================
// Module: Logic Node
// Description: Recursive AND/OR/LEAF tree over validation identifiers.
// Purpose: Define `LogicNode`, its constructors, and its non-short-circuit
//          evaluation.
// Dependencies: crate::{resolver, result, traits}, serde, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! A [`LogicNode`] describes how individual field results combine into a
//! form-level verdict. Groups always evaluate every child before resolving,
//! so side-effecting leaves (asynchronous rules) are kicked off even when
//! the group's outcome is already decided. Children are evaluated in
//! declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::resolver::LogicOperation;
use crate::resolver::resolve;
use crate::result::ValidationResult;
use crate::traits::EvaluationTrace;
use crate::traits::LeafEvaluator;
use crate::traits::NoopTrace;

// ============================================================================
// SECTION: Logic Node
// ============================================================================

/// Composable validation tree referencing units by identifier
///
/// # Invariants
/// - Trees are owned values; a tree can never contain itself.
/// - Child order is declaration order and never affects the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicNode<K> {
    /// A single validation unit
    Leaf(K),
    /// Every child must be positively valid
    And(SmallVec<[Box<Self>; 4]>),
    /// At least one child must be positively valid
    Or(SmallVec<[Box<Self>; 4]>),
}

impl<K> From<K> for LogicNode<K> {
    fn from(identifier: K) -> Self {
        Self::Leaf(identifier)
    }
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

impl<K> LogicNode<K> {
    /// Creates a tree validating a single identifier
    pub const fn single(identifier: K) -> Self {
        Self::Leaf(identifier)
    }

    /// Alias for [`LogicNode::single`]
    pub const fn leaf(identifier: K) -> Self {
        Self::Leaf(identifier)
    }

    /// Creates a tree that ANDs trees or bare identifiers
    pub fn and<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::And(items.into_iter().map(|item| Box::new(item.into())).collect())
    }

    /// Creates a tree that ORs trees or bare identifiers
    pub fn or<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::Or(items.into_iter().map(|item| Box::new(item.into())).collect())
    }

    /// Creates a group for the given operation
    pub fn group<I, T>(operation: LogicOperation, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        match operation {
            LogicOperation::And => Self::and(items),
            LogicOperation::Or => Self::or(items),
        }
    }

    /// Returns a tree that ANDs this tree with further trees or identifiers
    ///
    /// This tree becomes the first child of the new group.
    #[must_use]
    pub fn and_with<I, T>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::and(std::iter::once(self).chain(items.into_iter().map(Into::into)))
    }

    /// Returns a tree that ORs this tree with further trees or identifiers
    ///
    /// This tree becomes the first child of the new group.
    #[must_use]
    pub fn or_with<I, T>(self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Self>,
    {
        Self::or(std::iter::once(self).chain(items.into_iter().map(Into::into)))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<K> LogicNode<K> {
    /// Evaluates the tree against the given leaf evaluator
    pub fn evaluate<E>(&self, evaluator: &mut E, revalidate: bool) -> ValidationResult
    where
        E: LeafEvaluator<K> + ?Sized,
    {
        let mut trace = NoopTrace;
        self.evaluate_with_trace(evaluator, revalidate, &mut trace)
    }

    /// Evaluates the tree and reports every step to a trace hook
    pub fn evaluate_with_trace<E, T>(
        &self,
        evaluator: &mut E,
        revalidate: bool,
        trace: &mut T,
    ) -> ValidationResult
    where
        E: LeafEvaluator<K> + ?Sized,
        T: EvaluationTrace<K> + ?Sized,
    {
        match self {
            Self::Leaf(identifier) => {
                let result = evaluator.evaluate_leaf(identifier, revalidate);
                trace.on_leaf_evaluated(identifier, result);
                result
            }
            Self::And(children) => {
                Self::fold_group(LogicOperation::And, children, evaluator, revalidate, trace)
            }
            Self::Or(children) => {
                Self::fold_group(LogicOperation::Or, children, evaluator, revalidate, trace)
            }
        }
    }

    /// Evaluates every child, unions the results, and resolves the mask
    fn fold_group<E, T>(
        operation: LogicOperation,
        children: &[Box<Self>],
        evaluator: &mut E,
        revalidate: bool,
        trace: &mut T,
    ) -> ValidationResult
    where
        E: LeafEvaluator<K> + ?Sized,
        T: EvaluationTrace<K> + ?Sized,
    {
        let mut mask = ValidationResult::EMPTY;
        for child in children {
            mask |= child.evaluate_with_trace(evaluator, revalidate, trace);
        }
        let result = resolve(mask, operation);
        trace.on_group_resolved(operation, mask, result);
        result
    }
}

// ============================================================================
// SECTION: Structure Queries
// ============================================================================

impl<K> LogicNode<K> {
    /// Returns the group operation, or `None` for a leaf
    #[must_use]
    pub const fn operation(&self) -> Option<LogicOperation> {
        match self {
            Self::Leaf(_) => None,
            Self::And(_) => Some(LogicOperation::And),
            Self::Or(_) => Some(LogicOperation::Or),
        }
    }

    /// Returns the children of a group, or an empty slice for a leaf
    #[must_use]
    pub fn children(&self) -> &[Box<Self>] {
        match self {
            Self::Leaf(_) => &[],
            Self::And(children) | Self::Or(children) => children,
        }
    }

    /// Returns leaf identifiers in declaration order, including repeats
    pub fn identifiers(&self) -> Vec<&K> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    /// Appends leaf identifiers to `out`
    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a K>) {
        match self {
            Self::Leaf(identifier) => out.push(identifier),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_identifiers(out);
                }
            }
        }
    }

    /// Returns true when any leaf references `identifier`
    pub fn references(&self, identifier: &K) -> bool
    where
        K: PartialEq,
    {
        match self {
            Self::Leaf(leaf) => leaf == identifier,
            Self::And(children) | Self::Or(children) => {
                children.iter().any(|child| child.references(identifier))
            }
        }
    }

    /// Returns the number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(children) | Self::Or(children) => {
                children.iter().map(|child| child.leaf_count()).sum()
            }
        }
    }

    /// Returns the depth of the tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(|child| child.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Maps every leaf identifier into another identifier type
    pub fn map_identifiers<U, F>(self, mut f: F) -> LogicNode<U>
    where
        F: FnMut(K) -> U,
    {
        self.map_with(&mut f)
    }

    /// Recursive helper for [`LogicNode::map_identifiers`]
    fn map_with<U, F>(self, f: &mut F) -> LogicNode<U>
    where
        F: FnMut(K) -> U,
    {
        match self {
            Self::Leaf(identifier) => LogicNode::Leaf(f(identifier)),
            Self::And(children) => {
                LogicNode::And(children.into_iter().map(|child| Box::new(child.map_with(f))).collect())
            }
            Self::Or(children) => {
                LogicNode::Or(children.into_iter().map(|child| Box::new(child.map_with(f))).collect())
            }
        }
    }
}
