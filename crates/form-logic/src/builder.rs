// crates/form-logic/src/builder.rs
// ============================================================================
// Module: Logic Tree Builders
// Description: Fluent builders over the form logic tree.
// Purpose: Compose AND/OR trees incrementally with chained calls.
// Dependencies: crate::node::LogicNode
// ============================================================================

//! ## Overview
//! Builders collect children in declaration order and produce a
//! [`LogicNode`] group on `build`. They accept nested trees and bare
//! identifiers interchangeably.

use crate::node::LogicNode;

// ============================================================================
// SECTION: And Builder
// ============================================================================

/// Builder for AND groups with fluent chaining
#[derive(Debug, Clone)]
pub struct AndBuilder<K> {
    /// Children collected for the AND group.
    children: Vec<LogicNode<K>>,
}

impl<K> AndBuilder<K> {
    /// Creates an empty AND builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Adds a subtree to the group
    #[must_use]
    pub fn with(mut self, node: impl Into<LogicNode<K>>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Adds a leaf for `identifier`
    #[must_use]
    pub fn with_leaf(mut self, identifier: K) -> Self {
        self.children.push(LogicNode::Leaf(identifier));
        self
    }

    /// Adds several subtrees or identifiers
    #[must_use]
    pub fn with_all<I, T>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LogicNode<K>>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Builds the AND group
    #[must_use]
    pub fn build(self) -> LogicNode<K> {
        LogicNode::and(self.children)
    }
}

// ============================================================================
// SECTION: Or Builder
// ============================================================================

/// Builder for OR groups with fluent chaining
#[derive(Debug, Clone)]
pub struct OrBuilder<K> {
    /// Children collected for the OR group.
    children: Vec<LogicNode<K>>,
}

impl<K> OrBuilder<K> {
    /// Creates an empty OR builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Adds a subtree to the group
    #[must_use]
    pub fn with(mut self, node: impl Into<LogicNode<K>>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Adds a leaf for `identifier`
    #[must_use]
    pub fn with_leaf(mut self, identifier: K) -> Self {
        self.children.push(LogicNode::Leaf(identifier));
        self
    }

    /// Adds several subtrees or identifiers
    #[must_use]
    pub fn with_all<I, T>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LogicNode<K>>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Builds the OR group
    #[must_use]
    pub fn build(self) -> LogicNode<K> {
        LogicNode::or(self.children)
    }
}

// ============================================================================
// SECTION: Default Implementations
// ============================================================================

impl<K> Default for AndBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Default for OrBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
