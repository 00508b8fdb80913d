// crates/form-logic/src/lib.rs
// ============================================================================
// Module: Form Logic Root
// Description: Public API surface for form validation algebra.
// Purpose: Wire together result flags, resolution, trees, and the DSL macro.
// Dependencies: crate::{builder, dsl, error, node, resolver, result,
//              serde_support, traits}
// ============================================================================

//! ## Overview
//! `form-logic` is the pure half of the form validator: a bit-flag result
//! domain, the AND/OR precedence table that folds result masks, and the
//! [`LogicNode`] tree that combines field results into a form verdict.
//! Nothing here owns validation state; trees read leaves through a
//! [`LeafEvaluator`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod dsl;
pub mod error;
pub mod node;
pub mod resolver;
pub mod result;
pub mod serde_support;
pub mod traits;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::AndBuilder;
pub use builder::OrBuilder;
pub use dsl::DslError;
pub use dsl::IdentifierResolver;
pub use dsl::parse_tree;
pub use dsl::parse_tree_with;
pub use error::TreeError;
pub use error::TreeResult;
pub use node::LogicNode;
pub use resolver::LogicOperation;
pub use resolver::resolve;
pub use resolver::resolve_all;
pub use result::ResultLabelError;
pub use result::ValidationResult;
pub use serde_support::DEFAULT_MAX_TREE_DEPTH;
pub use serde_support::TreeLimits;
pub use serde_support::TreeSerializer;
pub use serde_support::TreeValidator;
pub use traits::EvaluationTrace;
pub use traits::LeafEvaluator;
pub use traits::NoopTrace;

// ============================================================================
// SECTION: Convenience DSL
// ============================================================================

/// Convenience functions for creating trees without builders
pub mod convenience {
    use super::LogicNode;

    /// Creates a tree requiring every child to be valid
    #[must_use]
    pub fn all<K>(children: Vec<LogicNode<K>>) -> LogicNode<K> {
        LogicNode::and(children)
    }

    /// Creates a tree requiring any child to be valid
    #[must_use]
    pub fn any<K>(children: Vec<LogicNode<K>>) -> LogicNode<K> {
        LogicNode::or(children)
    }

    /// Creates a tree validating a single identifier
    #[must_use]
    pub const fn single<K>(identifier: K) -> LogicNode<K> {
        LogicNode::single(identifier)
    }
}

// ============================================================================
// SECTION: Logic Macro
// ============================================================================

/// Macro for ergonomic tree construction
///
/// Bare tokens become leaves; parenthesized items nest further groups.
/// Groups expand through [`convenience::all`] and [`convenience::any`], so
/// the identifier type comes from the leaves. Mixing macro output with
/// [`LogicNode::and`] or [`LogicNode::or`] may need an annotated binding:
///
/// ```
/// use form_logic::LogicNode;
/// use form_logic::logic;
///
/// let tree: LogicNode<&str> = logic!(and ["email", (or ["phone", "alt_phone"])]);
/// assert_eq!(tree.leaf_count(), 3);
/// assert_eq!(tree.depth(), 3);
/// ```
#[macro_export]
macro_rules! logic {
    // Nested group or parenthesized expression
    (@item ($($inner:tt)+)) => {
        $crate::logic!($($inner)+)
    };

    // Leaf
    (@item $leaf:tt) => {
        $crate::node::LogicNode::leaf($leaf)
    };

    // And case
    (and [$($item:tt),* $(,)?]) => {
        $crate::convenience::all(::std::vec![$($crate::logic!(@item $item)),*])
    };

    // Or case
    (or [$($item:tt),* $(,)?]) => {
        $crate::convenience::any(::std::vec![$($crate::logic!(@item $item)),*])
    };

    // Single identifier expression
    ($leaf:expr) => {
        $crate::node::LogicNode::leaf($leaf)
    };
}
