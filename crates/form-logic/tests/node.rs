// crates/form-logic/tests/node.rs
// ============================================================================
// Test Module: Logic Node
// Coverage: Tree construction, evaluation order, tracing, and queries.
// ============================================================================
//! ## Overview
//! Integration tests for logic tree evaluation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::BTreeMap;
use std::collections::HashMap;

use form_logic::AndBuilder;
use form_logic::EvaluationTrace;
use form_logic::LogicNode;
use form_logic::LogicOperation;
use form_logic::OrBuilder;
use form_logic::ValidationResult;
use form_logic::convenience;
use form_logic::logic;
use support::TestResult;
use support::ensure;

/// Builds the contact form tree: email AND (phone OR alt phone).
fn contact_tree() -> LogicNode<&'static str> {
    LogicNode::single("email").and_with([LogicNode::or(["phone", "alt_phone"])])
}

/// Trace hook recording leaves and group resolutions.
#[derive(Default)]
struct RecordingTrace {
    /// Leaves in evaluation order.
    leaves: Vec<&'static str>,
    /// Group operations in resolution order.
    groups: Vec<(LogicOperation, ValidationResult)>,
}

impl EvaluationTrace<&'static str> for RecordingTrace {
    fn on_leaf_evaluated(&mut self, identifier: &&'static str, _result: ValidationResult) {
        self.leaves.push(*identifier);
    }

    fn on_group_resolved(
        &mut self,
        operation: LogicOperation,
        _mask: ValidationResult,
        result: ValidationResult,
    ) {
        self.groups.push((operation, result));
    }
}

/// Tests the contact form truth table.
#[test]
fn contact_form_requires_email_and_a_phone() -> TestResult {
    let tree = contact_tree();
    let mut results = HashMap::new();
    results.insert("email", ValidationResult::VALID);
    results.insert("phone", ValidationResult::INVALID);
    results.insert("alt_phone", ValidationResult::VALID);
    ensure(tree.evaluate(&mut results, false) == ValidationResult::INVALID, "invalid phone")?;

    results.insert("phone", ValidationResult::UNVALIDATED);
    ensure(tree.evaluate(&mut results, false) == ValidationResult::VALID, "alt phone suffices")?;

    results.insert("alt_phone", ValidationResult::PENDING);
    ensure(tree.evaluate(&mut results, false) == ValidationResult::PENDING, "pending alt phone")?;
    Ok(())
}

/// Tests missing identifiers resolve as unvalidated.
#[test]
fn missing_leaves_are_unvalidated() -> TestResult {
    let mut results: BTreeMap<&str, ValidationResult> = BTreeMap::new();
    results.insert("email", ValidationResult::VALID);
    let tree = LogicNode::and(["email", "ghost"]);
    ensure(tree.evaluate(&mut results, false) == ValidationResult::INVALID, "ghost fails and")?;
    let tree = LogicNode::or(["email", "ghost"]);
    ensure(tree.evaluate(&mut results, false) == ValidationResult::VALID, "ghost ignored by or")?;
    Ok(())
}

/// Tests every child is evaluated even when the outcome is decided.
#[test]
fn groups_never_short_circuit() -> TestResult {
    let tree = LogicNode::and(["a", "b", "c"]);
    let mut visited = Vec::new();
    let mut evaluator = |id: &&'static str, revalidate: bool| {
        visited.push((*id, revalidate));
        ValidationResult::INVALID
    };
    let result = tree.evaluate(&mut evaluator, true);
    ensure(result == ValidationResult::INVALID, "and is invalid")?;
    ensure(visited == vec![("a", true), ("b", true), ("c", true)], "all leaves visited in order")?;
    Ok(())
}

/// Tests the trace sees every leaf and every group.
#[test]
fn trace_observes_leaves_and_groups() -> TestResult {
    let tree = contact_tree();
    let mut results = HashMap::new();
    results.insert("email", ValidationResult::VALID);
    results.insert("phone", ValidationResult::DEFAULT_VALID);
    let mut trace = RecordingTrace::default();
    let result = tree.evaluate_with_trace(&mut results, false, &mut trace);
    ensure(result == ValidationResult::VALID, "default phone satisfies or")?;
    ensure(trace.leaves == vec!["email", "phone", "alt_phone"], "leaf order")?;
    ensure(
        trace.groups
            == vec![
                (LogicOperation::Or, ValidationResult::DEFAULT_VALID),
                (LogicOperation::And, ValidationResult::VALID),
            ],
        "groups resolve inner first",
    )?;
    Ok(())
}

/// Tests structure queries on a nested tree.
#[test]
fn structure_queries_report_shape() -> TestResult {
    let tree = contact_tree();
    ensure(tree.operation() == Some(LogicOperation::And), "root is and")?;
    ensure(tree.children().len() == 2, "two children")?;
    ensure(tree.depth() == 3, "depth counts the leaf level")?;
    ensure(tree.leaf_count() == 3, "three leaves")?;
    ensure(tree.references(&"alt_phone"), "references nested leaf")?;
    ensure(!tree.references(&"fax"), "does not reference absent leaf")?;
    ensure(tree.identifiers() == vec![&"email", &"phone", &"alt_phone"], "identifier order")?;
    let mapped = tree.map_identifiers(str::len);
    ensure(mapped.identifiers() == vec![&5, &5, &9], "identifiers mapped")?;
    Ok(())
}

/// Tests builders, convenience functions, and the macro agree.
#[test]
fn construction_surfaces_agree() -> TestResult {
    let built = AndBuilder::new()
        .with_leaf("email")
        .with(OrBuilder::new().with_all(["phone", "alt_phone"]).build())
        .build();
    let convenient = convenience::all(vec![
        convenience::single("email"),
        convenience::any(vec![LogicNode::leaf("phone"), LogicNode::leaf("alt_phone")]),
    ]);
    let macro_tree = logic!(and ["email", (or ["phone", "alt_phone"])]);
    ensure(built == contact_tree(), "builder matches combinators")?;
    ensure(convenient == contact_tree(), "convenience matches combinators")?;
    ensure(macro_tree == contact_tree(), "macro matches combinators")?;
    Ok(())
}

/// Tests extending an existing tree keeps it as the first child.
#[test]
fn or_with_prepends_existing_tree() -> TestResult {
    let tree = LogicNode::leaf("a").or_with(["b"]);
    ensure(tree == LogicNode::or(["a", "b"]), "existing tree first")?;
    let group = LogicNode::group(LogicOperation::And, ["x"]);
    ensure(group == LogicNode::and(["x"]), "group builds operation")?;
    Ok(())
}
