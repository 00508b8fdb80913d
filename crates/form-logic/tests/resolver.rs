// crates/form-logic/tests/resolver.rs
// ============================================================================
// Test Module: Result Resolver
// Coverage: AND/OR precedence table, empty masks, and algebraic laws.
// ============================================================================
//! ## Overview
//! Integration tests for mask resolution.

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

use form_logic::LogicOperation;
use form_logic::ValidationResult;
use form_logic::resolve;
use form_logic::resolve_all;
use proptest::prelude::*;
use support::TestResult;
use support::ensure;

/// Every single-bit result.
const SINGLES: [ValidationResult; 5] = [
    ValidationResult::UNVALIDATED,
    ValidationResult::INVALID,
    ValidationResult::VALID,
    ValidationResult::DEFAULT_VALID,
    ValidationResult::PENDING,
];

/// Tests invalid absorbs every other flag under both operations.
#[test]
fn invalid_absorbs_under_both_operations() -> TestResult {
    let mask = ValidationResult::INVALID | ValidationResult::PENDING | ValidationResult::VALID;
    ensure(resolve(mask, LogicOperation::And) == ValidationResult::INVALID, "and absorbs")?;
    ensure(resolve(mask, LogicOperation::Or) == ValidationResult::INVALID, "or absorbs")?;
    Ok(())
}

/// Tests pending outranks everything but invalid.
#[test]
fn pending_postpones_the_verdict() -> TestResult {
    let mask = ValidationResult::PENDING | ValidationResult::VALID | ValidationResult::UNVALIDATED;
    ensure(resolve(mask, LogicOperation::And) == ValidationResult::PENDING, "and pending")?;
    ensure(resolve(mask, LogicOperation::Or) == ValidationResult::PENDING, "or pending")?;
    Ok(())
}

/// Tests AND treats untouched fields as failures.
#[test]
fn and_rejects_unvalidated_children() -> TestResult {
    let mask = ValidationResult::VALID | ValidationResult::UNVALIDATED;
    ensure(resolve(mask, LogicOperation::And) == ValidationResult::INVALID, "unvalidated fails")?;
    Ok(())
}

/// Tests AND yields default-valid only when every child is default-valid.
#[test]
fn and_default_valid_requires_uniform_defaults() -> TestResult {
    ensure(
        resolve(ValidationResult::DEFAULT_VALID, LogicOperation::And)
            == ValidationResult::DEFAULT_VALID,
        "all defaults stay default",
    )?;
    ensure(
        resolve(ValidationResult::DEFAULT_VALID | ValidationResult::VALID, LogicOperation::And)
            == ValidationResult::VALID,
        "mixed defaults resolve valid",
    )?;
    Ok(())
}

/// Tests OR prefers positively valid children over defaults.
#[test]
fn or_prefers_valid_over_default() -> TestResult {
    let mask = ValidationResult::VALID | ValidationResult::DEFAULT_VALID;
    ensure(resolve(mask, LogicOperation::Or) == ValidationResult::VALID, "valid wins")?;
    let mask = ValidationResult::DEFAULT_VALID | ValidationResult::UNVALIDATED;
    ensure(resolve(mask, LogicOperation::Or) == ValidationResult::DEFAULT_VALID, "default next")?;
    ensure(
        resolve(ValidationResult::UNVALIDATED, LogicOperation::Or)
            == ValidationResult::UNVALIDATED,
        "nothing passing stays unvalidated",
    )?;
    Ok(())
}

/// Tests empty masks resolve to the operation identities.
#[test]
fn empty_mask_resolves_to_identity() -> TestResult {
    ensure(resolve(ValidationResult::EMPTY, LogicOperation::And) == ValidationResult::VALID, "and")?;
    ensure(
        resolve(ValidationResult::EMPTY, LogicOperation::Or) == ValidationResult::UNVALIDATED,
        "or",
    )?;
    ensure(
        resolve_all(Vec::new(), LogicOperation::And) == ValidationResult::VALID,
        "resolve_all of nothing",
    )?;
    Ok(())
}

/// Tests a single child resolves to itself except for unvalidated under AND.
#[test]
fn single_child_passes_through() -> TestResult {
    for result in SINGLES {
        let or = resolve(result, LogicOperation::Or);
        ensure(or == result, format!("or passes {result} through"))?;
        let and = resolve(result, LogicOperation::And);
        let expected =
            if result == ValidationResult::UNVALIDATED { ValidationResult::INVALID } else { result };
        ensure(and == expected, format!("and maps {result} to {expected}"))?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn resolution_always_yields_a_single_flag(bits in 0u8 .. 32, or in any::<bool>()) {
        let mask = ValidationResult::from_bits_truncate(bits);
        let operation = if or { LogicOperation::Or } else { LogicOperation::And };
        prop_assert!(resolve(mask, operation).is_single());
    }

    #[test]
    fn invalid_is_absorbing(bits in 0u8 .. 32) {
        let mask = ValidationResult::from_bits_truncate(bits) | ValidationResult::INVALID;
        prop_assert_eq!(resolve(mask, LogicOperation::And), ValidationResult::INVALID);
        prop_assert_eq!(resolve(mask, LogicOperation::Or), ValidationResult::INVALID);
    }

    #[test]
    fn and_passing_implies_or_passing(bits in 1u8 .. 32) {
        let mask = ValidationResult::from_bits_truncate(bits);
        if resolve(mask, LogicOperation::And).is_passing() {
            prop_assert!(resolve(mask, LogicOperation::Or).is_passing());
        }
    }

    #[test]
    fn child_order_is_irrelevant(children in prop::collection::vec(0usize .. 5, 0 .. 8)) {
        let forward: Vec<ValidationResult> = children.iter().map(|idx| SINGLES[*idx]).collect();
        let mut backward = forward.clone();
        backward.reverse();
        for operation in [LogicOperation::And, LogicOperation::Or] {
            prop_assert_eq!(
                resolve_all(forward.clone(), operation),
                resolve_all(backward.clone(), operation)
            );
        }
    }
}
