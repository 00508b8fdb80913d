// crates/form-validator/tests/audit.rs
// ============================================================================
// Test Module: Validation Audit Sinks
// Coverage: Event sequencing and JSON-line file output.
// ============================================================================
//! ## Overview
//! Integration tests for audit events emitted by the registry.

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

use std::sync::Arc;

use form_logic::logic;
use form_validator::AuditEventKind;
use form_validator::FieldValue;
use form_validator::FileAuditSink;
use form_validator::MemoryAuditSink;
use form_validator::PredicateRule;
use form_validator::ValidationAuditEvent;
use form_validator::ValidationResult;
use form_validator::ValidationSpec;
use form_validator::Validator;
use support::TestResult;
use support::ensure;

/// Accepts any string.
fn is_text(value: &FieldValue) -> bool {
    value.is_string()
}

/// Tests the registry records its lifecycle in order.
#[test]
fn memory_sink_records_lifecycle_in_order() -> TestResult {
    let audit = Arc::new(MemoryAuditSink::new());
    let mut validator = Validator::new().with_audit_sink(audit.clone());
    validator.add_validation(
        ValidationSpec::new("name", PredicateRule::new(is_text)).initial_value("Ada"),
    )?;
    validator.set_tree(Some(logic!(and ["name", "ghost"])))?;
    validator.validate();
    let _ = validator.remove_validation(&"name");

    let kinds = audit.kinds();
    ensure(
        kinds
            == vec![
                AuditEventKind::ValidationAdded,
                AuditEventKind::UnitWillValidate,
                AuditEventKind::UnitValidated,
                AuditEventKind::UnknownIdentifier,
                AuditEventKind::FormValidated,
                AuditEventKind::RemovalRejected,
            ],
        format!("unexpected sequence {kinds:?}"),
    )?;

    let form = audit.events().into_iter().find(|event| event.event == AuditEventKind::FormValidated);
    ensure(
        form.and_then(|event| event.result) == Some(ValidationResult::INVALID),
        "form result carried",
    )?;
    Ok(())
}

/// Tests the file sink appends one parseable JSON object per event.
#[test]
fn file_sink_writes_json_lines() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("audit.jsonl");
    let mut validator = Validator::new().with_audit_sink(Arc::new(FileAuditSink::new(&path)?));
    validator.add_validation(ValidationSpec::new("name", PredicateRule::new(is_text)))?;
    validator.remove_validation(&"name")?;

    let contents = std::fs::read_to_string(&path)?;
    let events = contents
        .lines()
        .map(serde_json::from_str::<ValidationAuditEvent>)
        .collect::<Result<Vec<_>, _>>()?;
    ensure(events.len() == 2, "two lines written")?;
    ensure(events[0].event == AuditEventKind::ValidationAdded, "added first")?;
    ensure(events[1].identifier.as_deref() == Some("name"), "identifier recorded")?;
    ensure(contents.contains("\"validation_removed\""), "snake_case kinds")?;
    Ok(())
}
