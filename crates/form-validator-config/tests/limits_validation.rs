//! Limits validation tests for form-validator-config.
// crates/form-validator-config/tests/limits_validation.rs
// =============================================================================
// Module: Limits Validation Tests
// Description: Tests for MAX_*/MIN_* constant enforcement.
// Purpose: Ensure numeric, size, and path limits are properly enforced.
// =============================================================================

use std::collections::BTreeMap;

use form_validator_config::AuditSinkKind;
use form_validator_config::FormValidatorConfig;
use form_validator_config::MAX_CONFIG_FILE_SIZE;
use form_validator_config::MAX_DELAY_MS;
use form_validator_config::MAX_TREE_DEPTH;
use form_validator_config::MIN_TREE_DEPTH;

mod common;

/// Result type for config tests.
type TestResult = Result<(), String>;

/// Tests delays are accepted up to the maximum and rejected above it.
#[test]
fn delays_are_bounded() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.timing.input_delay_ms = MAX_DELAY_MS;
    config.timing.network_input_delay_ms = 0;
    config.validate().map_err(|err| err.to_string())?;

    config.timing.input_delay_ms = MAX_DELAY_MS + 1;
    common::assert_invalid(config.validate(), "timing.input_delay_ms")?;

    config.timing.input_delay_ms = 0;
    config.timing.network_input_delay_ms = MAX_DELAY_MS + 1;
    common::assert_invalid(config.validate(), "timing.network_input_delay_ms")
}

/// Tests the tree depth bound itself is bounded.
#[test]
fn tree_depth_is_bounded() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    for depth in [MIN_TREE_DEPTH, MAX_TREE_DEPTH] {
        config.tree.max_depth = depth;
        config.validate().map_err(|err| err.to_string())?;
    }
    for depth in [MIN_TREE_DEPTH - 1, MAX_TREE_DEPTH + 1] {
        config.tree.max_depth = depth;
        common::assert_invalid(config.validate(), "tree.max_depth")?;
    }
    Ok(())
}

/// Tests blank expressions are rejected.
#[test]
fn blank_expression_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.tree.expression = Some("   ".to_string());
    common::assert_invalid(config.validate(), "tree.expression must be non-empty")
}

/// Tests expressions deeper than the configured bound fail to parse.
#[test]
fn expression_respects_configured_depth() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.tree.max_depth = 2;
    config.tree.expression = Some("a && (b || c)".to_string());
    config.validate().map_err(|err| err.to_string())?;

    let mut fields = BTreeMap::new();
    for name in ["a", "b", "c"] {
        fields.insert(name.to_string(), name);
    }
    common::assert_invalid(config.parse_tree(&fields), "tree.expression")?;

    config.tree.expression = Some("a && missing".to_string());
    config.tree.max_depth = MAX_TREE_DEPTH;
    common::assert_invalid(config.parse_tree(&fields), "tree.expression")
}

/// Tests the audit path must match the sink kind.
#[test]
fn audit_path_matches_sink() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    common::assert_invalid(config.validate(), "audit.path is required")?;
    common::assert_invalid(config.build_audit_sink(), "audit.path is required")?;

    config.audit.sink = AuditSinkKind::Stderr;
    config.audit.path = Some("audit.jsonl".into());
    common::assert_invalid(config.validate(), "only valid for the file sink")?;

    config.audit.sink = AuditSinkKind::File;
    config.audit.path = Some("a".repeat(300).into());
    common::assert_invalid(config.validate(), "component too long")
}

/// Tests oversized files are rejected before parsing.
#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let mut contents = b"# padding\n".to_vec();
    contents.resize(MAX_CONFIG_FILE_SIZE + 1, b'#');
    let path = common::write_config(dir.path(), &contents)?;
    common::assert_invalid(FormValidatorConfig::load(Some(&path)), "size limit")
}

/// Tests non-UTF-8 files are rejected.
#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = common::write_config(dir.path(), &[0xff, 0xfe, 0x00])?;
    common::assert_invalid(FormValidatorConfig::load(Some(&path)), "utf-8")
}

/// Tests missing files surface as I/O errors.
#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    common::assert_invalid(FormValidatorConfig::load(Some(&path)), "config io error")
}
