//! Config defaults and loading tests for form-validator-config.
// crates/form-validator-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults and Loading Tests
// Description: Validate default behavior, file loading, and derived objects.
// Purpose: Ensure an empty config reproduces runtime defaults and loaded
//          values reach settings, sinks, and trees.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use form_validator::AuditEventKind;
use form_validator::ValidationAuditEvent;
use form_validator::ValidatorSettings;
use form_validator_config::AuditSinkKind;
use form_validator_config::FormValidatorConfig;

mod common;

/// Result type for config tests.
type TestResult = Result<(), String>;

/// Tests an empty config validates and matches runtime defaults.
#[test]
fn default_config_matches_runtime_defaults() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.settings() != ValidatorSettings::default() {
        return Err("empty config should reproduce runtime defaults".to_string());
    }
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit sink should default to none".to_string());
    }
    Ok(())
}

/// Tests loading a file carries every section into the runtime objects.
#[test]
fn load_reads_all_sections() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let contents = br#"
[timing]
input_delay_ms = 50
network_input_delay_ms = 500

[tree]
max_depth = 4
expression = "email && (phone || alt_phone)"

[audit]
sink = "stderr"
"#;
    let path = common::write_config(dir.path(), contents)?;
    let config = FormValidatorConfig::load(Some(&path)).map_err(|err| err.to_string())?;

    let settings = config.settings();
    if settings.input_delay != Duration::from_millis(50)
        || settings.network_input_delay != Duration::from_millis(500)
        || settings.max_tree_depth != 4
    {
        return Err("loaded timing and depth not applied".to_string());
    }

    let mut fields = HashMap::new();
    for name in ["email", "phone", "alt_phone"] {
        fields.insert(name.to_string(), name);
    }
    let tree = config.parse_tree(&fields).map_err(|err| err.to_string())?;
    match tree {
        Some(tree) if tree.leaf_count() == 3 => {}
        _ => return Err("expected a three-leaf tree".to_string()),
    }
    config.build_audit_sink().map_err(|err| err.to_string())?;
    Ok(())
}

/// Tests configs without an expression produce no tree.
#[test]
fn missing_expression_yields_no_tree() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let resolver = |name: &str| Some(name.to_string());
    let tree = config.parse_tree(&resolver).map_err(|err| err.to_string())?;
    if tree.is_some() {
        return Err("expected no tree".to_string());
    }
    Ok(())
}

/// Tests the file sink appends events to the configured path.
#[test]
fn file_audit_sink_writes_to_configured_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let log = dir.path().join("audit.jsonl");
    let contents = format!("[audit]\nsink = \"file\"\npath = '{}'\n", log.display());
    let config = FormValidatorConfig::from_toml_str(&contents).map_err(|err| err.to_string())?;

    let sink = config.build_audit_sink().map_err(|err| err.to_string())?;
    sink.record(&ValidationAuditEvent::new(AuditEventKind::FormValidated));
    let written = std::fs::read_to_string(&log).map_err(|err| err.to_string())?;
    if !written.contains("\"form_validated\"") {
        return Err(format!("unexpected audit log {written}"));
    }
    Ok(())
}

/// Tests unknown keys are rejected rather than ignored.
#[test]
fn unknown_keys_are_rejected() -> TestResult {
    common::assert_invalid(
        FormValidatorConfig::from_toml_str("[timing]\ninput_delay = 10\n"),
        "parse error",
    )
}
