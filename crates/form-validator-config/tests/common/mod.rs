// crates/form-validator-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for form-validator-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::Path;
use std::path::PathBuf;

use form_validator_config::ConfigError;
use form_validator_config::FormValidatorConfig;

/// Parses a TOML string into a `FormValidatorConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<FormValidatorConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<FormValidatorConfig, toml::de::Error> {
    config_from_toml("")
}

/// Writes `contents` to `form-validator.toml` under `dir`.
pub fn write_config(dir: &Path, contents: &[u8]) -> Result<PathBuf, String> {
    let path = dir.join("form-validator.toml");
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok(path)
}

/// Asserts that a validation result is an error containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
