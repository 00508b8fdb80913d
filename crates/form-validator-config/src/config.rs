// crates/form-validator-config/src/config.rs
// ============================================================================
// Module: Form Validator Configuration
// Description: Configuration loading and validation for form validators.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: form-logic, form-validator, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an empty file yields the runtime defaults.
//! Invalid configuration fails closed instead of falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use form_logic::IdentifierResolver;
use form_logic::LogicNode;
use form_logic::TreeValidator;
use form_logic::parse_tree_with;
use form_validator::FileAuditSink;
use form_validator::NoopAuditSink;
use form_validator::StderrAuditSink;
use form_validator::ValidationAuditSink;
use form_validator::ValidatorSettings;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "form-validator.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FORM_VALIDATOR_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum debounce delay in milliseconds.
pub const MAX_DELAY_MS: u64 = 60_000;
/// Default debounce delay for local rules in milliseconds.
pub(crate) const DEFAULT_INPUT_DELAY_MS: u64 = 300;
/// Default debounce delay for network rules in milliseconds.
pub(crate) const DEFAULT_NETWORK_INPUT_DELAY_MS: u64 = 1_000;
/// Minimum accepted tree depth bound.
pub const MIN_TREE_DEPTH: usize = 1;
/// Maximum accepted tree depth bound.
pub const MAX_TREE_DEPTH: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Form validator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormValidatorConfig {
    /// Debounce timing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Form tree limits and expression.
    #[serde(default)]
    pub tree: TreeConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl FormValidatorConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path comes from `path`, then `FORM_VALIDATOR_CONFIG`, then
    /// `form-validator.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_bytes(content.as_bytes())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.tree.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the runtime settings described by this configuration.
    #[must_use]
    pub const fn settings(&self) -> ValidatorSettings {
        ValidatorSettings {
            input_delay: Duration::from_millis(self.timing.input_delay_ms),
            network_input_delay: Duration::from_millis(self.timing.network_input_delay_ms),
            max_tree_depth: self.tree.max_depth,
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened and
    /// [`ConfigError::Invalid`] when the file sink has no path.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn ValidationAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path is required for the file sink".to_string())
                })?;
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Parses the configured tree expression, if any.
    ///
    /// The tree is bounded by `tree.max_depth`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the expression does not parse or
    /// names an identifier the resolver does not know.
    pub fn parse_tree<K, R>(&self, resolver: &R) -> Result<Option<LogicNode<K>>, ConfigError>
    where
        R: IdentifierResolver<K> + ?Sized,
    {
        let Some(expression) = self.tree.expression.as_deref() else {
            return Ok(None);
        };
        let validator = TreeValidator::with_max_depth(self.tree.max_depth);
        parse_tree_with(expression, resolver, &validator)
            .map(Some)
            .map_err(|err| ConfigError::Invalid(format!("tree.expression: {err}")))
    }

    /// Parses and validates raw config bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Debounce timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay before revalidating local rules, in milliseconds.
    #[serde(default = "default_input_delay_ms")]
    pub input_delay_ms: u64,
    /// Delay before revalidating network rules, in milliseconds.
    #[serde(default = "default_network_input_delay_ms")]
    pub network_input_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            input_delay_ms: default_input_delay_ms(),
            network_input_delay_ms: default_network_input_delay_ms(),
        }
    }
}

impl TimingConfig {
    /// Validates timing configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_delay("timing.input_delay_ms", self.input_delay_ms)?;
        validate_delay("timing.network_input_delay_ms", self.network_input_delay_ms)
    }
}

/// Form tree configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Maximum accepted tree depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Optional tree written in the logic DSL.
    #[serde(default)]
    pub expression: Option<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            expression: None,
        }
    }
}

impl TreeConfig {
    /// Validates tree configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TREE_DEPTH ..= MAX_TREE_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::Invalid(format!(
                "tree.max_depth must be between {MIN_TREE_DEPTH} and {MAX_TREE_DEPTH}"
            )));
        }
        if let Some(expression) = &self.expression
            && expression.trim().is_empty()
        {
            return Err(ConfigError::Invalid("tree.expression must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Drop all events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => Err(ConfigError::Invalid(
                "audit.path is required for the file sink".to_string(),
            )),
            (AuditSinkKind::File, Some(path)) => validate_path(path),
            (AuditSinkKind::None | AuditSinkKind::Stderr, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid for the file sink".to_string(),
            )),
            (AuditSinkKind::None | AuditSinkKind::Stderr, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default local debounce delay.
const fn default_input_delay_ms() -> u64 {
    DEFAULT_INPUT_DELAY_MS
}

/// Default network debounce delay.
const fn default_network_input_delay_ms() -> u64 {
    DEFAULT_NETWORK_INPUT_DELAY_MS
}

/// Default tree depth bound.
const fn default_max_depth() -> usize {
    form_logic::DEFAULT_MAX_TREE_DEPTH
}

/// Validates a delay against the allowed range.
fn validate_delay(field: &str, value: u64) -> Result<(), ConfigError> {
    if value > MAX_DELAY_MS {
        return Err(ConfigError::Invalid(format!("{field} must be at most {MAX_DELAY_MS}")));
    }
    Ok(())
}

/// Resolves the config path from arguments or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("path must be non-empty".to_string()));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
