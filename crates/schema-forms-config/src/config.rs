// crates/schema-forms-config/src/config.rs
// ============================================================================
// Module: Schema Forms Configuration
// Description: Configuration loading and validation for the form toolchain.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: schema-forms-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional and defaults to the compiler's built-in values.
//! Values outside their documented ranges fail validation instead of being
//! clamped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use schema_forms_core::CompileOptions;
use schema_forms_core::DEFAULT_MAX_DEPTH;
use schema_forms_core::runtime::DEFAULT_ADD_MORE_LABEL;
use schema_forms_core::runtime::DEFAULT_ITEM_TITLE_FORMAT;
use schema_forms_core::runtime::DEFAULT_REMOVE_LABEL;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "schema-forms.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SCHEMA_FORMS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Smallest accepted compile depth limit.
pub(crate) const MIN_MAX_DEPTH: usize = 1;
/// Largest accepted compile depth limit.
pub(crate) const MAX_MAX_DEPTH: usize = 128;
/// Maximum length of a control label or title format.
pub(crate) const MAX_LABEL_LENGTH: usize = 256;
/// Placeholder that must appear in the item title format.
pub(crate) const ITEM_NUMBER_PLACEHOLDER: &str = "{number}";
/// Default limit for submitted document files in bytes.
pub(crate) const DEFAULT_MAX_DOCUMENT_BYTES: usize = 1024 * 1024;
/// Default limit for schema and UI hint files in bytes.
pub(crate) const DEFAULT_MAX_SCHEMA_BYTES: usize = 1024 * 1024;
/// Upper bound for any input size limit in bytes.
pub(crate) const MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Schema forms configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFormsConfig {
    /// Widget compiler configuration.
    #[serde(default)]
    pub compiler: CompilerConfig,
    /// Validator collaborator configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Event sink configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SchemaFormsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_from(&resolved)
    }

    /// Loads configuration, falling back to defaults when nothing was
    /// requested explicitly and the default file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit or present config fails to load.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some() || env::var_os(CONFIG_ENV_VAR).is_some();
        if !explicit && !Path::new(DEFAULT_CONFIG_NAME).exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads and validates configuration from `path`.
    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiler.validate()?;
        self.validation.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }

    /// Returns the compile options described by the `[compiler]` section.
    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            max_depth: self.compiler.max_depth,
            add_more_label: self.compiler.add_more_label.clone(),
            remove_label: self.compiler.remove_label.clone(),
            item_title_format: self.compiler.item_title_format.clone(),
        }
    }
}

/// Widget compiler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Maximum nesting depth of schemas and widget trees.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Title of the append control.
    #[serde(default = "default_add_more_label")]
    pub add_more_label: String,
    /// Title of the remove control.
    #[serde(default = "default_remove_label")]
    pub remove_label: String,
    /// Title format of repeat items.
    #[serde(default = "default_item_title_format")]
    pub item_title_format: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            add_more_label: default_add_more_label(),
            remove_label: default_remove_label(),
            item_title_format: default_item_title_format(),
        }
    }
}

impl CompilerConfig {
    /// Validates compiler configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&self.max_depth) {
            return Err(ConfigError::Invalid(format!(
                "compiler.max_depth must be between {MIN_MAX_DEPTH} and {MAX_MAX_DEPTH}"
            )));
        }
        validate_label("compiler.add_more_label", &self.add_more_label)?;
        validate_label("compiler.remove_label", &self.remove_label)?;
        validate_label("compiler.item_title_format", &self.item_title_format)?;
        if !self.item_title_format.contains(ITEM_NUMBER_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "compiler.item_title_format must contain {ITEM_NUMBER_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

/// JSON Schema drafts understood by the validator collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationDraft {
    /// Draft 4.
    #[default]
    Draft4,
    /// Draft 6.
    Draft6,
    /// Draft 7.
    Draft7,
    /// Draft 2019-09.
    #[serde(rename = "draft2019_09")]
    Draft201909,
    /// Draft 2020-12.
    #[serde(rename = "draft2020_12")]
    Draft202012,
}

/// Validator collaborator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Draft used to interpret schemas.
    #[serde(default)]
    pub draft: ValidationDraft,
    /// Maximum size of a submitted document file in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Maximum size of schema, UI hint, and state files in bytes.
    #[serde(default = "default_max_schema_bytes")]
    pub max_schema_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            draft: ValidationDraft::default(),
            max_document_bytes: default_max_document_bytes(),
            max_schema_bytes: default_max_schema_bytes(),
        }
    }
}

impl ValidationConfig {
    /// Validates validator configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_byte_limit("validation.max_document_bytes", self.max_document_bytes)?;
        validate_byte_limit("validation.max_schema_bytes", self.max_schema_bytes)?;
        Ok(())
    }
}

/// Event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TelemetrySink {
    /// Drop all events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Event sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: TelemetrySink,
    /// Event log path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl TelemetryConfig {
    /// Validates telemetry configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (TelemetrySink::File, None) => {
                Err(ConfigError::Invalid("telemetry.path is required for the file sink".to_string()))
            }
            (TelemetrySink::File, Some(path)) => {
                validate_path_string("telemetry.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "telemetry.path is only valid with the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default compile depth limit.
const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Default append control title.
fn default_add_more_label() -> String {
    DEFAULT_ADD_MORE_LABEL.to_string()
}

/// Default remove control title.
fn default_remove_label() -> String {
    DEFAULT_REMOVE_LABEL.to_string()
}

/// Default repeat item title format.
fn default_item_title_format() -> String {
    DEFAULT_ITEM_TITLE_FORMAT.to_string()
}

/// Default document size limit.
const fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

/// Default schema size limit.
const fn default_max_schema_bytes() -> usize {
    DEFAULT_MAX_SCHEMA_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
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

/// Resolves the config path from CLI or environment defaults.
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

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
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

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a user-facing label.
fn validate_label(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_LABEL_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds {MAX_LABEL_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Validates an input size limit.
fn validate_byte_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_INPUT_BYTES {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_INPUT_BYTES}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn compiler_config_validate_accepts_default() {
        assert!(CompilerConfig::default().validate().is_ok());
    }

    #[test]
    fn compiler_config_rejects_depth_out_of_range() {
        for max_depth in [0, MAX_MAX_DEPTH + 1] {
            let config = CompilerConfig {
                max_depth,
                ..CompilerConfig::default()
            };
            assert!(config.validate().is_err(), "max_depth {max_depth} should be rejected");
        }
        let config = CompilerConfig {
            max_depth: MAX_MAX_DEPTH,
            ..CompilerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn compiler_config_requires_number_placeholder() {
        let config = CompilerConfig {
            item_title_format: "{title}".to_string(),
            ..CompilerConfig::default()
        };
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("{number}"));
    }

    #[test]
    fn validate_label_rejects_blank_and_long() {
        assert!(validate_label("field", "  ").is_err());
        assert!(validate_label("field", &"a".repeat(MAX_LABEL_LENGTH + 1)).is_err());
        assert!(validate_label("field", &"a".repeat(MAX_LABEL_LENGTH)).is_ok());
    }

    #[test]
    fn validate_byte_limit_bounds() {
        assert!(validate_byte_limit("field", 0).is_err());
        assert!(validate_byte_limit("field", 1).is_ok());
        assert!(validate_byte_limit("field", MAX_INPUT_BYTES).is_ok());
        assert!(validate_byte_limit("field", MAX_INPUT_BYTES + 1).is_err());
    }

    #[test]
    fn telemetry_path_must_match_sink() {
        let missing = TelemetryConfig {
            sink: TelemetrySink::File,
            path: None,
        };
        assert!(missing.validate().is_err());
        let stray = TelemetryConfig {
            sink: TelemetrySink::Stderr,
            path: Some(PathBuf::from("events.jsonl")),
        };
        assert!(stray.validate().is_err());
        let file = TelemetryConfig {
            sink: TelemetrySink::File,
            path: Some(PathBuf::from("logs/events.jsonl")),
        };
        assert!(file.validate().is_ok());
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let value = format!("logs/{}", "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        let message = validate_path_string("telemetry.path", &value).unwrap_err().to_string();
        assert!(message.contains("telemetry.path path component too long"));
    }
}
