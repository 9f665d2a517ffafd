// crates/schema-forms-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Provides the message catalog and formatting utilities for the CLI.
// Purpose: Centralize user-facing strings behind stable keys.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The schema-forms CLI stores user-facing strings in a small catalog keyed
//! by stable identifiers. All runtime output should be routed through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG: &[(&str, &str)] = &[
    ("main.version", "schema-forms {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("input.kind.schema", "schema"),
    ("input.kind.ui", "UI hints"),
    ("input.kind.input", "form input"),
    ("input.kind.data", "submission data"),
    ("input.kind.state", "multivalue state"),
    ("input.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path} because it is {size} bytes (limit {limit}).",
    ),
    ("input.parse_failed", "Failed to parse {kind} JSON at {path}: {error}"),
    ("input.root_invalid", "Invalid --root value: {value}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("telemetry.open_failed", "Failed to open event log at {path}: {error}"),
    ("schema.invalid", "Schema rejected: {error}"),
    ("compile.failed", "Failed to compile form: {error}"),
    ("submit.failed", "Failed to validate submission: {error}"),
    ("submit.invalid", "Submission has {count} validation error(s)."),
    ("state.serialize_failed", "Failed to serialize multivalue state: {error}"),
    ("state.write_failed", "Failed to write multivalue state to {path}: {error}"),
    ("item.field_invalid", "Field path must end in a property name: {field}"),
    ("item.add.ok", "Added item {index} to {field}."),
    ("item.add.exhausted", "No item index left to add to {field}."),
    ("item.remove.ok", "Removed item {index} from {field}."),
    ("item.remove.missing", "Item {index} is not live in {field}; nothing removed."),
];

/// Returns the raw catalog entries in declaration order.
#[must_use]
pub const fn catalog_entries() -> &'static [(&'static str, &'static str)] {
    CATALOG
}

/// Returns the message catalog keyed by message identifier.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
