// crates/schema-forms-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable catalog helpers.
// Dependencies: schema-forms-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the schema-forms CLI catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](schema_forms_cli::t) macro formats placeholders correctly.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use schema_forms_cli::i18n::MessageArg;
use schema_forms_cli::i18n::translate;
use schema_forms_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/schema.json");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/schema.json");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("index", "2"), MessageArg::new("field", "/tags")];
    let result = translate("item.add.ok", args);
    assert_eq!(result, "Added item 2 to /tags.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    let result = translate("missing.key", Vec::new());
    assert_eq!(result, "missing.key");
}

/// Confirms the `t!` macro formats named arguments.
#[test]
fn t_macro_formats_named_arguments() {
    let count = 3;
    assert_eq!(t!("submit.invalid", count = count), "Submission has 3 validation error(s).");
    assert_eq!(t!("main.version", version = "1.2.3"), "schema-forms 1.2.3");
    assert_eq!(t!("config.validate.ok"), "Config valid.");
}
