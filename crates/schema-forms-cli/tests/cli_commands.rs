// crates/schema-forms-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Runs the schema-forms binary against temporary files.
// Purpose: Validate compile, item, submit, and config command behavior.
// Dependencies: schema-forms-cli binary, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Drives the compiled binary end to end. Each test works in its own
//! temporary directory so state files never leak between runs.

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

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_schema-forms"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(cli_binary())
        .current_dir(dir)
        .env_remove("SCHEMA_FORMS_CONFIG")
        .args(args)
        .output()
        .expect("run schema-forms")
}

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path.display().to_string()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn fixture() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "title": "Name"},
                "tags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["name"]
        }),
    );
    (dir, schema)
}

fn live_indices(state_path: &Path) -> Value {
    let state: Value = serde_json::from_slice(&fs::read(state_path).unwrap()).unwrap();
    state["fields"][0]["indices"].clone()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies `--version` prints the package version.
#[test]
fn version_flag_prints_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), format!("schema-forms {}", env!("CARGO_PKG_VERSION")));
}

/// Verifies compile emits the widget tree and seeds state from the input.
#[test]
fn compile_emits_tree_and_writes_state() {
    let (dir, schema) = fixture();
    let input = write_json(dir.path(), "input.json", &json!({"tags": ["a", "b"]}));
    let state = dir.path().join("state.json");
    let state_arg = state.display().to_string();

    let output = run(
        dir.path(),
        &["compile", "--schema", &schema, "--input", &input, "--state", &state_arg],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let tree = stdout_json(&output);
    assert_eq!(tree["children"][0]["name"], "name");
    assert_eq!(tree["children"][0]["kind"], "textfield");
    assert_eq!(tree["children"][0]["required"], true);
    assert_eq!(tree["children"][1]["kind"], "repeatable");
    assert_eq!(tree["children"][1]["children"].as_array().unwrap().len(), 3);
    assert_eq!(live_indices(&state), json!([0, 1]));
}

/// Verifies item add and remove edit the state file between compiles.
#[test]
fn item_commands_edit_state_between_compiles() {
    let (dir, schema) = fixture();
    let input = write_json(dir.path(), "input.json", &json!({"tags": ["a", "b"]}));
    let state = dir.path().join("state.json");
    let state_arg = state.display().to_string();
    let compile: [&str; 7] =
        ["compile", "--schema", &schema, "--input", &input, "--state", &state_arg];
    assert!(run(dir.path(), &compile).status.success());

    let added = run(dir.path(), &["item", "add", "--state", &state_arg, "--field", "/tags"]);
    assert!(added.status.success());
    assert_eq!(String::from_utf8(added.stdout).unwrap().trim(), "Added item 2 to /tags.");
    assert_eq!(live_indices(&state), json!([0, 1, 2]));

    let removed = run(
        dir.path(),
        &["item", "remove", "--state", &state_arg, "--field", "/tags", "--delta", "0"],
    );
    assert!(removed.status.success());
    assert_eq!(live_indices(&state), json!([1, 2]));

    let output = run(dir.path(), &compile);
    let tree = stdout_json(&output);
    let items: Vec<&str> = tree["children"][1]["children"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|child| child["kind"] == "removable_item")
        .map(|child| child["name"].as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["1", "2"]);
}

/// Verifies removing a dead index reports and leaves the state intact.
#[test]
fn item_remove_of_dead_index_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let state_arg = state.display().to_string();
    let output = run(
        dir.path(),
        &["item", "remove", "--state", &state_arg, "--field", "/tags", "--delta", "4"],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "Item 4 is not live in /tags; nothing removed."
    );
}

/// Verifies submit exits with status 2 and routes failures when invalid.
#[test]
fn submit_reports_invalid_submission() {
    let (dir, schema) = fixture();
    let data = write_json(dir.path(), "data.json", &json!({"name": "", "tags": {"add_more": "Add"}}));

    let output = run(dir.path(), &["submit", "--schema", &schema, "--data", &data]);
    assert_eq!(output.status.code(), Some(2));
    let outcome = stdout_json(&output);
    assert_eq!(outcome["error_count"], 1);
    assert_eq!(outcome["document"], json!({}));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Submission has 1 validation error(s)."));
}

/// Verifies submit succeeds on a valid submission.
#[test]
fn submit_accepts_valid_submission() {
    let (dir, schema) = fixture();
    let data = write_json(dir.path(), "data.json", &json!({"name": "Ada"}));

    let output = run(dir.path(), &["submit", "--schema", &schema, "--data", &data]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let outcome = stdout_json(&output);
    assert_eq!(outcome["error_count"], 0);
    assert_eq!(outcome["document"]["name"], "Ada");
}

/// Verifies config validate accepts a good file and rejects a bad one.
#[test]
fn config_validate_reports_result() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, "[compiler]\nmax_depth = 12\n").unwrap();
    let good_arg = good.display().to_string();
    let output = run(dir.path(), &["config", "validate", "--config", &good_arg]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "Config valid.");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[compiler]\nmax_depth = 0\n").unwrap();
    let bad_arg = bad.display().to_string();
    let output = run(dir.path(), &["config", "validate", "--config", &bad_arg]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Failed to load config: "));
}

/// Verifies compile rejects a schema with malformed keywords.
#[test]
fn compile_rejects_malformed_schema() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!({"type": "object", "properties": {"a": {"type": "string", "minLength": "x"}}}),
    );

    let output = run(dir.path(), &["compile", "--schema", &schema]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Schema rejected: "));
}

/// Verifies oversized inputs fail closed before parsing.
#[test]
fn oversized_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("schema-forms.toml");
    fs::write(&config, "[validation]\nmax_schema_bytes = 16\n").unwrap();
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!({"type": "object", "properties": {"a": {"type": "string"}}}),
    );

    let output = run(dir.path(), &["compile", "--schema", &schema]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Refusing to read schema"));
}
