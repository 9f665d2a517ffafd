//! Config load validation tests for schema-forms-config.
// crates/schema-forms-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards and section parsing.
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use schema_forms_config::ConfigError;
use schema_forms_config::SchemaFormsConfig;
use schema_forms_config::TelemetrySink;
use schema_forms_config::ValidationDraft;
use schema_forms_core::CompileOptions;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<SchemaFormsConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(contents: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(SchemaFormsConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(SchemaFormsConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(SchemaFormsConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(SchemaFormsConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_reports_missing_file_as_io() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match SchemaFormsConfig::load_or_default(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing config to fail".to_string()),
    }
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("[compiler\nmax_depth = 3")?;
    assert_invalid(SchemaFormsConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn empty_file_yields_default_options() -> TestResult {
    let file = write_config("")?;
    let config = SchemaFormsConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.compile_options() != CompileOptions::default() {
        return Err("empty config should produce default compile options".to_string());
    }
    if config.validation.draft != ValidationDraft::Draft4 {
        return Err("default draft should be draft4".to_string());
    }
    if config.telemetry.sink != TelemetrySink::None {
        return Err("default sink should be none".to_string());
    }
    Ok(())
}

#[test]
fn sections_map_onto_compile_options() -> TestResult {
    let file = write_config(
        r#"
[compiler]
max_depth = 8
add_more_label = "Add another"
remove_label = "Delete"
item_title_format = "{title} #{number}"

[validation]
draft = "draft2020_12"
max_document_bytes = 4096

[telemetry]
sink = "file"
path = "logs/events.jsonl"
"#,
    )?;
    let config = SchemaFormsConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let options = config.compile_options();
    if options.max_depth != 8 || options.add_more_label != "Add another" {
        return Err("compile options not taken from [compiler]".to_string());
    }
    if options.item_title("Phones", 1) != "Phones #2" {
        return Err("item title format not applied".to_string());
    }
    if config.validation.draft != ValidationDraft::Draft202012 {
        return Err("draft not parsed".to_string());
    }
    if config.validation.max_document_bytes != 4096 {
        return Err("document limit not parsed".to_string());
    }
    if config.telemetry.sink != TelemetrySink::File {
        return Err("sink not parsed".to_string());
    }
    Ok(())
}

#[test]
fn out_of_range_values_fail_closed() -> TestResult {
    assert_invalid(
        SchemaFormsConfig::from_toml("[compiler]\nmax_depth = 0"),
        "compiler.max_depth must be between",
    )?;
    assert_invalid(
        SchemaFormsConfig::from_toml("[compiler]\nremove_label = \"\""),
        "compiler.remove_label must be non-empty",
    )?;
    assert_invalid(
        SchemaFormsConfig::from_toml("[validation]\nmax_schema_bytes = 17000000"),
        "validation.max_schema_bytes must be between",
    )?;
    assert_invalid(
        SchemaFormsConfig::from_toml("[telemetry]\nsink = \"file\""),
        "telemetry.path is required",
    )?;
    assert_invalid(SchemaFormsConfig::from_toml("[validation]\ndraft = \"draft3\""), "parse")?;
    Ok(())
}
