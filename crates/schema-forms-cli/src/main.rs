// crates/schema-forms-cli/src/main.rs
// ============================================================================
// Module: Schema Forms CLI Entry Point
// Description: Command dispatcher for form compile, edit, and submit workflows.
// Purpose: Drive the form compiler over JSON files from the command line.
// Dependencies: clap, schema-forms-config, schema-forms-core,
//               schema-forms-jsonschema, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `schema-forms` binary compiles widget trees, edits multivalue state
//! files, and validates submissions. Inputs are JSON files read with hard
//! size limits. Multivalue state persists between invocations in a JSON file
//! so that add and remove actions survive across runs. All user-facing
//! strings are routed through the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use schema_forms_cli::t;
use schema_forms_config::SchemaFormsConfig;
use schema_forms_config::TelemetryConfig;
use schema_forms_config::TelemetrySink;
use schema_forms_config::ValidationDraft;
use schema_forms_core::FileEventSink;
use schema_forms_core::FormEvent;
use schema_forms_core::FormEventSink;
use schema_forms_core::FormSession;
use schema_forms_core::MultivalueKey;
use schema_forms_core::MultivalueTable;
use schema_forms_core::NoopEventSink;
use schema_forms_core::SchemaDocument;
use schema_forms_core::StderrEventSink;
use schema_forms_core::TreePath;
use schema_forms_core::UiHint;
use schema_forms_jsonschema::Draft;
use schema_forms_jsonschema::JsonSchemaValidator;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code returned when a submission fails validation.
const EXIT_VALIDATION_FAILED: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "schema-forms", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a schema into a widget tree.
    Compile(CompileCommand),
    /// Repeatable item utilities operating on a state file.
    Item {
        /// Selected item subcommand.
        #[command(subcommand)]
        command: ItemCommand,
    },
    /// Clean, cast, and validate a submission.
    Submit(SubmitCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments shared by commands that compile a form.
#[derive(Args, Debug)]
struct FormArgs {
    /// JSON Schema file.
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
    /// UI hints file.
    #[arg(long, value_name = "PATH")]
    ui: Option<PathBuf>,
    /// Multivalue state file; created or updated after the run.
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,
    /// Mount point of the form as a `/`-separated path.
    #[arg(long, value_name = "SEGMENTS")]
    root: Option<String>,
    /// Optional config file path (defaults to schema-forms.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration for the `compile` command.
#[derive(Args, Debug)]
struct CompileCommand {
    /// Shared form arguments.
    #[command(flatten)]
    form: FormArgs,
    /// Current input used to seed defaults and repeat counts.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,
}

/// Configuration for the `submit` command.
#[derive(Args, Debug)]
struct SubmitCommand {
    /// Shared form arguments.
    #[command(flatten)]
    form: FormArgs,
    /// Raw submission file.
    #[arg(long, value_name = "PATH")]
    data: PathBuf,
}

/// Item subcommands.
#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// Append an item to a repeatable field.
    Add(ItemAddCommand),
    /// Remove one item of a repeatable field.
    Remove(ItemRemoveCommand),
}

/// Configuration for `item add`.
#[derive(Args, Debug)]
struct ItemAddCommand {
    /// Multivalue state file.
    #[arg(long, value_name = "PATH")]
    state: PathBuf,
    /// Schema path of the repeatable field, e.g. `/people/0/phones`.
    #[arg(long, value_name = "PATH")]
    field: String,
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration for `item remove`.
#[derive(Args, Debug)]
struct ItemRemoveCommand {
    /// Multivalue state file.
    #[arg(long, value_name = "PATH")]
    state: PathBuf,
    /// Schema path of the repeatable field.
    #[arg(long, value_name = "PATH")]
    field: String,
    /// Index of the item to remove.
    #[arg(long, value_name = "N")]
    delta: usize,
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
}

/// Configuration for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Compile(command) => command_compile(&command),
        Commands::Item {
            command,
        } => command_item(&command),
        Commands::Submit(command) => command_submit(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Form Commands
// ============================================================================

/// Executes the `compile` command.
fn command_compile(command: &CompileCommand) -> CliResult<ExitCode> {
    let config = load_config(command.form.config.as_deref())?;
    let mut session = open_session(&command.form, &config)?;
    let input = command
        .input
        .as_deref()
        .map(|path| {
            read_json(path, config.validation.max_document_bytes, &t!("input.kind.input"))
        })
        .transpose()?;
    let tree = session
        .build(input.as_ref())
        .map_err(|err| CliError::new(t!("compile.failed", error = err)))?;
    write_json(&tree)?;
    if let Some(path) = command.form.state.as_deref() {
        save_state(path, session.state())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `submit` command.
fn command_submit(command: &SubmitCommand) -> CliResult<ExitCode> {
    let config = load_config(command.form.config.as_deref())?;
    let mut session = open_session(&command.form, &config)?;
    let raw =
        read_json(&command.data, config.validation.max_document_bytes, &t!("input.kind.data"))?;
    let validator = validator_for(&config);
    let outcome = session
        .submit(raw, &validator)
        .map_err(|err| CliError::new(t!("submit.failed", error = err)))?;
    write_json(&outcome)?;
    if let Some(path) = command.form.state.as_deref() {
        save_state(path, session.state())?;
    }
    if outcome.is_valid() {
        return Ok(ExitCode::SUCCESS);
    }
    write_stderr_line(&t!("submit.invalid", count = outcome.error_count))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::from(EXIT_VALIDATION_FAILED))
}

/// Builds a form session from shared form arguments.
fn open_session(form: &FormArgs, config: &SchemaFormsConfig) -> CliResult<FormSession> {
    let limit = config.validation.max_schema_bytes;
    let schema = read_json(&form.schema, limit, &t!("input.kind.schema"))?;
    let document = SchemaDocument::with_max_depth(schema, config.compiler.max_depth)
        .map_err(|err| CliError::new(t!("schema.invalid", error = err)))?;
    let ui = match form.ui.as_deref() {
        Some(path) => UiHint::from_value(&read_json(path, limit, &t!("input.kind.ui"))?),
        None => UiHint::default(),
    };
    let state = match form.state.as_deref() {
        Some(path) => load_state(path, limit)?,
        None => MultivalueTable::new(),
    };
    let root = parse_root(form.root.as_deref())?;
    let session = FormSession::new(document, ui, config.compile_options())
        .with_state(state)
        .with_root(root)
        .with_sink(build_sink(&config.telemetry)?);
    session
        .check_schema(&validator_for(config))
        .map_err(|err| CliError::new(t!("schema.invalid", error = err)))?;
    Ok(session)
}

/// Builds the validator for the configured draft.
const fn validator_for(config: &SchemaFormsConfig) -> JsonSchemaValidator {
    JsonSchemaValidator::new(draft_for(config.validation.draft))
}

/// Parses the `--root` mount point.
fn parse_root(value: Option<&str>) -> CliResult<TreePath> {
    let Some(value) = value else {
        return Ok(TreePath::root());
    };
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains("//") {
        return Err(CliError::new(t!("input.root_invalid", value = value)));
    }
    Ok(TreePath::parse(trimmed))
}

// ============================================================================
// SECTION: Item Commands
// ============================================================================

/// Dispatches item subcommands.
fn command_item(command: &ItemCommand) -> CliResult<ExitCode> {
    match command {
        ItemCommand::Add(command) => command_item_add(command),
        ItemCommand::Remove(command) => command_item_remove(command),
    }
}

/// Executes `item add`.
fn command_item_add(command: &ItemAddCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let key = field_key(&command.field)?;
    let mut state = load_state(&command.state, config.validation.max_schema_bytes)?;
    let index = state
        .add_one(&key)
        .ok_or_else(|| CliError::new(t!("item.add.exhausted", field = key.field_path())))?;
    save_state(&command.state, &state)?;
    record_change(&config, &state, &key, "add", index, true)?;
    write_stdout_line(&t!("item.add.ok", index = index, field = key.field_path()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `item remove`.
fn command_item_remove(command: &ItemRemoveCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let key = field_key(&command.field)?;
    let mut state = load_state(&command.state, config.validation.max_schema_bytes)?;
    let removed = state.remove_one(&key, command.delta);
    save_state(&command.state, &state)?;
    record_change(&config, &state, &key, "remove", command.delta, removed)?;
    let message = if removed {
        t!("item.remove.ok", index = command.delta, field = key.field_path())
    } else {
        t!("item.remove.missing", index = command.delta, field = key.field_path())
    };
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Resolves a `--field` argument to a multivalue key.
fn field_key(field: &str) -> CliResult<MultivalueKey> {
    MultivalueKey::for_field(&TreePath::parse(field))
        .ok_or_else(|| CliError::new(t!("item.field_invalid", field = field)))
}

/// Emits a `multivalue_changed` event for a state-file edit.
fn record_change(
    config: &SchemaFormsConfig,
    state: &MultivalueTable,
    key: &MultivalueKey,
    action: &'static str,
    delta: usize,
    applied: bool,
) -> CliResult<()> {
    let indices = state.get(key).map(|entry| entry.indices.clone()).unwrap_or_default();
    let sink = build_sink(&config.telemetry)?;
    sink.record(&FormEvent::multivalue_changed(
        key.field_path().to_string(),
        action,
        delta,
        applied,
        indices,
    ));
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = SchemaFormsConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads config, falling back to defaults when none is present.
fn load_config(path: Option<&Path>) -> CliResult<SchemaFormsConfig> {
    SchemaFormsConfig::load_or_default(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Maps the configured draft onto the validator's draft.
const fn draft_for(draft: ValidationDraft) -> Draft {
    match draft {
        ValidationDraft::Draft4 => Draft::Draft4,
        ValidationDraft::Draft6 => Draft::Draft6,
        ValidationDraft::Draft7 => Draft::Draft7,
        ValidationDraft::Draft201909 => Draft::Draft201909,
        ValidationDraft::Draft202012 => Draft::Draft202012,
    }
}

/// Builds the configured event sink.
fn build_sink(config: &TelemetryConfig) -> CliResult<Arc<dyn FormEventSink>> {
    match (config.sink, config.path.as_deref()) {
        (TelemetrySink::File, Some(path)) => FileEventSink::new(path)
            .map(|sink| Arc::new(sink) as Arc<dyn FormEventSink>)
            .map_err(|err| {
                CliError::new(t!("telemetry.open_failed", path = path.display(), error = err))
            }),
        (TelemetrySink::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        _ => Ok(Arc::new(NoopEventSink)),
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let read_limit = limit.saturating_add(1);
    let mut limited = file.take(read_limit);
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and parses a JSON input file.
fn read_json(path: &Path, max_bytes: usize, kind: &str) -> CliResult<Value> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Loads a multivalue state file; a missing file yields empty state.
fn load_state(path: &Path, max_bytes: usize) -> CliResult<MultivalueTable> {
    if !path.exists() {
        return Ok(MultivalueTable::new());
    }
    let kind = t!("input.kind.state");
    let value = read_json(path, max_bytes, &kind)?;
    serde_json::from_value(value).map_err(|err| {
        CliError::new(t!("input.parse_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Writes a multivalue state file.
fn save_state(path: &Path, state: &MultivalueTable) -> CliResult<()> {
    let mut bytes = serde_json::to_vec_pretty(state)
        .map_err(|err| CliError::new(t!("state.serialize_failed", error = err)))?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|err| {
        CliError::new(t!("state.write_failed", path = path.display(), error = err))
    })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
