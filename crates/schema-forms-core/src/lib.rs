// crates/schema-forms-core/src/lib.rs
// ============================================================================
// Module: Schema Forms Core Library
// Description: Public API surface for the schema-driven form compiler.
// Purpose: Expose core types, collaborator interfaces, runtime, and events.
// Dependencies: crate::{core, interfaces, runtime, telemetry}
// ============================================================================

//! ## Overview
//! Schema Forms compiles a dereferenced JSON Schema into an editable widget
//! tree, tracks repeatable-field state across edit cycles, and validates
//! submissions back against the schema with each failure attached to the
//! widget that produced it. Rendering, transport, and constraint checking
//! stay with external collaborators.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::SchemaValidator;
pub use interfaces::ValidationFailure;
pub use interfaces::ValidatorError;
pub use runtime::CompileError;
pub use runtime::CompileOptions;
pub use runtime::CompileRequest;
pub use runtime::CompiledForm;
pub use runtime::ErrorAttachment;
pub use runtime::FormSession;
pub use runtime::MultivalueKey;
pub use runtime::MultivalueState;
pub use runtime::MultivalueTable;
pub use runtime::PointerMap;
pub use runtime::ResolvedType;
pub use runtime::RoutedErrors;
pub use runtime::SessionError;
pub use runtime::SubmissionError;
pub use runtime::SubmissionOutcome;
pub use runtime::cast;
pub use runtime::clean;
pub use runtime::compile_form;
pub use runtime::guess_type;
pub use runtime::humanize;
pub use runtime::process_submission;
pub use telemetry::FileEventSink;
pub use telemetry::FormEvent;
pub use telemetry::FormEventSink;
pub use telemetry::MemoryEventSink;
pub use telemetry::NoopEventSink;
pub use telemetry::StderrEventSink;
