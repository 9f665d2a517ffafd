// crates/schema-forms-core/src/runtime/mod.rs
// ============================================================================
// Module: Schema Forms Runtime
// Description: Compiler, state tracker, submission pipeline, and session.
// Purpose: Implement the schema-to-widget round trip over the core types.
// Dependencies: crate::{core, interfaces, telemetry}
// ============================================================================

//! ## Overview
//! Leaves first: type guessing and label humanizing feed the widget tree
//! compiler together with the multivalue state tracker. On submission the
//! cleaner and caster prepare the document, the validator collaborator checks
//! it, and the pointer mapper and error router attach failures to widgets.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod caster;
pub mod cleaner;
pub mod compiler;
pub mod guess;
pub mod humanize;
pub mod multivalue;
pub mod pointer;
pub mod router;
pub mod session;
pub mod submission;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use caster::cast;
pub use cleaner::clean;
pub use compiler::CompileError;
pub use compiler::CompileOptions;
pub use compiler::CompileRequest;
pub use compiler::CompiledForm;
pub use compiler::Compiler;
pub use compiler::DEFAULT_ADD_MORE_LABEL;
pub use compiler::DEFAULT_ITEM_TITLE_FORMAT;
pub use compiler::DEFAULT_REMOVE_LABEL;
pub use compiler::compile_form;
pub use guess::ResolvedType;
pub use guess::guess_type;
pub use humanize::humanize;
pub use multivalue::MultivalueKey;
pub use multivalue::MultivalueState;
pub use multivalue::MultivalueTable;
pub use pointer::PointerMap;
pub use router::ErrorAttachment;
pub use router::RoutedErrors;
pub use router::SUMMARY_PREFIX;
pub use router::merge_errors;
pub use router::route_errors;
pub use session::FormSession;
pub use session::SessionError;
pub use submission::SubmissionError;
pub use submission::SubmissionOutcome;
pub use submission::prepare_document;
pub use submission::process_submission;
