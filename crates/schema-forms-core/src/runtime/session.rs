// crates/schema-forms-core/src/runtime/session.rs
// ============================================================================
// Module: Form Session
// Description: Reference owner of multivalue state across edit cycles.
// Purpose: Tie compile, add/remove, and submit together for one form instance.
// Dependencies: serde_json, thiserror, crate::{core, interfaces, runtime, telemetry}
// ============================================================================

//! ## Overview
//! A [`FormSession`] holds everything that outlives a single compile: the
//! normalized schema, UI hints, options, the [`MultivalueTable`], and the
//! mount point. Add and remove actions only mutate state and flag a rebuild;
//! the caller decides when to call [`FormSession::build`] again.
//!
//! The session is the only component that emits [`FormEvent`]s.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::core::SchemaDocument;
use crate::core::TreePath;
use crate::core::UiHint;
use crate::core::WidgetNode;
use crate::interfaces::SchemaValidator;
use crate::interfaces::ValidatorError;
use crate::runtime::compiler::CompileError;
use crate::runtime::compiler::CompileOptions;
use crate::runtime::compiler::CompileRequest;
use crate::runtime::compiler::compile_form;
use crate::runtime::multivalue::MultivalueKey;
use crate::runtime::multivalue::MultivalueTable;
use crate::runtime::submission::SubmissionError;
use crate::runtime::submission::SubmissionOutcome;
use crate::runtime::submission::process_submission;
use crate::telemetry::FormEvent;
use crate::telemetry::FormEventSink;
use crate::telemetry::NoopEventSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session operation failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The form could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The submission could not be validated.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// The schema failed the validator's meta-schema check.
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// One form instance across edit and submit cycles.
pub struct FormSession {
    /// Normalized schema.
    document: SchemaDocument,
    /// UI hints.
    ui: UiHint,
    /// Compile tunables.
    options: CompileOptions,
    /// Multivalue state owned by this session.
    state: MultivalueTable,
    /// Mount point of the form.
    root: TreePath,
    /// Event destination.
    sink: Arc<dyn FormEventSink>,
}

impl FormSession {
    /// Creates a session with empty state, mounted at the root path.
    #[must_use]
    pub fn new(document: SchemaDocument, ui: UiHint, options: CompileOptions) -> Self {
        Self {
            document,
            ui,
            options,
            state: MultivalueTable::new(),
            root: TreePath::root(),
            sink: Arc::new(NoopEventSink),
        }
    }

    /// Replaces the multivalue state, e.g. with state restored from storage.
    #[must_use]
    pub fn with_state(mut self, state: MultivalueTable) -> Self {
        self.state = state;
        self
    }

    /// Mounts the form at `root`.
    #[must_use]
    pub fn with_root(mut self, root: TreePath) -> Self {
        self.root = root;
        self
    }

    /// Routes events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn FormEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Checks the session's raw schema with `validator` before any compile.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validator`] when the schema is rejected.
    pub fn check_schema<V>(&self, validator: &V) -> Result<(), SessionError>
    where
        V: SchemaValidator + ?Sized,
    {
        validator.check_schema(self.document.raw())?;
        Ok(())
    }

    /// Compiles the form and clears the rebuild flag.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when the form cannot be compiled; state is
    /// left unchanged in that case.
    pub fn build(&mut self, current_input: Option<&Value>) -> Result<WidgetNode, CompileError> {
        let request = CompileRequest {
            schema: &self.document,
            ui: &self.ui,
            current_input,
            root: &self.root,
        };
        let compiled = compile_form(&request, &self.options, self.state.clone())?;
        self.state = compiled.state;
        self.state.take_rebuild();
        self.sink.record(&FormEvent::compiled(compiled.tree.field_count(), self.state.len()));
        Ok(compiled.tree)
    }

    /// Appends an item to a repeatable field and returns its index.
    ///
    /// Returns `None` when the field has no index left to hand out.
    pub fn add_item(&mut self, key: &MultivalueKey) -> Option<usize> {
        let index = self.state.add_one(key)?;
        self.record_change(key, "add", index, true);
        Some(index)
    }

    /// Removes item `delta` of a repeatable field.
    ///
    /// Returns false when the index was not live; the rebuild flag is set
    /// either way.
    pub fn remove_item(&mut self, key: &MultivalueKey, delta: usize) -> bool {
        let removed = self.state.remove_one(key, delta);
        self.record_change(key, "remove", delta, removed);
        removed
    }

    /// Returns true when an add or remove happened since the last build.
    #[must_use]
    pub const fn needs_rebuild(&self) -> bool {
        self.state.needs_rebuild()
    }

    /// Compiles the form against `raw` and validates the submission.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when compiling or validating cannot run.
    /// Validation failures are reported in the outcome, not as errors.
    pub fn submit<V>(&mut self, raw: Value, validator: &V) -> Result<SubmissionOutcome, SessionError>
    where
        V: SchemaValidator + ?Sized,
    {
        let tree = self.build(Some(&raw))?;
        let outcome = process_submission(tree, &self.document, raw, validator, &self.root)?;
        self.sink.record(&FormEvent::submission_validated(
            outcome.error_count,
            outcome.field_errors.len(),
            outcome.generic_errors.len(),
        ));
        Ok(outcome)
    }

    /// Returns the normalized schema.
    #[must_use]
    pub const fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// Returns the mount point.
    #[must_use]
    pub const fn root(&self) -> &TreePath {
        &self.root
    }

    /// Returns the current multivalue state.
    #[must_use]
    pub const fn state(&self) -> &MultivalueTable {
        &self.state
    }

    /// Consumes the session, returning its multivalue state.
    #[must_use]
    pub fn into_state(self) -> MultivalueTable {
        self.state
    }

    /// Emits a `multivalue_changed` event.
    fn record_change(&self, key: &MultivalueKey, action: &'static str, delta: usize, applied: bool) {
        let indices = self.state.get(key).map(|state| state.indices.clone()).unwrap_or_default();
        self.sink.record(&FormEvent::multivalue_changed(
            key.field_path().to_string(),
            action,
            delta,
            applied,
            indices,
        ));
    }
}
