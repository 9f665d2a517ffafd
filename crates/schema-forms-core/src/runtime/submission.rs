// crates/schema-forms-core/src/runtime/submission.rs
// ============================================================================
// Module: Submission Pipeline
// Description: Clean, cast, validate, and route one raw form submission.
// Purpose: Turn widget input into a typed document plus per-widget errors.
// Dependencies: serde, serde_json, thiserror, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`process_submission`] runs the round trip back from widget space:
//! raw input is cleaned and cast against the schema, handed to the validator
//! collaborator, and every failure is routed to a widget through a fresh
//! [`PointerMap`]. Failures with no widget become one summary on the root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::SchemaDocument;
use crate::core::TreePath;
use crate::core::WidgetNode;
use crate::interfaces::SchemaValidator;
use crate::interfaces::ValidatorError;
use crate::runtime::caster::cast;
use crate::runtime::cleaner::clean;
use crate::runtime::pointer::PointerMap;
use crate::runtime::router::ErrorAttachment;
use crate::runtime::router::merge_errors;
use crate::runtime::router::route_errors;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Submission pipeline failures.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The validator collaborator could not run.
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// Result of processing one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    /// Cleaned and cast document that was validated.
    pub document: Value,
    /// Widget tree with errors attached.
    pub tree: WidgetNode,
    /// Field-level errors.
    pub field_errors: Vec<ErrorAttachment>,
    /// Failures that matched no widget.
    pub generic_errors: Vec<String>,
    /// Tree-level summary of the generic failures.
    pub summary: Option<String>,
    /// Total number of validator failures.
    pub error_count: usize,
}

impl SubmissionOutcome {
    /// Returns true when the validator reported no failures.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error_count == 0
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Prepares a raw submission for validation: clean, then cast.
#[must_use]
pub fn prepare_document(document: &SchemaDocument, raw: Value) -> Value {
    cast(clean(raw), document.root())
}

/// Processes a raw submission against the tree it was entered in.
///
/// # Errors
///
/// Returns [`SubmissionError`] when the validator cannot run.
pub fn process_submission<V>(
    tree: WidgetNode,
    document: &SchemaDocument,
    raw: Value,
    validator: &V,
    root: &TreePath,
) -> Result<SubmissionOutcome, SubmissionError>
where
    V: SchemaValidator + ?Sized,
{
    let prepared = prepare_document(document, raw);
    let failures = validator.validate(&prepared, document.raw())?;
    let pointers = PointerMap::build(&tree, root);
    let routed = route_errors(&failures, &pointers, &tree);
    let summary = routed.summary();
    let tree = merge_errors(tree, &routed);
    Ok(SubmissionOutcome {
        document: prepared,
        tree,
        field_errors: routed.attachments,
        generic_errors: routed.generic,
        summary,
        error_count: failures.len(),
    })
}
