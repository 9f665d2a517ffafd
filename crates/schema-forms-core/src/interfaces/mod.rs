// crates/schema-forms-core/src/interfaces/mod.rs
// ============================================================================
// Module: Schema Forms Interfaces
// Description: Contracts for collaborators the core does not implement.
// Purpose: Define the black-box schema validator consumed by submissions.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The core never checks JSON Schema constraints itself. A
//! [`SchemaValidator`] accepts a document and the raw dereferenced schema and
//! reports structured failures keyed by JSON Pointer. Implementations must be
//! deterministic for identical inputs.
//!
//! The same collaborator checks a schema against its draft's meta-schema
//! before a form is compiled from it, so malformed keywords are rejected up
//! front instead of surfacing at submit time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// One structured validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Human-readable validator message.
    pub message: String,
    /// Name of the violated constraint, such as `required` or `type`.
    pub constraint: String,
    /// JSON Pointer of the offending value, `""` for the document root.
    pub pointer: String,
}

impl ValidationFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        constraint: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            constraint: constraint.into(),
            pointer: pointer.into(),
        }
    }
}

/// Validator collaborator errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The schema could not be compiled by the validator.
    #[error("validator rejected schema: {0}")]
    Schema(String),
    /// The validator failed for a reason unrelated to the document.
    #[error("validator error: {0}")]
    Internal(String),
}

/// Black-box JSON Schema constraint checker.
pub trait SchemaValidator {
    /// Checks that `schema` is itself a well-formed schema for the
    /// validator's draft.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::Schema`] when the schema is rejected.
    fn check_schema(&self, schema: &Value) -> Result<(), ValidatorError>;

    /// Validates `document` against `schema`.
    ///
    /// An empty vector means the document is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when validation cannot be performed at all.
    fn validate(
        &self,
        document: &Value,
        schema: &Value,
    ) -> Result<Vec<ValidationFailure>, ValidatorError>;
}

impl<T: SchemaValidator + ?Sized> SchemaValidator for &T {
    fn check_schema(&self, schema: &Value) -> Result<(), ValidatorError> {
        (**self).check_schema(schema)
    }

    fn validate(
        &self,
        document: &Value,
        schema: &Value,
    ) -> Result<Vec<ValidationFailure>, ValidatorError> {
        (**self).validate(document, schema)
    }
}
