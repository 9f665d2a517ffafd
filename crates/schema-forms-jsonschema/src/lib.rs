// crates/schema-forms-jsonschema/src/lib.rs
// ============================================================================
// Module: Schema Forms JSON Schema Validator
// Description: jsonschema-backed implementation of the validator interface.
// Purpose: Produce pointer-addressed failures for the error router.
// Dependencies: jsonschema, schema-forms-core, serde_json
// ============================================================================

//! ## Overview
//! [`JsonSchemaValidator`] compiles the raw schema for a fixed draft and
//! reports every failure as a [`ValidationFailure`]: the message, the name of
//! the violated keyword, and a JSON Pointer to the offending value.
//!
//! [`SchemaValidator::check_schema`] compiles the schema alone, which runs
//! the draft's meta-schema check, so a malformed keyword such as a string
//! `minLength` is rejected before a form is built from it.
//!
//! `required` failures are reported against the missing property rather than
//! the object that lacks it, so they route to the field the user left empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

pub use jsonschema::Draft;
use jsonschema::ValidationError;
use jsonschema::error::ValidationErrorKind;
use schema_forms_core::SchemaValidator;
use schema_forms_core::ValidationFailure;
use schema_forms_core::ValidatorError;
use schema_forms_core::escape_pointer_segment;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Constraint name used when the schema path is empty.
const ROOT_CONSTRAINT: &str = "schema";

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validator collaborator backed by `jsonschema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonSchemaValidator {
    /// Draft used to interpret schemas.
    draft: Draft,
}

impl JsonSchemaValidator {
    /// Creates a validator for `draft`.
    #[must_use]
    pub const fn new(draft: Draft) -> Self {
        Self {
            draft,
        }
    }

    /// Returns the configured draft.
    #[must_use]
    pub const fn draft(&self) -> Draft {
        self.draft
    }

    /// Compiles `schema` for the configured draft; building runs the
    /// meta-schema check first.
    fn compile(&self, schema: &Value) -> Result<jsonschema::Validator, ValidatorError> {
        jsonschema::options()
            .with_draft(self.draft)
            .build(schema)
            .map_err(|err| ValidatorError::Schema(err.to_string()))
    }
}

impl Default for JsonSchemaValidator {
    fn default() -> Self {
        Self::new(Draft::Draft4)
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn check_schema(&self, schema: &Value) -> Result<(), ValidatorError> {
        self.compile(schema).map(|_| ())
    }

    fn validate(
        &self,
        document: &Value,
        schema: &Value,
    ) -> Result<Vec<ValidationFailure>, ValidatorError> {
        let compiled = self.compile(schema)?;
        Ok(compiled.iter_errors(document).map(|err| failure_from_error(&err)).collect())
    }
}

// ============================================================================
// SECTION: Conversion
// ============================================================================

/// Converts one `jsonschema` error into a routed failure record.
#[must_use]
pub fn failure_from_error(err: &ValidationError<'_>) -> ValidationFailure {
    let mut pointer = err.instance_path.to_string();
    if let ValidationErrorKind::Required {
        property,
    } = &err.kind
    {
        let name = property.as_str().map_or_else(|| property.to_string(), str::to_string);
        pointer.push('/');
        pointer.push_str(&escape_pointer_segment(&name));
    }
    let schema_path = err.schema_path.to_string();
    let constraint = schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(ROOT_CONSTRAINT)
        .to_string();
    ValidationFailure::new(err.to_string(), constraint, pointer)
}
