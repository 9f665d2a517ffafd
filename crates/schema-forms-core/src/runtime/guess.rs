// crates/schema-forms-core/src/runtime/guess.rs
// ============================================================================
// Module: Type Guesser
// Description: Picks the single concrete type a schema node is rendered as.
// Purpose: Resolve `ui:widget` overrides and multi-type schema declarations.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A `ui:widget` hint always wins. Without one the first declared type that
//! is not `null` is used, so `["string", "null"]` resolves to `string`. A node
//! with no usable type resolves to [`ResolvedType::Unresolved`]; that is left
//! for validation to report rather than failing the compile.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::JsonType;
use crate::core::SchemaNode;
use crate::core::UiHint;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of type guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// A JSON Schema type drives the widget.
    Json(JsonType),
    /// An opaque widget name from `ui:widget`.
    Widget(String),
    /// No usable type was declared.
    Unresolved,
}

// ============================================================================
// SECTION: Guessing
// ============================================================================

/// Resolves the widget type for a schema node.
///
/// A `ui:widget` value that names a JSON type is treated as that type so
/// hints such as `"ui:widget": "string"` keep the type-driven behavior.
#[must_use]
pub fn guess_type(node: &SchemaNode, hint: &UiHint) -> ResolvedType {
    if let Some(widget) = &hint.widget {
        return JsonType::parse(widget)
            .map_or_else(|| ResolvedType::Widget(widget.clone()), ResolvedType::Json);
    }
    node.types.primary().map_or(ResolvedType::Unresolved, ResolvedType::Json)
}
