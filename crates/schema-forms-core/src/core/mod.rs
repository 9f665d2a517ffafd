// crates/schema-forms-core/src/core/mod.rs
// ============================================================================
// Module: Schema Forms Core Types
// Description: Schema, UI hint, path, and widget tree models.
// Purpose: Provide the typed data model shared by every runtime component.
// Dependencies: indexmap, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe the inputs (normalized schema and UI hints), the
//! join key between schema space and widget space ([`TreePath`]), and the
//! compiled output ([`WidgetNode`]).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod path;
pub mod schema;
pub mod ui;
pub mod widget;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use path::ADD_MORE_KEY;
pub use path::ControlKind;
pub use path::PathSegment;
pub use path::REMOVE_CONTROL_KEY;
pub use path::TreePath;
pub use path::WRAPPER_KEY;
pub use path::escape_pointer_segment;
pub use path::join_pointer;
pub use path::unescape_pointer_segment;
pub use schema::DEFAULT_MAX_DEPTH;
pub use schema::JsonType;
pub use schema::ObjectSchema;
pub use schema::SchemaDocument;
pub use schema::SchemaError;
pub use schema::SchemaKind;
pub use schema::SchemaNode;
pub use schema::TypeSet;
pub use ui::UiHint;
pub use ui::option_key;
pub use widget::Cardinality;
pub use widget::WidgetKind;
pub use widget::WidgetNode;
