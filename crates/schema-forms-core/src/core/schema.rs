// crates/schema-forms-core/src/core/schema.rs
// ============================================================================
// Module: Schema Normalization
// Description: Closed schema model parsed once from a dereferenced JSON Schema.
// Purpose: Give the compiler and caster an exhaustively matchable schema tree.
// Dependencies: indexmap, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`SchemaDocument::from_value`] walks a dereferenced JSON Schema exactly once
//! and produces a tree of [`SchemaNode`] values whose shape is a closed
//! [`SchemaKind`] union. Downstream code never probes optional keys on raw
//! JSON; it matches on the kind instead.
//!
//! Only the `type`, `properties`, `items`, `enum`, `const`, `required`,
//! `format`, `title`, `description` and `default` keywords are interpreted.
//! Every other keyword is preserved in the raw document for the validator
//! collaborator and otherwise ignored.
//!
//! ## Invariants
//! - An `array` node always carries an items schema.
//! - An `object` node always carries at least one property.
//! - The document root normalizes to [`SchemaKind::Object`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::path::PathSegment;
use crate::core::path::TreePath;
use crate::core::path::escape_pointer_segment;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum nesting depth accepted by the normalizer and compiler.
pub const DEFAULT_MAX_DEPTH: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while normalizing a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A keyword carries a value of the wrong JSON shape.
    #[error("invalid schema: {0}")]
    Invalid(String),
    /// The schema shape is valid JSON Schema but cannot be compiled.
    #[error("unsupported schema at '{pointer}': {reason}")]
    Unsupported {
        /// JSON Pointer of the offending schema node.
        pointer: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Nesting exceeds the configured maximum depth.
    #[error("schema nesting exceeds maximum depth {max_depth} at '{pointer}'")]
    DepthExceeded {
        /// JSON Pointer of the node past the limit.
        pointer: String,
        /// Configured maximum depth.
        max_depth: usize,
    },
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// JSON Schema primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonType {
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `string`
    String,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl JsonType {
    /// Parses a JSON Schema type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Returns the JSON Schema name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type names of a schema node, in declaration order.
///
/// # Invariants
/// - Entries are unique; the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSet(Vec<JsonType>);

impl TypeSet {
    /// Builds a type set, dropping duplicate entries.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = JsonType>) -> Self {
        let mut ordered = Vec::new();
        for ty in types {
            if !ordered.contains(&ty) {
                ordered.push(ty);
            }
        }
        Self(ordered)
    }

    /// Returns true when `ty` is declared.
    #[must_use]
    pub fn contains(&self, ty: JsonType) -> bool {
        self.0.contains(&ty)
    }

    /// Returns the first declared type that is not `null`.
    #[must_use]
    pub fn primary(&self) -> Option<JsonType> {
        self.0.iter().copied().find(|ty| *ty != JsonType::Null)
    }

    /// Returns true when no type is declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the declared types in order.
    pub fn iter(&self) -> impl Iterator<Item = JsonType> + '_ {
        self.0.iter().copied()
    }

    /// Returns true when either numeric type is declared.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.contains(JsonType::Integer) || self.contains(JsonType::Number)
    }
}

/// Closed union of the schema shapes the compiler understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SchemaKind {
    /// Read-only constant value.
    Const(Value),
    /// Fixed set of allowed values, in declaration order.
    Enum(Vec<Value>),
    /// Sequence of items sharing one schema.
    Array(Box<SchemaNode>),
    /// Mapping of named properties.
    Object(ObjectSchema),
    /// Any other leaf.
    Scalar,
}

/// Properties of an object schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties.
    pub required: BTreeSet<String>,
    /// Optional item schema, used only as a casting fallback.
    pub items: Option<Box<SchemaNode>>,
}

/// One normalized schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Declared types, in order.
    pub types: TypeSet,
    /// Schema `title`.
    pub title: Option<String>,
    /// Schema `description`.
    pub description: Option<String>,
    /// Schema `default`.
    pub default: Option<Value>,
    /// Schema `format`.
    pub format: Option<String>,
    /// Normalized shape.
    pub kind: SchemaKind,
}

impl SchemaNode {
    /// Returns an untyped scalar leaf used where a schema is absent.
    #[must_use]
    pub fn implicit_null() -> Self {
        Self {
            types: TypeSet::new([JsonType::Null]),
            title: None,
            description: None,
            default: None,
            format: None,
            kind: SchemaKind::Scalar,
        }
    }

    /// Returns the object properties when this node is an object.
    #[must_use]
    pub const fn object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the item schema when this node is an array.
    #[must_use]
    pub fn items(&self) -> Option<&Self> {
        match &self.kind {
            SchemaKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the allowed values when this node is an enum.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[Value]> {
        match &self.kind {
            SchemaKind::Enum(values) => Some(values),
            _ => None,
        }
    }

    /// Returns true when the node declares `format: "email"`.
    #[must_use]
    pub fn is_email(&self) -> bool {
        self.format.as_deref() == Some("email")
    }
}

// ============================================================================
// SECTION: Schema Document
// ============================================================================

/// Parsed schema paired with the raw JSON it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Raw dereferenced schema, handed to the validator collaborator.
    raw: Value,
    /// Normalized root node.
    root: SchemaNode,
}

impl SchemaDocument {
    /// Normalizes a schema using [`DEFAULT_MAX_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema is malformed, unsupported, or
    /// nested too deeply.
    pub fn from_value(raw: Value) -> Result<Self, SchemaError> {
        Self::with_max_depth(raw, DEFAULT_MAX_DEPTH)
    }

    /// Normalizes a schema with an explicit nesting limit.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema is malformed, unsupported, or
    /// nested deeper than `max_depth`.
    pub fn with_max_depth(raw: Value, max_depth: usize) -> Result<Self, SchemaError> {
        let root = Normalizer {
            max_depth,
        }
        .node(&raw, "", 0)?;
        if !matches!(root.kind, SchemaKind::Object(_)) {
            return Err(SchemaError::Unsupported {
                pointer: String::new(),
                reason: "root schema must be an object with properties".to_string(),
            });
        }
        Ok(Self {
            raw,
            root,
        })
    }

    /// Returns the raw schema JSON.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the normalized root node.
    #[must_use]
    pub const fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Resolves a schema-space path of property names and indices.
    ///
    /// Index segments step into array items; synthetic segments are skipped.
    #[must_use]
    pub fn node_at(&self, path: &TreePath) -> Option<&SchemaNode> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = match segment {
                PathSegment::Property(name) => node.object()?.properties.get(name)?,
                PathSegment::Index(_) => node.items()?,
                PathSegment::Wrapper | PathSegment::Control(_) => node,
            };
        }
        Some(node)
    }
}

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Recursive single-pass schema normalizer.
struct Normalizer {
    /// Maximum nesting depth.
    max_depth: usize,
}

impl Normalizer {
    /// Normalizes the node at `pointer`.
    fn node(&self, value: &Value, pointer: &str, depth: usize) -> Result<SchemaNode, SchemaError> {
        if depth > self.max_depth {
            return Err(SchemaError::DepthExceeded {
                pointer: pointer.to_string(),
                max_depth: self.max_depth,
            });
        }
        let Value::Object(map) = value else {
            return Err(SchemaError::Invalid(format!("schema node at '{pointer}' must be an object")));
        };

        let types = parse_types(map.get("type"), pointer)?;
        let kind = self.kind(map, &types, pointer, depth)?;
        Ok(SchemaNode {
            types,
            title: string_keyword(map, "title"),
            description: string_keyword(map, "description"),
            default: map.get("default").cloned(),
            format: string_keyword(map, "format"),
            kind,
        })
    }

    /// Selects the node kind: const, then enum, then the first structural type.
    fn kind(
        &self,
        map: &Map<String, Value>,
        types: &TypeSet,
        pointer: &str,
        depth: usize,
    ) -> Result<SchemaKind, SchemaError> {
        if let Some(value) = map.get("const") {
            return Ok(SchemaKind::Const(value.clone()));
        }
        match map.get("enum") {
            Some(Value::Array(values)) if !values.is_empty() => {
                return Ok(SchemaKind::Enum(values.clone()));
            }
            Some(Value::Array(_)) | None => {}
            Some(_) => {
                return Err(SchemaError::Invalid(format!("'enum' at '{pointer}' must be an array")));
            }
        }
        let structural = types.iter().find(|ty| matches!(ty, JsonType::Array | JsonType::Object));
        match structural {
            Some(JsonType::Array) => {
                let items = self.items(map, pointer, depth)?.ok_or_else(|| SchemaError::Unsupported {
                    pointer: pointer.to_string(),
                    reason: "array schema declares no items".to_string(),
                })?;
                Ok(SchemaKind::Array(Box::new(items)))
            }
            Some(_) => Ok(SchemaKind::Object(self.object(map, pointer, depth)?)),
            None => Ok(SchemaKind::Scalar),
        }
    }

    /// Normalizes the `items` keyword when present.
    fn items(
        &self,
        map: &Map<String, Value>,
        pointer: &str,
        depth: usize,
    ) -> Result<Option<SchemaNode>, SchemaError> {
        match map.get("items") {
            None => Ok(None),
            Some(items @ Value::Object(_)) => {
                Ok(Some(self.node(items, &format!("{pointer}/items"), depth + 1)?))
            }
            Some(_) => Err(SchemaError::Invalid(format!("'items' at '{pointer}' must be an object"))),
        }
    }

    /// Normalizes `properties`, `required`, and the optional `items` fallback.
    fn object(
        &self,
        map: &Map<String, Value>,
        pointer: &str,
        depth: usize,
    ) -> Result<ObjectSchema, SchemaError> {
        let properties = match map.get("properties") {
            Some(Value::Object(properties)) if !properties.is_empty() => properties,
            Some(Value::Object(_)) | None => {
                return Err(SchemaError::Unsupported {
                    pointer: pointer.to_string(),
                    reason: "object schema declares no properties".to_string(),
                });
            }
            Some(_) => {
                return Err(SchemaError::Invalid(format!(
                    "'properties' at '{pointer}' must be an object"
                )));
            }
        };

        let mut normalized = IndexMap::with_capacity(properties.len());
        for (name, child) in properties {
            let child_pointer = format!("{pointer}/properties/{}", escape_pointer_segment(name));
            normalized.insert(name.clone(), self.node(child, &child_pointer, depth + 1)?);
        }

        Ok(ObjectSchema {
            properties: normalized,
            required: parse_required(map.get("required"), pointer)?,
            items: self.items(map, pointer, depth)?.map(Box::new),
        })
    }
}

/// Parses the `type` keyword into a [`TypeSet`].
fn parse_types(value: Option<&Value>, pointer: &str) -> Result<TypeSet, SchemaError> {
    let parse_name = |name: &Value| -> Result<JsonType, SchemaError> {
        name.as_str().and_then(JsonType::parse).ok_or_else(|| {
            SchemaError::Invalid(format!("unknown type {name} at '{pointer}'"))
        })
    };
    match value {
        None => Ok(TypeSet::default()),
        Some(single @ Value::String(_)) => Ok(TypeSet::new([parse_name(single)?])),
        Some(Value::Array(names)) => {
            let parsed = names.iter().map(parse_name).collect::<Result<Vec<_>, _>>()?;
            Ok(TypeSet::new(parsed))
        }
        Some(_) => Err(SchemaError::Invalid(format!(
            "'type' at '{pointer}' must be a string or an array of strings"
        ))),
    }
}

/// Parses the `required` keyword into a name set.
fn parse_required(value: Option<&Value>, pointer: &str) -> Result<BTreeSet<String>, SchemaError> {
    let Some(value) = value else {
        return Ok(BTreeSet::new());
    };
    let Value::Array(names) = value else {
        return Err(SchemaError::Invalid(format!("'required' at '{pointer}' must be an array")));
    };
    names
        .iter()
        .map(|name| {
            name.as_str().map(str::to_string).ok_or_else(|| {
                SchemaError::Invalid(format!("'required' at '{pointer}' must list strings"))
            })
        })
        .collect()
}

/// Reads an annotation keyword, ignoring non-string values.
fn string_keyword(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
