// crates/schema-forms-core/src/runtime/compiler.rs
// ============================================================================
// Module: Widget Tree Compiler
// Description: Recursive schema + UI hint + current value to widget tree pass.
// Purpose: Produce the renderer-agnostic form tree for one compile cycle.
// Dependencies: indexmap, serde_json, thiserror, crate::{core, runtime}
// ============================================================================

//! ## Overview
//! [`compile_form`] turns a normalized schema into a [`WidgetNode`] tree. It
//! is pure given its inputs plus the [`MultivalueTable`] handed in: identical
//! inputs and identical state always yield an identical tree. The only state
//! change it makes is lazily creating entries for repeatable fields seen for
//! the first time, and the updated table is returned to the caller.
//!
//! Per node the compiler:
//! 1. scaffolds title, description, placeholder and default value,
//! 2. short-circuits `const` nodes into read-only markup,
//! 3. resolves the widget type and specializes email strings,
//! 4. builds enum options,
//! 5. expands arrays into checkbox sets or repeatable items,
//! 6. recurses into object properties,
//! 7. applies the enabled and visible flags.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::core::ADD_MORE_KEY;
use crate::core::Cardinality;
use crate::core::ControlKind;
use crate::core::DEFAULT_MAX_DEPTH;
use crate::core::JsonType;
use crate::core::PathSegment;
use crate::core::REMOVE_CONTROL_KEY;
use crate::core::SchemaDocument;
use crate::core::SchemaError;
use crate::core::SchemaKind;
use crate::core::SchemaNode;
use crate::core::TreePath;
use crate::core::UiHint;
use crate::core::WRAPPER_KEY;
use crate::core::WidgetKind;
use crate::core::WidgetNode;
use crate::core::option_key;
use crate::runtime::guess::ResolvedType;
use crate::runtime::guess::guess_type;
use crate::runtime::humanize::humanize;
use crate::runtime::multivalue::MultivalueKey;
use crate::runtime::multivalue::MultivalueTable;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default label of the append control.
pub const DEFAULT_ADD_MORE_LABEL: &str = "Append an item";
/// Default label of the remove control.
pub const DEFAULT_REMOVE_LABEL: &str = "Remove item";
/// Default title format of repeat items.
pub const DEFAULT_ITEM_TITLE_FORMAT: &str = "{title} (value {number})";

/// Tunables of a compile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Maximum nesting depth below the root.
    pub max_depth: usize,
    /// Title of the append control.
    pub add_more_label: String,
    /// Title of the remove control.
    pub remove_label: String,
    /// Title of repeat items; `{title}` is the field title and `{number}` the
    /// one-based item index.
    pub item_title_format: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            add_more_label: DEFAULT_ADD_MORE_LABEL.to_string(),
            remove_label: DEFAULT_REMOVE_LABEL.to_string(),
            item_title_format: DEFAULT_ITEM_TITLE_FORMAT.to_string(),
        }
    }
}

impl CompileOptions {
    /// Renders the title of the repeat item with live index `index`.
    #[must_use]
    pub fn item_title(&self, title: &str, index: usize) -> String {
        self.item_title_format
            .replace("{title}", title)
            .replace("{number}", &(index + 1).to_string())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Hard compile failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The schema failed normalization.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The schema and hints ask for a shape the compiler cannot build.
    #[error("unsupported field at '{path}': {reason}")]
    Unsupported {
        /// Widget-tree path of the field.
        path: String,
        /// Human-readable reason.
        reason: String,
    },
    /// The widget tree would exceed the configured depth.
    #[error("form nesting exceeds maximum depth {max_depth} at '{path}'")]
    DepthExceeded {
        /// Widget-tree path of the field past the limit.
        path: String,
        /// Configured maximum depth.
        max_depth: usize,
    },
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Inputs of one compile pass.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Normalized schema.
    pub schema: &'a SchemaDocument,
    /// UI hints mirroring the schema.
    pub ui: &'a UiHint,
    /// Previously entered values, if any.
    pub current_input: Option<&'a Value>,
    /// Widget-tree path the form is mounted at.
    pub root: &'a TreePath,
}

/// Output of one compile pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledForm {
    /// Compiled widget tree.
    pub tree: WidgetNode,
    /// Multivalue state including entries created by this pass.
    pub state: MultivalueTable,
}

/// Compiles a whole form.
///
/// # Errors
///
/// Returns [`CompileError`] when the schema and hints describe a shape that
/// cannot be compiled or the tree is nested too deeply.
pub fn compile_form(
    request: &CompileRequest<'_>,
    options: &CompileOptions,
    mut state: MultivalueTable,
) -> Result<CompiledForm, CompileError> {
    let name = request.root.last().map(PathSegment::key).unwrap_or_default();
    let tree = Compiler::new(options, &mut state, request.root.clone()).compile(
        request.schema.root(),
        &name,
        request.root.clone(),
        request.ui,
        request.current_input,
    )?;
    Ok(CompiledForm {
        tree,
        state,
    })
}

// ============================================================================
// SECTION: Compiler
// ============================================================================

/// Recursive compiler bound to one options set and state table.
pub struct Compiler<'a> {
    /// Compile tunables.
    options: &'a CompileOptions,
    /// Externally owned multivalue state.
    state: &'a mut MultivalueTable,
    /// Mount point; stripped from schema-relative paths.
    root: TreePath,
}

impl<'a> Compiler<'a> {
    /// Creates a compiler for a form mounted at `root`.
    #[must_use]
    pub const fn new(
        options: &'a CompileOptions,
        state: &'a mut MultivalueTable,
        root: TreePath,
    ) -> Self {
        Self {
            options,
            state,
            root,
        }
    }

    /// Compiles one schema node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] for unsupported shapes and excessive depth.
    pub fn compile(
        &mut self,
        schema: &SchemaNode,
        name: &str,
        path: TreePath,
        hint: &UiHint,
        current: Option<&Value>,
    ) -> Result<WidgetNode, CompileError> {
        let depth = path.strip_prefix(&self.root).map_or(0, |rest| {
            rest.iter().filter(|segment| !segment.is_synthetic()).count()
        });
        if depth > self.options.max_depth {
            return Err(CompileError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.options.max_depth,
            });
        }

        let mut node = self.scaffold(schema, name, path, hint, current);
        if let SchemaKind::Const(value) = &schema.kind {
            node.kind = WidgetKind::Markup;
            node.markup = Some(markup_text(value));
            node.default_value = None;
            node.placeholder = None;
            return Ok(node);
        }

        let resolved = guess_type(schema, hint);
        node.kind = match &resolved {
            ResolvedType::Json(ty) => kind_for(*ty, schema),
            ResolvedType::Widget(widget) => WidgetKind::Custom(widget.clone()),
            ResolvedType::Unresolved => WidgetKind::Unresolved,
        };

        if let Some(values) = schema.enum_values() {
            node.options = build_options(values, hint);
            if !matches!(node.kind, WidgetKind::Custom(_)) {
                node.kind = WidgetKind::Radios;
            }
        } else {
            match resolved {
                ResolvedType::Json(JsonType::Array) => {
                    self.compile_array(&mut node, schema, hint, current)?;
                }
                ResolvedType::Json(JsonType::Object) => {
                    self.compile_object(&mut node, schema, hint, current)?;
                }
                ResolvedType::Widget(_) => {
                    if let Some(values) = schema.items().and_then(SchemaNode::enum_values) {
                        node.options = build_options(values, hint);
                    }
                }
                ResolvedType::Json(_) | ResolvedType::Unresolved => {}
            }
        }

        node.enabled = hint.is_enabled();
        node.visible = hint.is_visible();
        Ok(node)
    }

    /// Fills the attributes shared by every widget.
    fn scaffold(
        &self,
        schema: &SchemaNode,
        name: &str,
        path: TreePath,
        hint: &UiHint,
        current: Option<&Value>,
    ) -> WidgetNode {
        let title = hint
            .title
            .clone()
            .or_else(|| schema.title.clone())
            .unwrap_or_else(|| humanize(name));
        let mut node = WidgetNode::new(name, path, WidgetKind::Unresolved, title);
        node.prop_path = self.schema_path(&node.path);
        node.description = hint
            .help
            .clone()
            .or_else(|| schema.description.clone())
            .filter(|text| !text.is_empty());
        node.placeholder = hint.placeholder.clone();
        node.default_value = current
            .filter(|value| !value.is_null())
            .cloned()
            .or_else(|| schema.default.clone());
        node
    }

    /// Expands an array field into a checkbox set or repeatable items.
    fn compile_array(
        &mut self,
        node: &mut WidgetNode,
        schema: &SchemaNode,
        hint: &UiHint,
        current: Option<&Value>,
    ) -> Result<(), CompileError> {
        let Some(items) = schema.items() else {
            return Err(CompileError::Unsupported {
                path: node.path.to_string(),
                reason: "array widget requires an items schema".to_string(),
            });
        };
        if let Some(values) = items.enum_values() {
            node.kind = WidgetKind::Checkboxes;
            node.options = build_options(values, hint);
            return Ok(());
        }

        let Some(key) = MultivalueKey::for_field(&node.prop_path) else {
            return Err(CompileError::Unsupported {
                path: node.path.to_string(),
                reason: "repeatable field cannot be the form root".to_string(),
            });
        };
        let live = self.state.ensure(key, item_count(current), node.path.clone()).clone();

        node.kind = WidgetKind::Repeatable;
        node.default_value = None;
        let item_hint = hint.item_hint();
        for (ordinal, index) in live.indices.iter().copied().enumerate() {
            let wrapper_path = node.path.index(index);
            let item_current = item_value(current, ordinal, index);
            let mut element = self.compile(
                items,
                &index.to_string(),
                wrapper_path.child(PathSegment::Wrapper),
                &item_hint,
                item_current,
            )?;
            element.required = false;
            element.description = None;
            element.title = self.options.item_title(&node.title, index);

            let mut remove = WidgetNode::new(
                REMOVE_CONTROL_KEY,
                wrapper_path.child(PathSegment::Control(ControlKind::Remove)),
                WidgetKind::RemoveControl,
                self.options.remove_label.clone(),
            );
            remove.prop_path = self.schema_path(&remove.path);
            remove.delta = Some(index);

            let mut wrapper = WidgetNode::new(
                index.to_string(),
                wrapper_path,
                WidgetKind::RemovableItem,
                element.title.clone(),
            );
            wrapper.prop_path = self.schema_path(&wrapper.path);
            wrapper.children = vec![element, remove];
            node.children.push(wrapper);
        }

        let mut add = WidgetNode::new(
            ADD_MORE_KEY,
            node.path.child(PathSegment::Control(ControlKind::AddMore)),
            WidgetKind::AddControl,
            self.options.add_more_label.clone(),
        );
        add.prop_path = self.schema_path(&add.path);
        node.children.push(add);
        node.cardinality = Some(Cardinality {
            max_index: live.max_index(),
            unlimited: true,
        });
        Ok(())
    }

    /// Compiles every declared property of an object field.
    fn compile_object(
        &mut self,
        node: &mut WidgetNode,
        schema: &SchemaNode,
        hint: &UiHint,
        current: Option<&Value>,
    ) -> Result<(), CompileError> {
        let Some(object) = schema.object() else {
            return Err(CompileError::Unsupported {
                path: node.path.to_string(),
                reason: "object widget requires declared properties".to_string(),
            });
        };
        node.kind = WidgetKind::Group;
        node.default_value = None;
        for (property, child_schema) in &object.properties {
            let child_current = current.and_then(|value| value.get(property.as_str()));
            let mut child = self.compile(
                child_schema,
                property,
                node.path.child(property.as_str()),
                hint.child(property),
                child_current,
            )?;
            if !matches!(child_schema.kind, SchemaKind::Const(_)) {
                child.required = object.required.contains(property);
            }
            node.children.push(child);
        }
        Ok(())
    }

    /// Returns the root-relative schema path of a widget path.
    fn schema_path(&self, path: &TreePath) -> TreePath {
        path.strip_prefix(&self.root).map_or_else(
            || path.without_synthetic(),
            |rest| rest.iter().filter(|segment| !segment.is_synthetic()).cloned().collect(),
        )
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a resolved JSON type to its default widget.
fn kind_for(ty: JsonType, schema: &SchemaNode) -> WidgetKind {
    match ty {
        JsonType::Boolean => WidgetKind::Checkbox,
        JsonType::String if schema.is_email() => WidgetKind::Email,
        JsonType::String => WidgetKind::Textfield,
        JsonType::Integer => WidgetKind::Integer,
        JsonType::Number => WidgetKind::Number,
        JsonType::Array => WidgetKind::Repeatable,
        JsonType::Object => WidgetKind::Group,
        JsonType::Null => WidgetKind::Unresolved,
    }
}

/// Builds the value to label map of an enum-backed widget.
fn build_options(values: &[Value], hint: &UiHint) -> IndexMap<String, String> {
    values
        .iter()
        .map(|value| {
            let key = option_key(value);
            let label = hint.label_for(value).map_or_else(|| humanize(&key), str::to_string);
            (key, label)
        })
        .collect()
}

/// Renders a constant as read-only markup.
fn markup_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Counts pre-existing items of a repeatable field's input.
fn item_count(current: Option<&Value>) -> usize {
    match current {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.keys().filter(|key| key.parse::<usize>().is_ok()).count(),
        _ => 0,
    }
}

/// Looks up the entered value of one repeat item.
///
/// Dense sequences are matched by ordinal position; raw index-keyed mappings
/// by live index. Removal wrappers are unwrapped.
fn item_value(current: Option<&Value>, ordinal: usize, index: usize) -> Option<&Value> {
    let item = match current? {
        Value::Array(items) => items.get(ordinal)?,
        Value::Object(map) => map.get(&index.to_string())?,
        _ => return None,
    };
    match item {
        Value::Object(map) if map.contains_key(WRAPPER_KEY) => map.get(WRAPPER_KEY),
        other => Some(other),
    }
}
