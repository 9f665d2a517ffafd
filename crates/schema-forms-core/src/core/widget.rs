// crates/schema-forms-core/src/core/widget.rs
// ============================================================================
// Module: Widget Tree
// Description: Compiled, renderer-agnostic form control tree.
// Purpose: Define the widget node model consumed by renderers and error routing.
// Dependencies: indexmap, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`WidgetNode`] is the compiled form of one schema node. The tree is
//! rebuilt on every compile and is never persisted; only multivalue state
//! survives between compiles.
//!
//! ## Invariants
//! - Every node's `path` ends with the segment under which its parent holds it.
//! - A [`WidgetKind::Markup`] node has no children and no options.

// ============================================================================
// SECTION: Imports
// ============================================================================

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::path::PathSegment;
use crate::core::path::TreePath;

// ============================================================================
// SECTION: Widget Kind
// ============================================================================

/// Resolved display type of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// Single-line text input.
    Textfield,
    /// Email address input.
    Email,
    /// Decimal number input.
    Number,
    /// Integer input.
    Integer,
    /// Boolean checkbox.
    Checkbox,
    /// Single choice from an option list.
    Radios,
    /// Multiple choices from an option list.
    Checkboxes,
    /// User-extendable list of repeated items.
    Repeatable,
    /// Container of named properties.
    Group,
    /// Read-only markup for constant values.
    Markup,
    /// Wrapper holding one repeat item and its remove control.
    RemovableItem,
    /// Control appending one more item.
    AddControl,
    /// Control removing the item it belongs to.
    RemoveControl,
    /// No concrete type could be resolved.
    Unresolved,
    /// Widget name supplied verbatim through `ui:widget`.
    Custom(String),
}

impl WidgetKind {
    /// Returns true for add and remove controls.
    #[must_use]
    pub const fn is_control(&self) -> bool {
        matches!(self, Self::AddControl | Self::RemoveControl)
    }

    /// Returns true for kinds that never hold a submitted value.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::AddControl | Self::RemoveControl | Self::RemovableItem)
    }
}

// ============================================================================
// SECTION: Widget Node
// ============================================================================

/// Repeat metadata of a repeatable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    /// Highest live index, or `None` when no item exists.
    pub max_index: Option<usize>,
    /// True when items may be added without bound.
    pub unlimited: bool,
}

/// One compiled widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetNode {
    /// Owning property name or item index.
    pub name: String,
    /// Full widget-tree path, including synthetic segments.
    pub path: TreePath,
    /// Schema-relative path of property names and indices.
    pub prop_path: TreePath,
    /// Resolved display type.
    pub kind: WidgetKind,
    /// Display title.
    pub title: String,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Initial value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// True when the owning object lists this property as required.
    pub required: bool,
    /// False when the widget is rendered disabled.
    pub enabled: bool,
    /// False when the widget is hidden.
    pub visible: bool,
    /// Option value to label mapping for enum-backed widgets.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, String>,
    /// Read-only markup for constant widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    /// Child widgets in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
    /// Repeat metadata for repeatable widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    /// Item index targeted by a remove control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<usize>,
    /// Attached validation messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl WidgetNode {
    /// Creates a bare, enabled, visible node.
    #[must_use]
    pub fn new(name: impl Into<String>, path: TreePath, kind: WidgetKind, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prop_path: path.without_synthetic(),
            path,
            kind,
            title: title.into(),
            description: None,
            placeholder: None,
            default_value: None,
            required: false,
            enabled: true,
            visible: true,
            options: IndexMap::new(),
            markup: None,
            children: Vec::new(),
            cardinality: None,
            delta: None,
            errors: Vec::new(),
        }
    }

    /// Returns the direct child held under `segment`.
    #[must_use]
    pub fn child(&self, segment: &PathSegment) -> Option<&Self> {
        self.children.iter().find(|child| child.path.last() == Some(segment))
    }

    /// Returns the node at an absolute path inside this subtree.
    #[must_use]
    pub fn find(&self, path: &TreePath) -> Option<&Self> {
        let mut node = self;
        for segment in path.strip_prefix(&self.path)? {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Mutable variant of [`WidgetNode::find`].
    #[must_use]
    pub fn find_mut(&mut self, path: &TreePath) -> Option<&mut Self> {
        let remaining = path.strip_prefix(&self.path)?.to_vec();
        let mut node = self;
        for segment in &remaining {
            node = node.children.iter_mut().find(|child| child.path.last() == Some(segment))?;
        }
        Some(node)
    }

    /// Visits this node and every descendant depth-first, parents first.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&Self),
    {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Counts descendant widgets that can hold a value.
    #[must_use]
    pub fn field_count(&self) -> usize {
        let mut count = 0usize;
        for child in &self.children {
            child.walk(&mut |node| {
                if !node.kind.is_structural() {
                    count += 1;
                }
            });
        }
        count
    }

    /// Returns the node with `message` appended to its errors.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    /// Returns true when this node or any descendant carries an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.children.iter().any(Self::has_errors)
    }
}
