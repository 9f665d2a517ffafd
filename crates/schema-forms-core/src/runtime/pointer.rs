// crates/schema-forms-core/src/runtime/pointer.rs
// ============================================================================
// Module: Pointer/Path Mapper
// Description: Bidirectional JSON Pointer to widget-tree path table.
// Purpose: Translate validator error locations into widget addresses.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A [`PointerMap`] is built fresh from a compiled tree on every validation
//! pass. Pointers follow the cleaned document's shape: wrapper segments are
//! elided and repeat items are numbered by their position among live items,
//! matching the dense re-indexing done by the input cleaner. The mapped paths
//! are full widget paths, wrapper segments included.
//!
//! ## Invariants
//! - Add and remove controls are never mapped and never descended into.
//! - When a wrapper and the element it holds share a pointer, the element wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::PathSegment;
use crate::core::TreePath;
use crate::core::WidgetKind;
use crate::core::WidgetNode;
use crate::core::join_pointer;

// ============================================================================
// SECTION: Pointer Map
// ============================================================================

/// JSON Pointer to widget-tree path table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerMap {
    /// Pointer to full widget path.
    by_pointer: BTreeMap<String, TreePath>,
    /// Full widget path to pointer.
    by_path: BTreeMap<TreePath, String>,
}

impl PointerMap {
    /// Builds the table for `tree`, making pointers relative to `root`.
    #[must_use]
    pub fn build(tree: &WidgetNode, root: &TreePath) -> Self {
        let mut map = Self::default();
        let mut tokens: Vec<String> = tree
            .path
            .strip_prefix(root)
            .unwrap_or_default()
            .iter()
            .filter(|segment| !segment.is_synthetic())
            .map(PathSegment::key)
            .collect();
        map.visit(tree, &mut tokens);
        map
    }

    /// Records `node` and descends into its children.
    fn visit(&mut self, node: &WidgetNode, tokens: &mut Vec<String>) {
        self.record(join_pointer(tokens.iter()), node.path.clone());
        let mut ordinal = 0usize;
        for child in &node.children {
            if child.kind.is_control() {
                continue;
            }
            let token = match child.path.last() {
                Some(PathSegment::Wrapper | PathSegment::Control(_)) | None => None,
                Some(PathSegment::Index(index)) => {
                    if node.kind == WidgetKind::Repeatable {
                        let position = ordinal;
                        ordinal += 1;
                        Some(position.to_string())
                    } else {
                        Some(index.to_string())
                    }
                }
                Some(PathSegment::Property(name)) => Some(name.clone()),
            };
            match token {
                Some(token) => {
                    tokens.push(token);
                    self.visit(child, tokens);
                    tokens.pop();
                }
                None => self.visit(child, tokens),
            }
        }
    }

    /// Inserts one entry, replacing an earlier holder of the same pointer.
    fn record(&mut self, pointer: String, path: TreePath) {
        if let Some(previous) = self.by_pointer.insert(pointer.clone(), path.clone()) {
            self.by_path.remove(&previous);
        }
        self.by_path.insert(path, pointer);
    }

    /// Returns the widget path for a pointer.
    ///
    /// A leading `#` fragment marker is accepted.
    #[must_use]
    pub fn path_for(&self, pointer: &str) -> Option<&TreePath> {
        let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
        self.by_pointer.get(pointer)
    }

    /// Returns the pointer for a full widget path.
    #[must_use]
    pub fn pointer_for(&self, path: &TreePath) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Iterates entries in pointer order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreePath)> {
        self.by_pointer.iter().map(|(pointer, path)| (pointer.as_str(), path))
    }

    /// Returns the number of mapped pointers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_pointer.len()
    }

    /// Returns true when nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_pointer.is_empty()
    }
}
