// crates/schema-forms-core/src/runtime/router.rs
// ============================================================================
// Module: Validation Error Router
// Description: Attaches validator failures to the widgets that produced them.
// Purpose: Split failures into field-level attachments and generic messages.
// Dependencies: serde, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Routing is pure: [`route_errors`] returns a list of attachments and the
//! messages that could not be routed, and [`merge_errors`] folds them into a
//! tree the caller owns. Pointer lookups that miss, or hit a path no longer in
//! the tree, demote the failure to a generic message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::TreePath;
use crate::core::WidgetNode;
use crate::interfaces::ValidationFailure;
use crate::runtime::pointer::PointerMap;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lead-in of the tree-level summary of unroutable failures.
pub const SUMMARY_PREFIX: &str = "Invalid data, please make sure all data is valid according to \
                                  the schema. Schema validation returned the following errors: ";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Message destined for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAttachment {
    /// Full widget path.
    pub path: TreePath,
    /// Display message.
    pub message: String,
}

/// Result of routing a failure list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutedErrors {
    /// Field-level messages.
    pub attachments: Vec<ErrorAttachment>,
    /// Messages with no matching widget.
    pub generic: Vec<String>,
}

impl RoutedErrors {
    /// Returns the tree-level summary, or `None` when every failure was routed.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.generic.is_empty() {
            return None;
        }
        Some(format!("{SUMMARY_PREFIX}{}", self.generic.join(", ")))
    }
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Routes validator failures to widgets.
#[must_use]
pub fn route_errors(
    failures: &[ValidationFailure],
    pointers: &PointerMap,
    tree: &WidgetNode,
) -> RoutedErrors {
    let mut routed = RoutedErrors::default();
    for failure in failures {
        let target = pointers.path_for(&failure.pointer).and_then(|path| tree.find(path));
        match target {
            Some(widget) => routed.attachments.push(ErrorAttachment {
                path: widget.path.clone(),
                message: format!(
                    "{}: {} [constraint: {}]",
                    widget.title, failure.message, failure.constraint
                ),
            }),
            None => routed
                .generic
                .push(format!("{} [constraint: {}]", failure.message, failure.constraint)),
        }
    }
    routed
}

/// Returns `tree` with attachments applied and the summary on the root.
#[must_use]
pub fn merge_errors(mut tree: WidgetNode, routed: &RoutedErrors) -> WidgetNode {
    for attachment in &routed.attachments {
        if let Some(widget) = tree.find_mut(&attachment.path) {
            widget.errors.push(attachment.message.clone());
        }
    }
    match routed.summary() {
        Some(summary) => tree.with_error(summary),
        None => tree,
    }
}
