// crates/schema-forms-core/tests/routing.rs
// ============================================================================
// Module: Pointer Mapping and Error Routing Tests
// Description: Tests for JSON Pointer to widget path translation.
// Purpose: Validate wrapper elision, control skipping, and error attachment.
// Dependencies: schema-forms-core, serde_json
// ============================================================================
//! ## Overview
//! Builds pointer maps from compiled trees and routes synthetic validator
//! failures through them.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use schema_forms_core::CompileOptions;
use schema_forms_core::CompileRequest;
use schema_forms_core::MultivalueKey;
use schema_forms_core::MultivalueTable;
use schema_forms_core::PathSegment;
use schema_forms_core::PointerMap;
use schema_forms_core::SchemaDocument;
use schema_forms_core::TreePath;
use schema_forms_core::UiHint;
use schema_forms_core::ValidationFailure;
use schema_forms_core::WidgetNode;
use schema_forms_core::compile_form;
use schema_forms_core::runtime::SUMMARY_PREFIX;
use schema_forms_core::runtime::merge_errors;
use schema_forms_core::runtime::route_errors;
use serde_json::Value;
use serde_json::json;

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "items": {
                "type": "array",
                "title": "Items",
                "items": {
                    "type": "object",
                    "properties": {"name": {"type": "string", "title": "Name"}}
                }
            }
        }
    })
}

fn compile_tree(state: MultivalueTable, root: &TreePath) -> WidgetNode {
    let document = SchemaDocument::from_value(schema()).unwrap();
    let ui = UiHint::default();
    let request = CompileRequest {
        schema: &document,
        ui: &ui,
        current_input: None,
        root,
    };
    compile_form(&request, &CompileOptions::default(), state).unwrap().tree
}

fn state_with(live: &[usize]) -> MultivalueTable {
    let key = MultivalueKey::new(TreePath::root(), "items");
    let mut table = MultivalueTable::new();
    let highest = live.iter().copied().max().unwrap_or(0);
    for _ in 0..=highest {
        table.add_one(&key);
    }
    for index in 0..=highest {
        if !live.contains(&index) {
            table.remove_one(&key, index);
        }
    }
    table
}

fn wrapped_name(index: usize) -> TreePath {
    TreePath::root().child("items").index(index).child(PathSegment::Wrapper).child("name")
}

// ============================================================================
// SECTION: Pointer Map
// ============================================================================

/// Verifies wrapper segments are elided from pointers but kept in mapped paths.
#[test]
fn wrapper_segment_is_elided_from_pointer() {
    let tree = compile_tree(state_with(&[0, 1, 2]), &TreePath::root());
    let map = PointerMap::build(&tree, &TreePath::root());

    assert_eq!(map.path_for("/items/2/name"), Some(&wrapped_name(2)));
    assert_eq!(map.pointer_for(&wrapped_name(2)), Some("/items/2/name"));
    assert_eq!(
        map.path_for("/items/2"),
        Some(&TreePath::root().child("items").index(2).child(PathSegment::Wrapper))
    );
    assert_eq!(map.path_for(""), Some(&TreePath::root()));
    assert_eq!(map.path_for("#/title"), Some(&TreePath::root().child("title")));
}

/// Verifies add and remove controls are never mapped.
#[test]
fn controls_are_not_mapped() {
    let tree = compile_tree(state_with(&[0]), &TreePath::root());
    let map = PointerMap::build(&tree, &TreePath::root());
    assert!(map.path_for("/items/add_more").is_none());
    assert!(map.path_for("/items/0/remove_one").is_none());
    assert!(map.iter().all(|(pointer, _)| !pointer.contains("removable_element")));
    // root, title, items, items/0, items/0/name
    assert_eq!(map.len(), 5);
}

/// Verifies pointers number live items by position after a removal.
#[test]
fn pointers_follow_live_item_positions() {
    let tree = compile_tree(state_with(&[1, 3]), &TreePath::root());
    let map = PointerMap::build(&tree, &TreePath::root());
    assert_eq!(map.path_for("/items/0/name"), Some(&wrapped_name(1)));
    assert_eq!(map.path_for("/items/1/name"), Some(&wrapped_name(3)));
    assert!(map.path_for("/items/3/name").is_none());
}

/// Verifies pointers are relative to the mount point.
#[test]
fn pointers_are_relative_to_root() {
    let root = TreePath::root().child("embedded");
    let tree = compile_tree(state_with(&[0]), &root);
    let map = PointerMap::build(&tree, &root);
    assert_eq!(map.path_for("/title"), Some(&root.child("title")));
    assert_eq!(map.path_for(""), Some(&root));
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Verifies routable failures attach with title and constraint and others summarize.
#[test]
fn failures_route_to_widgets_or_summary() {
    let tree = compile_tree(state_with(&[0, 1, 2]), &TreePath::root());
    let map = PointerMap::build(&tree, &TreePath::root());
    let failures = vec![
        ValidationFailure::new("\"\" is too short", "minLength", "/items/2/name"),
        ValidationFailure::new("unexpected property", "additionalProperties", "/ghost"),
        ValidationFailure::new("bad", "type", "/items/9"),
    ];

    let routed = route_errors(&failures, &map, &tree);
    assert_eq!(routed.attachments.len(), 1);
    assert_eq!(routed.attachments[0].path, wrapped_name(2));
    assert_eq!(routed.attachments[0].message, "Name: \"\" is too short [constraint: minLength]");
    assert_eq!(
        routed.generic,
        vec![
            "unexpected property [constraint: additionalProperties]".to_string(),
            "bad [constraint: type]".to_string(),
        ]
    );

    let merged = merge_errors(tree.clone(), &routed);
    let name = merged.find(&wrapped_name(2)).unwrap();
    assert_eq!(name.errors, vec!["Name: \"\" is too short [constraint: minLength]".to_string()]);
    assert_eq!(merged.errors.len(), 1);
    assert!(merged.errors[0].starts_with(SUMMARY_PREFIX));
    assert!(merged.errors[0].ends_with(
        "unexpected property [constraint: additionalProperties], bad [constraint: type]"
    ));
    assert!(tree.errors.is_empty());
}

/// Verifies a fully routed failure list adds no summary.
#[test]
fn no_summary_when_everything_routes() {
    let tree = compile_tree(MultivalueTable::new(), &TreePath::root());
    let map = PointerMap::build(&tree, &TreePath::root());
    let routed =
        route_errors(&[ValidationFailure::new("wrong", "type", "/title")], &map, &tree);
    assert_eq!(routed.summary(), None);
    let merged = merge_errors(tree, &routed);
    assert!(merged.errors.is_empty());
    assert!(merged.has_errors());
    assert_eq!(
        merged.find(&TreePath::root().child("title")).unwrap().errors,
        vec!["Title: wrong [constraint: type]".to_string()]
    );
}
