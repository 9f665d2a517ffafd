// crates/schema-forms-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog integrity.
// Purpose: Ensure catalog keys are unique and templates are well formed.
// Dependencies: schema-forms-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalog has unique keys and that every template
//! uses well-formed placeholders.

use std::collections::BTreeSet;

use crate::i18n::MessageArg;
use crate::i18n::catalog;
use crate::i18n::catalog_entries;
use crate::i18n::translate;

fn parse_placeholder_names(template: &str) -> Result<BTreeSet<String>, String> {
    let mut placeholders = BTreeSet::new();
    let bytes = template.as_bytes();
    let mut index = 0usize;
    while index < bytes.len() {
        match bytes[index] {
            b'{' => {
                let mut end = index + 1;
                while end < bytes.len() && bytes[end] != b'}' {
                    if bytes[end] == b'{' {
                        return Err(format!("nested '{{' at byte {end}"));
                    }
                    end += 1;
                }
                if end >= bytes.len() {
                    return Err(format!("unclosed '{{' at byte {index}"));
                }
                let name = &template[index + 1 .. end];
                let mut chars = name.chars();
                let Some(first) = chars.next() else {
                    return Err(format!("empty placeholder at byte {index}"));
                };
                if !first.is_ascii_lowercase() {
                    return Err(format!("placeholder '{name}' at byte {index} must start lowercase"));
                }
                if chars.any(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')) {
                    return Err(format!("placeholder '{name}' at byte {index} must use [a-z0-9_]"));
                }
                placeholders.insert(name.to_string());
                index = end + 1;
            }
            b'}' => {
                return Err(format!("unmatched '}}' at byte {index}"));
            }
            _ => {
                index += 1;
            }
        }
    }
    Ok(placeholders)
}

#[test]
fn catalog_keys_are_unique() {
    let entries = catalog_entries();
    let keys: BTreeSet<&'static str> = entries.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.len(), entries.len(), "catalog keys must be unique");
    assert_eq!(catalog().len(), entries.len());
}

#[test]
fn catalog_templates_use_valid_placeholders() {
    for (key, template) in catalog_entries() {
        if let Err(reason) = parse_placeholder_names(template) {
            panic!("invalid template for {key}: {reason}");
        }
    }
}

#[test]
fn read_failure_template_names_kind_path_and_error() {
    let template = catalog().get("input.read_failed").copied().unwrap();
    let names = parse_placeholder_names(template).unwrap();
    let expected: BTreeSet<String> =
        ["error", "kind", "path"].into_iter().map(str::to_string).collect();
    assert_eq!(names, expected);
}

#[test]
fn translate_leaves_unknown_placeholders_untouched() {
    let rendered = translate("item.add.ok", vec![MessageArg::new("index", "3")]);
    assert_eq!(rendered, "Added item 3 to {field}.");
}
