// crates/schema-forms-core/src/runtime/cleaner.rs
// ============================================================================
// Module: User-Input Cleaner
// Description: Normalizes raw widget submissions into compact JSON documents.
// Purpose: Strip add/remove control artifacts and untouched optional fields.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! Raw submissions mirror the widget tree: repeat items arrive as
//! index-keyed mappings, each wrapped with its remove control, next to the
//! append control's label. Cleaning runs bottom-up and:
//! - drops the append control value,
//! - turns index-keyed mappings into sequences, keeping submission order,
//! - unwraps removable-item wrappers when every sibling has the wrapper shape,
//! - trims trailing empty entries from sequences,
//! - drops mapping entries whose cleaned value is empty.
//!
//! ## Invariants
//! - Cleaning never fails; unexpected shapes pass through.
//! - Wrappers are unwrapped only when every element of the sequence is an
//!   exact `{removable_element, remove_one}` pair with a string control value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::core::ADD_MORE_KEY;
use crate::core::REMOVE_CONTROL_KEY;
use crate::core::WRAPPER_KEY;

// ============================================================================
// SECTION: Cleaning
// ============================================================================

/// Cleans a raw submission.
#[must_use]
pub fn clean(raw: Value) -> Value {
    match raw {
        Value::Object(map) => clean_map(map),
        Value::Array(items) => clean_sequence(items),
        scalar => scalar,
    }
}

/// Cleans a mapping, re-keying it into a sequence when every key is an index.
fn clean_map(mut map: Map<String, Value>) -> Value {
    if map.get(ADD_MORE_KEY).is_some_and(Value::is_string) {
        map.shift_remove(ADD_MORE_KEY);
    }
    if !map.is_empty() && map.keys().all(|key| is_index_key(key)) {
        return clean_sequence(map.into_iter().map(|(_, item)| item).collect());
    }
    let cleaned = map
        .into_iter()
        .filter_map(|(key, item)| {
            let item = clean(item);
            (!is_blank(&item)).then_some((key, item))
        })
        .collect::<Map<String, Value>>();
    Value::Object(cleaned)
}

/// Unwraps removal wrappers, cleans elements, and trims trailing empties.
fn clean_sequence(items: Vec<Value>) -> Value {
    let items = if items.iter().all(is_removable_wrapper) {
        items.into_iter().map(unwrap_removable).collect()
    } else {
        items
    };
    let mut cleaned: Vec<Value> = items.into_iter().map(clean).collect();
    while cleaned.last().is_some_and(is_blank) {
        cleaned.pop();
    }
    Value::Array(cleaned)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for a non-empty key made only of ASCII digits.
fn is_index_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|byte| byte.is_ascii_digit())
}

/// Returns true for the exact removable-item wrapper shape.
fn is_removable_wrapper(item: &Value) -> bool {
    let Value::Object(map) = item else {
        return false;
    };
    map.len() == 2
        && map.contains_key(WRAPPER_KEY)
        && map.get(REMOVE_CONTROL_KEY).is_some_and(Value::is_string)
}

/// Extracts the wrapped element.
fn unwrap_removable(item: Value) -> Value {
    match item {
        Value::Object(mut map) => map.remove(WRAPPER_KEY).unwrap_or(Value::Null),
        other => other,
    }
}

/// Returns true for values that mean "not filled in".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
