// crates/schema-forms-core/src/runtime/caster.rs
// ============================================================================
// Module: Recursive Type Caster
// Description: Best-effort coercion of widget input to declared schema types.
// Purpose: Reconcile string-typed form values with the schema before validation.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! Widgets submit strings. The caster walks a value alongside its schema and
//! coerces scalar leaves toward the declared types, trying number, boolean,
//! null and string in that order. A value that fits no declared type passes
//! through unchanged; the validator, not the caster, decides correctness.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::core::JsonType;
use crate::core::SchemaNode;
use crate::core::TypeSet;

// ============================================================================
// SECTION: Casting
// ============================================================================

/// Coerces `value` toward the types declared by `schema`.
#[must_use]
pub fn cast(value: Value, schema: &SchemaNode) -> Value {
    let types = &schema.types;
    match value {
        Value::Array(items) if types.contains(JsonType::Array) => {
            let implicit = SchemaNode::implicit_null();
            let item_schema = schema.items().unwrap_or(&implicit);
            Value::Array(items.into_iter().map(|item| cast(item, item_schema)).collect())
        }
        Value::Array(items) if types.contains(JsonType::Object) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| cast_property(&index.to_string(), item, schema))
                .collect(),
        ),
        Value::Object(map) if types.contains(JsonType::Object) => Value::Object(
            map.into_iter()
                .map(|(key, item)| {
                    let cast_item = cast_property(&key, item, schema);
                    (key, cast_item)
                })
                .collect::<Map<String, Value>>(),
        ),
        scalar => cast_scalar(scalar, types),
    }
}

/// Casts one property of an object, falling back to `items`, then to an
/// implicit null-typed leaf.
fn cast_property(key: &str, value: Value, schema: &SchemaNode) -> Value {
    let Some(object) = schema.object() else {
        return cast(value, &SchemaNode::implicit_null());
    };
    if let Some(child) = object.properties.get(key) {
        return cast(value, child);
    }
    match object.items.as_deref() {
        Some(items) => cast(value, items),
        None => cast(value, &SchemaNode::implicit_null()),
    }
}

/// Applies the first scalar coercion that accepts the value.
fn cast_scalar(value: Value, types: &TypeSet) -> Value {
    let value = match try_number(value, types) {
        Ok(cast) => return cast,
        Err(value) => value,
    };
    let value = match try_boolean(value, types) {
        Ok(cast) => return cast,
        Err(value) => value,
    };
    let value = match try_null(value, types) {
        Ok(cast) => return cast,
        Err(value) => value,
    };
    match try_string(value, types) {
        Ok(cast) | Err(cast) => cast,
    }
}

// ============================================================================
// SECTION: Coercions
// ============================================================================

/// Coerces numeric-looking values when a numeric type is declared.
fn try_number(value: Value, types: &TypeSet) -> Result<Value, Value> {
    if !types.is_numeric() {
        return Err(value);
    }
    let integer_only = types.contains(JsonType::Integer) && !types.contains(JsonType::Number);
    match &value {
        Value::Number(number) => {
            if integer_only
                && number.is_f64()
                && let Some(integer) = number.as_f64().and_then(whole_number)
            {
                return Ok(integer);
            }
            Ok(value)
        }
        Value::String(text) => parse_numeric(text, integer_only).ok_or(value),
        _ => Err(value),
    }
}

/// Coerces `0`, `1`, `"0"` and `"1"` when `boolean` is declared.
fn try_boolean(value: Value, types: &TypeSet) -> Result<Value, Value> {
    if !types.contains(JsonType::Boolean) {
        return Err(value);
    }
    let flag = match &value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.as_str() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        Value::Number(number) => match number.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    };
    flag.map(Value::Bool).ok_or(value)
}

/// Coerces empty values to `null` when `null` is declared.
///
/// `"0"` and `0` are not empty; a zero the user typed is kept as data.
fn try_null(value: Value, types: &TypeSet) -> Result<Value, Value> {
    if types.contains(JsonType::Null) && is_empty(&value) {
        return Ok(Value::Null);
    }
    Err(value)
}

/// Stringifies scalars when `string` is declared. Containers are kept.
fn try_string(value: Value, types: &TypeSet) -> Result<Value, Value> {
    if !types.contains(JsonType::String) {
        return Err(value);
    }
    match value {
        Value::String(_) => Ok(value),
        Value::Null => Ok(Value::String(String::new())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        container @ (Value::Array(_) | Value::Object(_)) => Err(container),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for `null`, `false`, `""` and empty containers.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Parses a numeric-looking string.
///
/// Text without a decimal point or exponent becomes an integer when it fits;
/// other numbers become floats, except that an integer-only declaration keeps
/// whole floats as integers.
fn parse_numeric(text: &str, integer_only: bool) -> Option<Value> {
    let trimmed = text.trim();
    if !looks_numeric(trimmed) {
        return None;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !unsigned.contains(['.', 'e', 'E']) {
        if let Ok(integer) = unsigned.parse::<i64>() {
            return Some(Value::Number(Number::from(integer)));
        }
        if let Ok(integer) = unsigned.parse::<u64>() {
            return Some(Value::Number(Number::from(integer)));
        }
    }
    let float = unsigned.parse::<f64>().ok().filter(|float| float.is_finite())?;
    if integer_only && let Some(integer) = whole_number(float) {
        return Some(integer);
    }
    Number::from_f64(float).map(Value::Number)
}

/// Converts a float with no fractional part into an integer value.
fn whole_number(float: f64) -> Option<Value> {
    if float.fract() != 0.0 || !float.is_finite() {
        return None;
    }
    let text = format!("{float:.0}");
    text.parse::<i64>().ok().map(|integer| Value::Number(Number::from(integer)))
}

/// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` with at least one digit in
/// the mantissa.
fn looks_numeric(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut index = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        index += 1;
    }
    let mut mantissa_digits = 0;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
        mantissa_digits += 1;
    }
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_start = index;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        if index == exponent_start {
            return false;
        }
    }
    index == bytes.len()
}
