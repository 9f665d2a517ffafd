// crates/schema-forms-core/src/core/ui.rs
// ============================================================================
// Module: UI Hints
// Description: Caller-supplied presentation overrides keyed by property path.
// Purpose: Parse the `ui:*` override bag into a typed, read-only tree.
// Dependencies: indexmap, serde, serde_json
// ============================================================================

//! ## Overview
//! UI hints mirror schema nesting: keys starting with `ui:` configure the
//! current node, every other object-valued key configures the child with that
//! name (`items` configures array items). Parsing is total so a schema/UI
//! mismatch never fails a compile; unknown or malformed entries are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix shared by node-level hint keys.
const UI_PREFIX: &str = "ui:";
/// Child key holding array item hints.
pub const ITEMS_HINT_KEY: &str = "items";

/// Shared empty hint returned for absent children.
static EMPTY_HINT: LazyLock<UiHint> = LazyLock::new(UiHint::default);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Parsed UI override bag for one node and its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiHint {
    /// `ui:title` override.
    pub title: Option<String>,
    /// `ui:help` override for the description.
    pub help: Option<String>,
    /// `ui:placeholder` text.
    pub placeholder: Option<String>,
    /// `ui:widget` override.
    pub widget: Option<String>,
    /// `ui:enabled` flag.
    pub enabled: Option<bool>,
    /// `ui:visible` flag.
    pub visible: Option<bool>,
    /// `ui:enum.labels.mappings` keyed by [`option_key`].
    pub enum_labels: IndexMap<String, String>,
    /// Child hints keyed by property name.
    pub children: IndexMap<String, Self>,
}

impl UiHint {
    /// Parses a hint tree. Non-object input yields an empty hint.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let mut hint = Self::default();
        for (key, entry) in map {
            match key.strip_prefix(UI_PREFIX) {
                Some("title") => hint.title = non_empty_string(entry),
                Some("help") => hint.help = non_empty_string(entry),
                Some("placeholder") => hint.placeholder = non_empty_string(entry),
                Some("widget") => hint.widget = non_empty_string(entry),
                Some("enabled") => hint.enabled = truthy(entry),
                Some("visible") => hint.visible = truthy(entry),
                Some("enum") => hint.enum_labels = parse_label_mappings(entry),
                Some(_) => {}
                None => {
                    if entry.is_object() {
                        hint.children.insert(key.clone(), Self::from_value(entry));
                    }
                }
            }
        }
        hint
    }

    /// Returns the hint for a named child, or an empty hint.
    #[must_use]
    pub fn child(&self, name: &str) -> &Self {
        self.children.get(name).unwrap_or(&EMPTY_HINT)
    }

    /// Returns the hint applied to every array item.
    ///
    /// Without an explicit `items` child the item inherits only the parent's
    /// enabled and visible flags.
    #[must_use]
    pub fn item_hint(&self) -> Cow<'_, Self> {
        if let Some(items) = self.children.get(ITEMS_HINT_KEY) {
            return Cow::Borrowed(items);
        }
        Cow::Owned(Self {
            enabled: self.enabled,
            visible: self.visible,
            ..Self::default()
        })
    }

    /// Returns the label override for an enum value.
    #[must_use]
    pub fn label_for(&self, value: &Value) -> Option<&str> {
        self.enum_labels.get(&option_key(value)).map(String::as_str)
    }

    /// Returns the effective enabled flag.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Returns the effective visible flag.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders an option value as the key used by option and label maps.
///
/// Strings are used verbatim; other values use their compact JSON text.
#[must_use]
pub fn option_key(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Returns a non-empty string hint.
fn non_empty_string(value: &Value) -> Option<String> {
    value.as_str().filter(|text| !text.is_empty()).map(str::to_string)
}

/// Interprets a flag hint. Unrecognized shapes are ignored.
fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) => Some(!matches!(text.as_str(), "" | "0" | "false")),
        Value::Null => Some(false),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads `labels.mappings` from a `ui:enum` hint.
fn parse_label_mappings(value: &Value) -> IndexMap<String, String> {
    let Some(Value::Object(mappings)) = value.get("labels").and_then(|labels| labels.get("mappings"))
    else {
        return IndexMap::new();
    };
    mappings.iter().map(|(key, label)| (key.clone(), option_key(label))).collect()
}
