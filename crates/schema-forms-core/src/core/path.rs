// crates/schema-forms-core/src/core/path.rs
// ============================================================================
// Module: Tree Paths
// Description: Structured addresses shared by schema space and widget space.
// Purpose: Provide typed path segments and RFC 6901 pointer escaping.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TreePath`] locates a node in both the schema and the compiled widget
//! tree. Segments are a closed enum so synthetic wrapper and control nodes are
//! tagged explicitly instead of being recognized by their key names.
//!
//! ## Invariants
//! - [`PathSegment::Wrapper`] and [`PathSegment::Control`] never appear in a
//!   JSON Pointer produced by this crate.
//! - Paths compare segment-by-segment, so they are usable as ordered map keys
//!   without string joining.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Widget-tree key of the element held inside a removable item wrapper.
pub const WRAPPER_KEY: &str = "removable_element";
/// Widget-tree key of the per-item remove control.
pub const REMOVE_CONTROL_KEY: &str = "remove_one";
/// Widget-tree key of the append control of a repeatable field.
pub const ADD_MORE_KEY: &str = "add_more";

// ============================================================================
// SECTION: Segments
// ============================================================================

/// Structural affordance controls attached to repeatable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// Appends one more item to a repeatable field.
    AddMore,
    /// Removes the item the control belongs to.
    Remove,
}

impl ControlKind {
    /// Returns the widget-tree key for the control.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AddMore => ADD_MORE_KEY,
            Self::Remove => REMOVE_CONTROL_KEY,
        }
    }
}

/// One step of a [`TreePath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Named object property.
    Property(String),
    /// Live index of a repeatable item.
    Index(usize),
    /// Synthetic wrapper introduced for the remove affordance.
    Wrapper,
    /// Structural control node.
    Control(ControlKind),
}

impl PathSegment {
    /// Returns true for segments that exist only in widget space.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Self::Wrapper | Self::Control(_))
    }

    /// Returns the raw key used for this segment in widget space.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Property(name) => name.clone(),
            Self::Index(index) => index.to_string(),
            Self::Wrapper => WRAPPER_KEY.to_string(),
            Self::Control(kind) => kind.key().to_string(),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Property(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Property(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

// ============================================================================
// SECTION: Tree Path
// ============================================================================

/// Ordered sequence of segments addressing a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<PathSegment>);

impl TreePath {
    /// Creates an empty (root) path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from explicit segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Parses a `/`-delimited pointer-like string into property and index segments.
    ///
    /// Purely numeric segments become [`PathSegment::Index`]; every other
    /// segment is unescaped per RFC 6901 and becomes a property.
    #[must_use]
    pub fn parse(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                if segment.bytes().all(|byte| byte.is_ascii_digit())
                    && let Ok(index) = segment.parse::<usize>()
                {
                    return PathSegment::Index(index);
                }
                PathSegment::Property(unescape_pointer_segment(segment))
            })
            .collect();
        Self(segments)
    }

    /// Returns the segments of the path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns true when the path has no segments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of segments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the final segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Self(segments)
    }

    /// Returns a new path with a repeat index appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Returns true when `prefix` is a leading sub-path of this path.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns the remaining segments after `prefix`, or `None` when the
    /// path is not below `prefix`.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<&[PathSegment]> {
        self.0.strip_prefix(prefix.0.as_slice())
    }

    /// Returns the path without its synthetic wrapper and control segments.
    #[must_use]
    pub fn without_synthetic(&self) -> Self {
        Self(self.0.iter().filter(|segment| !segment.is_synthetic()).cloned().collect())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            f.write_str("/")?;
            f.write_str(&escape_pointer_segment(&segment.key()))?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for TreePath {
    fn from(value: Vec<PathSegment>) -> Self {
        Self(value)
    }
}

impl FromIterator<PathSegment> for TreePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Pointer Escaping
// ============================================================================

/// Escapes a single JSON Pointer reference token.
#[must_use]
pub fn escape_pointer_segment(segment: &str) -> String {
    if !segment.contains(['~', '/']) {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`escape_pointer_segment`].
#[must_use]
pub fn unescape_pointer_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

/// Joins already-unescaped reference tokens into a JSON Pointer.
#[must_use]
pub fn join_pointer<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pointer = String::new();
    for token in tokens {
        pointer.push('/');
        pointer.push_str(&escape_pointer_segment(token.as_ref()));
    }
    pointer
}

#[cfg(test)]
mod tests {
    use super::ControlKind;
    use super::PathSegment;
    use super::TreePath;
    use super::escape_pointer_segment;
    use super::join_pointer;
    use super::unescape_pointer_segment;

    #[test]
    fn display_renders_synthetic_segments_by_key() {
        let path = TreePath::root()
            .child("items")
            .index(2)
            .child(PathSegment::Wrapper)
            .child(PathSegment::Control(ControlKind::Remove));
        assert_eq!(path.to_string(), "/items/2/removable_element/remove_one");
        assert_eq!(TreePath::root().to_string(), "/");
    }

    #[test]
    fn parse_turns_digits_into_indices() {
        let path = TreePath::parse("/people/3/a~1b");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Property("people".to_string()),
                PathSegment::Index(3),
                PathSegment::Property("a/b".to_string()),
            ]
        );
        assert!(TreePath::parse("").is_empty());
    }

    #[test]
    fn prefix_helpers_compare_whole_segments() {
        let parent = TreePath::root().child("a");
        let child = parent.child("b");
        assert!(child.starts_with(&parent));
        assert!(!parent.starts_with(&child));
        assert_eq!(child.strip_prefix(&parent), Some(&[PathSegment::Property("b".to_string())][..]));
        assert!(!TreePath::root().child("ab").starts_with(&parent));
    }

    #[test]
    fn pointer_escaping_round_trips() {
        assert_eq!(escape_pointer_segment("a/b~c"), "a~1b~0c");
        assert_eq!(unescape_pointer_segment("a~1b~0c"), "a/b~c");
        assert_eq!(unescape_pointer_segment("~01"), "~1");
        assert_eq!(join_pointer(["items", "0", "a/b"]), "/items/0/a~1b");
    }

    #[test]
    fn without_synthetic_drops_wrapper_and_controls() {
        let path = TreePath::root()
            .child("items")
            .index(0)
            .child(PathSegment::Wrapper)
            .child("name");
        assert_eq!(path.without_synthetic(), TreePath::parse("/items/0/name"));
    }
}
