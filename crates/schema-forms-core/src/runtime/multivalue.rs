// crates/schema-forms-core/src/runtime/multivalue.rs
// ============================================================================
// Module: Multivalue State Tracker
// Description: Live item indices of repeatable fields across compiles.
// Purpose: Let array fields grow and shrink without renumbering entered items.
// Dependencies: serde, crate::core
// ============================================================================

//! ## Overview
//! The [`MultivalueTable`] is the only state that outlives a compile. It is
//! owned by the caller's form session, passed into the compiler, and handed
//! back with any lazily created entries.
//!
//! ## Invariants
//! - Live indices are strictly ascending.
//! - An index is never handed out twice for the same field, even after the
//!   highest live index is removed (`next_index` is a high-water mark).
//! - Removing an index that is not live is a no-op.
//! - `usize::MAX` is never live; stored records holding it are trimmed on
//!   load and a field whose indices are exhausted refuses further adds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::PathSegment;
use crate::core::TreePath;

// ============================================================================
// SECTION: Keys and State
// ============================================================================

/// Storage key of a repeatable field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MultivalueKey {
    /// Schema-relative path of the field's parent.
    pub parents: TreePath,
    /// Field name under the parent.
    pub field: String,
}

impl MultivalueKey {
    /// Creates a key from a parent path and field name.
    #[must_use]
    pub fn new(parents: TreePath, field: impl Into<String>) -> Self {
        Self {
            parents,
            field: field.into(),
        }
    }

    /// Splits a schema-relative field path into parent path and field name.
    ///
    /// Returns `None` for the root path.
    #[must_use]
    pub fn for_field(path: &TreePath) -> Option<Self> {
        let schema_path = path.without_synthetic();
        let (last, parents) = schema_path.segments().split_last()?;
        Some(Self::new(TreePath::from_segments(parents.to_vec()), last.key()))
    }

    /// Returns the schema-relative path of the field itself.
    #[must_use]
    pub fn field_path(&self) -> TreePath {
        let segment = self
            .field
            .parse::<usize>()
            .map_or_else(|_| PathSegment::Property(self.field.clone()), PathSegment::Index);
        self.parents.child(segment)
    }
}

/// Live indices of one repeatable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultivalueState {
    /// Live item indices, ascending.
    pub indices: Vec<usize>,
    /// Lowest index that has never been handed out.
    pub next_index: usize,
    /// Last known full widget-tree path of the field.
    pub array_parents: TreePath,
}

impl MultivalueState {
    /// Creates state with `count` initial items `0..count`.
    #[must_use]
    pub fn with_count(count: usize, array_parents: TreePath) -> Self {
        Self {
            indices: (0..count).collect(),
            next_index: count,
            array_parents,
        }
    }

    /// Returns the highest live index.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Returns true when `index` is live.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Appends a fresh index and returns it.
    ///
    /// Returns `None` when the index space of the field is exhausted.
    pub fn add_one(&mut self) -> Option<usize> {
        let floor = match self.max_index() {
            Some(max) => max.checked_add(1)?,
            None => 0,
        };
        let index = floor.max(self.next_index);
        self.next_index = index.checked_add(1)?;
        self.indices.push(index);
        Some(index)
    }

    /// Removes `delta` from the live indices. Returns false when it was not live.
    pub fn remove_one(&mut self, delta: usize) -> bool {
        match self.indices.binary_search(&delta) {
            Ok(position) => {
                self.indices.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    /// Restores the ordering and high-water invariants.
    fn normalized(mut self) -> Self {
        self.indices.retain(|index| *index < usize::MAX);
        self.indices.sort_unstable();
        self.indices.dedup();
        let floor = self.max_index().map_or(0, |max| max.saturating_add(1));
        self.next_index = self.next_index.max(floor);
        self
    }
}

// ============================================================================
// SECTION: Table
// ============================================================================

/// Per-session table of repeatable field state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TableSnapshot", into = "TableSnapshot")]
pub struct MultivalueTable {
    /// State per field.
    fields: BTreeMap<MultivalueKey, MultivalueState>,
    /// Set by add/remove until the owner rebuilds.
    rebuild: bool,
}

impl MultivalueTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of a field.
    #[must_use]
    pub fn get(&self, key: &MultivalueKey) -> Option<&MultivalueState> {
        self.fields.get(key)
    }

    /// Replaces the state of a field.
    pub fn set(&mut self, key: MultivalueKey, state: MultivalueState) {
        self.fields.insert(key, state.normalized());
    }

    /// Returns the state of a field, creating it from `initial_count` items on
    /// first use, and records the field's current widget-tree location.
    pub fn ensure(
        &mut self,
        key: MultivalueKey,
        initial_count: usize,
        array_parents: TreePath,
    ) -> &MultivalueState {
        let state = self
            .fields
            .entry(key)
            .or_insert_with(|| MultivalueState::with_count(initial_count, TreePath::root()));
        state.array_parents = array_parents;
        state
    }

    /// Appends one item to a field and marks the table for rebuild.
    ///
    /// A field without state starts from zero items. Returns `None`, leaving
    /// the table untouched, when the field has no index left to hand out.
    pub fn add_one(&mut self, key: &MultivalueKey) -> Option<usize> {
        let index = self.fields.entry(key.clone()).or_default().add_one()?;
        self.rebuild = true;
        Some(index)
    }

    /// Removes item `delta` from a field and marks the table for rebuild.
    ///
    /// Unknown fields and indices are ignored; returns whether an item was removed.
    pub fn remove_one(&mut self, key: &MultivalueKey, delta: usize) -> bool {
        self.rebuild = true;
        self.fields.get_mut(key).is_some_and(|state| state.remove_one(delta))
    }

    /// Returns the last known widget-tree path of a field.
    #[must_use]
    pub fn locate(&self, key: &MultivalueKey) -> Option<&TreePath> {
        self.fields.get(key).map(|state| &state.array_parents)
    }

    /// Returns true when an add or remove happened since the last rebuild.
    #[must_use]
    pub const fn needs_rebuild(&self) -> bool {
        self.rebuild
    }

    /// Clears and returns the rebuild flag.
    pub const fn take_rebuild(&mut self) -> bool {
        let rebuild = self.rebuild;
        self.rebuild = false;
        rebuild
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MultivalueKey, &MultivalueState)> {
        self.fields.iter()
    }

    /// Returns the number of tracked fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

/// Serialized form of a [`MultivalueTable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableSnapshot {
    /// Field records in key order.
    #[serde(default)]
    fields: Vec<FieldSnapshot>,
}

/// Serialized form of one field record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldSnapshot {
    /// Schema-relative parent path.
    parents: TreePath,
    /// Field name.
    field: String,
    /// Live indices.
    indices: Vec<usize>,
    /// High-water mark.
    #[serde(default)]
    next_index: usize,
    /// Last known widget-tree path.
    #[serde(default)]
    array_parents: TreePath,
}

impl From<TableSnapshot> for MultivalueTable {
    fn from(snapshot: TableSnapshot) -> Self {
        let fields = snapshot
            .fields
            .into_iter()
            .map(|record| {
                let key = MultivalueKey::new(record.parents, record.field);
                let state = MultivalueState {
                    indices: record.indices,
                    next_index: record.next_index,
                    array_parents: record.array_parents,
                }
                .normalized();
                (key, state)
            })
            .collect();
        Self {
            fields,
            rebuild: false,
        }
    }
}

impl From<MultivalueTable> for TableSnapshot {
    fn from(table: MultivalueTable) -> Self {
        let fields = table
            .fields
            .into_iter()
            .map(|(key, state)| FieldSnapshot {
                parents: key.parents,
                field: key.field,
                indices: state.indices,
                next_index: state.next_index,
                array_parents: state.array_parents,
            })
            .collect();
        Self {
            fields,
        }
    }
}
