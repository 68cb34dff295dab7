//! Dense interning of opaque constraint values.
//!
//! Per spec.md §9 ("Intern domain values to dense ids at problem-build
//! time"), every distinct value seen across all variable domains is given
//! a small dense integer id the first time it's encountered. Domains and
//! the AC-3.1 revision cache then index by `ValId` instead of hashing `V`
//! on every lookup, and the interning order doubles as the "stable
//! ordering of each y-domain" AC-3.1 requires (spec.md §4.5).

use std::collections::HashMap;
use std::hash::Hash;

/// Dense id for an interned value, unique within one [`ValueTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValId(pub usize);

/// Interns arbitrary, hashable values into a dense `0..n` id space.
///
/// Interning is append-only: once a value is assigned a `ValId` it keeps
/// it for the table's lifetime, which is exactly what lets `ValId` order
/// serve as the AC-3.1 "stable domain ordering" snapshot.
#[derive(Debug, Clone, Default)]
pub struct ValueTable<V> {
    values: Vec<V>,
    index: HashMap<V, ValId>,
}

impl<V: Clone + Eq + Hash> ValueTable<V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Intern `value`, returning its (possibly newly assigned) id.
    pub fn intern(&mut self, value: V) -> ValId {
        if let Some(&id) = self.index.get(&value) {
            return id;
        }
        let id = ValId(self.values.len());
        self.values.push(value.clone());
        self.index.insert(value, id);
        id
    }

    /// Look up the id of an already-interned value, if any.
    pub fn id_of(&self, value: &V) -> Option<ValId> {
        self.index.get(value).copied()
    }

    /// Resolve a `ValId` back to its original value.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this table.
    pub fn value_of(&self, id: ValId) -> &V {
        &self.values[id.0]
    }

    /// Number of distinct interned values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
