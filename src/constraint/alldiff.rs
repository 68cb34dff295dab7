//! The `AllDiff` global constraint: pairwise distinctness over a scope, with
//! optional per-argument transforms (spec.md §3, §4.1).
//!
//! Grounded on `original_source/csp/constraints.py::AllDiff`, which offers
//! the same two uses this module keeps: evaluating a partial assignment
//! directly (used by [`crate::problem::Problem::consistent`]) and expanding
//! to pairwise `Different` as a fallback binary encoding (used when
//! [`crate::config::SolverConfig::binary_only`] is set).

use super::{BinaryConstraint, PredicateBinary, Transform, Var};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Scope plus optional per-variable transforms for an `AllDiff` global.
pub struct AllDiff<V> {
    scope: Vec<Var>,
    transforms: HashMap<Var, Transform<V>>,
}

impl<V> AllDiff<V> {
    pub fn new(scope: Vec<Var>) -> Self {
        Self {
            scope,
            transforms: HashMap::new(),
        }
    }

    pub fn with_transform(mut self, x: Var, f: Transform<V>) -> Self {
        self.transforms.insert(x, f);
        self
    }

    pub fn scope(&self) -> &[Var] {
        &self.scope
    }

    pub fn transform_of(&self, x: Var) -> Option<&Transform<V>> {
        self.transforms.get(&x)
    }

    /// Rebase every scope member and transform key through `map` (original
    /// [`Var`] -> new [`Var`]) — used by [`crate::decompose::decompose`]
    /// when rebuilding a sub-problem whose variables get fresh dense
    /// indices. Panics if a scope member is missing from `map`.
    pub(crate) fn remapped(&self, map: &HashMap<Var, Var>) -> Self {
        Self {
            scope: self.scope.iter().map(|x| map[x]).collect(),
            transforms: self.transforms.iter().map(|(x, t)| (map[x], t.clone())).collect(),
        }
    }
}

impl<V: Clone> AllDiff<V> {
    /// Apply `x`'s transform (identity if none) to a domain value.
    pub fn apply(&self, x: Var, v: &V) -> V {
        match self.transforms.get(&x) {
            Some(f) => f(v),
            None => v.clone(),
        }
    }
}

impl<V: Clone + Eq + Hash> AllDiff<V> {
    /// `true` iff every pair of currently-assigned in-scope variables has
    /// distinct transformed values (spec.md §4.1, use (a)).
    pub fn satisfied(&self, assignment: &HashMap<Var, V>) -> bool {
        let mut seen = HashSet::with_capacity(self.scope.len());
        for &x in &self.scope {
            if let Some(v) = assignment.get(&x) {
                let transformed = self.apply(x, v);
                if !seen.insert(transformed) {
                    return false;
                }
            }
        }
        true
    }
}

impl<V: PartialEq + Send + Sync + 'static> AllDiff<V> {
    /// Expand to pairwise `Different` constraints, carrying each
    /// variable's transform along (spec.md §4.1, use (b)).
    pub fn iter_binary(&self) -> Vec<BinaryConstraint<V>> {
        let mut out = Vec::new();
        for i in 0..self.scope.len() {
            for j in (i + 1)..self.scope.len() {
                let x = self.scope[i];
                let y = self.scope[j];
                let mut pred = PredicateBinary::different(x, y);
                if let Some(t) = self.transforms.get(&x) {
                    pred = pred.with_x_transform(t.clone());
                }
                if let Some(t) = self.transforms.get(&y) {
                    pred = pred.with_y_transform(t.clone());
                }
                out.push(BinaryConstraint::Predicate(pred));
            }
        }
        out
    }
}
