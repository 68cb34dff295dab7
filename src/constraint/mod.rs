//! Constraint algebra: unary filters, composed binary constraints, and the
//! `AllDiff` global.
//!
//! Per the redesign this crate follows (spec.md §9: "re-architect as a
//! tagged variant"), binary constraints are not trait objects dispatched
//! through a shared interface the way
//! `original_source/csp/constraints.py::BinConst` does it; they are a
//! closed enum (`Predicate` / `Linear` / `Conjunction`) so `sat` is a
//! single match rather than a virtual call. Predicates and linear checks
//! still carry a boxed closure internally — that part of the original's
//! `Callable[[Value, Value], bool]` design is kept as-is, since the
//! alternative (a further tagged enum per comparator) buys nothing once the
//! closure must already be `Send + Sync` for parallel sub-solves.

pub mod alldiff;
pub mod linear;
pub mod predicate;

pub use alldiff::AllDiff;
pub use linear::{LinearBinary, LinearOp};
pub use predicate::{PredicateBinary, PredicateOp};

use std::collections::HashMap;
use std::sync::Arc;

/// Dense variable index, assigned by [`crate::problem::Problem`] interning.
pub type Var = usize;

/// A per-argument value transform, e.g. `x + i` (spec.md §4.1).
///
/// Boxed rather than generic so `PredicateBinary`/`LinearBinary`/`AllDiff`
/// don't need a type parameter per closure; `Send + Sync` is required
/// because transforms may be evaluated from parallel decomposed sub-solves.
pub type Transform<V> = Arc<dyn Fn(&V) -> V + Send + Sync>;

/// A unary constraint: `(x, p: V -> bool)`, resolved at build time by
/// filtering `domains[x]` (spec.md §4.1) rather than carried as a live
/// constraint object.
pub struct Unary<V> {
    pub x: Var,
    pub pred: Arc<dyn Fn(&V) -> bool + Send + Sync>,
}

impl<V> Unary<V> {
    pub fn new(x: Var, pred: impl Fn(&V) -> bool + Send + Sync + 'static) -> Self {
        Self {
            x,
            pred: Arc::new(pred),
        }
    }
}

/// A binary constraint between two variables, folded at insertion time into
/// a conjunction if more than one is asserted on the same pair
/// (spec.md §3: "Multiple constraints on the same pair are folded into a
/// conjunction (ConstSet)").
pub enum BinaryConstraint<V> {
    Predicate(PredicateBinary<V>),
    Linear(LinearBinary<V>),
    /// Conjunction of binary constraints sharing the same two endpoints.
    /// Always non-empty; constructed only via [`BinaryConstraint::fold`].
    Conjunction(Vec<BinaryConstraint<V>>),
}

impl<V> Clone for BinaryConstraint<V> {
    fn clone(&self) -> Self {
        match self {
            BinaryConstraint::Predicate(p) => BinaryConstraint::Predicate(p.clone()),
            BinaryConstraint::Linear(l) => BinaryConstraint::Linear(l.clone()),
            BinaryConstraint::Conjunction(cs) => BinaryConstraint::Conjunction(cs.clone()),
        }
    }
}

impl<V> BinaryConstraint<V> {
    /// The canonical `(x, y)` pair this constraint was built with.
    pub fn vars(&self) -> (Var, Var) {
        match self {
            BinaryConstraint::Predicate(p) => p.vars(),
            BinaryConstraint::Linear(l) => l.vars(),
            BinaryConstraint::Conjunction(cs) => {
                cs.first().expect("conjunction is never empty").vars()
            }
        }
    }

    /// Evaluate this constraint for the arc `(x, y)` — which may be the
    /// reverse of the constraint's own canonical order, in which case the
    /// values are swapped before dispatch (spec.md §4.1).
    pub fn sat(&self, arc: (Var, Var), x_val: &V, y_val: &V) -> bool {
        let (cx, cy) = self.vars();
        if arc == (cx, cy) {
            self.sat_ordered(x_val, y_val)
        } else {
            debug_assert_eq!(arc, (cy, cx), "arc does not match either orientation");
            self.sat_ordered(y_val, x_val)
        }
    }

    /// Evaluate this constraint with values given in its own canonical
    /// `(x, y)` order.
    fn sat_ordered(&self, x_val: &V, y_val: &V) -> bool {
        match self {
            BinaryConstraint::Predicate(p) => p.sat_ordered(x_val, y_val),
            BinaryConstraint::Linear(l) => l.sat_ordered(x_val, y_val),
            BinaryConstraint::Conjunction(cs) => {
                cs.iter().all(|c| c.sat_ordered(x_val, y_val))
            }
        }
    }

    /// Rebase both endpoints through `map` (original [`Var`] -> new
    /// [`Var`]) — used by [`crate::decompose::decompose`] when rebuilding a
    /// sub-problem whose variables get fresh dense indices. Panics if an
    /// endpoint is missing from `map`, which would mean the caller tried to
    /// carry a constraint into a sub-problem that doesn't cover both of its
    /// endpoints.
    pub fn remap(&self, map: &HashMap<Var, Var>) -> BinaryConstraint<V> {
        match self {
            BinaryConstraint::Predicate(p) => {
                let (x, y) = p.vars();
                BinaryConstraint::Predicate(p.remapped(map[&x], map[&y]))
            }
            BinaryConstraint::Linear(l) => {
                let (x, y) = l.vars();
                BinaryConstraint::Linear(l.remapped(map[&x], map[&y]))
            }
            BinaryConstraint::Conjunction(cs) => {
                BinaryConstraint::Conjunction(cs.iter().map(|c| c.remap(map)).collect())
            }
        }
    }

    /// Fold `other` into `self`, flattening nested conjunctions
    /// (`original_source/csp/constraints.py::ConstSet.__iand__`).
    pub fn fold(self, other: BinaryConstraint<V>) -> BinaryConstraint<V> {
        let mut members = match self {
            BinaryConstraint::Conjunction(cs) => cs,
            other => vec![other],
        };
        match other {
            BinaryConstraint::Conjunction(cs) => members.extend(cs),
            leaf => members.push(leaf),
        }
        BinaryConstraint::Conjunction(members)
    }

    /// Human-readable rendering, joined with `&` for conjunctions
    /// (mirrors `ConstSet.__str__`).
    pub fn display(&self) -> String {
        match self {
            BinaryConstraint::Predicate(p) => p.display(),
            BinaryConstraint::Linear(l) => l.display(),
            BinaryConstraint::Conjunction(cs) => cs
                .iter()
                .map(BinaryConstraint::display)
                .collect::<Vec<_>>()
                .join(" & "),
        }
    }
}
