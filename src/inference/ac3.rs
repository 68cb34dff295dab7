//! AC-3.1 arc consistency with last-support memoisation (spec.md §4.5).
//!
//! The plain-AC3 shape (`revise`/`propagate`/`infer`, queue of arcs,
//! requeue `(z, x)` for `z != y` on shrink) is ported from
//! `original_source/csp/inference.py::AC3`. That source implements plain
//! AC-3 (`revise` rescans `domain_y` from scratch every time); this module
//! adds the "last support" cache spec.md §4.5 and §9 require: per `(x, v,
//! y)`, remember the last `y`-value (and its position in a stable
//! value-id ordering of `y`, snapshotted once per [`Ac3::propagate`] call)
//! that supported `v`, and resume scanning from there instead of from the
//! start.

use crate::constraint::{BinaryConstraint, Var};
use crate::domain::Domain;
use crate::problem::{Assign, Problem};
use crate::value::ValId;

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// AC-3.1 arc-consistency propagator bound to one problem's constraint
/// graph.
pub struct Ac3<'p, K, V> {
    problem: &'p Problem<K, V>,
}

impl<'p, K, V> Ac3<'p, K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new(problem: &'p Problem<K, V>) -> Self {
        Self { problem }
    }

    /// Every binary arc in the constraint graph, both directions
    /// (`original_source/csp/inference.py::AC3.arc_iter`).
    pub fn arc_iter(&self) -> impl Iterator<Item = (Var, Var)> + '_ {
        (0..self.problem.num_vars())
            .flat_map(move |x| self.problem.neighbors(x).map(move |y| (x, y)))
    }

    /// `assign(var, val)` fixes `domains[var] := {val}` on a deep copy,
    /// then propagates over every arc (spec.md §4.5 `infer`).
    pub fn infer(&self, assign: Assign, domains: &[Domain]) -> Option<Vec<Domain>> {
        let domains = assign.apply(domains);
        self.propagate(self.arc_iter(), &domains)
    }

    /// Run arc consistency to a fixpoint starting from `arcs`, returning
    /// the revised domains or `None` on infeasibility (spec.md §4.5).
    pub fn propagate(
        &self,
        arcs: impl IntoIterator<Item = (Var, Var)>,
        domains: &[Domain],
    ) -> Option<Vec<Domain>> {
        let mut domains: Vec<Domain> = domains.to_vec();

        // Stable snapshot of every domain's ascending-ValId ordering, taken
        // once for this whole propagation run (spec.md §4.5: "A stable
        // ordering of each y-domain (snapshot at context creation)").
        let orderings: Vec<Vec<ValId>> = domains.iter().map(|d| d.iter().collect()).collect();
        let mut cache: HashMap<(Var, ValId, Var), (ValId, usize)> = HashMap::new();

        let mut queue: VecDeque<(Var, Var)> = arcs.into_iter().collect();
        while let Some((x, y)) = queue.pop_front() {
            let c = self
                .problem
                .constraint(x, y)
                .expect("arc (x, y) must have a registered constraint");
            if self.revise(x, y, c, &mut domains, &orderings, &mut cache) {
                if domains[x].is_empty() {
                    return None;
                }
                for z in self.problem.neighbors(x) {
                    if z != y {
                        queue.push_back((z, x));
                    }
                }
            }
        }

        Some(domains)
    }

    /// Delete every value from `domains[x]` that has no support in
    /// `domains[y]` under `c`, using and updating the last-support cache.
    /// Returns whether anything was deleted.
    fn revise(
        &self,
        x: Var,
        y: Var,
        c: &BinaryConstraint<V>,
        domains: &mut [Domain],
        orderings: &[Vec<ValId>],
        cache: &mut HashMap<(Var, ValId, Var), (ValId, usize)>,
    ) -> bool {
        let y_order = &orderings[y];
        let x_vals: Vec<ValId> = domains[x].iter().collect();
        let mut deleted = false;

        for v in x_vals {
            let key = (x, v, y);
            let still_supported = match cache.get(&key) {
                Some(&(last_w, _)) if domains[y].contains(last_w) => true,
                _ => {
                    let start = cache.get(&key).map(|&(_, idx)| idx).unwrap_or(0);
                    let support = y_order
                        .iter()
                        .enumerate()
                        .skip(start)
                        .find(|&(_, &w)| {
                            domains[y].contains(w)
                                && c.sat(
                                    (x, y),
                                    self.problem.value_of(v),
                                    self.problem.value_of(w),
                                )
                        })
                        .map(|(i, &w)| (w, i));
                    match support {
                        Some(found) => {
                            cache.insert(key, found);
                            true
                        }
                        None => false,
                    }
                }
            };

            if !still_supported {
                domains[x].remove(v);
                deleted = true;
            }
        }

        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{BinaryConstraint, PredicateBinary};

    fn chain_problem() -> Problem<&'static str, i32> {
        // S1: x1>x2, x2!=x3, x2+x3>4 over {1,2,3}/{1,2,3}/{2,3}
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x1 = p.add_variable("x1", [1, 2, 3]);
        let x2 = p.add_variable("x2", [1, 2, 3]);
        let x3 = p.add_variable("x3", [2, 3]);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::greater_than(
            x1, x2,
        )))
        .unwrap();
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(
            x2, x3,
        )))
        .unwrap();
        p.add_binary_constraint(BinaryConstraint::Linear(crate::constraint::LinearBinary::new(
            x2,
            x3,
            1,
            1,
            4,
            crate::constraint::LinearOp::Gt,
        )))
        .unwrap();
        p
    }

    #[test]
    fn s1_ac3_chain_propagates_to_expected_domains() {
        let p = chain_problem();
        let ac3 = Ac3::new(&p);
        let result = ac3
            .propagate(ac3.arc_iter(), p.domains())
            .expect("feasible");

        let as_values = |d: &Domain, p: &Problem<&str, i32>| -> Vec<i32> {
            let mut v: Vec<i32> = d.iter().map(|id| *p.value_of(id)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(as_values(&result[0], &p), vec![3]);
        assert_eq!(as_values(&result[1], &p), vec![2]);
        assert_eq!(as_values(&result[2], &p), vec![3]);
    }

    #[test]
    fn s1_assigning_x1_to_1_is_infeasible() {
        let p = chain_problem();
        let ac3 = Ac3::new(&p);
        let x1_val = p.id_of(&1).unwrap();
        let assign = Assign::new(0, x1_val);
        assert!(ac3.infer(assign, p.domains()).is_none());
    }

    #[test]
    fn s1_assigning_x1_to_3_reaches_same_propagated_domains() {
        let p = chain_problem();
        let ac3 = Ac3::new(&p);
        let x1_val = p.id_of(&3).unwrap();
        let assign = Assign::new(0, x1_val);
        let result = ac3.infer(assign, p.domains()).expect("feasible");
        let as_values = |d: &Domain| -> Vec<i32> {
            let mut v: Vec<i32> = d.iter().map(|id| *p.value_of(id)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(as_values(&result[0]), vec![3]);
        assert_eq!(as_values(&result[1]), vec![2]);
        assert_eq!(as_values(&result[2]), vec![3]);
    }

    #[test]
    fn s2_ac3_shift_propagates_to_expected_domains() {
        // S2: x1=x2, x2+1=x3 over {1,2,3} each
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x1 = p.add_variable("x1", [1, 2, 3]);
        let x2 = p.add_variable("x2", [1, 2, 3]);
        let x3 = p.add_variable("x3", [1, 2, 3]);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::same(x1, x2)))
            .unwrap();
        p.add_binary_constraint(BinaryConstraint::Linear(crate::constraint::LinearBinary::new(
            x2,
            x3,
            1,
            -1,
            -1,
            crate::constraint::LinearOp::Eq,
        )))
        .unwrap();

        let ac3 = Ac3::new(&p);
        let result = ac3
            .propagate(ac3.arc_iter(), p.domains())
            .expect("feasible");
        let as_values = |d: &Domain| -> Vec<i32> {
            let mut v: Vec<i32> = d.iter().map(|id| *p.value_of(id)).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(as_values(&result[0]), vec![1, 2]);
        assert_eq!(as_values(&result[1]), vec![1, 2]);
        assert_eq!(as_values(&result[2]), vec![2, 3]);
    }

    #[test]
    fn propagation_is_idempotent() {
        let p = chain_problem();
        let ac3 = Ac3::new(&p);
        let once = ac3.propagate(ac3.arc_iter(), p.domains()).unwrap();
        let twice = ac3.propagate(ac3.arc_iter(), &once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a, b);
        }
    }
}
