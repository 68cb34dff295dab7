//! Variable and value ordering heuristics (spec.md §4.8).
//!
//! MRV+degree is ported from `original_source/csp/heuristics.py::MRV`
//! (same `(domain_len, -active_degree)` tie-break, generalized here to also
//! count `AllDiff`-induced neighbours as spec.md §4.8 requires). LCV is not
//! present in the retrieved `original_source` snapshot (its `solver.py`
//! imports a `LeastConstraining` class this pack's excerpt doesn't include)
//! — built directly from spec.md's description.

use crate::constraint::Var;
use crate::domain::Domain;
use crate::problem::Problem;
use crate::value::ValId;

use std::collections::HashSet;
use std::hash::Hash;

/// Precomputed neighbour sets (binary + `AllDiff` co-scope) for MRV's
/// degree tie-break, bound to one problem.
pub struct Heuristics<'p, K, V> {
    problem: &'p Problem<K, V>,
    neighbors: Vec<HashSet<Var>>,
}

impl<'p, K, V> Heuristics<'p, K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new(problem: &'p Problem<K, V>) -> Self {
        let n = problem.num_vars();
        let mut neighbors = vec![HashSet::new(); n];
        for x in 0..n {
            for y in problem.neighbors(x) {
                neighbors[x].insert(y);
            }
        }
        for global in problem.globals() {
            for &x in global.scope() {
                for &y in global.scope() {
                    if x != y {
                        neighbors[x].insert(y);
                    }
                }
            }
        }
        Self { problem, neighbors }
    }

    fn active_degree(&self, x: Var, unassigned: &[bool]) -> usize {
        self.neighbors[x].iter().filter(|&&y| unassigned[y]).count()
    }

    /// MRV variable selection: smallest current domain among unassigned
    /// variables, ties broken by largest active degree.
    pub fn select_var(&self, unassigned: &[bool], domains: &[Domain]) -> Var {
        (0..self.problem.num_vars())
            .filter(|&x| unassigned[x])
            .min_by_key(|&x| {
                (
                    domains[x].len(),
                    std::cmp::Reverse(self.active_degree(x, unassigned)),
                )
            })
            .expect("select_var requires at least one unassigned variable")
    }

    /// LCV value ordering for `x`: ascending by the number of `(y, w)`
    /// pairs, `y` unassigned and `w` in `y`'s domain, inconsistent with
    /// `x := v` (spec.md §4.8).
    pub fn sort_domain(&self, x: Var, domains: &[Domain], unassigned: &[bool]) -> Vec<ValId> {
        let mut vals: Vec<ValId> = domains[x].iter().collect();
        vals.sort_by_key(|&v| self.conflict_count(x, v, domains, unassigned));
        vals
    }

    fn conflict_count(&self, x: Var, v: ValId, domains: &[Domain], unassigned: &[bool]) -> usize {
        let x_val = self.problem.value_of(v);
        let mut count = 0;
        for y in self.problem.neighbors(x) {
            if !unassigned[y] {
                continue;
            }
            let Some(c) = self.problem.constraint(x, y) else {
                continue;
            };
            for w in domains[y].iter() {
                if !c.sat((x, y), x_val, self.problem.value_of(w)) {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{AllDiff, BinaryConstraint, PredicateBinary};

    #[test]
    fn mrv_picks_smallest_domain() {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", [1, 2, 3]);
        let y = p.add_variable("y", [1]);
        let h = Heuristics::new(&p);
        let unassigned = vec![true, true];
        let chosen = h.select_var(&unassigned, p.domains());
        assert_eq!(chosen, y);
        let _ = x;
    }

    #[test]
    fn mrv_tie_break_prefers_higher_degree() {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", [1, 2]);
        let y = p.add_variable("y", [1, 2]);
        let z = p.add_variable("z", [1, 2]);
        // x is constrained against both y and z; y and z only against x.
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y)))
            .unwrap();
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, z)))
            .unwrap();
        let h = Heuristics::new(&p);
        let unassigned = vec![true, true, true];
        assert_eq!(h.select_var(&unassigned, p.domains()), x);
    }

    #[test]
    fn alldiff_scope_counts_toward_degree() {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", [1, 2]);
        let y = p.add_variable("y", [1, 2]);
        let z = p.add_variable("z", [1, 2]);
        p.add_alldiff(AllDiff::new(vec![x, y, z])).unwrap();
        let h = Heuristics::new(&p);
        // all three have equal domain size and equal alldiff-induced degree
        let unassigned = vec![true, true, true];
        let chosen = h.select_var(&unassigned, p.domains());
        assert!([x, y, z].contains(&chosen));
    }

    #[test]
    fn lcv_orders_least_constraining_first() {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", [1, 2, 3]);
        let y = p.add_variable("y", [1, 2, 3]);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y)))
            .unwrap();
        let h = Heuristics::new(&p);
        let unassigned = vec![true, true];
        let order = h.sort_domain(x, p.domains(), &unassigned);
        // every x-value rules out exactly one y-value here, so all tie;
        // the ordering must at least be a permutation of the full domain.
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn lcv_is_deterministic_for_a_fixed_snapshot() {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", [3, 1, 2]);
        let y = p.add_variable("y", [2]);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y)))
            .unwrap();
        let h = Heuristics::new(&p);
        let unassigned = vec![true, true];
        let first = h.sort_domain(x, p.domains(), &unassigned);
        let second = h.sort_domain(x, p.domains(), &unassigned);
        assert_eq!(first, second);
    }
}
