//! Property-based tests for the nine invariants of spec.md §8.
//!
//! Generators are kept deliberately small (a handful of variables, small
//! domains) so brute-force cross-checks stay cheap while still exercising
//! the propagators/search/decomposer against an independent, naive
//! implementation of the same guarantee.

use csp_core::config::SolverConfig;
use csp_core::constraint::{AllDiff, BinaryConstraint, PredicateBinary};
use csp_core::decompose::decompose;
use csp_core::inference::Ac3;
use csp_core::inference::Regin;
use csp_core::matching::{ford_fulkerson_matching, hopcroft_karp};
use csp_core::problem::Problem;
use csp_core::scc::tarjan_scc;
use csp_core::{solve, SearchStats};

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn small_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=8).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n, 0..n), n).prop_map(move |mut adj| {
            for neighbors in &mut adj {
                neighbors.sort_unstable();
                neighbors.dedup();
            }
            adj
        })
    })
}

fn bipartite_adj() -> impl Strategy<Value = (usize, usize, Vec<Vec<usize>>)> {
    (1usize..=6, 1usize..=6).prop_flat_map(|(n, m)| {
        prop::collection::vec(prop::collection::vec(0..m, 0..m), n).prop_map(move |mut adj| {
            for neighbors in &mut adj {
                neighbors.sort_unstable();
                neighbors.dedup();
            }
            (n, m, adj)
        })
    })
}

fn reachable(graph: &[Vec<usize>], start: usize) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(u) = stack.pop() {
        for &v in &graph[u] {
            if seen.insert(v) {
                stack.push(v);
            }
        }
    }
    seen
}

/// `solve`/`Ac3`/`Regin` log via `log::info!`/`log::debug!`; wire a backend
/// so that output is visible when these tests are run with `RUST_LOG` set.
fn init_logging() {
    let _ = env_logger::try_init();
}

proptest! {
    /// 1. Matching correctness.
    #[test]
    fn matching_is_a_valid_matching_with_max_cardinality((n, m, adj) in bipartite_adj()) {
        let xs: Vec<usize> = (0..n).collect();
        let ys: Vec<usize> = (0..m).collect();
        let matched = hopcroft_karp(&xs, &ys, &adj);

        let mut seen_x = HashSet::new();
        let mut seen_y = HashSet::new();
        for &(x, y) in &matched {
            prop_assert!(seen_x.insert(x), "x {} matched twice", x);
            prop_assert!(seen_y.insert(y), "y {} matched twice", y);
            prop_assert!(adj[x].contains(&y), "matched edge ({x},{y}) not in input");
        }

        let ford_fulkerson = ford_fulkerson_matching(&xs, &ys, &adj);
        prop_assert_eq!(matched.len(), ford_fulkerson.len());
    }

    /// 2. SCC correctness.
    #[test]
    fn scc_groups_exactly_the_mutually_reachable_nodes(graph in small_graph()) {
        let comp = tarjan_scc(&graph);
        let n = graph.len();
        for u in 0..n {
            let fwd = reachable(&graph, u);
            for v in 0..n {
                let back = reachable(&graph, v);
                let mutually_reachable = fwd.contains(&v) && back.contains(&u);
                prop_assert_eq!(
                    comp[u] == comp[v],
                    mutually_reachable,
                    "u={u} v={v} comp-equality disagrees with mutual reachability"
                );
            }
        }
    }

    /// 3 & 4. AC-3.1 monotonicity (subset + idempotence) and soundness.
    #[test]
    fn ac3_is_monotone_idempotent_and_sound(
        bound in 2i32..=5,
        keep_less_than in any::<bool>(),
    ) {
        init_logging();
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", 1..=bound);
        let y = p.add_variable("y", 1..=bound);
        if keep_less_than {
            p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::less_than(x, y))).unwrap();
        } else {
            p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y))).unwrap();
        }

        let ac3 = Ac3::new(&p);
        let once = ac3.propagate(ac3.arc_iter(), p.domains());
        prop_assume!(once.is_some());
        let once = once.unwrap();

        for (before, after) in p.domains().iter().zip(once.iter()) {
            for v in after.iter() {
                prop_assert!(before.contains(v), "propagation added a value");
            }
        }

        let twice = ac3.propagate(ac3.arc_iter(), &once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert_eq!(a, b, "propagation is not idempotent");
        }

        let c = p.constraint(x, y).unwrap();
        for v in once[x].iter() {
            let supported = once[y].iter().any(|w| c.sat((x, y), p.value_of(v), p.value_of(w)));
            prop_assert!(supported, "value {:?} in x has no support in y", v);
        }
    }

    /// 5. AllDiff soundness.
    #[test]
    fn alldiff_keeps_exactly_the_values_on_some_maximum_matching(
        domains in prop::collection::vec(
            prop::collection::hash_set(1i32..=6, 1..=6).prop_map(|s| {
                let mut v: Vec<i32> = s.into_iter().collect();
                v.sort_unstable();
                v
            }),
            2..=4,
        ),
    ) {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let names = ["v0", "v1", "v2", "v3"];
        let xs: Vec<usize> = domains
            .iter()
            .enumerate()
            .map(|(i, d)| p.add_variable(names[i], d.clone()))
            .collect();

        let regin = Regin::new(&p);
        let alldiff = AllDiff::new(xs.clone());
        let result = regin.propagate(&alldiff, p.domains());

        // Independent brute-force: value graph over raw values, node per
        // distinct value, edge x -> value if value in x's domain.
        let mut node_of: HashMap<i32, usize> = HashMap::new();
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); xs.len()];
        for (i, d) in domains.iter().enumerate() {
            for &v in d {
                let next = node_of.len();
                let node = *node_of.entry(v).or_insert(next);
                adj[i].push(node);
            }
        }
        let m = node_of.len();
        let full_size = hopcroft_karp(&(0..xs.len()).collect::<Vec<_>>(), &(0..m).collect::<Vec<_>>(), &adj).len();

        match result {
            None => prop_assert!(full_size < xs.len(), "regin found infeasible but a full matching exists"),
            Some(after) => {
                for (i, &x) in xs.iter().enumerate() {
                    for &v in &domains[i] {
                        let node = node_of[&v];
                        let mut restricted = adj.clone();
                        restricted[i] = vec![node];
                        let size = hopcroft_karp(&(0..xs.len()).collect::<Vec<_>>(), &(0..m).collect::<Vec<_>>(), &restricted).len();
                        let keep_worthy = size == xs.len();
                        let id = p.id_of(&v).unwrap();
                        let kept = after[x].contains(id);
                        prop_assert_eq!(
                            kept, keep_worthy,
                            "value {v} at var {i}: kept={kept} keep_worthy={keep_worthy}"
                        );
                    }
                }
            }
        }
    }

    /// 6 & 7. Search soundness and completeness against brute force.
    #[test]
    fn search_is_sound_and_complete(
        bound in 2i32..=4,
        edges in prop::collection::vec((0usize..3, 0usize..3, any::<bool>()), 0..=3),
    ) {
        init_logging();
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let names = ["a", "b", "c"];
        let xs: Vec<usize> = names.iter().map(|n| p.add_variable(*n, 1..=bound)).collect();

        let mut pairs: Vec<(usize, usize, bool)> = Vec::new();
        for (i, j, different) in edges {
            if i == j {
                continue;
            }
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            if pairs.iter().any(|&(a, b, _)| a == lo && b == hi) {
                continue;
            }
            pairs.push((lo, hi, different));
            let op = if different {
                PredicateBinary::different(xs[lo], xs[hi])
            } else {
                PredicateBinary::less_than(xs[lo], xs[hi])
            };
            p.add_binary_constraint(BinaryConstraint::Predicate(op)).unwrap();
        }

        let solution = solve(&p, &SolverConfig::default()).unwrap();

        // brute force
        let mut brute_force_found = false;
        for a in 1..=bound {
            for b in 1..=bound {
                for c in 1..=bound {
                    let values = [a, b, c];
                    let ok = pairs.iter().all(|&(i, j, different)| {
                        if different {
                            values[i] != values[j]
                        } else {
                            values[i] < values[j]
                        }
                    });
                    if ok {
                        brute_force_found = true;
                    }
                }
            }
        }

        prop_assert_eq!(!solution.is_empty(), brute_force_found);

        if !solution.is_empty() {
            for &(i, j, different) in &pairs {
                let vi = solution[names[i]];
                let vj = solution[names[j]];
                if different {
                    prop_assert_ne!(vi, vj);
                } else {
                    prop_assert!(vi < vj);
                }
            }
        }
    }

    /// 8. Decomposer equivalence.
    #[test]
    fn decomposer_result_matches_whole_problem_feasibility(bound in 2i32..=4) {
        init_logging();
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let a = p.add_variable("a", 1..=bound);
        let b = p.add_variable("b", 1..=bound);
        let c = p.add_variable("c", 1..=bound);
        let d = p.add_variable("d", 1..=bound);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(a, b))).unwrap();
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(c, d))).unwrap();

        let parts = decompose(&p);
        prop_assert_eq!(parts.len(), 2);

        let whole = solve(&p, &SolverConfig::default()).unwrap();

        let mut merged: HashMap<usize, i32> = HashMap::new();
        let mut any_empty = false;
        for part in &parts {
            let sub_solution = csp_core::search::solve_one(&part.sub, &SolverConfig::default()).unwrap();
            if sub_solution.is_empty() {
                any_empty = true;
            }
            for (sub_var, value) in sub_solution {
                merged.insert(part.original_vars[sub_var], value);
            }
        }
        let component_feasible = !any_empty && merged.len() == p.num_vars();
        prop_assert_eq!(!whole.is_empty(), component_feasible);
    }

    /// 9. LCV total order is deterministic for a fixed snapshot.
    #[test]
    fn lcv_ordering_is_deterministic(bound in 2i32..=6) {
        let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
        let x = p.add_variable("x", 1..=bound);
        let y = p.add_variable("y", 1..=bound);
        p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y))).unwrap();

        let heuristics = csp_core::heuristics::Heuristics::new(&p);
        let unassigned = vec![true, true];
        let first = heuristics.sort_domain(x, p.domains(), &unassigned);
        let second = heuristics.sort_domain(x, p.domains(), &unassigned);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn search_stats_reports_problem_shape() {
    init_logging();
    let mut p: Problem<&str, i32> = Problem::with_binary_only(false);
    let x = p.add_variable("x", [1, 2]);
    let y = p.add_variable("y", [1, 2]);
    p.add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y)))
        .unwrap();
    let stats = SearchStats::for_problem(&p);
    assert_eq!(stats.vars, 2);
    assert_eq!(stats.binary, 2);
    assert_eq!(stats.global, 0);
}
