//! Régin's bipartite-matching `AllDiff` propagator (spec.md §4.6).
//!
//! Not present in `original_source` (its `AllDiff` only offers the
//! partial-assignment check and the pairwise-`Different` fallback, spec.md
//! §4.1 uses (a)/(b)) — this is the "hard part" spec.md §1 calls out by
//! name, built from its step-by-step description and grounded
//! algorithmically on `selen::gac.rs`'s `BipartiteGraph` / `Matching` /
//! `SCCFinder` / residual-graph pipeline, restated here over this crate's
//! own [`crate::matching::hopcroft_karp`] and [`crate::scc::tarjan_scc`].

use crate::constraint::{AllDiff, Var};
use crate::domain::Domain;
use crate::graph;
use crate::matching::hopcroft_karp;
use crate::problem::Problem;
use crate::scc::tarjan_scc;
use crate::value::ValId;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Régin's alldiff propagator bound to one problem (for value lookups).
pub struct Regin<'p, K, V> {
    problem: &'p Problem<K, V>,
}

impl<'p, K, V> Regin<'p, K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new(problem: &'p Problem<K, V>) -> Self {
        Self { problem }
    }

    /// Prune every value that cannot appear in any maximum matching of
    /// `alldiff`'s value graph under `domains`. Returns `None` on
    /// infeasibility (spec.md §4.6 steps 1-5).
    pub fn propagate(&self, alldiff: &AllDiff<V>, domains: &[Domain]) -> Option<Vec<Domain>> {
        let scope: Vec<Var> = alldiff.scope().to_vec();
        let n = scope.len();

        // Step 1: value graph. `adj[x_idx]` lists distinct transformed-value
        // node ids reachable from scope member `x_idx`; `origin` remembers
        // which pre-transform ValIds collapse onto each (x_idx, node) edge,
        // so pruning can remove every one of them if the transform isn't
        // injective (spec.md §9 open question: no injectivity check, the
        // matching still operates soundly on post-transform nodes).
        let mut node_of: HashMap<V, usize> = HashMap::new();
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut origin: HashMap<(usize, usize), Vec<ValId>> = HashMap::new();

        for (x_idx, &x) in scope.iter().enumerate() {
            let mut seen: HashSet<usize> = HashSet::new();
            for v in domains[x].iter() {
                let transformed = alldiff.apply(x, self.problem.value_of(v));
                let next_id = node_of.len();
                let node = *node_of.entry(transformed).or_insert(next_id);
                origin.entry((x_idx, node)).or_default().push(v);
                if seen.insert(node) {
                    adj[x_idx].push(node);
                }
            }
        }
        let m = node_of.len();

        // Step 2: maximum matching.
        let xs: Vec<usize> = (0..n).collect();
        let ys: Vec<usize> = (0..m).collect();
        let matched = hopcroft_karp(&xs, &ys, &adj);
        if matched.len() < n {
            return None;
        }
        let mut match_of_x = vec![usize::MAX; n];
        let mut match_of_y = vec![usize::MAX; m];
        for &(x_idx, node) in &matched {
            match_of_x[x_idx] = node;
            match_of_y[node] = x_idx;
        }

        // Step 3: oriented residual graph on n + m vertices: x-vertices
        // `0..n`, value-vertices `n..n+m`. Matched edges point x -> v;
        // unmatched edges point v -> x.
        let total = n + m;
        let mut residual: Vec<Vec<usize>> = vec![Vec::new(); total];
        for (x_idx, neighbors) in adj.iter().enumerate() {
            for &node in neighbors {
                let y_vertex = n + node;
                if match_of_x[x_idx] == node {
                    residual[x_idx].push(y_vertex);
                } else {
                    residual[y_vertex].push(x_idx);
                }
            }
        }

        // Step 4: mark consistent edges — in M, on an alternating cycle
        // (SCC-internal), or on an even alternating path from a free vertex.
        let mut consistent: HashSet<(usize, usize)> = matched.iter().copied().collect();

        let comp = tarjan_scc(&residual);
        for (x_idx, neighbors) in adj.iter().enumerate() {
            for &node in neighbors {
                if comp[x_idx] == comp[n + node] {
                    consistent.insert((x_idx, node));
                }
            }
        }

        let free_vertices: Vec<usize> = (0..n)
            .filter(|&x_idx| match_of_x[x_idx] == usize::MAX)
            .chain((0..m).filter(|&node| match_of_y[node] == usize::MAX).map(|node| n + node))
            .collect();
        for (from, to) in graph::bfs(&residual, free_vertices) {
            if from < n {
                consistent.insert((from, to - n));
            } else {
                consistent.insert((to, from - n));
            }
        }

        // Step 5: prune every unmarked edge's pre-image values.
        let mut next_domains: Vec<Domain> = domains.to_vec();
        for (x_idx, &x) in scope.iter().enumerate() {
            for &node in &adj[x_idx] {
                if !consistent.contains(&(x_idx, node)) {
                    for &v in origin.get(&(x_idx, node)).into_iter().flatten() {
                        next_domains[x].remove(v);
                    }
                }
            }
        }
        for &x in &scope {
            if next_domains[x].is_empty() {
                return None;
            }
        }

        Some(next_domains)
    }
}

/// Runs [`Regin::propagate`] over every `AllDiff` global repeatedly until
/// none of them reduces a domain (spec.md §4.6 last paragraph).
pub struct AllDiffInference<'p, K, V> {
    problem: &'p Problem<K, V>,
    regin: Regin<'p, K, V>,
}

impl<'p, K, V> AllDiffInference<'p, K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new(problem: &'p Problem<K, V>) -> Self {
        Self {
            problem,
            regin: Regin::new(problem),
        }
    }

    pub fn propagate(&self, domains: &[Domain]) -> Option<Vec<Domain>> {
        let mut domains: Vec<Domain> = domains.to_vec();
        loop {
            let mut changed = false;
            for alldiff in self.problem.globals() {
                let next = self.regin.propagate(alldiff, &domains)?;
                if next.iter().zip(domains.iter()).any(|(a, b)| a != b) {
                    changed = true;
                }
                domains = next;
            }
            if !changed {
                break;
            }
        }
        Some(domains)
    }
}
