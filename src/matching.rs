//! Bipartite maximum matching: Hopcroft–Karp (primary) and a DFS-based
//! Ford–Fulkerson variant (fallback), both grounded on
//! `original_source/csp/matching.py::hopcroft_karp` /
//! `max_bipartite_matching` and ported close to 1:1.
//!
//! Used by the Régin alldiff propagator (spec.md §4.6 step 2) over the
//! value graph: `xs` are scope variables, `ys` are domain values, `adj[i]`
//! the (by-index) values still in `x_i`'s domain.

use std::collections::VecDeque;

const NIL: usize = 0;

struct HopcroftKarpState {
    pair_u: Vec<usize>,
    pair_v: Vec<usize>,
    dist: Vec<usize>,
}

impl HopcroftKarpState {
    fn new(m: usize, n: usize) -> Self {
        Self {
            pair_u: vec![NIL; m + 1],
            pair_v: vec![NIL; n + 1],
            dist: vec![0; m + 1],
        }
    }

    /// Level-BFS from every free `x`. Returns whether any free `y` was
    /// reached (i.e. whether an augmenting phase is possible).
    fn bfs(&mut self, adj: &[Vec<usize>]) -> bool {
        let m = self.pair_u.len() - 1;
        let inf = usize::MAX;
        let mut queue = VecDeque::new();
        for u in 1..=m {
            if self.pair_u[u] == NIL {
                self.dist[u] = 0;
                queue.push_back(u);
            } else {
                self.dist[u] = inf;
            }
        }
        self.dist[NIL] = inf;

        while let Some(u) = queue.pop_front() {
            if self.dist[u] < self.dist[NIL] {
                for &v0 in &adj[u - 1] {
                    let v = v0 + 1;
                    if self.dist[self.pair_v[v]] == inf {
                        self.dist[self.pair_v[v]] = self.dist[u] + 1;
                        queue.push_back(self.pair_v[v]);
                    }
                }
            }
        }
        self.dist[NIL] != inf
    }

    fn dfs(&mut self, u: usize, adj: &[Vec<usize>]) -> bool {
        if u == NIL {
            return true;
        }
        let inf = usize::MAX;
        for &v0 in &adj[u - 1] {
            let v = v0 + 1;
            if self.dist[self.pair_v[v]] == self.dist[u] + 1 && self.dfs(self.pair_v[v], adj) {
                self.pair_v[v] = u;
                self.pair_u[u] = v;
                return true;
            }
        }
        self.dist[u] = inf;
        false
    }
}

/// Maximum bipartite matching via Hopcroft–Karp, `O(E * sqrt(V))`
/// (spec.md §4.3).
///
/// `adj[i]` lists the indices into `ys` that `xs[i]` may match to.
/// Fails soft: on a graph with no perfect matching this returns whatever
/// maximum matching exists; compare `result.len()` against `xs.len()` to
/// detect it.
pub fn hopcroft_karp<X: Copy, Y: Copy>(xs: &[X], ys: &[Y], adj: &[Vec<usize>]) -> Vec<(X, Y)> {
    let m = xs.len();
    let mut state = HopcroftKarpState::new(m, ys.len());
    while state.bfs(adj) {
        for u in 1..=m {
            if state.pair_u[u] == NIL {
                state.dfs(u, adj);
            }
        }
    }
    (1..=m)
        .filter_map(|u| {
            let v = state.pair_u[u];
            (v != NIL).then(|| (xs[u - 1], ys[v - 1]))
        })
        .collect()
}

/// DFS-based (Ford–Fulkerson-style) maximum bipartite matching,
/// `O(V*E)` worst case. An acceptable fallback per spec.md §4.3;
/// kept as an independently-testable alternative to Hopcroft–Karp.
pub fn ford_fulkerson_matching<X: Copy, Y: Copy>(
    xs: &[X],
    ys: &[Y],
    adj: &[Vec<usize>],
) -> Vec<(X, Y)> {
    fn search(
        x: usize,
        adj: &[Vec<usize>],
        matching: &mut [Option<usize>],
        seen: &mut [bool],
    ) -> bool {
        for &y in &adj[x] {
            if !seen[y] {
                seen[y] = true;
                if matching[y].is_none_or(|m| search(m, adj, matching, seen)) {
                    matching[y] = Some(x);
                    return true;
                }
            }
        }
        false
    }

    let mut matching: Vec<Option<usize>> = vec![None; ys.len()];
    for x in 0..xs.len() {
        let mut seen = vec![false; ys.len()];
        search(x, adj, &mut matching, &mut seen);
    }
    matching
        .iter()
        .enumerate()
        .filter_map(|(j, mx)| mx.map(|x| (xs[x], ys[j])))
        .collect()
}
