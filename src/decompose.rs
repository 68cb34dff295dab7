//! Decomposition of a problem into independently solvable sub-problems by
//! connected components of the binary-constraint graph (spec.md §4.9).
//!
//! Ported from `original_source/csp/solver.py::_split`: build the symmetric
//! binary-constraint adjacency, run SCC over it, and rebuild one
//! sub-[`Problem`] per component by re-registering its variables, binary
//! constraints and any `AllDiff` globals fully contained in it — all
//! rebased onto the sub-problem's own fresh dense indices. The Python skips
//! splitting whenever any global constraint is present ("take into account
//! global consts" is a TODO there); this crate does the same, since an
//! `AllDiff` can span variables that would otherwise land in different
//! components.

use crate::constraint::Var;
use crate::problem::Problem;
use crate::scc::{component_sets, tarjan_scc};

use std::collections::HashMap;
use std::hash::Hash;

/// One independent piece of the original problem, carrying the dense
/// indices (`Var`, into the *original* problem) of its members alongside
/// the rebuilt sub-[`Problem`] itself. `original_vars[i]` is the original
/// variable that sub-problem variable `i` corresponds to.
pub struct Component<K, V> {
    pub sub: Problem<K, V>,
    pub original_vars: Vec<Var>,
}

/// Split `problem` into independent components, or a single component
/// covering the whole problem if any global constraint is registered or
/// the constraint graph is already fully connected (spec.md §4.9).
pub fn decompose<K, V>(problem: &Problem<K, V>) -> Vec<Component<K, V>>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash + PartialEq + Send + Sync + 'static,
{
    if !problem.globals().is_empty() {
        return vec![whole_problem(problem)];
    }

    let n = problem.num_vars();
    let graph: Vec<Vec<usize>> = (0..n).map(|x| problem.neighbors(x).collect()).collect();
    let comp = tarjan_scc(&graph);
    let sets = component_sets(&comp);

    if sets.len() <= 1 {
        return vec![whole_problem(problem)];
    }

    sets.into_iter().map(|members| sub_problem(problem, members)).collect()
}

fn whole_problem<K, V>(problem: &Problem<K, V>) -> Component<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash + PartialEq + Send + Sync + 'static,
{
    sub_problem(problem, (0..problem.num_vars()).collect())
}

fn sub_problem<K, V>(problem: &Problem<K, V>, members: Vec<Var>) -> Component<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash + PartialEq + Send + Sync + 'static,
{
    let mut sub: Problem<K, V> = Problem::with_binary_only(false);

    // Original `Var` -> local `Var` in `sub`. Every constraint/global we
    // carry over must be rebased through this before re-registering, since
    // `sub` assigns fresh dense indices in `members` order rather than
    // reusing the original ones.
    let mut to_local: HashMap<Var, Var> = HashMap::with_capacity(members.len());
    for &x in &members {
        let values: Vec<V> = problem.domains()[x]
            .iter()
            .map(|id| problem.value_of(id).clone())
            .collect();
        let local = sub.add_variable(problem.key_of(x).clone(), values);
        to_local.insert(x, local);
    }

    // All neighbours of a member are members too, by SCC construction; a
    // plain per-member sweep visits every intra-component edge exactly
    // twice, and `add_binary_constraint` folds duplicates harmlessly.
    for &x in &members {
        for y in problem.neighbors(x) {
            if let Some(c) = problem.constraint(x, y) {
                sub.add_binary_constraint(c.remap(&to_local))
                    .expect("endpoints were just registered above");
            }
        }
    }

    // Globals fully contained in this component carry over too — dropping
    // them here would mean `AllDiff` is silently unenforced in the rebuilt
    // sub-problem that `solve_one` actually searches.
    for global in problem.globals() {
        if global.scope().iter().all(|x| to_local.contains_key(x)) {
            sub.add_alldiff(global.remapped(&to_local))
                .expect("endpoints were just registered above");
        }
    }

    Component {
        sub,
        original_vars: members,
    }
}
