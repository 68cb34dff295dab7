//! The public orchestrator: decompose, solve each component (in parallel
//! when there's more than one and `parallelism` allows it), merge
//! (spec.md §4.9, §5; `original_source/csp/solver.py::solve`).

use crate::config::{Parallelism, SolverConfig};
use crate::constraint::Var;
use crate::decompose::{decompose, Component};
use crate::error::SolverResult;
use crate::problem::Problem;
use crate::search::{estimate_stack_bytes, solve_one, with_sized_stack};

use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// Find a complete assignment for `problem`, or an empty map if none
/// exists (spec.md §6: "empty map iff infeasible").
///
/// Misuse (an unregistered variable slipping through construction,
/// a resource ceiling) is reported as `Err`; plain infeasibility is
/// `Ok(HashMap::new())` — never conflated, per spec.md §7's taxonomy.
pub fn solve<K, V>(problem: &Problem<K, V>, config: &SolverConfig) -> SolverResult<HashMap<K, V>>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Eq + Hash + PartialEq + Send + Sync + 'static,
{
    let components = decompose(problem);

    if components.len() > 1 {
        log::info!("problem split into {} independent components", components.len());
    }

    let results: Vec<SolverResult<HashMap<Var, V>>> = if components.len() <= 1 {
        components.iter().map(|c| run_component(c, config)).collect()
    } else {
        match config.parallelism {
            Parallelism::Sequential => {
                components.iter().map(|c| run_component(c, config)).collect()
            }
            Parallelism::Auto => {
                components.par_iter().map(|c| run_component(c, config)).collect()
            }
            Parallelism::Fixed(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .expect("failed to build a fixed-size rayon pool");
                pool.install(|| components.par_iter().map(|c| run_component(c, config)).collect())
            }
        }
    };

    let mut merged: HashMap<Var, V> = HashMap::new();
    for (component, result) in components.iter().zip(results) {
        let sub_solution = result?;
        if sub_solution.is_empty() {
            return Ok(HashMap::new());
        }
        for (sub_var, value) in sub_solution {
            let original_var = component.original_vars[sub_var];
            merged.insert(original_var, value);
        }
    }

    if merged.len() != problem.num_vars() {
        return Ok(HashMap::new());
    }

    Ok(merged
        .into_iter()
        .map(|(x, v)| (problem.key_of(x).clone(), v))
        .collect())
}

fn run_component<K, V>(
    component: &Component<K, V>,
    config: &SolverConfig,
) -> SolverResult<HashMap<Var, V>>
where
    K: Clone + Eq + Hash + Sync,
    V: Clone + Eq + Hash + Send + Sync,
{
    let stack_bytes = estimate_stack_bytes(&component.sub);
    with_sized_stack(stack_bytes, || solve_one(&component.sub, config))
}
