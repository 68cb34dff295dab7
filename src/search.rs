//! Backtracking search (spec.md §4.10), plus the ambient additions
//! SPEC_FULL.md §4.10 asks for: [`SearchStats`] bookkeeping and a
//! timeout/memory check at every node.
//!
//! The recursion/rollback discipline — mutate `ctx.assignment` and
//! `ctx.unassigned` in place, restore on every early return, never mutate
//! `domains` itself — is a direct port of
//! `original_source/csp/solver.py::_solve::backtracking_search`.
//! [`with_sized_stack`] ports `original_source/csp/utils.py::recursionlimit`:
//! Rust has no settable recursion limit to restore afterwards, so instead
//! of raising-then-lowering a global, it runs the search on a dedicated,
//! pre-sized thread and joins it.

use crate::config::SolverConfig;
use crate::constraint::Var;
use crate::domain::Domain;
use crate::error::{SolverError, SolverResult};
use crate::heuristics::Heuristics;
use crate::inference::InferenceEngine;
use crate::problem::{AssignCtx, Problem};

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

/// Per-solve counters, ported from `original_source/csp/solver.py`'s
/// `Counter`-based `stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub vars: usize,
    pub binary: usize,
    pub global: usize,
    pub states: u64,
    pub inferences: u64,
    pub inconsistent: u64,
    pub pruned: u64,
    pub backtracks: u64,
}

impl SearchStats {
    pub fn for_problem<K, V>(problem: &Problem<K, V>) -> Self {
        let binary: usize = (0..problem.num_vars()).map(|x| problem.neighbors(x).count()).sum();
        Self {
            vars: problem.num_vars(),
            binary,
            global: problem.globals().len(),
            ..Self::default()
        }
    }

    fn log_summary(&self) {
        log::info!(
            "search finished: states={} inferences={} inconsistent={} pruned={} backtracks={}",
            self.states,
            self.inferences,
            self.inconsistent,
            self.pruned,
            self.backtracks
        );
    }
}

/// Run `f` on a freshly spawned thread whose stack is pre-sized to
/// `stack_bytes`, and join it. Used so deep recursion (spec.md §5: depth
/// can reach `~2*(num_vars+num_vals)`) doesn't blow the calling thread's
/// default stack.
pub fn with_sized_stack<F, T>(stack_bytes: usize, f: F) -> T
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    std::thread::scope(|scope| {
        std::thread::Builder::new()
            .stack_size(stack_bytes)
            .spawn_scoped(scope, f)
            .expect("failed to spawn sized-stack search thread")
            .join()
            .expect("search thread panicked")
    })
}

/// `2*(num_vars + num_vals)` stack frames' worth of bytes, using a
/// generous per-frame estimate (spec.md §5/§7,
/// `original_source/csp/solver.py::_estimate_recursion_depth`).
pub fn estimate_stack_bytes<K, V>(problem: &Problem<K, V>) -> usize {
    const BYTES_PER_FRAME: usize = 4096;
    const MIN_STACK_BYTES: usize = 1 << 20;
    let depth = 2 * (problem.num_vars() + problem.num_vals());
    (depth * BYTES_PER_FRAME).max(MIN_STACK_BYTES)
}

/// Rough estimate of one domain-set clone's live size in bytes, used for
/// the memory-ceiling check (spec.md §7 "resource exhaustion").
fn domains_bytes(domains: &[Domain]) -> u64 {
    domains.iter().map(|d| d.word_len() as u64 * 8 + 24).sum()
}

/// Solve one (already decomposed, already binary-only-expanded as needed)
/// problem via MRV + LCV + the two-propagator inference fixpoint
/// (spec.md §4.10).
pub fn solve_one<K, V>(
    problem: &Problem<K, V>,
    config: &SolverConfig,
) -> SolverResult<HashMap<Var, V>>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    let heuristics = Heuristics::new(problem);
    let inference = InferenceEngine::new(problem);
    let mut stats = SearchStats::for_problem(problem);
    let start = Instant::now();

    let mut ctx = problem.init();
    let domains = inference.propagate(problem.domains());
    let Some(domains) = domains else {
        stats.log_summary();
        return Ok(HashMap::new());
    };

    let result = backtrack(
        problem,
        &heuristics,
        &inference,
        config,
        &mut stats,
        start,
        0,
        &mut ctx,
        &domains,
    )?;

    stats.log_summary();
    Ok(result.unwrap_or_default())
}

#[allow(clippy::too_many_arguments)]
fn backtrack<K, V>(
    problem: &Problem<K, V>,
    heuristics: &Heuristics<'_, K, V>,
    inference: &InferenceEngine<'_, K, V>,
    config: &SolverConfig,
    stats: &mut SearchStats,
    start: Instant,
    depth: usize,
    ctx: &mut AssignCtx<V>,
    domains: &[Domain],
) -> SolverResult<Option<HashMap<Var, V>>>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    if problem.complete(&ctx.assignment) {
        return Ok(Some(ctx.assignment.clone()));
    }

    if let Some(timeout_ms) = config.timeout_ms {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if elapsed_ms > timeout_ms {
            return Err(SolverError::Timeout { elapsed_ms });
        }
    }
    if let Some(limit_mb) = config.max_memory_mb {
        let live_bytes = domains_bytes(domains) * (depth as u64 + 1);
        if live_bytes > limit_mb * 1_000_000 {
            return Err(SolverError::MemoryLimit { limit_mb });
        }
    }

    stats.states += 1;
    let x = heuristics.select_var(&ctx.unassigned, domains);
    ctx.unassigned[x] = false;

    log::debug!(
        "search depth={depth} state={} choosing var={x} |assignment|={}",
        stats.states,
        ctx.assignment.len()
    );

    for v in heuristics.sort_domain(x, domains, &ctx.unassigned) {
        let value = problem.value_of(v).clone();
        if !problem.consistent(x, &value, &ctx.assignment) {
            stats.inconsistent += 1;
            continue;
        }

        ctx.assignment.insert(x, value.clone());
        stats.inferences += 1;

        let assign = crate::problem::Assign::new(x, v);
        let revised = inference.infer(assign, domains);

        if let Some(revised) = revised {
            let found = backtrack(
                problem, heuristics, inference, config, stats, start, depth + 1, ctx, &revised,
            )?;
            if found.is_some() {
                return Ok(found);
            }
            stats.backtracks += 1;
        } else {
            stats.pruned += 1;
        }

        ctx.assignment.remove(&x);
    }

    ctx.unassigned[x] = true;
    Ok(None)
}
