//! The problem builder: interns variables and values, stores domains,
//! binary-constraint adjacency, and globals (spec.md §4.2).
//!
//! Grounded on `original_source/csp/model.py::CSP` — `_var_ids`/`_vars`,
//! `_doms`, `_consts`, `_global`/`_scoped_global` map directly onto this
//! module's fields, and `init`/`consistent` are line-for-line ports of the
//! same-named methods there. The one structural change: `consts[x][y]` and
//! `consts[y][x]` there are the *same Python object* (shared reference);
//! here they are two index-table entries into one `arena` vec
//! (spec.md §9: "arena + index, or shared-ownership handle").

use crate::config::SolverConfig;
use crate::constraint::{AllDiff, BinaryConstraint, Unary, Var};
use crate::domain::Domain;
use crate::error::{SolverError, SolverResult};
use crate::value::{ValId, ValueTable};

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// A materialized assignment: `var(var,val)` fixes `domains[var] :=
/// {val}` on a deep copy (spec.md §4.5, `original_source/csp/model.py::Assign`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assign {
    pub var: Var,
    pub val: ValId,
}

impl Assign {
    pub fn new(var: Var, val: ValId) -> Self {
        Self { var, val }
    }

    /// Deep-copy `domains`, then collapse `var`'s domain to `{val}`.
    pub fn apply(&self, domains: &[Domain]) -> Vec<Domain> {
        let mut next: Vec<Domain> = domains.to_vec();
        next[self.var] = Domain::from_ids([self.val]);
        next
    }
}

/// Partial assignment plus the per-variable "still free" flag search
/// mutates in place (spec.md §3, §4.10).
#[derive(Debug, Clone)]
pub struct AssignCtx<V> {
    pub assignment: HashMap<Var, V>,
    pub unassigned: Vec<bool>,
}

/// A finite-domain constraint satisfaction problem over user keys `K` and
/// opaque values `V`.
///
/// Built once via `add_*`, then queried read-only by inference, heuristics,
/// the decomposer, and search (spec.md §3 "Lifecycles").
pub struct Problem<K, V> {
    var_ids: HashMap<K, Var>,
    vars: Vec<K>,
    doms: Vec<Domain>,
    consts: Vec<HashMap<Var, usize>>,
    arena: Vec<BinaryConstraint<V>>,
    global: Vec<Arc<AllDiff<V>>>,
    scoped_global: Vec<Vec<Arc<AllDiff<V>>>>,
    values: ValueTable<V>,
    binary_only: bool,
}

impl<K, V> Problem<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_binary_only(
            std::env::var("BINARY_ONLY")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        )
    }

    pub fn with_binary_only(binary_only: bool) -> Self {
        Self {
            var_ids: HashMap::new(),
            vars: Vec::new(),
            doms: Vec::new(),
            consts: Vec::new(),
            arena: Vec::new(),
            global: Vec::new(),
            scoped_global: Vec::new(),
            values: ValueTable::new(),
            binary_only,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::with_binary_only(config.binary_only)
    }

    /// Register `key` with the given domain, or replace its domain if
    /// already registered. Returns the dense `Var` index.
    pub fn add_variable(&mut self, key: K, domain: impl IntoIterator<Item = V>) -> Var {
        let ids: Vec<ValId> = domain.into_iter().map(|v| self.values.intern(v)).collect();
        let dom = Domain::from_ids(ids);
        if let Some(&x) = self.var_ids.get(&key) {
            self.doms[x] = dom;
            x
        } else {
            let x = self.vars.len();
            self.var_ids.insert(key.clone(), x);
            self.vars.push(key);
            self.doms.push(dom);
            self.consts.push(HashMap::new());
            self.scoped_global.push(Vec::new());
            x
        }
    }

    /// Resolve a previously-registered key to its dense index.
    pub fn var(&self, key: &K) -> SolverResult<Var>
    where
        K: std::fmt::Debug,
    {
        self.var_ids
            .get(key)
            .copied()
            .ok_or_else(|| SolverError::UnknownVariable {
                key: format!("{key:?}"),
            })
    }

    fn check_var(&self, x: Var) -> SolverResult<()> {
        if x < self.vars.len() {
            Ok(())
        } else {
            Err(SolverError::UnknownVariable {
                key: format!("var#{x}"),
            })
        }
    }

    /// Assert a binary constraint between two already-registered variables,
    /// folding it into any existing constraint on the same pair
    /// (spec.md §3, §4.2).
    pub fn add_binary_constraint(&mut self, constraint: BinaryConstraint<V>) -> SolverResult<()> {
        let (x, y) = constraint.vars();
        self.check_var(x)?;
        self.check_var(y)?;
        match self.consts[x].get(&y).copied() {
            Some(idx) => {
                let existing = std::mem::replace(
                    &mut self.arena[idx],
                    BinaryConstraint::Conjunction(Vec::new()),
                );
                self.arena[idx] = existing.fold(constraint);
            }
            None => {
                let idx = self.arena.len();
                self.arena.push(constraint);
                self.consts[x].insert(y, idx);
                self.consts[y].insert(x, idx);
            }
        }
        Ok(())
    }

    /// Filter `unary.x`'s domain in place by `unary.pred` (spec.md §4.1:
    /// "resolved at build time by filtering `domains[x]`").
    pub fn add_unary(&mut self, unary: Unary<V>) -> SolverResult<()> {
        self.check_var(unary.x)?;
        let x = unary.x;
        let kept: Vec<ValId> = self
            .doms[x]
            .iter()
            .filter(|&id| (unary.pred)(self.values.value_of(id)))
            .collect();
        self.doms[x] = Domain::from_ids(kept);
        Ok(())
    }

    /// Register an `AllDiff` global, or — if `binary_only` is set — expand
    /// it to pairwise `Different` binary constraints instead
    /// (spec.md §4.2, §6 `BINARY_ONLY`).
    pub fn add_alldiff(&mut self, alldiff: AllDiff<V>) -> SolverResult<()>
    where
        V: PartialEq + Send + Sync + 'static,
    {
        for &x in alldiff.scope() {
            self.check_var(x)?;
        }
        if self.binary_only {
            for c in alldiff.iter_binary() {
                self.add_binary_constraint(c)?;
            }
        } else {
            let alldiff = Arc::new(alldiff);
            for &x in alldiff.scope() {
                self.scoped_global[x].push(Arc::clone(&alldiff));
            }
            self.global.push(alldiff);
        }
        Ok(())
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// Distinct values present across all *current* domains.
    pub fn num_vals(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for dom in &self.doms {
            seen.extend(dom.iter());
        }
        seen.len()
    }

    pub fn variables(&self) -> &[K] {
        &self.vars
    }

    pub fn domains(&self) -> &[Domain] {
        &self.doms
    }

    pub fn globals(&self) -> &[Arc<AllDiff<V>>] {
        &self.global
    }

    pub fn scoped_globals(&self, x: Var) -> &[Arc<AllDiff<V>>] {
        &self.scoped_global[x]
    }

    /// Binary neighbours of `x` (both directions of every constraint
    /// touching `x`).
    pub fn neighbors(&self, x: Var) -> impl Iterator<Item = Var> + '_ {
        self.consts[x].keys().copied()
    }

    pub fn constraint(&self, x: Var, y: Var) -> Option<&BinaryConstraint<V>> {
        self.consts[x].get(&y).map(|&idx| &self.arena[idx])
    }

    pub fn value_of(&self, id: ValId) -> &V {
        self.values.value_of(id)
    }

    pub fn id_of(&self, value: &V) -> Option<ValId> {
        self.values.id_of(value)
    }

    pub fn key_of(&self, x: Var) -> &K {
        &self.vars[x]
    }

    /// Initial assignment: every singleton-domain variable pre-assigned,
    /// `unassigned` true elsewhere (spec.md §4.2).
    pub fn init(&self) -> AssignCtx<V> {
        let mut assignment = HashMap::new();
        let mut unassigned = vec![true; self.vars.len()];
        for x in 0..self.vars.len() {
            if let Some(id) = self.doms[x].singleton_value() {
                assignment.insert(x, self.values.value_of(id).clone());
                unassigned[x] = false;
            }
        }
        AssignCtx {
            assignment,
            unassigned,
        }
    }

    pub fn as_solution(&self, a: &HashMap<Var, V>) -> HashMap<K, V> {
        a.iter()
            .map(|(&x, v)| (self.vars[x].clone(), v.clone()))
            .collect()
    }

    pub fn complete(&self, a: &HashMap<Var, V>) -> bool {
        a.len() == self.num_vars()
    }

    /// `x := x_val` is consistent with `a` under every global whose scope
    /// contains `x`, and every binary constraint to an already-assigned
    /// neighbour (spec.md §4.2).
    pub fn consistent(&self, x: Var, x_val: &V, a: &HashMap<Var, V>) -> bool {
        let mut extended = a.clone();
        extended.insert(x, x_val.clone());
        if !self.scoped_global[x]
            .iter()
            .all(|g| g.satisfied(&extended))
        {
            return false;
        }
        self.consts[x].iter().all(|(&y, &idx)| match a.get(&y) {
            Some(y_val) => self.arena[idx].sat((x, y), x_val, y_val),
            None => true,
        })
    }
}

impl<K, V> Default for Problem<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
