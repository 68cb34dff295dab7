//! The inference engine: alternates the `AllDiff` propagator with AC-3.1
//! until neither reduces a domain (spec.md §4.7).

pub mod ac3;
pub mod regin;

pub use ac3::Ac3;
pub use regin::{AllDiffInference, Regin};

use crate::domain::Domain;
use crate::problem::{Assign, Problem};

use std::hash::Hash;

/// Fixpoint of the global (`AllDiff`) and binary (AC-3.1) propagators,
/// bound to one problem's constraint graph.
///
/// Grounded on spec.md §4.7: "(a) run all AllDiff propagators to their own
/// fixpoint; (b) run AC-3.1 over all binary arcs; repeat while either step
/// reduced a domain." No direct `original_source` counterpart exists —
/// `original_source/csp/solver.py` calls `AC3` alone — this orchestration
/// is new per spec.md's explicit two-propagator design.
pub struct InferenceEngine<'p, K, V> {
    ac3: Ac3<'p, K, V>,
    alldiff: AllDiffInference<'p, K, V>,
}

impl<'p, K, V> InferenceEngine<'p, K, V>
where
    K: Clone + Eq + Hash,
    V: Clone + Eq + Hash,
{
    pub fn new(problem: &'p Problem<K, V>) -> Self {
        Self {
            ac3: Ac3::new(problem),
            alldiff: AllDiffInference::new(problem),
        }
    }

    /// `assign(var, val)` fixes `domains[var] := {val}` on a deep copy,
    /// then propagates both global and binary constraints to a joint
    /// fixpoint. Returns `None` on infeasibility (spec.md §4.7).
    pub fn infer(&self, assign: Assign, domains: &[Domain]) -> Option<Vec<Domain>> {
        let domains = assign.apply(domains);
        self.propagate(&domains)
    }

    /// Run both propagators to a joint fixpoint without first making an
    /// assignment (used to build the root node's initial domains).
    pub fn propagate(&self, domains: &[Domain]) -> Option<Vec<Domain>> {
        let mut domains: Vec<Domain> = domains.to_vec();
        loop {
            let after_alldiff = self.alldiff.propagate(&domains)?;
            let alldiff_changed = after_alldiff
                .iter()
                .zip(domains.iter())
                .any(|(a, b)| a != b);
            domains = after_alldiff;

            let after_ac3 = self.ac3.propagate(self.ac3.arc_iter(), &domains)?;
            let ac3_changed = after_ac3.iter().zip(domains.iter()).any(|(a, b)| a != b);
            domains = after_ac3;

            if !alldiff_changed && !ac3_changed {
                break;
            }
        }
        Some(domains)
    }
}
