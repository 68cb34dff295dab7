//! A finite-domain constraint satisfaction problem (CSP) solver core:
//! AC-3.1 arc consistency with last-support memoisation, Régin's
//! bipartite-matching `AllDiff` propagator, MRV/degree and
//! least-constraining-value heuristics, connected-component
//! decomposition, and backtracking search.
//!
//! Build a [`Problem`], then call [`solve`]:
//!
//! ```rust
//! use csp_core::config::SolverConfig;
//! use csp_core::constraint::{BinaryConstraint, PredicateBinary};
//! use csp_core::problem::Problem;
//! use csp_core::solve;
//!
//! let _ = env_logger::try_init();
//!
//! let mut problem: Problem<&str, i32> = Problem::new();
//! let x = problem.add_variable("x", [1, 2, 3]);
//! let y = problem.add_variable("y", [1, 2, 3]);
//! problem
//!     .add_binary_constraint(BinaryConstraint::Predicate(PredicateBinary::different(x, y)))
//!     .unwrap();
//!
//! let solution = solve(&problem, &SolverConfig::default()).unwrap();
//! assert_ne!(solution["x"], solution["y"]);
//! ```
//!
//! This crate is library-only: no wire formats, no persisted state, no
//! file I/O. The one environment knob it reads is `BINARY_ONLY`, which
//! forces `AllDiff` globals to pre-expand into pairwise `Different`
//! binary constraints at build time — a debugging/benchmarking switch.

pub mod config;
pub mod constraint;
pub mod decompose;
pub mod domain;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod inference;
pub mod matching;
pub mod problem;
pub mod scc;
pub mod search;
pub mod solve;
pub mod value;

pub use config::{Parallelism, SolverConfig};
pub use error::{SolverError, SolverResult};
pub use inference::{Ac3, AllDiffInference, InferenceEngine, Regin};
pub use matching::{ford_fulkerson_matching, hopcroft_karp};
pub use problem::Problem;
pub use scc::{component_sets, tarjan_scc};
pub use search::SearchStats;
pub use solve::solve;
