//! Configuration for the CSP solver.
//!
//! This module provides [`SolverConfig`], a consuming builder for the
//! resource-control knobs the core exposes: solve timeout, memory ceiling,
//! parallel decomposition strategy, and whether global constraints should
//! be pre-expanded into pairwise binary constraints at build time.
//!
//! # Examples
//!
//! ```rust
//! use csp_core::config::{Parallelism, SolverConfig};
//!
//! let config = SolverConfig::default()
//!     .with_timeout_ms(30_000)
//!     .with_parallelism(Parallelism::Sequential);
//! assert_eq!(config.timeout_ms, Some(30_000));
//! ```

/// How independent sub-problems produced by the decomposer are solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Let the runtime decide (currently: `rayon`'s global pool, one task
    /// per decomposed component).
    #[default]
    Auto,
    /// Solve every decomposed component on the calling thread, in order.
    /// Useful for deterministic tests and for environments where spawning
    /// worker threads is undesirable.
    Sequential,
    /// Use at most this many worker threads for decomposed sub-solves.
    Fixed(usize),
}

/// Configuration for a single [`crate::solve`] call.
///
/// Use [`SolverConfig::default`] for sensible defaults, or the `with_*`
/// builder methods to customize individual fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum wall-clock time to spend solving, in milliseconds.
    /// `None` means no timeout.
    pub timeout_ms: Option<u64>,

    /// Approximate maximum memory, in megabytes, the search is allowed to
    /// retain in live domain-set clones before it aborts with
    /// [`crate::SolverError::MemoryLimit`]. `None` means no limit.
    pub max_memory_mb: Option<u64>,

    /// How decomposed sub-problems are dispatched.
    pub parallelism: Parallelism,

    /// Force global (`AllDiff`) constraints to be pre-expanded into
    /// pairwise `Different` binary constraints at build time, bypassing
    /// the Régin propagator entirely. Mirrors the `BINARY_ONLY`
    /// environment variable; a debugging/benchmarking switch only.
    pub binary_only: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_memory_mb: None,
            parallelism: Parallelism::Auto,
            binary_only: std::env::var("BINARY_ONLY")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl SolverConfig {
    /// Equivalent to [`SolverConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the solve timeout in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Remove the timeout (allow unlimited solving time).
    pub fn without_timeout(mut self) -> Self {
        self.timeout_ms = None;
        self
    }

    /// Set the memory ceiling in megabytes.
    pub fn with_max_memory_mb(mut self, max_memory_mb: u64) -> Self {
        self.max_memory_mb = Some(max_memory_mb);
        self
    }

    /// Set the parallel decomposition strategy.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Force binary-only expansion of global constraints.
    pub fn with_binary_only(mut self, binary_only: bool) -> Self {
        self.binary_only = binary_only;
        self
    }
}
