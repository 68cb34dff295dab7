//! Error handling for the CSP solver.
//!
//! All public, fallible entry points return `Result<T, SolverError>`.
//! Per the error taxonomy this crate implements, `SolverError` is reserved
//! for *misuse* (a programmer error such as referencing an unregistered
//! variable) and *resource exhaustion* (timeout, memory ceiling). Plain
//! infeasibility — the expected outcome when a CSP has no solution — is
//! never an error: `solve` returns `Ok` with an empty solution map.

use thiserror::Error;

/// Failure modes reported by the solver's public API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A binary constraint, unary constraint, or `AllDiff` referenced a
    /// variable key that was never registered via [`crate::Problem::add_variable`].
    #[error("unknown variable: {key}")]
    UnknownVariable {
        /// Debug rendering of the offending key.
        key: String,
    },

    /// A variable key was registered with an empty domain, or a
    /// `remove`/filter operation emptied a domain outside of search
    /// (both caller errors, not search-time infeasibility).
    #[error("invalid domain for {key}: {reason}")]
    InvalidDomain {
        /// Debug rendering of the offending key.
        key: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// A per-argument transform produced values that cannot be compared
    /// under the constraint that consumes them (e.g. an `Ord` constraint
    /// fed a transform whose codomain isn't `Ord`).
    #[error("transform on {key} produced an incomparable value: {reason}")]
    IncomparableTransform {
        /// Debug rendering of the offending key.
        key: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// The configured timeout elapsed before search completed.
    #[error("solve timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds elapsed before the timeout fired.
        elapsed_ms: u64,
    },

    /// The configured memory ceiling was (estimated to be) exceeded.
    #[error("memory limit of {limit_mb}MB exceeded")]
    MemoryLimit {
        /// The configured limit, in megabytes.
        limit_mb: u64,
    },
}

/// Convenience alias for results that can fail with [`SolverError`].
pub type SolverResult<T> = Result<T, SolverError>;
