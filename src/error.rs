//! Error types for HHF estimation.
//!
//! All errors here are programmer or input errors: they are surfaced
//! immediately to the caller and never retried, since every computation in
//! this crate is deterministic given the same inputs and seed.

use thiserror::Error;

/// Errors produced by distribution construction, fitting, and calibration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HhfError {
    /// A distribution parameter or function argument is out of range.
    ///
    /// Raised for non-positive Weibull scale/shape, percentile or
    /// percentage arguments outside (0, 1), and empty samples.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown class tier name passed to the class-match shortcut.
    #[error("unsupported class tier: {0:?} (expected one of \"GM\", \"M\", \"A\")")]
    UnsupportedClassTier(String),

    /// An optimizer exhausted its iteration budget without converging.
    ///
    /// The termination status is surfaced instead of returning a
    /// possibly-garbage parameter estimate.
    #[error("{context}: optimizer did not converge within {iterations} iterations")]
    OptimizationFailure {
        /// Which optimization run failed.
        context: &'static str,
        /// Iterations consumed before giving up.
        iterations: usize,
    },
}
