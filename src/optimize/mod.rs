//! Derivative-free minimizers.
//!
//! Provides the two optimizers the HHF pipeline needs:
//!
//! - [`nelder_mead`] — local simplex search, used for per-stage
//!   maximum-likelihood fitting (unbounded, gradient-free)
//! - [`differential_evolution`] — seeded global search over a bounded box,
//!   used for the percentile/percentage calibration regression whose cost
//!   surface need not be convex or unimodal
//!
//! Both run under a fixed iteration budget and report their termination
//! status in [`MinimizeResult::converged`] instead of failing internally;
//! callers decide whether a non-converged result is an error.
//!
//! # References
//!
//! - Nelder & Mead (1965). "A Simplex Method for Function Minimization",
//!   *The Computer Journal* 7(4).
//! - Storn & Price (1997). "Differential Evolution — A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces",
//!   *J. Global Optimization* 11.

mod differential_evolution;
mod nelder_mead;

pub use differential_evolution::{differential_evolution, DifferentialEvolutionOptions};
pub use nelder_mead::{nelder_mead, NelderMeadOptions};

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct MinimizeResult {
    /// Best parameter vector found.
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    /// Iterations (generations for the global search) performed.
    pub iterations: usize,
    /// Objective evaluations performed.
    pub nfev: usize,
    /// Whether the convergence criterion was met within the budget.
    pub converged: bool,
}
