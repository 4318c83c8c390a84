//! # hitfactor
//!
//! High hit factor (HHF) estimation for shooting-sport classifier stages.
//!
//! The HHF is the threshold marking the Master classification boundary of a
//! stage. This crate estimates it from historical hit-factor samples by
//! fitting a two-parameter Weibull distribution via maximum likelihood and
//! reading the HHF off a calibrated quantile:
//!
//! ```text
//! HHF = quantile(percentile) / percentage
//! ```
//!
//! ## Modules
//!
//! - [`weibull`] — Weibull distribution with closed-form moments
//! - [`hhf`] — HHF methods: per-stage MLE fitting and the global
//!   percentile/percentage calibration regression
//! - [`optimize`] — derivative-free minimizers (Nelder–Mead simplex,
//!   seeded differential evolution)
//! - [`sample`] — validated hit-factor samples
//! - [`source`] — data-source seam for fetching stage scores
//! - [`error`] — error taxonomy
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: fixed initial guesses and a seeded global search
//!   make every fit and calibration exactly reproducible
//! - **Fail fast**: invalid parameters and non-converged optimizers are
//!   surfaced as errors, never silently defaulted
//! - **Domain-agnostic core**: distributions and optimizers operate on raw
//!   `f64` data; only the `hhf` layer knows about classifier stages

pub mod error;
pub mod hhf;
pub mod optimize;
pub mod sample;
pub mod source;
pub mod weibull;

pub use error::HhfError;
pub use hhf::{CalibrationRegressor, ClassTier, WeibullFitter};
pub use sample::Sample;
pub use source::{SampleSource, StageSamples};
pub use weibull::Weibull;
