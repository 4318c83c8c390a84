//! High hit factor (HHF) estimation methods.
//!
//! The HHF is the performance threshold marking the Master classification
//! boundary of a classifier stage. Both methods here model a stage's
//! historical hit factors with a Weibull distribution and read the HHF off
//! a quantile:
//!
//! ```text
//! HHF = quantile(percentile) / percentage
//! ```
//!
//! - [`WeibullFitter`] — fixes (percentile, percentage) up front, either
//!   explicitly or from a named class tier, and fits one stage
//! - [`CalibrationRegressor`] — learns the (percentile, percentage) pair
//!   from reference stages with known HHFs, then applies it to new stages

mod calibration;
mod fitter;

pub use calibration::{CalibrationRegressor, CALIBRATION_SEED};
pub use fitter::{ClassTier, WeibullFitter, DEFAULT_PERCENTAGE, DEFAULT_PERCENTILE};
