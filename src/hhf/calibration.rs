//! Percentile-percentage calibration regression.
//!
//! Finds the single (percentile, percentage) pair that best reproduces the
//! known HHFs of a set of reference stages, then applies that pair to a
//! target stage. The cost being minimized is the mean squared log-ratio
//! error across the reference stages:
//!
//! ```text
//! cost(p, pct) = mean_i [ ln( (Q_i(p)/pct) / HHF_i ) ]²
//! ```
//!
//! The log-ratio makes the cost scale-invariant: relative deviation is
//! penalized uniformly regardless of each stage's HHF magnitude. The
//! surface need not be convex or unimodal over (p, pct), so a seeded
//! differential evolution searches the whole unit box.

use log::debug;

use crate::error::HhfError;
use crate::optimize::{differential_evolution, DifferentialEvolutionOptions};
use crate::sample::Sample;
use crate::weibull::Weibull;

use super::fitter::WeibullFitter;

/// Fixed seed for the calibration search; keeps results reproducible.
pub const CALIBRATION_SEED: u64 = 123;

/// Epsilon keeping the search box strictly inside (0, 1).
const BOUND_MARGIN: f64 = 1e-6;

/// One reference stage: historical hit factors plus the known HHF.
type Reference = (Sample, f64);

/// Calibrates (percentile, percentage) against reference stages and applies
/// it to a target stage.
///
/// Calibration runs once per regressor instance: the reference fits and the
/// global search are memoized, so repeated HHF queries (including queries
/// for new stage samples via [`CalibrationRegressor::hhf_for`]) reuse the
/// calibrated pair.
#[derive(Debug, Clone)]
pub struct CalibrationRegressor {
    target: Sample,
    references: Vec<Reference>,
    seed: u64,
    calibrated: Option<(f64, f64)>,
}

impl CalibrationRegressor {
    /// Creates a regressor for `target` calibrated against `references`.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] if `references` is empty or
    /// any known HHF is non-positive or non-finite.
    pub fn new(target: Sample, references: Vec<Reference>) -> Result<Self, HhfError> {
        Self::with_seed(target, references, CALIBRATION_SEED)
    }

    /// Same as [`CalibrationRegressor::new`] with an explicit search seed.
    pub fn with_seed(
        target: Sample,
        references: Vec<Reference>,
        seed: u64,
    ) -> Result<Self, HhfError> {
        if references.is_empty() {
            return Err(HhfError::InvalidParameter(
                "calibration requires at least one reference stage".to_string(),
            ));
        }
        if let Some((_, bad)) = references
            .iter()
            .find(|(_, hhf)| !hhf.is_finite() || *hhf <= 0.0)
        {
            return Err(HhfError::InvalidParameter(format!(
                "reference HHFs must be positive and finite, got {bad}"
            )));
        }
        Ok(Self {
            target,
            references,
            seed,
            calibrated: None,
        })
    }

    /// The calibrated (percentile, percentage), if calibration has run.
    pub fn calibrated(&self) -> Option<(f64, f64)> {
        self.calibrated
    }

    /// Runs the calibration regression and memoizes the result.
    ///
    /// Every reference sample is fitted exactly once, up front; the global
    /// search then evaluates its cost against the precomputed immutable
    /// list of fitted distributions, never refitting inside the loop.
    ///
    /// # Errors
    /// Returns [`HhfError::OptimizationFailure`] if a per-stage fit or the
    /// global search fails to converge within its budget.
    pub fn calibrate(&mut self) -> Result<(f64, f64), HhfError> {
        if let Some(pair) = self.calibrated {
            return Ok(pair);
        }

        // Independent per-stage fits; order does not matter.
        let mut fitted: Vec<Weibull> = Vec::with_capacity(self.references.len());
        for (sample, _) in &self.references {
            let mut fitter = WeibullFitter::new(sample.clone());
            fitted.push(fitter.fit()?.clone());
        }
        let known: Vec<f64> = self.references.iter().map(|(_, hhf)| *hhf).collect();

        let cost = |params: &[f64]| {
            let (percentile, percentage) = (params[0], params[1]);
            let mut total = 0.0;
            for (weibull, known_hhf) in fitted.iter().zip(&known) {
                let quantile = match weibull.quantile(percentile) {
                    Ok(q) => q,
                    Err(_) => return f64::INFINITY,
                };
                let log_ratio = ((quantile / percentage) / known_hhf).ln();
                total += log_ratio * log_ratio;
            }
            total / known.len() as f64
        };

        let bounds = [
            (BOUND_MARGIN, 1.0 - BOUND_MARGIN),
            (BOUND_MARGIN, 1.0 - BOUND_MARGIN),
        ];
        let options = DifferentialEvolutionOptions {
            seed: self.seed,
            ..DifferentialEvolutionOptions::default()
        };
        let result = differential_evolution(cost, &bounds, &options)?;
        if !result.converged {
            return Err(HhfError::OptimizationFailure {
                context: "percentile-percentage calibration",
                iterations: result.iterations,
            });
        }

        let pair = (result.x[0], result.x[1]);
        debug!(
            "calibration: percentile={:.6} percentage={:.6} cost={:.6e} generations={}",
            pair.0, pair.1, result.fun, result.iterations
        );
        self.calibrated = Some(pair);
        Ok(pair)
    }

    /// Returns the calibrated HHF of the target stage, calibrating on
    /// first use.
    pub fn hhf(&mut self) -> Result<f64, HhfError> {
        let target = self.target.clone();
        self.hhf_for(&target)
    }

    /// Applies the calibrated pair to an arbitrary stage sample.
    ///
    /// Reuses the memoized calibration; only the stage fit and quantile
    /// lookup are computed per call.
    pub fn hhf_for(&mut self, sample: &Sample) -> Result<f64, HhfError> {
        let (percentile, percentage) = self.calibrate()?;
        let mut fitter = WeibullFitter::new(sample.clone());
        fitter.hhf_with(percentile, percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hit factors on the midpoint-quantile grid of Weibull(lam, k).
    fn quantile_grid(lam: f64, k: f64, n: usize) -> Sample {
        let values: Vec<f64> = (1..=n)
            .map(|i| {
                let p = (i as f64 - 0.5) / n as f64;
                lam * (-(1.0 - p).ln()).powf(1.0 / k)
            })
            .collect();
        Sample::new(values).unwrap()
    }

    /// True HHF at tier M for a Weibull(lam, k) stage.
    fn true_hhf(lam: f64, k: f64) -> f64 {
        lam * (-(0.05_f64).ln()).powf(1.0 / k) / 0.85
    }

    /// Reference stages with known HHFs generated from the same
    /// (percentile, percentage) convention the regressor should recover.
    fn reference_set() -> Vec<(Sample, f64)> {
        [(4.0, 3.2), (6.5, 3.6), (8.0, 4.0), (11.0, 3.4)]
            .iter()
            .map(|&(lam, k)| (quantile_grid(lam, k, 120), true_hhf(lam, k)))
            .collect()
    }

    #[test]
    fn test_reproduces_reference_outcomes() {
        let target = quantile_grid(7.0, 3.6, 120);
        let mut regressor = CalibrationRegressor::new(target, reference_set()).unwrap();
        let hhf = regressor.hhf().unwrap();
        let expected = true_hhf(7.0, 3.6);
        assert!(
            (hhf - expected).abs() / expected < 0.03,
            "hhf = {hhf}, expected ≈ {expected}"
        );
    }

    #[test]
    fn test_calibrated_pair_in_unit_box() {
        let target = quantile_grid(7.0, 3.6, 120);
        let mut regressor = CalibrationRegressor::new(target, reference_set()).unwrap();
        let (percentile, percentage) = regressor.calibrate().unwrap();
        assert!(percentile > 0.0 && percentile < 1.0, "percentile = {percentile}");
        assert!(percentage > 0.0 && percentage < 1.0, "percentage = {percentage}");
    }

    #[test]
    fn test_fixed_seed_reproduces_run_exactly() {
        let target = quantile_grid(7.0, 3.6, 120);
        let mut a = CalibrationRegressor::new(target.clone(), reference_set()).unwrap();
        let mut b = CalibrationRegressor::new(target, reference_set()).unwrap();
        assert_eq!(a.hhf().unwrap(), b.hhf().unwrap());
        assert_eq!(a.calibrated(), b.calibrated());
    }

    #[test]
    fn test_calibration_is_memoized() {
        let target = quantile_grid(7.0, 3.6, 120);
        let mut regressor = CalibrationRegressor::new(target, reference_set()).unwrap();
        let first_pair = regressor.calibrate().unwrap();
        let first = regressor.hhf().unwrap();
        let second = regressor.hhf().unwrap();
        assert_eq!(first, second);
        assert_eq!(regressor.calibrated(), Some(first_pair));
    }

    #[test]
    fn test_hhf_for_new_stage_reuses_calibration() {
        let target = quantile_grid(7.0, 3.6, 120);
        let mut regressor = CalibrationRegressor::new(target, reference_set()).unwrap();
        regressor.calibrate().unwrap();
        let other = quantile_grid(9.0, 3.5, 120);
        let hhf = regressor.hhf_for(&other).unwrap();
        let expected = true_hhf(9.0, 3.5);
        assert!(
            (hhf - expected).abs() / expected < 0.03,
            "hhf = {hhf}, expected ≈ {expected}"
        );
    }

    #[test]
    fn test_rejects_empty_reference_set() {
        let target = quantile_grid(7.0, 3.6, 50);
        assert!(matches!(
            CalibrationRegressor::new(target, vec![]),
            Err(HhfError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_known_hhfs() {
        let target = quantile_grid(7.0, 3.6, 50);
        let references = vec![(quantile_grid(5.0, 3.6, 50), -1.0)];
        assert!(CalibrationRegressor::new(target.clone(), references).is_err());
        let references = vec![(quantile_grid(5.0, 3.6, 50), f64::NAN)];
        assert!(CalibrationRegressor::new(target, references).is_err());
    }
}
