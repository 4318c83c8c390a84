//! Per-stage Weibull maximum-likelihood fitting.
//!
//! Fits a Weibull distribution to one stage's hit factors by minimizing the
//! mean negative log-likelihood with a Nelder–Mead simplex search, then
//! derives the HHF as `quantile(percentile) / percentage`.
//!
//! The default calibration (percentile 0.95, percentage 0.85) encodes the
//! assumption that the top 5% of shooters sit at or above 85% of the HHF.

use std::str::FromStr;

use log::debug;

use crate::error::HhfError;
use crate::optimize::{nelder_mead, NelderMeadOptions};
use crate::sample::Sample;
use crate::weibull::Weibull;

/// Default percentile to match.
pub const DEFAULT_PERCENTILE: f64 = 0.95;
/// Default hit-factor percentage (as a fraction) at that percentile.
pub const DEFAULT_PERCENTAGE: f64 = 0.85;
/// Default initial guess for the shape parameter.
const DEFAULT_SHAPE_GUESS: f64 = 3.6;

/// Named classification tiers for the class-match shortcut.
///
/// Each tier fixes the (percentile, percentage) pair from its known class
/// boundary instead of calibrating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassTier {
    /// Grand Master: top 1% at 95% of HHF.
    GrandMaster,
    /// Master: top 5% at 85% of HHF.
    Master,
    /// A class: top 15% at 75% of HHF.
    AClass,
}

impl ClassTier {
    /// Percentile matched by this tier.
    pub fn percentile(self) -> f64 {
        match self {
            ClassTier::GrandMaster => 0.99,
            ClassTier::Master => 0.95,
            ClassTier::AClass => 0.85,
        }
    }

    /// Hit-factor percentage (fraction of HHF) at this tier's percentile.
    pub fn percentage(self) -> f64 {
        match self {
            ClassTier::GrandMaster => 0.95,
            ClassTier::Master => 0.85,
            ClassTier::AClass => 0.75,
        }
    }
}

impl FromStr for ClassTier {
    type Err = HhfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GM" => Ok(ClassTier::GrandMaster),
            "M" => Ok(ClassTier::Master),
            "A" => Ok(ClassTier::AClass),
            other => Err(HhfError::UnsupportedClassTier(other.to_string())),
        }
    }
}

/// Maximum-likelihood Weibull fitter for one stage.
///
/// The fit is lazy and memoized: the first HHF query fits the distribution,
/// and every later query reuses it, so repeated queries with different
/// (percentile, percentage) pairs never refit.
///
/// # Examples
///
/// ```
/// use hitfactor::{Sample, WeibullFitter};
///
/// // Hit factors drawn on a Weibull(lam=5, k=3.6) quantile grid
/// let hf: Vec<f64> = (1..=60)
///     .map(|i| {
///         let p = (i as f64 - 0.5) / 60.0;
///         5.0 * (-(1.0_f64 - p).ln()).powf(1.0 / 3.6)
///     })
///     .collect();
/// let mut fitter = WeibullFitter::new(Sample::new(hf).unwrap());
/// let hhf = fitter.hhf().unwrap();
/// assert!(hhf > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct WeibullFitter {
    sample: Sample,
    percentile: f64,
    percentage: f64,
    fitted: Option<Weibull>,
}

impl WeibullFitter {
    /// Creates a fitter with the default (percentile, percentage).
    pub fn new(sample: Sample) -> Self {
        Self {
            sample,
            percentile: DEFAULT_PERCENTILE,
            percentage: DEFAULT_PERCENTAGE,
            fitted: None,
        }
    }

    /// Creates a fitter with an explicit (percentile, percentage) pair.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] unless both lie in (0, 1).
    pub fn with_params(sample: Sample, percentile: f64, percentage: f64) -> Result<Self, HhfError> {
        validate_unit_interval("percentile", percentile)?;
        validate_unit_interval("percentage", percentage)?;
        Ok(Self {
            sample,
            percentile,
            percentage,
            fitted: None,
        })
    }

    /// Creates a fitter whose (percentile, percentage) comes from a named
    /// class tier.
    pub fn for_tier(sample: Sample, tier: ClassTier) -> Self {
        Self {
            sample,
            percentile: tier.percentile(),
            percentage: tier.percentage(),
            fitted: None,
        }
    }

    /// Current percentile.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Current percentage.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// The memoized fitted distribution, if a fit has run.
    pub fn fitted(&self) -> Option<&Weibull> {
        self.fitted.as_ref()
    }

    /// Fits the Weibull distribution with default initial guesses
    /// (k₀ = 3.6, λ₀ = median / ln(2)^(1/k₀)).
    ///
    /// The λ₀ default comes from the Weibull median-quantile relationship,
    /// so the starting scale is already consistent with the sample.
    pub fn fit(&mut self) -> Result<&Weibull, HhfError> {
        self.fit_with(None, DEFAULT_SHAPE_GUESS)
    }

    /// Fits the Weibull distribution with explicit initial guesses.
    ///
    /// `lam0 = None` uses the median-derived default scale guess.
    ///
    /// The objective is the mean negative log-likelihood over the sample.
    /// Non-positive (λ, k) proposals score `+∞`, which keeps the unbounded
    /// simplex inside the valid parameter region.
    ///
    /// # Errors
    /// Returns [`HhfError::OptimizationFailure`] if the simplex does not
    /// converge within its iteration budget.
    pub fn fit_with(&mut self, lam0: Option<f64>, k0: f64) -> Result<&Weibull, HhfError> {
        if !k0.is_finite() || k0 <= 0.0 {
            return Err(HhfError::InvalidParameter(format!(
                "initial shape guess must be positive and finite, got {k0}"
            )));
        }
        let lam0 = match lam0 {
            Some(lam0) => {
                if !lam0.is_finite() || lam0 <= 0.0 {
                    return Err(HhfError::InvalidParameter(format!(
                        "initial scale guess must be positive and finite, got {lam0}"
                    )));
                }
                lam0
            }
            None => self.sample.median() / std::f64::consts::LN_2.powf(1.0 / k0),
        };

        let values = self.sample.values();
        let objective = |params: &[f64]| mean_negative_log_likelihood(params, values);

        let result = nelder_mead(objective, &[lam0, k0], &NelderMeadOptions::default())?;
        if !result.converged {
            return Err(HhfError::OptimizationFailure {
                context: "Weibull maximum-likelihood fit",
                iterations: result.iterations,
            });
        }

        debug!(
            "weibull mle: lam={:.6} k={:.6} nll={:.6} iterations={} nfev={}",
            result.x[0], result.x[1], result.fun, result.iterations, result.nfev
        );

        let fitted = Weibull::new(result.x[0], result.x[1])?;
        self.fitted = Some(fitted);
        Ok(self.fitted.as_ref().expect("fit stored above"))
    }

    /// Returns the HHF for the stored (percentile, percentage), fitting
    /// lazily on first use.
    pub fn hhf(&mut self) -> Result<f64, HhfError> {
        self.ensure_fitted()?;
        let weibull = self.fitted.as_ref().expect("ensured above");
        Ok(weibull.quantile(self.percentile)? / self.percentage)
    }

    /// Updates the stored (percentile, percentage) and returns the HHF.
    ///
    /// Reuses the memoized fit; only the quantile lookup is recomputed.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] unless both arguments lie in
    /// (0, 1).
    pub fn hhf_with(&mut self, percentile: f64, percentage: f64) -> Result<f64, HhfError> {
        validate_unit_interval("percentile", percentile)?;
        validate_unit_interval("percentage", percentage)?;
        self.percentile = percentile;
        self.percentage = percentage;
        self.hhf()
    }

    /// Returns the HHF for a named class tier.
    pub fn hhf_for_tier(&mut self, tier: ClassTier) -> Result<f64, HhfError> {
        self.hhf_with(tier.percentile(), tier.percentage())
    }

    fn ensure_fitted(&mut self) -> Result<(), HhfError> {
        if self.fitted.is_none() {
            self.fit()?;
        }
        Ok(())
    }
}

/// Mean negative log-likelihood of a Weibull(λ, k) over `values`.
///
/// Uses the analytic log-density
///
/// ```text
/// ln pdf(x) = ln k − ln λ + (k−1) ln(x/λ) − (x/λ)^k
/// ```
///
/// to avoid underflowing the density in the tails. Invalid parameters and
/// non-finite likelihoods score `+∞`.
fn mean_negative_log_likelihood(params: &[f64], values: &[f64]) -> f64 {
    let (lam, k) = (params[0], params[1]);
    if lam <= 0.0 || k <= 0.0 {
        return f64::INFINITY;
    }
    let ln_lam = lam.ln();
    let ln_k = k.ln();
    let mut total = 0.0;
    for &x in values {
        let ln_z = x.ln() - ln_lam;
        let ln_pdf = ln_k - ln_lam + (k - 1.0) * ln_z - (k * ln_z).exp();
        if !ln_pdf.is_finite() {
            return f64::INFINITY;
        }
        total -= ln_pdf;
    }
    total / values.len() as f64
}

fn validate_unit_interval(name: &str, value: f64) -> Result<(), HhfError> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(HhfError::InvalidParameter(format!(
            "{name} must be in (0, 1), got {value}"
        )));
    }
    Ok(())
}
