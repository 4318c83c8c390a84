//! Two-parameter Weibull distribution.
//!
//! Density, cumulative distribution, quantile function, and closed-form
//! moments for the Weibull distribution with scale λ and shape k:
//!
//! ```text
//! pdf(x) = (k/λ) (x/λ)^(k−1) exp(−(x/λ)^k)     x ≥ 0
//! cdf(x) = 1 − exp(−(x/λ)^k)
//! Q(p)   = λ (−ln(1−p))^(1/k)                  p ∈ (0, 1)
//! ```
//!
//! Moments are pure functions of (λ, k) through the gamma function,
//! e.g. mean = λ Γ(1+1/k) and variance = λ² (Γ(1+2/k) − Γ(1+1/k)²).
//!
//! # Reference
//!
//! Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
//! Distributions*, Vol. 1, 2nd ed., ch. 21.

use statrs::function::gamma::gamma;

use crate::error::HhfError;

/// Immutable two-parameter Weibull distribution.
///
/// Parameters are validated once at construction; every derived statistic
/// is a pure function of the stored (λ, k).
///
/// # Examples
///
/// ```
/// use hitfactor::Weibull;
///
/// let w = Weibull::new(5.0, 3.6).unwrap();
/// assert!((w.mean() - 4.5055).abs() < 1e-4);
/// assert!((w.cdf(w.median()) - 0.5).abs() < 1e-12);
///
/// // Invalid parameters are rejected
/// assert!(Weibull::new(0.0, 3.6).is_err());
/// assert!(Weibull::new(5.0, -1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Weibull {
    /// Scale parameter (λ).
    lam: f64,
    /// Shape parameter (k).
    k: f64,
}

impl Weibull {
    /// Creates a Weibull distribution with scale `lam` (λ) and shape `k`.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] unless both parameters are
    /// positive and finite.
    pub fn new(lam: f64, k: f64) -> Result<Self, HhfError> {
        if !lam.is_finite() || lam <= 0.0 {
            return Err(HhfError::InvalidParameter(format!(
                "Weibull scale must be positive and finite, got lam={lam}"
            )));
        }
        if !k.is_finite() || k <= 0.0 {
            return Err(HhfError::InvalidParameter(format!(
                "Weibull shape must be positive and finite, got k={k}"
            )));
        }
        Ok(Self { lam, k })
    }

    /// Scale parameter (λ).
    pub fn lam(&self) -> f64 {
        self.lam
    }

    /// Shape parameter (k).
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Probability density function.
    ///
    /// Returns 0 for x < 0; the distribution has no mass there.
    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        let z = x / self.lam;
        (self.k / self.lam) * z.powf(self.k - 1.0) * (-z.powf(self.k)).exp()
    }

    /// Cumulative distribution function.
    ///
    /// ```text
    /// F(x) = 1 − exp(−(x/λ)^k)
    /// ```
    ///
    /// Returns 0 for x ≤ 0.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        1.0 - (-(x / self.lam).powf(self.k)).exp()
    }

    /// Quantile function (inverse CDF).
    ///
    /// ```text
    /// Q(p) = λ (−ln(1−p))^(1/k)
    /// ```
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] unless `p` ∈ (0, 1).
    pub fn quantile(&self, p: f64) -> Result<f64, HhfError> {
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(HhfError::InvalidParameter(format!(
                "quantile probability must be in (0, 1), got {p}"
            )));
        }
        Ok(self.lam * (-(1.0 - p).ln()).powf(1.0 / self.k))
    }

    /// Mean, λ Γ(1+1/k).
    pub fn mean(&self) -> f64 {
        self.lam * gamma(1.0 + 1.0 / self.k)
    }

    /// Mode, λ ((k−1)/k)^(1/k).
    ///
    /// Defined only for k > 1; for k ≤ 1 the density is monotonically
    /// decreasing and the formula would take a fractional power of a
    /// non-positive base, so `None` is returned.
    pub fn mode(&self) -> Option<f64> {
        if self.k <= 1.0 {
            return None;
        }
        Some(self.lam * ((self.k - 1.0) / self.k).powf(1.0 / self.k))
    }

    /// Median, λ (ln 2)^(1/k).
    pub fn median(&self) -> f64 {
        self.lam * std::f64::consts::LN_2.powf(1.0 / self.k)
    }

    /// Variance, λ² (Γ(1+2/k) − Γ(1+1/k)²).
    pub fn variance(&self) -> f64 {
        let g1 = gamma(1.0 + 1.0 / self.k);
        let g2 = gamma(1.0 + 2.0 / self.k);
        self.lam * self.lam * (g2 - g1 * g1)
    }

    /// Standard deviation, √variance.
    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Skewness.
    ///
    /// ```text
    /// skew = (Γ(1+3/k) λ³ − 3 μ σ² − μ³) / σ³
    /// ```
    pub fn skewness(&self) -> f64 {
        let g3 = gamma(1.0 + 3.0 / self.k);
        let mean = self.mean();
        let std = self.std();
        (g3 * self.lam.powi(3) - 3.0 * mean * std * std - mean.powi(3)) / std.powi(3)
    }

    /// Excess kurtosis.
    ///
    /// ```text
    /// kurt = (λ⁴ Γ(1+4/k) − 4 γ₁ σ³ μ − 6 μ² σ² − μ⁴) / σ⁴ − 3
    /// ```
    ///
    /// where γ₁ is the skewness.
    pub fn kurtosis(&self) -> f64 {
        let g4 = gamma(1.0 + 4.0 / self.k);
        let mean = self.mean();
        let std = self.std();
        let skew = self.skewness();
        (self.lam.powi(4) * g4
            - 4.0 * skew * std.powi(3) * mean
            - 6.0 * mean * mean * std * std
            - mean.powi(4))
            / std.powi(4)
            - 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same tolerance as numpy's `isclose` defaults.
    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= 1e-8 + 1e-5 * expected.abs()
    }

    fn reference() -> Weibull {
        Weibull::new(5.0, 3.6).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        assert!(Weibull::new(0.0, 3.6).is_err());
        assert!(Weibull::new(-5.0, 3.6).is_err());
        assert!(Weibull::new(5.0, 0.0).is_err());
        assert!(Weibull::new(5.0, -3.6).is_err());
        assert!(Weibull::new(f64::NAN, 3.6).is_err());
        assert!(Weibull::new(5.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_mean() {
        let mean = reference().mean();
        assert!(close(mean, 4.5055), "mean = {mean}");
    }

    #[test]
    fn test_mode() {
        let mode = reference().mode().expect("mode defined for k > 1");
        assert!(close(mode, 4.56785076), "mode = {mode}");
    }

    #[test]
    fn test_mode_undefined_for_small_shape() {
        assert!(Weibull::new(5.0, 1.0).unwrap().mode().is_none());
        assert!(Weibull::new(5.0, 0.8).unwrap().mode().is_none());
    }

    #[test]
    fn test_median() {
        let median = reference().median();
        assert!(close(median, 4.5160095), "median = {median}");
    }

    #[test]
    fn test_variance() {
        let variance = reference().variance();
        assert!(close(variance, 1.932382), "variance = {variance}");
    }

    #[test]
    fn test_std() {
        let std = reference().std();
        assert!(close(std, 1.3901014), "std = {std}");
    }

    #[test]
    fn test_std_is_sqrt_variance_exactly() {
        for (lam, k) in [(5.0, 3.6), (0.5, 0.7), (12.0, 1.0), (2.0, 8.0)] {
            let w = Weibull::new(lam, k).unwrap();
            assert_eq!(w.std(), w.variance().sqrt());
        }
    }

    #[test]
    fn test_skewness() {
        let skewness = reference().skewness();
        assert!(close(skewness, 0.0005629389), "skewness = {skewness}");
    }

    #[test]
    fn test_kurtosis() {
        let kurtosis = reference().kurtosis();
        assert!(close(kurtosis, -0.2832548), "kurtosis = {kurtosis}");
    }

    #[test]
    fn test_pdf_nonnegative_and_zero_below_support() {
        let w = reference();
        assert_eq!(w.pdf(-1.0), 0.0);
        for i in 0..1024 {
            let x = 10.0 * i as f64 / 1023.0;
            let p = w.pdf(x);
            assert!(p.is_finite() && p >= 0.0, "pdf({x}) = {p}");
        }
    }

    #[test]
    fn test_cdf_bounds_and_monotone() {
        let w = reference();
        assert_eq!(w.cdf(-1.0), 0.0);
        assert_eq!(w.cdf(0.0), 0.0);
        let mut prev = 0.0;
        for i in 0..1024 {
            let x = 20.0 * i as f64 / 1023.0;
            let c = w.cdf(x);
            assert!((0.0..=1.0).contains(&c), "cdf({x}) = {c}");
            assert!(c >= prev, "cdf not monotone at x = {x}");
            prev = c;
        }
    }

    #[test]
    fn test_quantile_roundtrip() {
        let w = reference();
        for p in [0.001, 0.05, 0.25, 0.5, 0.75, 0.95, 0.999] {
            let x = w.quantile(p).unwrap();
            let back = w.cdf(x);
            assert!(
                (back - p).abs() < 1e-10,
                "cdf(quantile({p})) = {back}"
            );
        }
    }

    #[test]
    fn test_quantile_at_median() {
        let w = reference();
        let q50 = w.quantile(0.5).unwrap();
        assert!((q50 - w.median()).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_rejects_out_of_range() {
        let w = reference();
        assert!(w.quantile(0.0).is_err());
        assert!(w.quantile(1.0).is_err());
        assert!(w.quantile(-0.5).is_err());
        assert!(w.quantile(1.5).is_err());
        assert!(w.quantile(f64::NAN).is_err());
    }
}
