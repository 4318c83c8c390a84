//! Hit-factor samples.
//!
//! A [`Sample`] is the collection of observed hit factors for one classifier
//! stage. Fitting requires strictly positive, finite observations, so the
//! invariant is enforced at construction: a `Sample` is never empty and
//! never contains a non-positive or non-finite value.

use crate::error::HhfError;

/// Observed hit factors for one stage.
///
/// Order is irrelevant to all downstream computations, but the insertion
/// order is preserved.
///
/// # Examples
///
/// ```
/// use hitfactor::Sample;
///
/// let sample = Sample::new(vec![5.2, 6.1, 4.8]).unwrap();
/// assert_eq!(sample.len(), 3);
///
/// // Empty or non-positive data is rejected
/// assert!(Sample::new(vec![]).is_err());
/// assert!(Sample::new(vec![5.2, -1.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Creates a sample from already-clean observations.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] if `values` is empty or any
    /// entry is non-positive or non-finite.
    pub fn new(values: Vec<f64>) -> Result<Self, HhfError> {
        if values.is_empty() {
            return Err(HhfError::InvalidParameter(
                "sample must contain at least one hit factor".to_string(),
            ));
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(HhfError::InvalidParameter(format!(
                "sample values must be positive and finite, got {bad}"
            )));
        }
        Ok(Self { values })
    }

    /// Creates a sample from raw scores, dropping unusable entries.
    ///
    /// Non-positive and non-finite scores (zeroed runs, placeholder values
    /// from the data source) are filtered out before construction.
    ///
    /// # Errors
    /// Returns [`HhfError::InvalidParameter`] if nothing remains after
    /// filtering.
    pub fn from_raw(raw: &[f64]) -> Result<Self, HhfError> {
        let values: Vec<f64> = raw
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        Self::new(values)
    }

    /// The observations, in insertion order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    #[allow(clippy::len_without_is_empty)] // never empty by construction
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Sample median (average of the two middle values for even counts).
    ///
    /// Used as the anchor for the default Weibull scale initial guess.
    pub fn median(&self) -> f64 {
        let mut sorted = self.values.clone();
        sorted.sort_unstable_by(|a, b| {
            a.partial_cmp(b).expect("NaN values rejected at construction")
        });
        let n = sorted.len();
        if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            Sample::new(vec![]),
            Err(HhfError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_values() {
        assert!(Sample::new(vec![1.0, 0.0]).is_err());
        assert!(Sample::new(vec![1.0, -2.5]).is_err());
        assert!(Sample::new(vec![1.0, f64::NAN]).is_err());
        assert!(Sample::new(vec![1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_from_raw_filters() {
        let sample = Sample::from_raw(&[5.0, 0.0, -1.0, f64::NAN, 6.0]).unwrap();
        assert_eq!(sample.values(), &[5.0, 6.0]);
    }

    #[test]
    fn test_from_raw_all_filtered() {
        assert!(Sample::from_raw(&[0.0, -1.0]).is_err());
    }

    #[test]
    fn test_median_odd() {
        let sample = Sample::new(vec![3.0, 1.0, 2.0]).unwrap();
        assert!((sample.median() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_even() {
        let sample = Sample::new(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!((sample.median() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_single_value() {
        let sample = Sample::new(vec![7.5]).unwrap();
        assert!((sample.median() - 7.5).abs() < 1e-12);
    }
}
