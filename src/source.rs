//! Data-source seam for stage samples.
//!
//! Retrieval of historical hit factors lives behind the [`SampleSource`]
//! trait: a backing store (database, flat file, fixture) returns raw scores
//! for a (classifier, division) key with records flagged bad already
//! excluded. [`StageSamples`] is the glue that fetches, applies the
//! non-positive filtering policy, and produces a validated [`Sample`] ready
//! for fitting.
//!
//! Division codes in use: `opn`, `lo`, `co`, `ltd`, `pcc`, `prod`, `ss`,
//! `l10`, `rev`.

use crate::error::HhfError;
use crate::sample::Sample;

/// A backing store of historical hit factors.
pub trait SampleSource {
    /// Returns raw hit factors for a classifier stage within a division,
    /// with records flagged bad excluded.
    ///
    /// The returned scores may still contain non-positive placeholders;
    /// the caller filters those before fitting.
    fn fetch_samples(&self, classifier: &str, division: &str) -> Result<Vec<f64>, HhfError>;
}

/// Hit factors for one stage, fetched and filtered.
#[derive(Debug, Clone)]
pub struct StageSamples {
    classifier: String,
    division: String,
    sample: Sample,
}

impl StageSamples {
    /// Fetches the stage's scores from `source` and applies the filtering
    /// policy (non-positive and non-finite entries are dropped).
    ///
    /// # Errors
    /// Propagates source errors, and returns
    /// [`HhfError::InvalidParameter`] if no usable scores remain.
    pub fn load(
        source: &dyn SampleSource,
        classifier: &str,
        division: &str,
    ) -> Result<Self, HhfError> {
        let raw = source.fetch_samples(classifier, division)?;
        let sample = Sample::from_raw(&raw)?;
        Ok(Self {
            classifier: classifier.to_string(),
            division: division.to_string(),
            sample,
        })
    }

    /// Classifier key, e.g. `"23-01"`.
    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    /// Division code, e.g. `"co"`.
    pub fn division(&self) -> &str {
        &self.division
    }

    /// The filtered sample.
    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    /// Consumes the stage, yielding the sample for fitting.
    pub fn into_sample(self) -> Sample {
        self.sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    struct InMemorySource {
        scores: HashMap<(String, String), Vec<f64>>,
    }

    impl InMemorySource {
        fn new() -> Self {
            let mut scores = HashMap::new();
            scores.insert(
                ("23-01".to_string(), "co".to_string()),
                vec![6.2, 0.0, 5.1, -1.0, 7.4, 8.0],
            );
            scores.insert(("23-02".to_string(), "co".to_string()), vec![0.0, -3.0]);
            Self { scores }
        }
    }

    impl SampleSource for InMemorySource {
        fn fetch_samples(&self, classifier: &str, division: &str) -> Result<Vec<f64>, HhfError> {
            self.scores
                .get(&(classifier.to_string(), division.to_string()))
                .cloned()
                .ok_or_else(|| {
                    HhfError::InvalidParameter(format!(
                        "no scores for classifier {classifier:?} division {division:?}"
                    ))
                })
        }
    }

    #[test]
    fn test_load_filters_unusable_scores() {
        let source = InMemorySource::new();
        let stage = StageSamples::load(&source, "23-01", "co").unwrap();
        assert_eq!(stage.classifier(), "23-01");
        assert_eq!(stage.division(), "co");
        assert_eq!(stage.sample().values(), &[6.2, 5.1, 7.4, 8.0]);
    }

    #[test]
    fn test_load_fails_when_nothing_usable_remains() {
        let source = InMemorySource::new();
        assert!(StageSamples::load(&source, "23-02", "co").is_err());
    }

    #[test]
    fn test_load_propagates_source_errors() {
        let source = InMemorySource::new();
        assert!(StageSamples::load(&source, "99-99", "opn").is_err());
    }

    #[test]
    fn test_into_sample() {
        let source = InMemorySource::new();
        let stage = StageSamples::load(&source, "23-01", "co").unwrap();
        let sample = stage.into_sample();
        assert_eq!(sample.len(), 4);
    }
}
