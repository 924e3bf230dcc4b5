use crate::domain::error::EnrichmentResult;
use crate::domain::models::FeatureRow;

/// Port for the binary boundary classifier
///
/// `fit` produces a fresh model every call; callers discard the previous
/// instance on each retrain.
///
/// # Examples
///
/// ```no_run
/// use fieldloop::domain::ports::Classifier;
/// use fieldloop::domain::EnrichmentResult;
///
/// fn example(classifier: &dyn Classifier) -> EnrichmentResult<f64> {
///     let rows = vec![[0.9, 0.8, 0.7, 0.1], [0.1, 0.2, 0.1, 0.9]];
///     let model = classifier.fit(&rows, &[true, false])?;
///     Ok(model.predict_probability(&rows[0]))
/// }
/// ```
pub trait Classifier: Send + Sync {
    /// Fit a model on complete feature rows against boolean labels
    ///
    /// # Arguments
    ///
    /// * `features` - Training rows, one per sample
    /// * `labels` - Positive-class flags aligned with `features`
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are misaligned or the model cannot be fit
    fn fit(&self, features: &[FeatureRow], labels: &[bool])
        -> EnrichmentResult<Box<dyn BoundaryModel>>;
}

/// A fitted boundary model
pub trait BoundaryModel: Send + Sync {
    /// Probability that `features` belongs to the positive class, in `[0, 1]`
    fn predict_probability(&self, features: &FeatureRow) -> f64;
}
