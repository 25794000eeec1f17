//! The uniform model contract.
//!
//! The service only ever sees `predict(vector) → scalar`. Anything that can
//! satisfy it (tree ensembles loaded from artifacts, test doubles) can be
//! registered.

use crate::domain::FeatureVector;
use crate::error::InferenceError;

/// A loaded, read-only regression model.
///
/// Implementations must be pure with respect to `&self`: concurrent requests
/// share one instance without locking.
pub trait PredictionModel: Send + Sync {
    /// Number of features the model was trained on.
    fn n_features(&self) -> usize;

    /// Feature names in training order, if the artifact recorded them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Short description for diagnostics (e.g. `random forest, 100 trees`).
    fn describe(&self) -> String;

    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}

/// Reject vectors whose length does not match the model.
pub fn check_feature_count(model: &dyn PredictionModel, features: &FeatureVector) -> Result<(), InferenceError> {
    let expected = model.n_features();
    if features.len() != expected {
        return Err(InferenceError::FeatureCount {
            expected,
            found: features.len(),
        });
    }
    Ok(())
}

impl<M: PredictionModel + ?Sized> PredictionModel for Box<M> {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        (**self).feature_names()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        (**self).predict(features)
    }
}
