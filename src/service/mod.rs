//! Prediction service: one request in, one rounded result per model out.
//!
//! Request flow:
//! raw fields -> feature vector (built once) -> every registered model -> rounding
//!
//! Vector construction errors abort the request before any model runs. A model
//! that fails only marks its own result as failed.

use rayon::prelude::*;

use crate::domain::{FeatureVector, PredictionResult, RawFields};
use crate::encoding::FeatureVectorBuilder;
use crate::error::{InferenceError, InputError};
use crate::models::ModelRegistry;

/// Decimal places kept in every reported prediction.
pub const OUTPUT_DECIMALS: i32 = 4;

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

#[derive(Debug)]
pub struct PredictionService {
    builder: FeatureVectorBuilder,
    registry: ModelRegistry,
}

impl PredictionService {
    pub fn new(builder: FeatureVectorBuilder, registry: ModelRegistry) -> Self {
        Self { builder, registry }
    }

    pub fn builder(&self) -> &FeatureVectorBuilder {
        &self.builder
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Predict one request with every registered model, in registration order.
    pub fn predict(&self, raw: &RawFields) -> Result<Vec<PredictionResult>, InputError> {
        let features = self.builder.build(raw)?;
        tracing::debug!(features = ?features.as_slice(), "encoded request");
        Ok(self.predict_vector(&features))
    }

    /// Run every model on an already-built vector.
    pub fn predict_vector(&self, features: &FeatureVector) -> Vec<PredictionResult> {
        self.registry
            .all()
            .iter()
            .map(|entry| {
                let outcome = entry
                    .model()
                    .predict(features)
                    .and_then(|y| {
                        if y.is_finite() {
                            Ok(round_to(y, OUTPUT_DECIMALS))
                        } else {
                            Err(InferenceError::NonFinite { value: y })
                        }
                    });
                if let Err(err) = &outcome {
                    tracing::warn!(model = entry.name(), error = %err, "model inference failed");
                }
                PredictionResult {
                    model: entry.name().to_string(),
                    outcome,
                }
            })
            .collect()
    }

    /// Predict many independent requests in parallel.
    ///
    /// Output order matches input order; each row fails or succeeds on its own.
    pub fn predict_batch(&self, rows: &[RawFields]) -> Vec<Result<Vec<PredictionResult>, InputError>> {
        rows.par_iter().map(|raw| self.predict(raw)).collect()
    }
}
