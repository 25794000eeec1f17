//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between the encoding, model and service layers
//! - serialized for JSON reports
//! - constructed directly in tests

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::InferenceError;

/// Raw request fields as submitted (field name → unparsed string value).
pub type RawFields = HashMap<String, String>;

/// How a schema field is turned into a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Encoded through the categorical codec.
    Categorical,
    /// Parsed as a floating-point number.
    Numeric,
}

/// One named field at a fixed position of the feature vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical,
        }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
        }
    }
}

/// Fixed-length numeric input to a model, in schema order.
///
/// Immutable once built: models receive it by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Box<[f64]>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }
}

/// Tree ensemble flavour of a model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Mean of the tree outputs.
    RandomForest,
    /// `base_score` plus the sum of the tree outputs.
    GradientBoosted,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random forest",
            ModelKind::GradientBoosted => "gradient boosted trees",
        }
    }

    /// Split comparison used by the library that usually exports this kind.
    pub fn default_split_condition(self) -> SplitCondition {
        match self {
            ModelKind::RandomForest => SplitCondition::Le,
            ModelKind::GradientBoosted => SplitCondition::Lt,
        }
    }
}

/// Comparison deciding when a sample goes to the left child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitCondition {
    /// Left when `x <= threshold`.
    Le,
    /// Left when `x < threshold`.
    Lt,
}

impl SplitCondition {
    /// `value` is the feature as the tree library sees it (`f32`); the
    /// threshold keeps its full `f64` precision.
    #[inline]
    pub fn goes_left(self, value: f32, threshold: f64) -> bool {
        let value = f64::from(value);
        match self {
            SplitCondition::Le => value <= threshold,
            SplitCondition::Lt => value < threshold,
        }
    }
}

/// One model's answer to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Registry name of the model (e.g. `rf`, `xgb`).
    pub model: String,
    /// Rounded prediction, or why this model could not produce one.
    pub outcome: Result<f64, InferenceError>,
}

impl PredictionResult {
    pub fn value(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&InferenceError> {
        self.outcome.as_ref().err()
    }
}

/// Where one model artifact is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub name: String,
    pub path: PathBuf,
}

/// Startup configuration for the prediction service.
///
/// This is derived from CLI flags, the environment and defaults.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Artifacts to register, in registration order.
    pub models: Vec<ModelSource>,
    /// When non-empty, only these models are registered.
    pub only: Vec<String>,
}
