//! Tree ensembles: random forests and gradient-boosted trees.
//!
//! Both share the same storage; only the aggregation differs:
//!
//! - random forest: mean of the tree outputs
//! - gradient boosted: `base_score + Σ tree outputs`

use crate::domain::{FeatureVector, ModelKind, SplitCondition};
use crate::error::InferenceError;
use crate::models::model::{PredictionModel, check_feature_count};
use crate::models::tree::Tree;

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    kind: ModelKind,
    n_features: usize,
    feature_names: Option<Vec<String>>,
    split_condition: SplitCondition,
    base_score: f64,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Assemble an ensemble from already-validated trees.
    ///
    /// `trees` must be non-empty; artifact loading enforces this.
    pub fn new(
        kind: ModelKind,
        n_features: usize,
        split_condition: SplitCondition,
        base_score: f64,
        trees: Vec<Tree>,
    ) -> Self {
        Self {
            kind,
            n_features,
            feature_names: None,
            split_condition,
            base_score,
            trees,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn split_condition(&self) -> SplitCondition {
        self.split_condition
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl PredictionModel for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn describe(&self) -> String {
        format!("{}, {} trees", self.kind.display_name(), self.trees.len())
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_feature_count(self, features)?;
        if self.trees.is_empty() {
            return Err(InferenceError::Model("ensemble has no trees".to_string()));
        }

        let x = features.as_slice();
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict(x, self.split_condition))
            .sum();

        let y = match self.kind {
            ModelKind::RandomForest => sum / self.trees.len() as f64,
            ModelKind::GradientBoosted => self.base_score + sum,
        };

        if !y.is_finite() {
            return Err(InferenceError::NonFinite { value: y });
        }
        Ok(y)
    }
}
