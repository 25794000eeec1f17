//! Read model artifact JSON files.
//!
//! An artifact is a tree ensemble exported from the training environment:
//! - model kind (random forest / gradient boosted)
//! - expected feature count (and optionally feature names)
//! - split comparison and base score
//! - the trees, as flat node lists
//!
//! Loading validates the whole structure; a model that loads can always be
//! traversed.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use serde::Deserialize;

use crate::domain::{ModelKind, SplitCondition};
use crate::error::ModelLoadError;
use crate::models::{NodeSpec, Tree, TreeEnsemble};

/// On-disk model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub kind: ModelKind,
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Defaults to the convention of the library that exports `kind`.
    #[serde(default)]
    pub split_condition: Option<SplitCondition>,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeArtifact {
    pub nodes: Vec<NodeSpec>,
}

impl ModelArtifact {
    /// Validate the artifact and build the ensemble. `name` is used in errors only.
    pub fn into_ensemble(self, name: &str) -> Result<TreeEnsemble, ModelLoadError> {
        if self.trees.is_empty() {
            return Err(ModelLoadError::NoTrees {
                model: name.to_string(),
            });
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(ModelLoadError::FeatureCountMismatch {
                    model: name.to_string(),
                    expected: self.n_features,
                    found: names.len(),
                });
            }
        }

        let trees = self
            .trees
            .iter()
            .enumerate()
            .map(|(idx, t)| {
                Tree::from_nodes(&t.nodes, self.n_features).map_err(|reason| ModelLoadError::InvalidTree {
                    model: name.to_string(),
                    tree: idx,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let split_condition = self
            .split_condition
            .unwrap_or_else(|| self.kind.default_split_condition());
        let base_score = match self.kind {
            ModelKind::RandomForest => 0.0,
            ModelKind::GradientBoosted => self.base_score,
        };

        let ensemble = TreeEnsemble::new(self.kind, self.n_features, split_condition, base_score, trees);
        Ok(match self.feature_names {
            Some(names) => ensemble.with_feature_names(names),
            None => ensemble,
        })
    }
}

/// Read and validate a model artifact.
pub fn load_model(name: &str, path: &Path) -> Result<TreeEnsemble, ModelLoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ModelLoadError::MissingArtifact {
            path: path.to_path_buf(),
        },
        _ => ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let artifact: ModelArtifact =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let ensemble = artifact.into_ensemble(name)?;
    tracing::debug!(
        model = name,
        kind = ensemble.kind().display_name(),
        path = %path.display(),
        trees = ensemble.n_trees(),
        "loaded model artifact"
    );
    Ok(ensemble)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::FeatureVector;
    use crate::models::PredictionModel;

    const BOOSTED: &str = r#"{
        "kind": "gradient_boosted",
        "n_features": 2,
        "base_score": 0.5,
        "trees": [
            {"nodes": [{"feature": 0, "threshold": 1.0, "left": 1, "right": 2}, {"leaf": -0.1}, {"leaf": 0.1}]}
        ]
    }"#;

    fn parse(json: &str) -> ModelArtifact {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn boosted_artifact_defaults_to_strict_less_than() {
        let model = parse(BOOSTED).into_ensemble("xgb").unwrap();
        assert_eq!(model.kind(), ModelKind::GradientBoosted);
        assert_eq!(model.split_condition(), SplitCondition::Lt);
        assert_eq!(model.base_score(), 0.5);
        let y = model.predict(&FeatureVector::from(vec![1.0, 0.0])).unwrap();
        assert!((y - 0.6).abs() < 1e-12);
    }

    #[test]
    fn forest_artifact_ignores_base_score_and_defaults_to_le() {
        let json = BOOSTED.replace("gradient_boosted", "random_forest");
        let model = parse(&json).into_ensemble("rf").unwrap();
        assert_eq!(model.split_condition(), SplitCondition::Le);
        assert_eq!(model.base_score(), 0.0);
        let y = model.predict(&FeatureVector::from(vec![1.0, 0.0])).unwrap();
        assert!((y + 0.1).abs() < 1e-12);
    }

    #[test]
    fn explicit_split_condition_wins() {
        let json = BOOSTED.replace(r#""base_score": 0.5,"#, r#""base_score": 0.5, "split_condition": "le","#);
        let model = parse(&json).into_ensemble("xgb").unwrap();
        assert_eq!(model.split_condition(), SplitCondition::Le);
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        let json = r#"{"kind": "random_forest", "n_features": 2, "trees": []}"#;
        assert!(matches!(
            parse(json).into_ensemble("rf"),
            Err(ModelLoadError::NoTrees { .. })
        ));
    }

    #[test]
    fn invalid_tree_reports_its_index() {
        let json = r#"{"kind": "random_forest", "n_features": 2, "trees": [
            {"nodes": [{"leaf": 0.5}]},
            {"nodes": [{"feature": 5, "threshold": 1.0, "left": 1, "right": 2}, {"leaf": 0.0}, {"leaf": 1.0}]}
        ]}"#;
        assert!(matches!(
            parse(json).into_ensemble("rf"),
            Err(ModelLoadError::InvalidTree { tree: 1, .. })
        ));
    }

    #[test]
    fn feature_names_must_cover_every_feature() {
        let json = r#"{"kind": "random_forest", "n_features": 2, "feature_names": ["team"],
            "trees": [{"nodes": [{"leaf": 0.5}]}]}"#;
        assert!(matches!(
            parse(json).into_ensemble("rf"),
            Err(ModelLoadError::FeatureCountMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn load_model_distinguishes_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("rf_model.json");
        assert!(matches!(
            load_model("rf", &missing),
            Err(ModelLoadError::MissingArtifact { .. })
        ));

        let malformed = dir.path().join("broken.json");
        let mut file = File::create(&malformed).unwrap();
        file.write_all(b"{\"kind\": \"svm\"}").unwrap();
        assert!(matches!(
            load_model("rf", &malformed),
            Err(ModelLoadError::Parse { .. })
        ));

        // A path that cannot be opened for another reason is an I/O error.
        let under_file = malformed.join("rf_model.json");
        assert!(matches!(
            load_model("rf", &under_file),
            Err(ModelLoadError::Io { .. })
        ));

        let good = dir.path().join("xgb_model.json");
        std::fs::write(&good, BOOSTED).unwrap();
        assert_eq!(load_model("xgb", &good).unwrap().n_trees(), 1);
    }
}
