//! Shared startup and batch logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> artifact load -> registry -> prediction service
//!
//! The subcommands can then focus on presentation (text vs JSON vs CSV).

use std::path::{Path, PathBuf};

use crate::domain::{ModelSource, RawFields, ServiceConfig};
use crate::encoding::FeatureVectorBuilder;
use crate::error::{AppError, ModelLoadError};
use crate::io::{IngestedRequests, load_model};
use crate::models::ModelRegistry;
use crate::report::BatchRow;
use crate::service::PredictionService;

/// Artifact directory used when neither flag nor environment names one.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Default registry: random forest first, then gradient boosted trees.
pub fn default_model_sources(dir: &Path) -> Vec<ModelSource> {
    [("rf", "rf_model.json"), ("xgb", "xgb_model.json")]
        .into_iter()
        .map(|(name, file)| ModelSource {
            name: name.to_string(),
            path: dir.join(file),
        })
        .collect()
}

/// Resolve which artifacts to register from explicit sources, the directory
/// option and the environment value (in that precedence).
pub fn service_config(
    explicit: Vec<ModelSource>,
    model_dir: Option<PathBuf>,
    env_dir: Option<String>,
    only: Vec<String>,
) -> ServiceConfig {
    let models = if explicit.is_empty() {
        let dir = model_dir
            .or_else(|| env_dir.filter(|d| !d.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR));
        default_model_sources(&dir)
    } else {
        explicit
    };
    ServiceConfig { models, only }
}

/// Load every selected artifact and assemble the service.
///
/// Any load or registration failure aborts startup.
pub fn build_service(config: &ServiceConfig) -> Result<PredictionService, AppError> {
    let builder = FeatureVectorBuilder::garment()?;
    let sources = select_sources(config)?;

    let mut registry = ModelRegistry::new(builder.schema());
    for source in sources {
        let model = load_model(&source.name, &source.path)?;
        registry.register(&source.name, model)?;
    }

    Ok(PredictionService::new(builder, registry))
}

fn select_sources(config: &ServiceConfig) -> Result<Vec<&ModelSource>, ModelLoadError> {
    if config.only.is_empty() {
        if config.models.is_empty() {
            return Err(ModelLoadError::NoModels);
        }
        return Ok(config.models.iter().collect());
    }

    for name in &config.only {
        if !config.models.iter().any(|m| &m.name == name) {
            let available: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();
            return Err(ModelLoadError::UnknownModel {
                model: name.clone(),
                available: available.join(", "),
            });
        }
    }

    // Registration order follows the configured list, not the `only` list.
    let selected: Vec<&ModelSource> = config
        .models
        .iter()
        .filter(|m| config.only.contains(&m.name))
        .collect();
    if selected.is_empty() {
        return Err(ModelLoadError::NoModels);
    }
    Ok(selected)
}

/// Predict every ingested row in parallel; rows keep their file order.
pub fn run_batch(service: &PredictionService, ingest: &IngestedRequests) -> Vec<BatchRow> {
    let requests: Vec<RawFields> = ingest.rows.iter().map(|r| r.fields.clone()).collect();
    let outcomes = service.predict_batch(&requests);

    let mut rows: Vec<BatchRow> = ingest
        .rows
        .iter()
        .zip(outcomes)
        .map(|(row, outcome)| {
            if let Err(err) = &outcome {
                tracing::warn!(line = row.line, field = err.field(), error = %err, "skipping batch row");
            }
            BatchRow {
                line: row.line,
                outcome: outcome.map_err(|e| e.to_string()),
            }
        })
        .collect();

    for err in &ingest.row_errors {
        tracing::warn!(line = err.line, error = %err.message, "skipping unreadable batch row");
        rows.push(BatchRow {
            line: err.line,
            outcome: Err(err.message.clone()),
        });
    }
    rows.sort_by_key(|r| r.line);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> ModelSource {
        ModelSource {
            name: name.to_string(),
            path: PathBuf::from(format!("{name}.json")),
        }
    }

    #[test]
    fn defaults_use_model_dir_then_env_then_models() {
        let cfg = service_config(Vec::new(), Some(PathBuf::from("a")), Some("b".into()), Vec::new());
        assert_eq!(cfg.models[0].path, PathBuf::from("a/rf_model.json"));

        let cfg = service_config(Vec::new(), None, Some("b".into()), Vec::new());
        assert_eq!(cfg.models[1].path, PathBuf::from("b/xgb_model.json"));

        let cfg = service_config(Vec::new(), None, None, Vec::new());
        let names: Vec<&str> = cfg.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["rf", "xgb"]);
        assert_eq!(cfg.models[0].path, PathBuf::from("models/rf_model.json"));
    }

    #[test]
    fn explicit_models_replace_defaults() {
        let cfg = service_config(vec![source("gbr")], Some(PathBuf::from("a")), None, Vec::new());
        assert_eq!(cfg.models, vec![source("gbr")]);
    }

    #[test]
    fn only_keeps_configured_order() {
        let cfg = ServiceConfig {
            models: vec![source("rf"), source("xgb"), source("gbr")],
            only: vec!["gbr".to_string(), "rf".to_string()],
        };
        let names: Vec<&str> = select_sources(&cfg).unwrap().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["rf", "gbr"]);
    }

    #[test]
    fn only_rejects_unknown_names() {
        let cfg = ServiceConfig {
            models: vec![source("rf")],
            only: vec!["svm".to_string()],
        };
        assert!(matches!(
            select_sources(&cfg),
            Err(ModelLoadError::UnknownModel { .. })
        ));
    }

    #[test]
    fn missing_artifact_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = service_config(Vec::new(), Some(dir.path().to_path_buf()), None, Vec::new());
        let err = build_service(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_MODEL_LOAD);
        assert!(err.to_string().contains("rf_model.json"));
    }
}
