//! Model registry.
//!
//! Models are registered once at startup and checked against the feature
//! schema. After that the registry is only read: there is no API to replace or
//! remove a model, so every request sees the same set.

use crate::encoding::FeatureSchema;
use crate::error::ModelLoadError;
use crate::models::model::PredictionModel;

pub struct RegisteredModel {
    name: String,
    model: Box<dyn PredictionModel>,
}

impl RegisteredModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &dyn PredictionModel {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for RegisteredModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModel")
            .field("name", &self.name)
            .field("model", &self.model.describe())
            .finish()
    }
}

#[derive(Debug)]
pub struct ModelRegistry {
    schema_names: Vec<String>,
    entries: Vec<RegisteredModel>,
}

impl ModelRegistry {
    /// Empty registry that accepts models trained on `schema`.
    pub fn new(schema: &FeatureSchema) -> Self {
        Self {
            schema_names: schema.names().map(str::to_string).collect(),
            entries: Vec::new(),
        }
    }

    /// Register `model` under `name`.
    ///
    /// Fails if the name is taken or the model's inputs do not match the schema.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        model: impl PredictionModel + 'static,
    ) -> Result<(), ModelLoadError> {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(ModelLoadError::DuplicateModel { model: name });
        }

        let expected = self.schema_names.len();
        if model.n_features() != expected {
            return Err(ModelLoadError::FeatureCountMismatch {
                model: name,
                expected,
                found: model.n_features(),
            });
        }

        if let Some(names) = model.feature_names() {
            if names.len() != expected {
                return Err(ModelLoadError::FeatureCountMismatch {
                    model: name,
                    expected,
                    found: names.len(),
                });
            }
            if let Some((position, (found, expected))) = names
                .iter()
                .zip(&self.schema_names)
                .enumerate()
                .find(|(_, (found, expected))| found != expected)
            {
                return Err(ModelLoadError::FeatureNameMismatch {
                    model: name,
                    position,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        tracing::info!(model = %name, kind = %model.describe(), "registered model");
        self.entries.push(RegisteredModel {
            name,
            model: Box::new(model),
        });
        Ok(())
    }

    /// All models in registration order.
    pub fn all(&self) -> &[RegisteredModel] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&dyn PredictionModel> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.model.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
