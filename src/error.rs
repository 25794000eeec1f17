//! Error types.
//!
//! Domain errors are typed so callers can tell client-input problems apart from
//! startup failures and per-model inference failures. The binary collapses all
//! of them into [`AppError`], which carries the process exit code.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TreeValidationError;

/// Exit code for bad client input or unreadable input files.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for model artifacts that cannot be loaded.
pub const EXIT_MODEL_LOAD: u8 = 3;
/// Exit code when no registered model produced a prediction.
pub const EXIT_INFERENCE: u8 = 4;

/// A request-scoped problem with the raw fields. Fixable by correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` must be a finite number, got '{value}'")]
    InvalidNumeric { field: String, value: String },

    #[error("field `{field}` has unknown category '{value}' (expected one of: {expected})")]
    UnknownCategory {
        field: String,
        value: String,
        expected: String,
    },

    #[error("field `{field}` is not a categorical field")]
    UnknownField { field: String },
}

impl InputError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            InputError::MissingField { field }
            | InputError::InvalidNumeric { field, .. }
            | InputError::UnknownCategory { field, .. }
            | InputError::UnknownField { field } => field,
        }
    }
}

/// Inconsistent schema or vocabulary declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("vocabulary for `{field}` is empty")]
    EmptyVocabulary { field: String },

    #[error("vocabulary for `{field}` lists '{value}' more than once")]
    DuplicateCategory { field: String, value: String },

    #[error("schema lists field `{field}` more than once")]
    DuplicateField { field: String },

    #[error("categorical field `{field}` has no vocabulary")]
    MissingVocabulary { field: String },
}

/// Fatal startup failure while loading or registering a model.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact '{}' not found", .path.display())]
    MissingArtifact { path: PathBuf },

    #[error("failed to read model artifact '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model `{model}` has no trees")]
    NoTrees { model: String },

    #[error("model `{model}` tree {tree}: {reason}")]
    InvalidTree {
        model: String,
        tree: usize,
        reason: TreeValidationError,
    },

    #[error("model `{model}` expects {found} features, schema has {expected}")]
    FeatureCountMismatch {
        model: String,
        expected: usize,
        found: usize,
    },

    #[error("model `{model}` feature {position} is `{found}`, schema has `{expected}`")]
    FeatureNameMismatch {
        model: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("model `{model}` is already registered")]
    DuplicateModel { model: String },

    #[error("unknown model `{model}` (registered: {available})")]
    UnknownModel { model: String, available: String },

    #[error("no models configured")]
    NoModels,
}

/// Failure inside a single model's prediction call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature vector has {found} values, model expects {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("model produced a non-finite value ({value})")]
    NonFinite { value: f64 },

    #[error("{0}")]
    Model(String),
}

/// Process-level error: a message plus the exit code the binary should return.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::new(EXIT_INPUT, format!("Invalid input: {err}"))
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::new(EXIT_MODEL_LOAD, format!("Invalid feature schema: {err}"))
    }
}

impl From<ModelLoadError> for AppError {
    fn from(err: ModelLoadError) -> Self {
        AppError::new(EXIT_MODEL_LOAD, format!("Model load failed: {err}"))
    }
}
