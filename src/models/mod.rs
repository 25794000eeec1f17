//! Prediction models.
//!
//! - `model`: the `PredictionModel` trait every registered model implements
//! - `tree` / `ensemble`: tree-ensemble models loaded from artifacts
//! - `registry`: the immutable set of models the service fans out to

pub mod ensemble;
pub mod model;
pub mod registry;
pub mod tree;

pub use ensemble::*;
pub use model::*;
pub use registry::*;
pub use tree::*;
