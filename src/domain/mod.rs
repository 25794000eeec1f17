//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - schema building blocks (`FieldKind`, `FieldSpec`)
//! - the per-request `FeatureVector` and `PredictionResult`
//! - artifact/config descriptors (`ModelKind`, `SplitCondition`, `ServiceConfig`)

pub mod types;

pub use types::*;
