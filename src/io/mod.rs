//! Input/output helpers.
//!
//! - model artifact loading + validation (`artifact`)
//! - request ingest from CSV/JSON (`ingest`)
//! - batch result exports (`export`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
