//! `garment-productivity` library crate.
//!
//! The binary (`gpp`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the encoding and service layers can sit behind other front-ends (HTTP, batch jobs)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod encoding;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod service;
