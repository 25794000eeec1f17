//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - loads model artifacts into the registry
//! - runs predictions for one request or a CSV batch
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{BatchArgs, Cli, Command, ModelArgs, PredictArgs};
use crate::domain::{PredictionResult, RawFields, ServiceConfig};
use crate::encoding::FeatureVectorBuilder;
use crate::error::{AppError, EXIT_INFERENCE};

pub mod pipeline;

/// Environment variable naming the artifact directory.
pub const MODEL_DIR_ENV: &str = "GARMENT_MODEL_DIR";

/// Entry point for the `gpp` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Batch(args) => handle_batch(args),
        Command::Models(args) => handle_models(args),
        Command::Schema => handle_schema(),
    }
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let service = pipeline::build_service(&service_config_from_args(&args.models))?;
    let raw = request_from_args(&args)?;

    let results = service.predict(&raw)?;
    if args.json {
        println!("{}", crate::report::prediction_report_json(&results)?);
    } else {
        print!("{}", crate::report::format_predictions(&results));
    }

    ensure_any_prediction(&results)
}

/// A request where every model failed exits with `EXIT_INFERENCE`.
fn ensure_any_prediction(results: &[PredictionResult]) -> Result<(), AppError> {
    if results.iter().all(|r| r.outcome.is_err()) {
        return Err(AppError::new(EXIT_INFERENCE, "No model produced a prediction."));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let service = pipeline::build_service(&service_config_from_args(&args.models))?;
    let ingest = crate::io::load_request_rows(&args.csv, service.builder().schema())?;
    let rows = pipeline::run_batch(&service, &ingest);
    let models: Vec<String> = service.registry().names().map(str::to_string).collect();

    if args.json {
        println!("{}", crate::report::batch_report_json(&rows)?);
    } else {
        print!("{}", crate::report::format_batch(&rows, &models));
    }

    if let Some(path) = &args.export {
        crate::io::write_predictions_csv(path, &rows, &models)?;
    }
    Ok(())
}

fn handle_models(args: ModelArgs) -> Result<(), AppError> {
    let service = pipeline::build_service(&service_config_from_args(&args))?;
    print!("{}", crate::report::format_models(service.registry()));
    Ok(())
}

fn handle_schema() -> Result<(), AppError> {
    let builder = FeatureVectorBuilder::garment()?;
    print!("{}", crate::report::format_schema(&builder));
    Ok(())
}

pub fn service_config_from_args(args: &ModelArgs) -> ServiceConfig {
    pipeline::service_config(
        args.models.clone(),
        args.model_dir.clone(),
        std::env::var(MODEL_DIR_ENV).ok(),
        args.only.clone(),
    )
}

/// Merge the optional JSON request file with flag values (flags win).
fn request_from_args(args: &PredictArgs) -> Result<RawFields, AppError> {
    let mut raw = match &args.input {
        Some(path) => crate::io::read_request_json(path)?,
        None => RawFields::new(),
    };
    raw.extend(args.flag_fields());
    Ok(raw)
}
