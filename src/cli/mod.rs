//! Command-line parsing for the garment productivity predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the encoding/model code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ModelSource, RawFields};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gpp", version, about = "Garment team productivity predictor")]
pub struct Cli {
    /// Log registrations and per-model failures (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict productivity for one request.
    Predict(PredictArgs),
    /// Predict one request per CSV row.
    Batch(BatchArgs),
    /// Load the configured models and list them.
    Models(ModelArgs),
    /// Print the feature schema and categorical codes.
    Schema,
}

/// Where models are loaded from.
#[derive(Debug, Args, Clone, Default)]
pub struct ModelArgs {
    /// Artifact directory holding `rf_model.json` and `xgb_model.json`
    /// (default: $GARMENT_MODEL_DIR or `models`).
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Register a model artifact explicitly. Repeatable; replaces the defaults.
    #[arg(long = "model", value_name = "NAME=PATH", value_parser = parse_model_source)]
    pub models: Vec<ModelSource>,

    /// Only register the named model(s).
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,
}

/// One request, from flags and/or a JSON file.
#[derive(Debug, Args, Clone, Default)]
pub struct PredictArgs {
    #[command(flatten)]
    pub models: ModelArgs,

    /// JSON object with field values. Flags override values from the file.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Production quarter of the month (Quarter1..Quarter5).
    #[arg(long)]
    pub quarter: Option<String>,
    /// Department (sweing, finishing).
    #[arg(long)]
    pub department: Option<String>,
    /// Day of the week (Monday..Sunday).
    #[arg(long)]
    pub day: Option<String>,
    #[arg(long)]
    pub team: Option<String>,
    #[arg(long)]
    pub targeted_productivity: Option<String>,
    /// Standard minute value.
    #[arg(long)]
    pub smv: Option<String>,
    /// Work in progress.
    #[arg(long)]
    pub wip: Option<String>,
    #[arg(long)]
    pub over_time: Option<String>,
    #[arg(long)]
    pub incentive: Option<String>,
    #[arg(long)]
    pub idle_time: Option<String>,
    #[arg(long)]
    pub idle_men: Option<String>,
    #[arg(long)]
    pub no_of_style_change: Option<String>,
    #[arg(long)]
    pub no_of_workers: Option<String>,
    #[arg(long)]
    pub month: Option<String>,
}

impl PredictArgs {
    /// Field values given as flags, keyed by schema field name.
    pub fn flag_fields(&self) -> RawFields {
        let pairs = [
            ("quarter", &self.quarter),
            ("department", &self.department),
            ("day", &self.day),
            ("team", &self.team),
            ("targeted_productivity", &self.targeted_productivity),
            ("smv", &self.smv),
            ("wip", &self.wip),
            ("over_time", &self.over_time),
            ("incentive", &self.incentive),
            ("idle_time", &self.idle_time),
            ("idle_men", &self.idle_men),
            ("no_of_style_change", &self.no_of_style_change),
            ("no_of_workers", &self.no_of_workers),
            ("month", &self.month),
        ];
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
            .collect()
    }
}

/// Options for CSV batches.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub models: ModelArgs,

    /// Request CSV with schema field names as headers.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Export per-row predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print a JSON report instead of the text table.
    #[arg(long)]
    pub json: bool,
}

fn parse_model_source(s: &str) -> Result<ModelSource, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))?;
    let name = name.trim();
    let path = path.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{s}'"));
    }
    Ok(ModelSource {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_flag_parses_name_and_path() {
        let src = parse_model_source("rf=models/rf.json").unwrap();
        assert_eq!(src.name, "rf");
        assert_eq!(src.path, PathBuf::from("models/rf.json"));
        assert!(parse_model_source("rf").is_err());
        assert!(parse_model_source("=x.json").is_err());
    }

    #[test]
    fn predict_flags_use_schema_names() {
        let cli = Cli::parse_from([
            "gpp",
            "predict",
            "--department",
            "sweing",
            "--targeted-productivity",
            "0.8",
            "--only",
            "rf",
        ]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let fields = args.flag_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["department"], "sweing");
        assert_eq!(fields["targeted_productivity"], "0.8");
        assert_eq!(args.models.only, vec!["rf".to_string()]);
    }

    #[test]
    fn batch_requires_csv() {
        assert!(Cli::try_parse_from(["gpp", "batch"]).is_err());
    }
}
