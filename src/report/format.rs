//! Formatted terminal and JSON output.
//!
//! We keep formatting code in one place so the encoding/model code stays free
//! of presentation concerns.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{FieldKind, PredictionResult};
use crate::encoding::FeatureVectorBuilder;
use crate::error::{AppError, EXIT_INPUT};
use crate::models::ModelRegistry;
use crate::report::{BatchRow, batch_stats, cell_text};

/// One model's entry in a JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionEntry {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&PredictionResult> for PredictionEntry {
    fn from(r: &PredictionResult) -> Self {
        Self {
            model: r.model.clone(),
            value: r.value(),
            error: r.error().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub generated_at: DateTime<Utc>,
    pub predictions: Vec<PredictionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReportRow {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub predictions: Vec<PredictionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<BatchReportRow>,
}

/// Text report for a single request.
pub fn format_predictions(results: &[PredictionResult]) -> String {
    let width = results.iter().map(|r| r.model.len()).max().unwrap_or(0);
    let mut out = String::new();
    for r in results {
        match &r.outcome {
            Ok(value) => out.push_str(&format!("{:<width$}  {value:.4}\n", r.model)),
            Err(err) => out.push_str(&format!("{:<width$}  error: {err}\n", r.model)),
        }
    }
    out
}

pub fn prediction_report_json(results: &[PredictionResult]) -> Result<String, AppError> {
    let report = PredictionReport {
        generated_at: Utc::now(),
        predictions: results.iter().map(PredictionEntry::from).collect(),
    };
    to_json(&report)
}

/// Text table for a batch: one line per row, one column per model.
pub fn format_batch(rows: &[BatchRow], models: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6}", "line"));
    for m in models {
        out.push_str(&format!("  {m:>10}"));
    }
    out.push('\n');

    for row in rows {
        if let Err(message) = &row.outcome {
            out.push_str(&format!("{:>6}  rejected: {message}\n", row.line));
            continue;
        }
        out.push_str(&format!("{:>6}", row.line));
        for m in models {
            out.push_str(&format!("  {:>10}", cell_text(row, m)));
        }
        out.push('\n');
    }

    let stats = batch_stats(rows);
    out.push_str(&format!(
        "\nRows: {} | rejected: {} | model failures: {}\n",
        stats.rows, stats.rejected, stats.model_failures
    ));
    out
}

pub fn batch_report_json(rows: &[BatchRow]) -> Result<String, AppError> {
    let report = BatchReport {
        generated_at: Utc::now(),
        rows: rows
            .iter()
            .map(|row| match &row.outcome {
                Ok(results) => BatchReportRow {
                    line: row.line,
                    error: None,
                    predictions: results.iter().map(PredictionEntry::from).collect(),
                },
                Err(message) => BatchReportRow {
                    line: row.line,
                    error: Some(message.clone()),
                    predictions: Vec::new(),
                },
            })
            .collect(),
    };
    to_json(&report)
}

/// Schema positions and categorical codes.
pub fn format_schema(builder: &FeatureVectorBuilder) -> String {
    let mut out = String::new();
    out.push_str("Feature schema (vector position, field, kind):\n");
    for (pos, field) in builder.schema().fields().iter().enumerate() {
        let kind = match field.kind {
            FieldKind::Categorical => "categorical",
            FieldKind::Numeric => "numeric",
        };
        out.push_str(&format!("{pos:>3}  {:<22} {kind}\n", field.name));
    }

    out.push_str("\nCategorical codes:\n");
    for vocab in builder.codec().vocabularies() {
        let codes: Vec<String> = vocab
            .values()
            .iter()
            .enumerate()
            .map(|(code, value)| format!("{value}={code}"))
            .collect();
        out.push_str(&format!("  {}: {}\n", vocab.field(), codes.join(", ")));
    }
    out
}

/// One line per registered model.
pub fn format_models(registry: &ModelRegistry) -> String {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    let mut out = String::new();
    for entry in registry.all() {
        let model = entry.model();
        out.push_str(&format!(
            "{:<width$}  {} | features={}{}\n",
            entry.name(),
            model.describe(),
            model.n_features(),
            if model.feature_names().is_some() { " (named)" } else { "" },
        ));
    }
    out
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to serialize report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;

    fn results() -> Vec<PredictionResult> {
        vec![
            PredictionResult {
                model: "rf".to_string(),
                outcome: Ok(0.8735),
            },
            PredictionResult {
                model: "xgb".to_string(),
                outcome: Err(InferenceError::NonFinite { value: f64::NAN }),
            },
        ]
    }

    #[test]
    fn text_report_has_one_line_per_model() {
        let text = format_predictions(&results());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rf   0.8735");
        assert!(lines[1].starts_with("xgb  error: model produced a non-finite value"));
    }

    #[test]
    fn json_report_omits_absent_fields() {
        let json = prediction_report_json(&results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let preds = value["predictions"].as_array().unwrap();
        assert_eq!(preds[0]["model"], "rf");
        assert_eq!(preds[0]["value"], 0.8735);
        assert!(preds[0].get("error").is_none());
        assert!(preds[1].get("value").is_none());
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn schema_listing_shows_codes() {
        let text = format_schema(&FeatureVectorBuilder::garment().unwrap());
        assert!(text.contains("department: finishing=0, sweing=1"));
        assert!(text.contains("day: Friday=0, Monday=1"));
        assert!(text.contains(" 13  month"));
    }
}
