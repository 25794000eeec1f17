//! Reporting utilities: batch outcomes and formatted terminal/JSON output.

pub mod format;

pub use format::*;

use crate::domain::PredictionResult;

/// Outcome of one batch row: per-model results, or why the row was rejected.
#[derive(Debug, Clone)]
pub struct BatchRow {
    /// 1-based line number in the source CSV.
    pub line: usize,
    pub outcome: Result<Vec<PredictionResult>, String>,
}

/// Counts for the batch summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub rows: usize,
    pub rejected: usize,
    pub model_failures: usize,
}

pub fn batch_stats(rows: &[BatchRow]) -> BatchStats {
    let mut stats = BatchStats {
        rows: rows.len(),
        ..BatchStats::default()
    };
    for row in rows {
        match &row.outcome {
            Ok(results) => stats.model_failures += results.iter().filter(|r| r.outcome.is_err()).count(),
            Err(_) => stats.rejected += 1,
        }
    }
    stats
}

/// Cell text for one model in a batch row.
pub fn cell_text(row: &BatchRow, model: &str) -> String {
    match &row.outcome {
        Err(message) => format!("error: {message}"),
        Ok(results) => match results.iter().find(|r| r.model == model) {
            Some(PredictionResult { outcome: Ok(value), .. }) => format!("{value:.4}"),
            Some(PredictionResult { outcome: Err(err), .. }) => format!("error: {err}"),
            None => String::new(),
        },
    }
}
