//! Export batch predictions to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per input row, one column per model.

use std::path::Path;

use crate::error::{AppError, EXIT_INPUT};
use crate::report::{BatchRow, cell_text};

/// Write batch results to a CSV file.
pub fn write_predictions_csv(path: &Path, rows: &[BatchRow], models: &[String]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["line".to_string()];
    header.extend(models.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let mut record = vec![row.line.to_string()];
        record.extend(models.iter().map(|m| cell_text(row, m)));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PredictionResult;

    #[test]
    fn writes_one_column_per_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            BatchRow {
                line: 2,
                outcome: Ok(vec![PredictionResult {
                    model: "rf".to_string(),
                    outcome: Ok(0.5),
                }]),
            },
            BatchRow {
                line: 3,
                outcome: Err("field `department` has unknown category 'dyeing' (expected one of: finishing, sweing)"
                    .to_string()),
            },
        ];

        write_predictions_csv(&path, &rows, &["rf".to_string()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap(), vec!["line", "rf"]);
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(&records[0][1], "0.5000");
        // The comma inside the message survives quoting.
        assert!(records[1][1].ends_with("finishing, sweing)"));
    }
}
