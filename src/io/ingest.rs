//! Request ingest: CSV batches and JSON request files.
//!
//! This module only turns files into `RawFields`. Parsing and validating the
//! values is the feature builder's job, so a bad value surfaces with the same
//! typed error whether it came from a flag, a JSON file or a CSV row.
//!
//! Design goals:
//! - **Strict header** for schema columns (clear errors + exit code 2)
//! - **Row-level isolation** (a malformed row is reported, not fatal)
//! - **Deterministic behavior** (rows keep their file order)

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use serde_json::Value;

use crate::domain::RawFields;
use crate::encoding::FeatureSchema;
use crate::error::{AppError, EXIT_INPUT};

/// One CSV data row, keyed by the normalized header names.
#[derive(Debug, Clone)]
pub struct RequestRow {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub fields: RawFields,
}

/// A row the CSV reader itself could not parse.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows + unreadable rows.
#[derive(Debug, Clone)]
pub struct IngestedRequests {
    pub rows: Vec<RequestRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a CSV of requests, one per row, with schema field names as headers.
///
/// Columns outside the schema are kept (and later ignored by the builder).
pub fn load_request_rows(path: &Path, schema: &FeatureSchema) -> Result<IngestedRequests, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers)?;
    ensure_schema_columns_exist(schema, &header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        match result {
            Ok(record) => rows.push(RequestRow {
                line,
                fields: record_fields(&record, &header_map),
            }),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    if rows_read == 0 {
        return Err(AppError::new(EXIT_INPUT, format!("CSV '{}' has no data rows.", path.display())));
    }

    Ok(IngestedRequests {
        rows,
        row_errors,
        rows_read,
    })
}

/// Read one request from a JSON object file.
///
/// Values may be strings or numbers (numbers are kept in their JSON spelling);
/// `null` counts as absent. Keys are normalized like CSV headers.
pub fn read_request_json(path: &Path) -> Result<RawFields, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open request JSON '{}': {e}", path.display())))?;
    let value: Value = serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid request JSON: {e}")))?;
    request_from_json(value)
}

fn request_from_json(value: Value) -> Result<RawFields, AppError> {
    let Value::Object(map) = value else {
        return Err(AppError::new(EXIT_INPUT, "Request JSON must be an object of field values."));
    };

    let mut fields = RawFields::new();
    for (key, v) in map {
        let name = normalize_header_name(&key);
        let raw = match v {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(AppError::new(
                    EXIT_INPUT,
                    format!("Request field `{name}` must be a string or number, got {other}"),
                ));
            }
        };
        if fields.insert(name.clone(), raw).is_some() {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Request JSON sets field `{name}` more than once"),
            ));
        }
    }
    Ok(fields)
}

fn build_header_map(headers: &StringRecord) -> Result<HashMap<String, usize>, AppError> {
    let mut map = HashMap::new();
    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if map.insert(name.clone(), idx).is_some() {
            return Err(AppError::new(EXIT_INPUT, format!("Duplicate CSV column: {name}")));
        }
    }
    Ok(map)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_schema_columns_exist(schema: &FeatureSchema, header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = schema.names().filter(|n| !header_map.contains_key(*n)).collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::new(
        EXIT_INPUT,
        format!("Missing required column(s): {}", missing.join(", ")),
    ))
}

fn record_fields(record: &StringRecord, header_map: &HashMap<String, usize>) -> RawFields {
    header_map
        .iter()
        .filter_map(|(name, &idx)| record.get(idx).map(|v| (name.clone(), v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "quarter,department,day,team,targeted_productivity,smv,wip,over_time,incentive,idle_time,idle_men,no_of_style_change,no_of_workers,month";

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_rows_with_line_numbers() {
        let csv = format!(
            "\u{feff}{HEADER}\nQuarter1,sweing,Monday,8,0.8,26.16,1108,7080,98,0,0,0,59,1\nQuarter2, finishing ,Friday,3,0.7,3.94,,960,0,0,0,0,8,2\n"
        );
        let file = write_csv(&csv);
        let ingest = load_request_rows(file.path(), &FeatureSchema::garment()).unwrap();

        assert_eq!(ingest.rows_read, 2);
        assert_eq!(ingest.rows.len(), 2);
        assert_eq!(ingest.rows[0].line, 2);
        assert_eq!(ingest.rows[0].fields["quarter"], "Quarter1");
        assert_eq!(ingest.rows[1].line, 3);
        assert_eq!(ingest.rows[1].fields["department"], "finishing");
        // Empty cells are passed through; the builder reports them as missing.
        assert_eq!(ingest.rows[1].fields["wip"], "");
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let csv = format!("{HEADER}\nQuarter1,sweing,Monday\n");
        let file = write_csv(&csv);
        let ingest = load_request_rows(file.path(), &FeatureSchema::garment()).unwrap();
        assert_eq!(ingest.rows[0].fields.len(), 3);
        assert!(!ingest.rows[0].fields.contains_key("month"));
    }

    #[test]
    fn missing_columns_are_listed() {
        let file = write_csv("quarter,department,day\nQuarter1,sweing,Monday\n");
        let err = load_request_rows(file.path(), &FeatureSchema::garment()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.to_string().contains("team"));
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn header_only_file_is_rejected() {
        let file = write_csv(&format!("{HEADER}\n"));
        assert!(load_request_rows(file.path(), &FeatureSchema::garment()).is_err());
    }

    #[test]
    fn json_request_accepts_strings_and_numbers() {
        let value = serde_json::json!({
            "quarter": "Quarter1",
            "team": 8,
            "smv": 26.16,
            "wip": null
        });
        let fields = request_from_json(value).unwrap();
        assert_eq!(fields["quarter"], "Quarter1");
        assert_eq!(fields["team"], "8");
        assert_eq!(fields["smv"], "26.16");
        assert!(!fields.contains_key("wip"));
    }

    #[test]
    fn header_case_is_normalized_on_every_path() {
        let csv = format!("{}\nQuarter1,sweing,Monday,8,0.8,26.16,1108,7080,98,0,0,0,59,1\n", HEADER.replace("team", "Team"));
        let file = write_csv(&csv);
        let ingest = load_request_rows(file.path(), &FeatureSchema::garment()).unwrap();
        assert_eq!(ingest.rows[0].fields["team"], "8");

        let fields = request_from_json(serde_json::json!({"Team": 8, " Day ": "Monday"})).unwrap();
        assert_eq!(fields["team"], "8");
        assert_eq!(fields["day"], "Monday");
    }

    #[test]
    fn colliding_names_are_rejected() {
        let file = write_csv(&format!("{HEADER},TEAM\nQuarter1,sweing,Monday,8,0.8,26.16,1108,7080,98,0,0,0,59,1,9\n"));
        let err = load_request_rows(file.path(), &FeatureSchema::garment()).unwrap_err();
        assert!(err.to_string().contains("Duplicate CSV column: team"));

        assert!(request_from_json(serde_json::json!({"team": 8, "Team": 9})).is_err());
    }

    #[test]
    fn json_request_rejects_nested_values() {
        assert!(request_from_json(serde_json::json!({"team": [8]})).is_err());
        assert!(request_from_json(serde_json::json!(["Quarter1"])).is_err());
    }
}
