// src/system/files.rs

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::paths::{self, PathError};

/// Top-level keys that are either expanded into prefixed columns or have no
/// useful CSV representation.
const CSV_IGNORED_KEYS: &[&str] = &[
    "resource",
    "properties",
    "tags",
    "collections",
    "location",
    "customFields",
    "identifiers",
];

/// Nested objects that get one column per inner key.
const CSV_EXPANDED_KEYS: &[&str] = &["customFields", "identifiers"];

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Filesystem Error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{0}' must contain a JSON array of objects.")]
    NotAnArray(String),
}

fn resolve(path: &Path) -> Result<PathBuf, FileError> {
    Ok(paths::expand_user_path(&path.to_string_lossy())?)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FileError + '_ {
    move |source| FileError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> FileError + '_ {
    move |source| FileError::Csv {
        path: path.display().to_string(),
        source,
    }
}

/// Computes the CSV header row for a set of items.
///
/// Plain columns come first in order of appearance, then one
/// `customFields.<key>` and `identifiers.<key>` column per nested key.
pub fn csv_columns(items: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    let mut add = |column: String| {
        if !columns.contains(&column) {
            columns.push(column);
        }
    };

    for object in items.iter().filter_map(Value::as_object) {
        for key in object.keys().filter(|k| !CSV_IGNORED_KEYS.contains(&k.as_str())) {
            add(key.clone());
        }
    }
    for prefix in CSV_EXPANDED_KEYS {
        for object in items.iter().filter_map(|item| item.get(*prefix)?.as_object()) {
            for key in object.keys() {
                add(format!("{}.{}", prefix, key));
            }
        }
    }
    columns
}

fn cell(item: &Value, column: &str) -> String {
    let value = match column.split_once('.') {
        Some((prefix, key)) if CSV_EXPANDED_KEYS.contains(&prefix) => {
            item.get(prefix).and_then(|nested| nested.get(key))
        }
        _ => item.get(column),
    };
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Writes items to a CSV file, one row per item.
pub fn write_csv(path: &Path, items: &[Value]) -> Result<(), FileError> {
    let target = resolve(path)?;
    let columns = csv_columns(items);
    let mut writer = csv::Writer::from_path(&target).map_err(csv_error(&target))?;

    writer.write_record(&columns).map_err(csv_error(&target))?;
    for item in items {
        let row: Vec<String> = columns.iter().map(|column| cell(item, column)).collect();
        writer.write_record(&row).map_err(csv_error(&target))?;
    }
    writer.flush().map_err(io_error(&target))?;

    log::info!("Wrote {} items to {}", items.len(), target.display());
    Ok(())
}

/// Writes items to a file as a pretty-printed JSON array.
pub fn write_json(path: &Path, items: &[Value]) -> Result<(), FileError> {
    let target = resolve(path)?;
    let content = serde_json::to_string_pretty(items).map_err(|source| FileError::Json {
        path: target.display().to_string(),
        source,
    })?;
    fs::write(&target, content).map_err(io_error(&target))?;

    log::info!("Wrote {} items to {}", items.len(), target.display());
    Ok(())
}

/// Reads a CSV file into objects, folding prefixed columns back into nested
/// objects. Cells holding JSON values are parsed; everything else is a string.
pub fn read_csv(path: &Path) -> Result<Vec<Value>, FileError> {
    let source = resolve(path)?;
    let mut reader = csv::Reader::from_path(&source).map_err(csv_error(&source))?;
    let headers = reader.headers().map_err(csv_error(&source))?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error(&source))?;
        let mut object = Map::new();
        for (column, raw) in headers.iter().zip(row.iter()) {
            if raw.is_empty() || column.is_empty() {
                continue;
            }
            let value = parse_cell(raw);
            match column.split_once('.') {
                Some((prefix, key)) if CSV_EXPANDED_KEYS.contains(&prefix) => {
                    let nested = object
                        .entry(prefix.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(nested) = nested {
                        nested.insert(key.to_string(), value);
                    }
                }
                _ => {
                    object.insert(column.to_string(), value);
                }
            }
        }
        records.push(Value::Object(object));
    }

    log::debug!("Read {} records from {}", records.len(), source.display());
    Ok(records)
}

fn parse_cell(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_) | Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Reads a JSON file holding an array of objects.
pub fn read_json(path: &Path) -> Result<Vec<Value>, FileError> {
    let source = resolve(path)?;
    let content = fs::read_to_string(&source).map_err(io_error(&source))?;
    let value: Value = serde_json::from_str(&content).map_err(|e| FileError::Json {
        path: source.display().to_string(),
        source: e,
    })?;
    match value {
        Value::Array(items) if items.iter().all(Value::is_object) => Ok(items),
        _ => Err(FileError::NotAnArray(source.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> Vec<Value> {
        vec![
            json!({
                "id": "U1",
                "name": "Lamp",
                "tags": ["a"],
                "customFields": {"color": "red"},
                "identifiers": {"gs1:01": "0001"}
            }),
            json!({"id": "U2", "description": "Second", "customFields": {"size": 3}}),
        ]
    }

    #[test]
    fn test_columns_skip_ignored_and_expand_nested() {
        assert_eq!(
            csv_columns(&sample()),
            vec![
                "id",
                "name",
                "description",
                "customFields.color",
                "customFields.size",
                "identifiers.gs1:01"
            ]
        );
    }

    #[test]
    fn test_csv_export_then_import_restores_nested_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,name,description,customFields.color"));

        let records = read_csv(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["customFields"]["color"], "red");
        assert_eq!(records[1]["customFields"]["size"], 3);
        assert!(records[1].get("name").is_none());
    }

    #[test]
    fn test_json_file_must_hold_an_array() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        write_json(&good, &sample()).unwrap();
        assert_eq!(read_json(&good).unwrap(), sample());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{\"id\": 1}").unwrap();
        assert!(matches!(read_json(&bad), Err(FileError::NotAnArray(_))));
    }
}
