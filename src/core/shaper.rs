// src/core/shaper.rs

//! # Response Shaper
//!
//! Renders the final response of an operation. The switches of the command
//! line pick exactly one output path, checked in a fixed order:
//! `--page`, `--silent`, `--to-page`, `--expand`, response echo, `--summary`,
//! `--simple`, `--field`, `--to-csv`, `--to-json`, then pretty JSON.

use chrono::DateTime;
use serde_json::Value;
use std::io::Write;
use thiserror::Error;

use crate::{
    core::pagination::{self, into_items},
    models::ApiResponse,
    system::{
        files::{self, FileError},
        http::{ApiSession, HttpError, reason_phrase},
    },
};

/// Fields holding epoch-millisecond timestamps.
const TIMESTAMP_FIELDS: &[&str] = &[
    "createdAt",
    "updatedAt",
    "timestamp",
    "activatedAt",
    "completedAt",
    "expiresAt",
];

const INDENT: &str = "  ";

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("--to-page is only available when using --to-csv or --to-json")]
    ExportTargetMissing,
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Applies the output switches to a response and returns the resulting value.
pub async fn shape(
    session: &ApiSession<'_>,
    mut response: ApiResponse,
    out: &mut dyn Write,
) -> Result<Value, ShapeError> {
    let options = session.options;
    if response.data.is_none() {
        return Ok(Value::Null);
    }

    if let Some(page) = options.page.filter(|page| *page > 0) {
        response = pagination::advance_to_page(session.client, response, page).await?;
    }

    if options.silent {
        return Ok(response.data.unwrap_or(Value::Null));
    }

    if let Some(to_page) = options.to_page {
        if options.to_csv.is_none() && options.to_json.is_none() {
            return Err(ShapeError::ExportTargetMissing);
        }
        let status = response.status;
        let headers = response.headers.clone();
        let items = pagination::accumulate_pages(session.client, response, to_page).await?;
        response = ApiResponse {
            status,
            headers,
            data: Some(Value::Array(items)),
        };
    }

    let mut data = response.data.take().unwrap_or(Value::Null);

    if options.expand {
        expand_timestamps(&mut data);
    }

    if session.settings.show_http {
        writeln!(out, "<< {} {}", response.status, reason_phrase(response.status))?;
        for (name, value) in &response.headers {
            writeln!(out, "{}: {}", name, value)?;
        }
        writeln!(out)?;
    }

    if options.summary {
        render_summary(&data, out)?;
        return Ok(data);
    }

    if options.simple {
        render_simple(&data, 1, out)?;
        return Ok(data);
    }

    if let Some(field) = &options.field {
        let value = data.get(field).cloned().unwrap_or(Value::Null);
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(value);
    }

    if let Some(path) = &options.to_csv {
        files::write_csv(path, &into_items(Some(data.clone())))?;
        return Ok(data);
    }
    if let Some(path) = &options.to_json {
        files::write_json(path, &into_items(Some(data.clone())))?;
        return Ok(data);
    }

    writeln!(out, "{}", serde_json::to_string_pretty(&data)?)?;
    Ok(data)
}

/// Prints one `id name` line per item.
pub fn render_summary(data: &Value, out: &mut dyn Write) -> std::io::Result<()> {
    let items = match data {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    for item in items {
        let id = item.get("id").and_then(Value::as_str).unwrap_or("-");
        let name = item.get("name").and_then(Value::as_str).unwrap_or("");
        writeln!(out, "{} {}", id, name.trim_end())?;
    }
    Ok(())
}

/// Prints a flattened, indented `key: value` view.
pub fn render_simple(data: &Value, level: usize, out: &mut dyn Write) -> std::io::Result<()> {
    let indent = INDENT.repeat(level);
    match data {
        Value::Object(map) => {
            for (key, value) in map {
                if is_nested(value) {
                    writeln!(out, "{}{}:", indent, key)?;
                    render_simple(value, level + 1, out)?;
                } else {
                    writeln!(out, "{}{}: {}", indent, key, scalar(value))?;
                }
            }
        }
        Value::Array(items) => {
            for (position, item) in items.iter().enumerate() {
                if is_nested(item) {
                    if position > 0 {
                        writeln!(out)?;
                    }
                    render_simple(item, level, out)?;
                } else {
                    writeln!(out, "{}- {}", indent, scalar(item))?;
                }
            }
        }
        other => writeln!(out, "{}{}", indent, scalar(other))?,
    }
    Ok(())
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
        other => other.to_string(),
    }
}

/// Rewrites epoch-millisecond timestamps into RFC 3339 strings, recursively.
pub fn expand_timestamps(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if TIMESTAMP_FIELDS.contains(&key.as_str())
                    && let Some(millis) = field.as_i64()
                    && let Some(date) = DateTime::from_timestamp_millis(millis)
                {
                    *field = Value::String(date.to_rfc3339());
                } else {
                    expand_timestamps(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(expand_timestamps),
        _ => {}
    }
}
