// src/cli/handlers/request.rs

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use super::Invocation;
use crate::{
    core::{
        pattern::Pattern,
        registry::{Endpoint, render_path},
        switches::RequestOptions,
    },
    models::{Method, Outcome},
    system::{files, http::ApiSession, prompt::Prompt},
};

const BUILD_PROMPT: &str = "Request payload (JSON)";

/// Executes a declarative endpoint.
pub async fn handle(
    endpoint: Endpoint,
    pattern: &Pattern,
    args: &[String],
    options: &RequestOptions,
    inv: &mut Invocation<'_>,
) -> Result<Outcome> {
    let path = render_path(endpoint.path, args);
    let imports_file = options.from_csv.is_some() || options.from_json.is_some();
    if imports_file && endpoint.method != Method::Post {
        bail!("--from-csv and --from-json are only available for create operations.");
    }

    let client = inv.client(options)?;
    let settings = inv.config.options.clone();
    let session = ApiSession {
        client: &client,
        options,
        settings: &settings,
        prompt: inv.prompt,
    };

    if imports_file {
        let records = load_records(options)?;
        return session.import(&path, records, inv.out).await;
    }

    let body = if endpoint.method.has_body() {
        Some(payload(pattern, args, options, inv.prompt)?)
    } else {
        None
    };
    session.request(endpoint.method, &path, body, inv.out).await
}

/// Reads the records of `--from-csv` or `--from-json`.
fn load_records(options: &RequestOptions) -> Result<Vec<Value>> {
    if let Some(path) = &options.from_csv {
        return Ok(files::read_csv(path)?);
    }
    if let Some(path) = &options.from_json {
        return Ok(files::read_json(path)?);
    }
    Ok(Vec::new())
}

/// The request body: prompted for with `--build`, otherwise the `$payload` argument.
pub fn payload(
    pattern: &Pattern,
    args: &[String],
    options: &RequestOptions,
    prompt: &dyn Prompt,
) -> Result<Value> {
    let raw = if options.build {
        prompt.input(BUILD_PROMPT)?
    } else {
        let position = pattern
            .payload_position()
            .ok_or_else(|| anyhow!("This operation does not take a payload."))?;
        args.get(position)
            .cloned()
            .ok_or_else(|| anyhow!("Missing $payload argument."))?
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON payload: {}", raw))
}
