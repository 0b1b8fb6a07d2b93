// src/system/http.rs

//! # HTTP Pipeline
//!
//! [`ApiClient`] owns the transport: it turns a [`RequestDescriptor`] into a
//! `reqwest` call and decodes the answer into an [`ApiResponse`].
//! [`ApiSession`] wraps a client with everything one command line needs (its
//! switches, the persistent options and the prompt) and runs the full
//! pipeline: query synthesis, confirmation, request echo, send and shaping.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::io::Write;
use thiserror::Error;
use url::Url;

use crate::{
    core::{
        credentials::{Credential, mask},
        query,
        shaper::{self, ShapeError},
        switches::RequestOptions,
    },
    models::{ApiResponse, Delivery, Method, Options, Outcome, RequestDescriptor},
    system::prompt::Prompt,
};

const CONFIRMATION_PROMPT: &str = "Continue?";

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API Error ({status}): {}", first_error(.body))]
    Api { status: u16, body: Value },
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("The API returned an empty body for {method} {path}.")]
    EmptyBody { method: Method, path: String },
}

impl HttpError {
    /// The status and body of a platform error response.
    pub fn api_body(&self) -> Option<(u16, &Value)> {
        match self {
            Self::Api { status, body } => Some((*status, body)),
            _ => None,
        }
    }
}

/// The message shown for a platform error: the first entry of its `errors`
/// array, then its `message`, then the raw body.
pub fn first_error(body: &Value) -> String {
    if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        return match first {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
    }
    match body.get("message") {
        Some(Value::String(text)) => text.clone(),
        _ => match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

/// The transport half of the pipeline. One per invocation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(credential: &Credential) -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(concat!("evrythng-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HttpError::Client)?;
        Ok(Self {
            client,
            base_url: credential.api_url.trim_end_matches('/').to_string(),
            api_key: credential.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request of `method`.
    pub fn headers(&self, method: Method) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Authorization".to_string(), self.api_key.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if method.has_body() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers
    }

    /// Builds the absolute URL of a descriptor.
    pub fn url_for(&self, descriptor: &RequestDescriptor) -> Result<Url, HttpError> {
        let raw = format!("{}{}", self.base_url, descriptor.path);
        let mut url = Url::parse(&raw).map_err(|source| HttpError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if !descriptor.query.is_empty() {
            url.set_query(Some(&encode_query(&descriptor.query)));
        }
        Ok(url)
    }

    /// Sends a descriptor and decodes the response.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<ApiResponse, HttpError> {
        let url = self.url_for(descriptor)?;
        log::debug!("{} {}", descriptor.method, url);

        let mut request = match descriptor.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        for (name, value) in &descriptor.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &descriptor.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        decode(descriptor.method, &descriptor.path, response).await
    }

    /// Issues a GET for an absolute URL, as used by page traversal.
    pub async fn fetch(&self, url: &str) -> Result<ApiResponse, HttpError> {
        let parsed = Url::parse(url).map_err(|source| HttpError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        log::debug!("GET {}", parsed);

        let mut request = self.client.get(parsed);
        for (name, value) in self.headers(Method::Get) {
            request = request.header(name, value);
        }
        let response = request.send().await?;
        decode(Method::Get, url, response).await
    }
}

/// Joins query pairs with every value percent-encoded, so a space is `%20`.
fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Turns a raw response into an [`ApiResponse`].
///
/// DELETE bodies are ignored. Empty bodies are accepted for POST and PUT only.
async fn decode(method: Method, path: &str, response: reqwest::Response) -> Result<ApiResponse, HttpError> {
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let text = response.text().await?;

    if !status.is_success() {
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(HttpError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let data = if method == Method::Delete {
        None
    } else if text.trim().is_empty() {
        if !method.has_body() {
            return Err(HttpError::EmptyBody {
                method,
                path: path.to_string(),
            });
        }
        None
    } else {
        Some(serde_json::from_str(&text)?)
    };

    Ok(ApiResponse {
        status: status.as_u16(),
        headers,
        data,
    })
}

/// Everything one command line needs to talk to the API.
pub struct ApiSession<'a> {
    pub client: &'a ApiClient,
    pub options: &'a RequestOptions,
    pub settings: &'a Options,
    pub prompt: &'a dyn Prompt,
}

impl std::fmt::Debug for ApiSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("client", &self.client)
            .field("options", &self.options)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<'a> ApiSession<'a> {
    /// Builds the descriptor of a request: synthesized query plus headers.
    pub fn describe(&self, method: Method, path: &str, body: Option<Value>) -> RequestDescriptor {
        RequestDescriptor {
            method,
            path: path.to_string(),
            query: query::build_query(method, path, self.options, self.settings.default_per_page),
            headers: self.client.headers(method),
            body,
        }
    }

    /// Asks for confirmation when the verb mutates and `no_confirm` is off.
    fn confirmed(&self, method: Method, out: &mut dyn Write) -> Result<bool> {
        if !method.is_mutating() || self.settings.no_confirm {
            return Ok(true);
        }
        if self.prompt.confirm(CONFIRMATION_PROMPT)? {
            return Ok(true);
        }
        writeln!(out, "Cancelled")?;
        Ok(false)
    }

    /// Prints a request the way it is sent, with the credential masked.
    fn echo_request(&self, descriptor: &RequestDescriptor, out: &mut dyn Write) -> Result<()> {
        let url = self.client.url_for(descriptor)?;
        writeln!(out, "\n>> {} {}", descriptor.method, url)?;
        for (name, value) in &descriptor.headers {
            let shown = if name == "Authorization" { mask(value) } else { value.clone() };
            writeln!(out, "{}: {}", name, shown)?;
        }
        writeln!(out)?;
        if let Some(body) = &descriptor.body {
            writeln!(out, "{}\n", serde_json::to_string_pretty(body)?)?;
        }
        Ok(())
    }

    /// Confirms (if required), echoes (if enabled) and sends one request.
    pub async fn execute(&self, descriptor: &RequestDescriptor, out: &mut dyn Write) -> Result<Delivery> {
        if !self.confirmed(descriptor.method, out)? {
            return Ok(Delivery::Declined);
        }
        if self.settings.show_http {
            self.echo_request(descriptor, out)?;
        }
        let response = self.client.send(descriptor).await?;
        Ok(Delivery::Sent(response))
    }

    /// Runs the whole pipeline for one operation and shapes the response.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        let descriptor = self.describe(method, path, body);
        let response = match self.execute(&descriptor, out).await? {
            Delivery::Sent(response) => response,
            Delivery::Declined => return Ok(Outcome::Declined),
        };

        if method == Method::Delete {
            writeln!(out, "\nDeleted {}", path)?;
            return Ok(Outcome::Completed(Value::Null));
        }

        let value = shaper::shape(self, response, out).await.map_err(|err| match err {
            ShapeError::Http(inner) => anyhow::Error::new(inner),
            other => anyhow::Error::new(other),
        })?;
        Ok(Outcome::Completed(value))
    }

    /// Sends a GET without confirmation, echo or shaping and returns its data.
    pub async fn get_silently(&self, path: &str) -> Result<Value> {
        let descriptor = self.describe(Method::Get, path, None);
        let response = self.client.send(&descriptor).await?;
        Ok(response.data.unwrap_or(Value::Null))
    }

    /// Creates one resource per record, in order, behind a single confirmation.
    /// The first failure stops the batch.
    pub async fn import(&self, path: &str, records: Vec<Value>, out: &mut dyn Write) -> Result<Outcome> {
        if !self.settings.no_confirm {
            let question = format!("Create {} resources at {}?", records.len(), path);
            if !self.prompt.confirm(&question)? {
                writeln!(out, "Cancelled")?;
                return Ok(Outcome::Declined);
            }
        }

        let total = records.len();
        let mut created = Vec::with_capacity(total);
        for (position, record) in records.into_iter().enumerate() {
            let descriptor = self.describe(Method::Post, path, Some(record));
            if self.settings.show_http {
                self.echo_request(&descriptor, out)?;
            }
            let response = self.client.send(&descriptor).await?;
            log::info!("Created {}/{}", position + 1, total);
            created.push(response.data.unwrap_or(Value::Null));
        }

        writeln!(out, "Created {} resources.", created.len())?;
        Ok(Outcome::Completed(Value::Array(created)))
    }
}

/// The reason phrase of a status code, e.g. `Not Found`.
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}
