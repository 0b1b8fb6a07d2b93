// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{DEFAULT_PER_PAGE, DEFAULT_REGIONS};

// --- REQUEST / RESPONSE MODELS ---

/// The HTTP verbs the platform API is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Mutating verbs are gated behind an interactive confirmation.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Verbs that carry a JSON body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request, built fresh for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Resource path relative to the API base URL, e.g. `/thngs/UpUxnWAXeMPNQraRaGmKQdHr`.
    pub path: String,
    /// Query parameters in the order they are appended.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// The decoded JSON body. `None` for DELETE and for empty mutation bodies.
    pub data: Option<Value>,
}

impl ApiResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The continuation cursor of a paginated result set.
    pub fn next_link(&self) -> Option<&str> {
        self.header("link").filter(|link| !link.trim().is_empty())
    }
}

/// Result of pushing a request through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent(ApiResponse),
    /// The user declined the confirmation prompt; nothing was sent.
    Declined,
}

/// Result of running a complete command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command ran; carries the value it produced (`Null` when there is none).
    Completed(Value),
    /// A mutating request was declined at the confirmation prompt.
    Declined,
    /// The reserved interactive keyword was given.
    Interactive,
}

// --- CONFIGURATION MODELS (config.toml) ---

/// A stored API key and the region it belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub api_key: String,
    pub region: String,
}

/// Verbosity of informational output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Error,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Persistent behavior options, edited with `evrythng options`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Options {
    #[serde(default)]
    pub error_detail: bool,
    #[serde(default = "default_true")]
    pub no_confirm: bool,
    #[serde(default)]
    pub show_http: bool,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            error_detail: false,
            no_confirm: true,
            show_http: false,
            log_level: LogLevel::Info,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// The deserialized structure of `config.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Name of the active key. Empty when none is selected.
    #[serde(default)]
    pub using: String,
    #[serde(default)]
    pub keys: BTreeMap<String, KeyEntry>,
    #[serde(default)]
    pub options: Options,
    #[serde(default = "default_regions")]
    pub regions: BTreeMap<String, String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            using: String::new(),
            keys: BTreeMap::new(),
            options: Options::default(),
            regions: default_regions(),
        }
    }
}

impl CliConfig {
    /// The active key entry, if one is selected and stored.
    pub fn active_key(&self) -> Option<(&str, &KeyEntry)> {
        if self.using.is_empty() {
            return None;
        }
        self.keys
            .get_key_value(&self.using)
            .map(|(name, entry)| (name.as_str(), entry))
    }
}

fn default_true() -> bool {
    true
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_regions() -> BTreeMap<String, String> {
    DEFAULT_REGIONS
        .iter()
        .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CliConfig = toml::from_str("using = \"\"\n[options]\nshow_http = true\n").unwrap();
        assert!(config.options.show_http);
        assert!(config.options.no_confirm);
        assert_eq!(config.options.default_per_page, DEFAULT_PER_PAGE);
        assert_eq!(config.regions.len(), DEFAULT_REGIONS.len());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = ApiResponse {
            status: 200,
            headers: vec![("Link".to_string(), "<https://x/next>".to_string())],
            data: None,
        };
        assert_eq!(response.header("link"), Some("<https://x/next>"));
        assert_eq!(response.next_link(), Some("<https://x/next>"));
    }

    #[test]
    fn test_only_get_is_not_mutating() {
        assert!(!Method::Get.is_mutating());
        assert!(Method::Post.is_mutating());
        assert!(Method::Put.is_mutating());
        assert!(Method::Delete.is_mutating());
        assert!(!Method::Delete.has_body());
    }
}
