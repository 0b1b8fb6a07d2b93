// src/core/credentials.rs

use thiserror::Error;

use crate::{
    constants::{API_KEY_LENGTH, CREDENTIAL_PREFIX_LENGTH, DEFAULT_REGION},
    models::CliConfig,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No key has been selected. Use 'keys add' to add one.")]
    NoKeySelected,
    #[error("Key '{0}' not found in the configuration.")]
    UnknownKey(String),
    #[error("Invalid API key provided to --api-key.")]
    InvalidOverride,
    #[error("Region '{0}' is not defined in the configuration.")]
    UnknownRegion(String),
}

/// The bearer credential and API base URL used for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub api_key: String,
    pub api_url: String,
}

/// Cuts a secret to its first few characters.
pub fn mask(secret: &str) -> String {
    let prefix: String = secret.chars().take(CREDENTIAL_PREFIX_LENGTH).collect();
    format!("{}...", prefix)
}

/// Resolves the credential for this invocation.
///
/// An `--api-key` override is either the name of a stored key or a raw
/// 80-character key. Without an override the active key is used.
pub fn resolve(config: &CliConfig, api_key_override: Option<&str>) -> Result<Credential, CredentialError> {
    if let Some(value) = api_key_override {
        if let Some(entry) = config.keys.get(value) {
            log::debug!("Using stored key '{}' for this request", value);
            return Ok(Credential {
                api_key: entry.api_key.clone(),
                api_url: region_url(config, &entry.region)?,
            });
        }

        if value.chars().count() != API_KEY_LENGTH {
            return Err(CredentialError::InvalidOverride);
        }

        let region = config
            .active_key()
            .map(|(_, entry)| entry.region.as_str())
            .unwrap_or(DEFAULT_REGION);
        return Ok(Credential {
            api_key: value.to_string(),
            api_url: region_url(config, region)?,
        });
    }

    if config.using.is_empty() {
        return Err(CredentialError::NoKeySelected);
    }
    let (_, entry) = config
        .active_key()
        .ok_or_else(|| CredentialError::UnknownKey(config.using.clone()))?;

    Ok(Credential {
        api_key: entry.api_key.clone(),
        api_url: region_url(config, &entry.region)?,
    })
}

/// Looks up the base URL of a configured region.
pub fn region_url(config: &CliConfig, region: &str) -> Result<String, CredentialError> {
    config
        .regions
        .get(region)
        .cloned()
        .ok_or_else(|| CredentialError::UnknownRegion(region.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyEntry;

    fn config_with(name: &str, region: &str) -> CliConfig {
        let mut config = CliConfig::default();
        config.keys.insert(
            name.to_string(),
            KeyEntry {
                api_key: "k".repeat(API_KEY_LENGTH),
                region: region.to_string(),
            },
        );
        config.using = name.to_string();
        config
    }

    #[test]
    fn test_active_key_is_used_by_default() {
        let credential = resolve(&config_with("prod", "eu"), None).unwrap();
        assert_eq!(credential.api_url, "https://api-eu.evrythng.com");
        assert_eq!(mask(&credential.api_key), "kkkk...");
    }

    #[test]
    fn test_no_selected_key_is_an_error() {
        let err = resolve(&CliConfig::default(), None).unwrap_err();
        assert_eq!(err, CredentialError::NoKeySelected);
    }

    #[test]
    fn test_override_by_name_uses_its_region() {
        let mut config = config_with("prod", "eu");
        config.keys.insert(
            "test".to_string(),
            KeyEntry {
                api_key: "t".repeat(API_KEY_LENGTH),
                region: "us".to_string(),
            },
        );
        let credential = resolve(&config, Some("test")).unwrap();
        assert!(credential.api_key.starts_with('t'));
        assert_eq!(credential.api_url, "https://api.evrythng.com");
    }

    #[test]
    fn test_raw_override_must_be_full_length() {
        let config = CliConfig::default();
        assert_eq!(resolve(&config, Some("short")), Err(CredentialError::InvalidOverride));

        let raw = "r".repeat(API_KEY_LENGTH);
        let credential = resolve(&config, Some(&raw)).unwrap();
        assert_eq!(credential.api_key, raw);
        assert_eq!(credential.api_url, "https://api.evrythng.com");
    }
}
