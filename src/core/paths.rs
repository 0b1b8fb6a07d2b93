// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_PATH_ENV};
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CLI_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to expand path '{path}': {message}")]
    Expansion { path: String, message: String },
}

/// Returns the path to the CLI configuration directory (`~/.config/evrythng`).
/// Creates it if it doesn't exist.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = CLI_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    // --- Cache miss: compute the path for the first time ---
    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `config.toml`.
///
/// `EVRYTHNG_CONFIG` takes precedence over the system config directory.
pub fn get_config_path() -> Result<PathBuf, PathError> {
    if let Ok(custom) = std::env::var(CONFIG_PATH_ENV)
        && !custom.trim().is_empty()
    {
        return expand_user_path(&custom);
    }
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_are_unchanged() {
        assert_eq!(
            expand_user_path("./data.csv").unwrap(),
            PathBuf::from("./data.csv")
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let expanded = expand_user_path("~/data.json").unwrap();
        assert!(expanded.ends_with("data.json"));
        if let Some(home) = dirs::home_dir() {
            assert!(expanded.starts_with(home));
        }
    }
}
