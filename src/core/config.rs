// src/core/config.rs

use std::{fs, path::Path};
use thiserror::Error;
use url::Url;

use crate::{
    constants::{API_KEY_LENGTH, MAX_PER_PAGE},
    models::CliConfig,
};

/// Represents errors that can occur while reading or writing `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path error: {0}")]
    Path(#[from] crate::core::paths::PathError),
    #[error("Failed to parse configuration: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Configuration is invalid:\n- {}", .0.join("\n- "))]
    Invalid(Vec<String>),
}

type ConfigResult<T> = Result<T, ConfigError>;

/// Loads the configuration, writing the defaults first if the file doesn't exist.
pub fn load_or_create(path: &Path) -> ConfigResult<CliConfig> {
    if !path.exists() {
        log::debug!("No configuration at '{}'. Writing defaults.", path.display());
        let default_config = CliConfig::default();
        save(path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(path)?;
    let config: CliConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Writes the configuration, creating parent directories as needed.
pub fn save(path: &Path, config: &CliConfig) -> ConfigResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)?;
    log::trace!("Configuration written to '{}'", path.display());
    Ok(())
}

/// Checks the whole configuration and reports every problem at once.
pub fn validate(config: &CliConfig) -> ConfigResult<()> {
    let mut problems = Vec::new();

    if !config.using.is_empty() && !config.keys.contains_key(&config.using) {
        problems.push(format!("'using' names unknown key '{}'", config.using));
    }

    for (name, entry) in &config.keys {
        if entry.api_key.chars().count() != API_KEY_LENGTH {
            problems.push(format!(
                "key '{}' must be {} characters long",
                name, API_KEY_LENGTH
            ));
        }
        if !config.regions.contains_key(&entry.region) {
            problems.push(format!(
                "key '{}' uses unknown region '{}'",
                name, entry.region
            ));
        }
    }

    let per_page = config.options.default_per_page;
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        problems.push(format!(
            "options.default_per_page must be between 1 and {}, got {}",
            MAX_PER_PAGE, per_page
        ));
    }

    for (region, url) in &config.regions {
        if Url::parse(url).is_err() {
            problems.push(format!("region '{}' has an invalid URL '{}'", region, url));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyEntry;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_or_create(&path).unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(path.exists());

        let reloaded = load_or_create(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_save_and_reload_keeps_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = CliConfig::default();
        config.keys.insert(
            "prod".to_string(),
            KeyEntry {
                api_key: "a".repeat(API_KEY_LENGTH),
                region: "eu".to_string(),
            },
        );
        config.using = "prod".to_string();

        save(&path, &config).unwrap();
        assert_eq!(load_or_create(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut config = CliConfig::default();
        config.using = "ghost".to_string();
        config.options.default_per_page = 0;
        config.keys.insert(
            "bad".to_string(),
            KeyEntry {
                api_key: "short".to_string(),
                region: "mars".to_string(),
            },
        );

        match validate(&config) {
            Err(ConfigError::Invalid(problems)) => assert_eq!(problems.len(), 4),
            other => panic!("expected invalid configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[options]\ndefault_per_page = 500\n").unwrap();
        assert!(matches!(load_or_create(&path), Err(ConfigError::Invalid(_))));
    }
}
