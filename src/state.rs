// src/state.rs

use crate::core::config::{self, ConfigError};
use crate::models::CliConfig;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// Represents the state of the loaded configuration.
/// It holds the current state and, once a mutation has been requested, a
/// snapshot of the original.
#[derive(Debug)]
enum ConfigSnapshot {
    /// No mutable access has been handed out yet.
    Pristine(CliConfig),
    /// Mutable access was requested. Holds the original and the current state.
    Dirty {
        original: CliConfig,
        current: CliConfig,
    },
}

/// The configuration of one process, with change tracking.
///
/// Read through `Deref`. The first `DerefMut` takes the snapshot, so unchanged
/// configurations are never rewritten.
#[derive(Debug)]
pub struct ConfigState {
    path: PathBuf,
    state: ConfigSnapshot,
}

impl ConfigState {
    pub fn new(path: PathBuf, config: CliConfig) -> Self {
        Self {
            path,
            state: ConfigSnapshot::Pristine(config),
        }
    }

    /// Loads (or creates) the configuration file at `path`.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let config = config::load_or_create(&path)?;
        Ok(Self::new(path, config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the current state differs from the original snapshot.
    pub fn needs_saving(&self) -> bool {
        match &self.state {
            ConfigSnapshot::Pristine(_) => false,
            ConfigSnapshot::Dirty { original, current } => original != current,
        }
    }

    /// Writes the configuration if it changed. Returns whether a write happened.
    pub fn persist(&mut self) -> Result<bool, ConfigError> {
        if !self.needs_saving() {
            return Ok(false);
        }
        config::validate(&**self)?;
        config::save(&self.path, &**self)?;

        // The written state becomes the new baseline.
        let current = std::mem::take(self.current_mut());
        self.state = ConfigSnapshot::Pristine(current);
        Ok(true)
    }

    fn current_mut(&mut self) -> &mut CliConfig {
        if let ConfigSnapshot::Pristine(_) = self.state {
            self.state = match std::mem::replace(
                &mut self.state,
                ConfigSnapshot::Pristine(CliConfig::default()),
            ) {
                ConfigSnapshot::Pristine(config) => ConfigSnapshot::Dirty {
                    original: config.clone(),
                    current: config,
                },
                dirty => dirty,
            };
        }

        match &mut self.state {
            ConfigSnapshot::Dirty { current, .. } | ConfigSnapshot::Pristine(current) => current,
        }
    }
}

impl Deref for ConfigState {
    type Target = CliConfig;

    fn deref(&self) -> &Self::Target {
        match &self.state {
            ConfigSnapshot::Pristine(config) => config,
            ConfigSnapshot::Dirty { current, .. } => current,
        }
    }
}

impl DerefMut for ConfigState {
    fn deref_mut(&mut self) -> &mut CliConfig {
        self.current_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reading_does_not_mark_dirty() {
        let state = ConfigState::new(PathBuf::from("unused.toml"), CliConfig::default());
        assert!(state.using.is_empty());
        assert!(!state.needs_saving());
    }

    #[test]
    fn test_mutation_back_to_original_needs_no_save() {
        let mut state = ConfigState::new(PathBuf::from("unused.toml"), CliConfig::default());
        state.options.show_http = true;
        assert!(state.needs_saving());
        state.options.show_http = false;
        assert!(!state.needs_saving());
    }

    #[test]
    fn test_persist_writes_only_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut state = ConfigState::new(path.clone(), CliConfig::default());

        assert!(!state.persist().unwrap());
        assert!(!path.exists());

        state.options.error_detail = true;
        assert!(state.persist().unwrap());
        assert!(!state.needs_saving());

        let reloaded = ConfigState::load(path).unwrap();
        assert!(reloaded.options.error_detail);
    }
}
