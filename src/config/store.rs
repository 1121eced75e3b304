//! Thread-safe configuration storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// Shared config container. Readers take cloned snapshots.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<Config>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and path.
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(config),
            path,
        }
    }

    /// Load from `path` and wrap the result.
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let config = Config::load_from(&path)?;
        Ok(Self::new(config, path))
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> Config {
        Config::clone(&self.inner)
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
