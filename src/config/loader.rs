use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Environment variables that override the `[employees]` section.
pub const EMPLOYEE_ENV_OVERRIDES: [&str; 5] = [
    "EMPLOYEE_API_BASE_URL",
    "EMPLOYEE_API_TENANT",
    "EMPLOYEE_API_ENVIRONMENT",
    "EMPLOYEE_API_TIME_ZONE",
    "EMPLOYEE_API_ACCEPT_LANGUAGE",
];

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/stockdesk/config.toml` on Unix/macOS, or the
    /// equivalent from `dirs::config_dir()` elsewhere. Falls back to the
    /// current directory if no config dir is available.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("stockdesk").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - A missing file yields `Config::default()`.
    /// - Environment overrides are applied on top of the file.
    /// - The merged result is validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overrides employee API settings from `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let [base_url, tenant, environment, time_zone, accept_language] = EMPLOYEE_ENV_OVERRIDES;
        let employees = &mut self.employees;
        let targets: [(&str, &mut String); 5] = [
            (base_url, &mut employees.base_url),
            (tenant, &mut employees.tenant),
            (environment, &mut employees.environment),
            (time_zone, &mut employees.time_zone),
            (accept_language, &mut employees.accept_language),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Both upstream base URLs parse
    /// - The server bind address is a socket address
    /// - Page sizes and the listing limit are non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (section, url) in [
            ("catalog", &self.catalog.base_url),
            ("employees", &self.employees.base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                return Err(ConfigError::ValidationError {
                    message: format!("Invalid {} base_url '{}'", section, url),
                });
            }
        }

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid server bind_addr '{}'", self.server.bind_addr),
            });
        }

        if self.catalog.listing_limit == 0 {
            return Err(ConfigError::ValidationError {
                message: "catalog.listing_limit must be greater than zero".to_string(),
            });
        }

        if self.dashboard.catalog_page_size == 0 || self.dashboard.employee_page_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "dashboard page sizes must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
