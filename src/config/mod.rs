//! Configuration: TOML file, environment overrides and a shared store.

mod loader;
mod store;
mod types;

pub use loader::{ConfigError, EMPLOYEE_ENV_OVERRIDES};
pub use store::ConfigStore;
pub use types::{
    CatalogApiConfig, Config, DashboardConfig, Defaults, EmployeeApiConfig, ServerConfig,
};
