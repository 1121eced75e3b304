use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub catalog: CatalogApiConfig,
    #[serde(default)]
    pub employees: EmployeeApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Network settings shared by both upstream clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Whole-request timeout in seconds. Unset means requests never time out.
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Product catalog upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogApiConfig {
    /// Base URL (e.g., "https://dummyjson.com").
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Upper bound for the unsearched listing.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: u32,
}

/// Employee directory upstream and the headers it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeApiConfig {
    /// Collection endpoint; `?id=` selects a single record.
    #[serde(default = "default_employee_base_url")]
    pub base_url: String,
    /// Sent as `x-tenant-name`.
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Sent as `x-environment`.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Sent as `x-time-zone`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Sent as `accept-language`.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

/// Internal HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Terminal dashboard behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: usize,
    #[serde(default = "default_employee_page_size")]
    pub employee_page_size: usize,
    /// Search input quiet period before the query commits.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_catalog_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_listing_limit() -> u32 {
    100
}

fn default_employee_base_url() -> String {
    "https://routino.limatech.co/api/talento/employee".to_string()
}

fn default_tenant() -> String {
    "default".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_accept_language() -> String {
    "en".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_catalog_page_size() -> usize {
    crate::paginate::CATALOG_PAGE_SIZE
}

fn default_employee_page_size() -> usize {
    crate::paginate::EMPLOYEE_PAGE_SIZE
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Defaults {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(|secs| Duration::from_secs(secs as u64))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds as u64)
    }
}

impl DashboardConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for CatalogApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            listing_limit: default_listing_limit(),
        }
    }
}

impl Default for EmployeeApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_employee_base_url(),
            tenant: default_tenant(),
            environment: default_environment(),
            time_zone: default_time_zone(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: default_catalog_page_size(),
            employee_page_size: default_employee_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}
