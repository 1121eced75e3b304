//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use stockdesk::client::{CatalogClient, EmployeeClient};
use stockdesk::config::EmployeeApiConfig;
use tempfile::TempDir;

pub const EMPLOYEE_PATH: &str = "/api/talento/employee";

/// Write `content` to a config.toml inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn catalog_client(base_url: &str, listing_limit: u32) -> CatalogClient {
    CatalogClient::with_client(reqwest::Client::new(), base_url, listing_limit)
        .expect("Failed to build catalog client")
}

pub fn employee_api_config(base_url: &str) -> EmployeeApiConfig {
    EmployeeApiConfig {
        base_url: base_url.to_string(),
        tenant: "acme".to_string(),
        environment: "staging".to_string(),
        time_zone: "Asia/Amman".to_string(),
        accept_language: "ar".to_string(),
    }
}

pub fn employee_client(base_url: &str) -> EmployeeClient {
    EmployeeClient::with_client(reqwest::Client::new(), &employee_api_config(base_url))
        .expect("Failed to build employee client")
}

/// A directory record that passes validation.
pub fn employee_json(id: &str, first: &str, last: &str) -> Value {
    json!({
        "id": id,
        "name1st": first,
        "name2nd": null,
        "name3rd": null,
        "nameLast": last,
        "mobileNo": "0790000000",
        "address": null,
        "dOB": null,
        "identityType": null,
        "identityNumber": null,
        "identityImage": null,
        "employeeDevices": [],
        "employeeDocuments": [],
        "employeeReferences": []
    })
}

pub fn product_json(id: u64, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": 9.99,
        "thumbnail": format!("https://cdn.example/{id}.png"),
        "category": category
    })
}

pub fn products_envelope(items: &[Value]) -> Value {
    json!({ "products": items, "total": items.len(), "skip": 0, "limit": items.len() })
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, check: F) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

/// Formatted log output collected by [`capture_logs`].
#[derive(Clone, Default)]
pub struct LogCapture(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's tracing output into a buffer until the guard drops.
/// Only sees events from tasks polled on the current thread, so use it from
/// a current-thread `#[tokio::test]`.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}
