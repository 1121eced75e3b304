//! Typed access to the two upstream APIs.
//!
//! Both APIs sit behind traits so the dashboard, the HTTP surface and the
//! tests can swap in their own implementations. No caching happens here:
//! every call is a fresh request.

mod catalog;
mod employees;
mod error;
mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

pub use catalog::CatalogClient;
pub use employees::{ingest_records, EmployeeClient, UpstreamProbe};
pub use error::ClientError;

use crate::list::Deleter;
use crate::resource::{CatalogItem, Category, PersonPage, PersonProfile, PersonRecord};

/// Product catalog operations.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Searches when `query` is non-blank, otherwise lists up to the
    /// configured limit. `category` is applied locally after the fetch.
    async fn list_items(&self, query: &str, category: &str) -> Result<Vec<CatalogItem>, ClientError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ClientError>;

    async fn delete_item(&self, id: u64) -> Result<(), ClientError>;
}

/// Employee directory operations.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    /// Fetches the whole directory, drops invalid records and returns the
    /// `skip`/`limit` slice. `total` counts valid records only.
    async fn list(&self, skip: usize, limit: usize) -> Result<PersonPage, ClientError>;

    async fn get(&self, id: &str) -> Result<PersonRecord, ClientError>;

    async fn create(&self, profile: &PersonProfile) -> Result<PersonRecord, ClientError>;

    /// Returns the directory's response body unchanged.
    async fn update(&self, record: &PersonRecord) -> Result<Value, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;

    /// Raw status, headers and body of the collection endpoint.
    async fn probe(&self) -> Result<UpstreamProbe, ClientError>;
}

/// Routes list deletions of catalog items to a [`CatalogApi`].
pub struct CatalogRemoval(pub Arc<dyn CatalogApi>);

#[async_trait]
impl Deleter<CatalogItem> for CatalogRemoval {
    async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.0.delete_item(id).await
    }
}

/// Routes list deletions of employee records to an [`EmployeeApi`].
pub struct EmployeeRemoval(pub Arc<dyn EmployeeApi>);

#[async_trait]
impl Deleter<PersonRecord> for EmployeeRemoval {
    async fn delete(&self, id: String) -> Result<(), ClientError> {
        self.0.delete(&id).await
    }
}
