use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::client::error::ClientError;
use crate::client::http::{build_http_client, join, parse_base, read_json, send};
use crate::client::CatalogApi;
use crate::config::Config;
use crate::resource::{dedupe_by_id, filter_by_category, CatalogItem, Category};

#[derive(Deserialize)]
struct ProductsEnvelope {
    products: Vec<CatalogItem>,
}

/// Client for the public product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    listing_limit: u32,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = build_http_client(&config.defaults)?;
        Self::with_client(http, &config.catalog.base_url, config.catalog.listing_limit)
    }

    pub fn with_client(http: Client, base_url: &str, listing_limit: u32) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base(base_url)?,
            listing_limit,
        })
    }

    async fn get_json(&self, url: Url, failure: &str) -> Result<Value, ClientError> {
        let response = send(self.http.get(url.clone()), &url).await?;
        read_json(response, &url, failure).await
    }

    async fn fetch_products(&self, query: &str) -> Result<Vec<CatalogItem>, ClientError> {
        let url = if query.trim().is_empty() {
            let mut url = join(&self.base_url, &["products"])?;
            url.query_pairs_mut()
                .append_pair("limit", &self.listing_limit.to_string());
            url
        } else {
            let mut url = join(&self.base_url, &["products", "search"])?;
            url.query_pairs_mut().append_pair("q", query);
            url
        };

        let value = self.get_json(url.clone(), "Failed to fetch products").await?;
        let envelope: ProductsEnvelope =
            serde_json::from_value(value).map_err(|source| ClientError::Decode {
                url: url.to_string(),
                source,
            })?;
        Ok(envelope.products)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_items(&self, query: &str, category: &str) -> Result<Vec<CatalogItem>, ClientError> {
        let products = self.fetch_products(query).await?;
        let fetched = products.len();
        let (products, duplicates) = dedupe_by_id(products);
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "Dropped duplicate catalog ids");
        }
        let products = filter_by_category(products, category);
        tracing::debug!(
            query,
            category,
            fetched,
            kept = products.len(),
            "Listed catalog items"
        );
        Ok(products)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let url = join(&self.base_url, &["products", "categories"])?;
        let value = self
            .get_json(url.clone(), "Failed to fetch categories")
            .await?;
        serde_json::from_value(value).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn delete_item(&self, id: u64) -> Result<(), ClientError> {
        let url = join(&self.base_url, &["products", &id.to_string()])?;
        let response = send(self.http.delete(url.clone()), &url).await?;
        read_json(response, &url, "Failed to delete product").await?;
        tracing::info!(id, "Deleted catalog item");
        Ok(())
    }
}
