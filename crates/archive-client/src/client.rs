//! HTTP client for the archive REST API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use archive_core::{
    defaults, CreateItemRequest, Item, ItemFilter, SpendingReport, UpdateItemRequest,
};

use crate::error::{ClientError, Result};

/// Configuration for [`ArchiveClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without the `/api` suffix.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_URL.to_string(),
            timeout_seconds: defaults::CLIENT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Read `ARCHIVE_API_URL` and `ARCHIVE_API_TIMEOUT`.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ARCHIVE_API_URL")
                .unwrap_or_else(|_| defaults::API_URL.to_string()),
            timeout_seconds: std::env::var("ARCHIVE_API_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::CLIENT_TIMEOUT_SECS),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn item_url(&self, id: Uuid) -> String {
        self.url(&format!("/api/items/{}", id))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn filter_params(filter: &ItemFilter) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if !filter.search_term.is_empty() {
            params.push(("search", filter.search_term.as_str()));
        }
        let tag = filter.tag_filter.trim();
        if !tag.is_empty() {
            params.push(("tag", tag));
        }
        params
    }

    /// All items, newest first.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let response = self.client.get(self.url("/api/items")).send().await?;
        let items: Vec<Item> = Self::decode(response).await?;
        debug!(result_count = items.len(), "client: list items");
        Ok(items)
    }

    /// Items matching a filter, evaluated by the server.
    pub async fn search_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let response = self
            .client
            .get(self.url("/api/items"))
            .query(&Self::filter_params(filter))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<Item> {
        let response = self.client.get(self.item_url(id)).send().await?;
        Self::decode(response).await
    }

    pub async fn create_item(&self, req: &CreateItemRequest) -> Result<Item> {
        let response = self
            .client
            .post(self.url("/api/items"))
            .json(req)
            .send()
            .await?;
        let item: Item = Self::decode(response).await?;
        debug!(item_id = %item.id, "client: created item");
        Ok(item)
    }

    pub async fn update_item(&self, id: Uuid, req: &UpdateItemRequest) -> Result<Item> {
        let response = self.client.put(self.item_url(id)).json(req).send().await?;
        Self::decode(response).await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        let _: serde_json::Value = Self::decode(response).await?;
        debug!(item_id = %id, "client: deleted item");
        Ok(())
    }

    /// Server-side spending report over the items matching `filter`.
    pub async fn spending_report(
        &self,
        filter: &ItemFilter,
        top: Option<usize>,
    ) -> Result<SpendingReport> {
        let mut request = self
            .client
            .get(self.url("/api/items/analytics"))
            .query(&Self::filter_params(filter));
        if let Some(top) = top {
            request = request.query(&[("top", top)]);
        }
        Self::decode(request.send().await?).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::decode(response).await
    }
}
