//! Access to the portfolio API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use vitrine_sdk::params::CatalogParams;
use vitrine_sdk::types::{ContentTypeOption, ErrorBody, FilterCatalog, PortfolioPage};

use crate::error::ClientError;
use crate::request::{QueryRequest, catalog_query_string};

/// Operations the controller needs from the API.
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    async fn fetch_items(&self, request: &QueryRequest) -> Result<PortfolioPage, ClientError>;

    async fn fetch_catalog(&self, params: &CatalogParams) -> Result<FilterCatalog, ClientError>;

    async fn content_types(&self) -> Result<Vec<ContentTypeOption>, ClientError>;
}

/// [`PortfolioApi`] over HTTP.
///
/// Requests carry no client-side timeout and are never retried: a slow
/// response is waited for, and only a failed one reaches the controller as
/// an error.
#[derive(Debug, Clone)]
pub struct HttpPortfolioApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortfolioApi {
    /// Client for the API served under `base_url` (e.g. `https://example.com`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        tracing::debug!(url = %url, "portfolio api request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            tracing::warn!(status = status.as_u16(), message = %message, "portfolio api error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn fetch_items(&self, request: &QueryRequest) -> Result<PortfolioPage, ClientError> {
        let url = self.url("/api/portfolio/items", &request.query_string());
        self.get(&url).await
    }

    async fn fetch_catalog(&self, params: &CatalogParams) -> Result<FilterCatalog, ClientError> {
        let url = self.url("/api/portfolio/filters", &catalog_query_string(params));
        self.get(&url).await
    }

    async fn content_types(&self) -> Result<Vec<ContentTypeOption>, ClientError> {
        let url = self.url("/api/portfolio/content-types", "");
        self.get(&url).await
    }
}
