#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Client test utilities.
//!
//! [`RouterApi`] answers controller fetches from the real kernel router over
//! an in-memory repository, without a network socket.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use vitrine_client::request::catalog_query_string;
use vitrine_client::{ClientError, PortfolioApi, QueryRequest};
use vitrine_kernel::content::Seed;
use vitrine_kernel::repository::MemoryRepository;
use vitrine_kernel::tap::default_registry;
use vitrine_kernel::{AppState, Config, routes};
use vitrine_sdk::params::CatalogParams;
use vitrine_sdk::types::{ContentTypeOption, ErrorBody, FilterCatalog, PortfolioPage};
use vitrine_test_utils::SeedBuilder;

/// Kernel router over `seed` with a test configuration.
pub async fn kernel_router(seed: &SeedBuilder) -> Router {
    let config = Config {
        site_url: "https://example.test".to_string(),
        ..Config::default()
    };
    let seed = Seed::from_json(seed.build()).expect("invalid test seed");
    let repo = MemoryRepository::from_seed(&seed).expect("failed to build repository");
    let taps = default_registry(&config);
    let state = AppState::with_repository(&config, Arc::new(repo), taps)
        .await
        .expect("Failed to initialize AppState");
    routes::router(state)
}

/// [`PortfolioApi`] served by an in-process kernel router.
#[derive(Clone)]
pub struct RouterApi {
    router: Router,
    requests: Arc<AtomicUsize>,
}

impl RouterApi {
    pub async fn new(seed: &SeedBuilder) -> Self {
        Self {
            router: kernel_router(seed).await,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Requests answered so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn get<T: DeserializeOwned>(&self, uri: String) -> Result<T, ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        if !status.is_success() {
            let body: ErrorBody = serde_json::from_slice(&bytes)?;
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: body.error,
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PortfolioApi for RouterApi {
    async fn fetch_items(&self, request: &QueryRequest) -> Result<PortfolioPage, ClientError> {
        self.get(format!("/api/portfolio/items?{}", request.query_string()))
            .await
    }

    async fn fetch_catalog(&self, params: &CatalogParams) -> Result<FilterCatalog, ClientError> {
        self.get(format!("/api/portfolio/filters?{}", catalog_query_string(params)))
            .await
    }

    async fn content_types(&self) -> Result<Vec<ContentTypeOption>, ClientError> {
        self.get("/api/portfolio/content-types".to_string()).await
    }
}

/// Wraps an API and fails the first `failures` item fetches with a 503.
pub struct FlakyApi<A> {
    inner: A,
    failures: AtomicUsize,
}

impl<A> FlakyApi<A> {
    pub fn new(inner: A, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl<A: PortfolioApi> PortfolioApi for FlakyApi<A> {
    async fn fetch_items(&self, request: &QueryRequest) -> Result<PortfolioPage, ClientError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ClientError::Status {
                status: 503,
                message: "internal server error".to_string(),
            });
        }
        self.inner.fetch_items(request).await
    }

    async fn fetch_catalog(&self, params: &CatalogParams) -> Result<FilterCatalog, ClientError> {
        self.inner.fetch_catalog(params).await
    }

    async fn content_types(&self) -> Result<Vec<ContentTypeOption>, ClientError> {
        self.inner.content_types().await
    }
}
