#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] drives the real kernel router over an in-memory
//! repository built from a `vitrine-test-utils` seed, so no database is
//! needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vitrine_kernel::content::Seed;
use vitrine_kernel::repository::{ContentRepository, MemoryRepository};
use vitrine_kernel::tap::{TapRegistry, default_registry};
use vitrine_kernel::{AppState, Config, routes};
use vitrine_test_utils::SeedBuilder;

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Application over `seed` with the default configuration.
    pub async fn new(seed: &SeedBuilder) -> Self {
        Self::with_config(seed, test_config()).await
    }

    /// Application over `seed` with a custom configuration.
    pub async fn with_config(seed: &SeedBuilder, config: Config) -> Self {
        let taps = default_registry(&config);
        Self::with_taps(seed, config, taps).await
    }

    /// Application over `seed` with an explicit tap registry.
    pub async fn with_taps(seed: &SeedBuilder, config: Config, taps: TapRegistry) -> Self {
        Self::from_parts(Arc::new(memory_repository(seed)), config, taps).await
    }

    /// Application over an arbitrary repository.
    pub async fn with_repository(repo: Arc<dyn ContentRepository>, config: Config) -> Self {
        let taps = default_registry(&config);
        Self::from_parts(repo, config, taps).await
    }

    async fn from_parts(repo: Arc<dyn ContentRepository>, config: Config, taps: TapRegistry) -> Self {
        let state = AppState::with_repository(&config, repo, taps)
            .await
            .expect("Failed to initialize AppState");

        let router = routes::router(state.clone());
        Self { router, state }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET `uri` and return the status and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .request(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// GET `uri` and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let value = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("response to {uri} is not JSON ({e}): {body}"));
        (status, value)
    }

    /// GET an items page, asserting 200.
    pub async fn items(&self, query: &str) -> Value {
        let (status, body) = self.get_json(&format!("/api/portfolio/items?{query}")).await;
        assert_eq!(status, StatusCode::OK, "items request failed: {body}");
        body
    }

    /// GET a filter catalog, asserting 200.
    pub async fn filters(&self, query: &str) -> Value {
        let (status, body) = self.get_json(&format!("/api/portfolio/filters?{query}")).await;
        assert_eq!(status, StatusCode::OK, "filters request failed: {body}");
        body
    }
}

/// In-memory repository holding `seed`.
pub fn memory_repository(seed: &SeedBuilder) -> MemoryRepository {
    let seed = Seed::from_json(seed.build()).expect("invalid test seed");
    MemoryRepository::from_seed(&seed).expect("failed to build repository")
}

/// Configuration for tests: fixed site URL and no exclusions.
pub fn test_config() -> Config {
    Config {
        site_url: "https://example.test".to_string(),
        ..Config::default()
    }
}

/// Percent-encode a query parameter value.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
