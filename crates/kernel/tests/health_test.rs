#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Health, metrics and fallback routes.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use vitrine_test_utils::SeedBuilder;

#[tokio::test]
async fn health_reports_backend() {
    let app = TestApp::new(&SeedBuilder::standard()).await;

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["repository"], true);
    assert_eq!(body["content_types"], 3);
}

#[tokio::test]
async fn metrics_track_requests() {
    let app = TestApp::new(&SeedBuilder::standard().with_posts(2)).await;

    app.items("").await;
    app.filters("").await;

    let (status, body) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("path=\"/api/portfolio/items\""));
    assert!(body.contains("portfolio_query_duration_seconds"));
    assert!(body.contains("catalog_cache_misses_total"));
}

#[tokio::test]
async fn unknown_routes_return_json_404() {
    let app = TestApp::new(&SeedBuilder::standard()).await;

    let (status, body) = app.get_json("/api/portfolio/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}
