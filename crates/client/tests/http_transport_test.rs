#![allow(clippy::unwrap_used, clippy::expect_used)]
//! `HttpPortfolioApi` against a server on a real socket.

mod common;

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::{Json, Router};
use vitrine_client::prelude::*;
use vitrine_client::QueryRequest;
use vitrine_sdk::types::ContentTypeOption;
use vitrine_test_utils::SeedBuilder;

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn fetches_pages_and_content_types() {
    let router = common::kernel_router(&SeedBuilder::standard().with_posts(14)).await;
    let addr = spawn(router).await;
    let api = HttpPortfolioApi::new(format!("http://{addr}/"));

    let state = ControllerState::new(ControllerConfig::default());
    let page = api
        .fetch_items(&QueryRequest::from_state(&state, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 14);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.items.len(), 2);

    let types = api.content_types().await.unwrap();
    assert_eq!(types.len(), 3);
}

#[tokio::test]
async fn error_bodies_become_status_errors() {
    let router = common::kernel_router(&SeedBuilder::standard()).await;
    let addr = spawn(router).await;
    let api = HttpPortfolioApi::new(format!("http://{addr}/missing"));

    let err = api.content_types().await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "not found");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_are_awaited() {
    let router = Router::new().route(
        "/api/portfolio/content-types",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            Json(vec![ContentTypeOption {
                value: "post".to_string(),
                label: "Posts".to_string(),
            }])
        }),
    );
    let addr = spawn(router).await;
    let api = HttpPortfolioApi::new(format!("http://{addr}"));

    let started = Instant::now();
    let types = api.content_types().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(types[0].value, "post");
}
