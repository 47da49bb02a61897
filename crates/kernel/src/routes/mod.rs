//! HTTP route handlers.

pub mod health;
pub mod metrics;
pub mod portfolio;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router with every kernel route.
///
/// CORS is left to the caller since it depends on deployment.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(portfolio::router())
        .merge(health::router())
        .merge(metrics::router())
        .fallback(|| async { AppError::NotFound })
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::track_metrics,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
