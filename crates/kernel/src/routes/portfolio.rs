//! Portfolio API routes.
//!
//! - `GET /api/portfolio/items`: one page of normalized items
//! - `GET /api/portfolio/filters`: filter catalog for a type selection
//! - `GET /api/portfolio/content-types`: selectable content types
//! - `POST /api/portfolio/cache/invalidate`: drop cached catalogs (admin token)

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Json;
use axum::routing::{get, post};
use tracing::{debug, info};
use vitrine_sdk::params::{CatalogParams, ItemsParams, parse_flag};
use vitrine_sdk::types::{ContentTypeOption, FilterCatalog, PortfolioPage};

use crate::error::{AppError, AppResult};
use crate::portfolio::PortfolioRequest;
use crate::portfolio::params::parse_post_types;
use crate::state::AppState;

/// Create the portfolio router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/portfolio/items", get(list_items))
        .route("/api/portfolio/filters", get(filter_catalog))
        .route("/api/portfolio/content-types", get(content_types))
        .route("/api/portfolio/cache/invalidate", post(invalidate_cache))
}

async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemsParams>,
) -> AppResult<Json<PortfolioPage>> {
    let request = PortfolioRequest::from_params(&params, &state.param_policy())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let page = state.resolver().resolve(&request).await?;
    Ok(Json(page))
}

async fn filter_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<Json<FilterCatalog>> {
    let post_types = parse_post_types(params.post_types.as_deref());
    let include_commerce = parse_flag(params.include_commerce.as_deref());

    let catalog = state.catalog().catalog(&post_types, include_commerce).await?;
    Ok(Json(FilterCatalog::clone(&catalog)))
}

async fn content_types(State(state): State<AppState>) -> Json<Vec<ContentTypeOption>> {
    let options = state.catalog().content_types().await;
    Json(options.as_ref().clone())
}

/// Drop cached filter catalogs and content-type lists after content changed,
/// e.g. following `vitrine import` against the same database.
async fn invalidate_cache(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let Some(expected) = state.config().admin_token.as_deref() else {
        return Err(AppError::NotFound);
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if token != Some(expected) {
        debug!("cache invalidation rejected");
        return Err(AppError::Unauthorized);
    }

    state.catalog().invalidate();
    info!("filter catalog cache invalidated");
    Ok(StatusCode::NO_CONTENT)
}
