//! Startup browsing endpoints
//!
//! - GET /api/startups - paginated listing (default order `id`)
//! - GET /api/startups/search - name search, 400 on a blank keyword
//! - GET /api/startups/comparison - focal startup plus up to five peers
//! - GET /api/startups/{id} - single startup
//! - GET /api/startups/{id}/rank - neighbours in a ranking

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use venturectl_core::{Comparison, Page, RankView, Startup, StartupFilter};

use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::params::{ComparisonParams, ListParams, RankParams, SearchParams};
use crate::http::server::AppState;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// GET /api/startups
async fn list_startups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Startup>>, ApiError> {
    let page = state
        .catalog()
        .list(StartupFilter::All, params.order_or("id"), params.window())
        .await?;
    Ok(Json(page))
}

/// GET /api/startups/search
#[instrument(skip(state, params), fields(keyword = ?params.search_keyword))]
async fn search_startups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<([(&'static str, String); 1], Json<Page<Startup>>), ApiError> {
    let keyword = params.keyword()?;
    let page = state
        .catalog()
        .list(
            StartupFilter::NameContains(keyword),
            params.list.order_or("id"),
            params.list.window(),
        )
        .await?;

    tracing::debug!(total = page.total_count, "search complete");
    Ok((
        [(TOTAL_COUNT_HEADER, page.total_count.to_string())],
        Json(page),
    ))
}

/// GET /api/startups/comparison
async fn compare_startups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComparisonParams>,
) -> Result<Json<Comparison>, ApiError> {
    let focal_id = params.startup_id()?;
    let candidate_ids = params.compare_ids()?;

    let comparison = state
        .catalog()
        .compare(focal_id, &candidate_ids, params.order(), params.limit())
        .await?;
    Ok(Json(comparison))
}

/// GET /api/startups/{id}
async fn get_startup(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Startup>, ApiError> {
    let startup = state.catalog().get(id).await?;
    Ok(Json(startup))
}

/// GET /api/startups/{id}/rank
async fn rank_startup(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    Query(params): Query<RankParams>,
) -> Result<Json<RankView>, ApiError> {
    let view = state.catalog().rank(id, params.order(), params.k()).await?;
    Ok(Json(view))
}

/// Startup routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/startups", get(list_startups))
        .route("/api/startups/search", get(search_startups))
        .route("/api/startups/comparison", get(compare_startups))
        .route("/api/startups/{id}", get(get_startup))
        .route("/api/startups/{id}/rank", get(rank_startup))
}
