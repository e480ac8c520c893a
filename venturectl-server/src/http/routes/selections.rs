//! Selection endpoints
//!
//! Startups ranked by how often users picked them, plus the counter bump.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use venturectl_core::{Page, Startup, StartupFilter};

use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::params::ListParams;
use crate::http::server::AppState;

/// GET /api/selections
async fn list_selections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Startup>>, ApiError> {
    let page = state
        .catalog()
        .list(StartupFilter::All, params.order_or("countDesc"), params.window())
        .await?;
    Ok(Json(page))
}

/// POST /api/selections/{id} - count one more pick
async fn record_selection(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Startup>, ApiError> {
    let startup = state.catalog().select(id).await?;
    tracing::info!(startup_id = id, count = startup.count, "selection recorded");
    Ok(Json(startup))
}

/// Selection routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/selections", get(list_selections))
        .route("/api/selections/{id}", post(record_selection))
}
