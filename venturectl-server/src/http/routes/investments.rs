//! Mock investment endpoints
//!
//! The listing ranks startups by simulated investment, which every write below
//! keeps in step. Writes go to a single investment record addressed by its
//! own id. Delete needs the record's password; changing that password needs
//! the current one.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use venturectl_core::{
    Amount, DeleteOutcome, Investment, InvestmentPatch, NewInvestment, Page, Startup,
    StartupFilter, UpdateOutcome,
};

use crate::http::error::ApiError;
use crate::http::extractors::{OptionalJson, ValidId, ValidJson};
use crate::http::params::ListParams;
use crate::http::server::AppState;

/// Create investment request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentRequest {
    pub startup_id: i64,
    pub name: String,
    pub invest_amount: Amount,
    #[serde(default)]
    pub comment: String,
    pub password: String,
}

/// Partial update; absent fields keep their stored value
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentRequest {
    pub startup_id: Option<i64>,
    pub name: Option<String>,
    pub invest_amount: Option<Amount>,
    pub comment: Option<String>,
    pub password: Option<String>,
    /// Required alongside `password`
    pub current_password: Option<String>,
}

/// Delete investment request; the whole body may be omitted
#[derive(Deserialize, Default)]
pub struct DeleteInvestmentRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/investments - startups ranked by simulated investment
async fn list_investments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Startup>>, ApiError> {
    let page = state
        .catalog()
        .list(
            StartupFilter::All,
            params.order_or("simInvestDesc"),
            params.window(),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/investments/{id}
async fn get_investment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Investment>, ApiError> {
    let investment = state
        .investments
        .get(id, state.deadline())
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(investment))
}

/// POST /api/investments
#[instrument(skip(state, req), fields(startup_id = req.startup_id))]
async fn create_investment(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<Investment>), ApiError> {
    let new = NewInvestment::new(
        req.startup_id,
        &req.name,
        req.invest_amount,
        &req.comment,
        &req.password,
    )?;
    let investment = state.investments.create(&new, state.deadline()).await?;

    Ok((StatusCode::CREATED, Json(investment)))
}

/// PATCH /api/investments/{id}
async fn update_investment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UpdateInvestmentRequest>,
) -> Result<Json<Investment>, ApiError> {
    let patch = InvestmentPatch::new(
        req.startup_id,
        req.name.as_deref(),
        req.invest_amount,
        req.comment.as_deref(),
        req.password.as_deref(),
        req.current_password.as_deref(),
    )?;

    match state
        .investments
        .update(id, &patch, state.deadline())
        .await?
    {
        UpdateOutcome::Updated(investment) => Ok(Json(investment)),
        UpdateOutcome::NotFound => Err(not_found(id)),
        UpdateOutcome::PasswordMismatch => {
            tracing::warn!(investment_id = id, "update rejected: password mismatch");
            Err(ApiError::Unauthorized {
                reason: "current password does not match",
            })
        }
    }
}

/// DELETE /api/investments/{id}
///
/// A missing id is 404 whether or not a password was sent.
async fn delete_investment(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    OptionalJson(req): OptionalJson<DeleteInvestmentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(password) = req.unwrap_or_default().password else {
        return match state.investments.get(id, state.deadline()).await? {
            None => Err(not_found(id)),
            Some(_) => Err(ApiError::Unauthorized {
                reason: "password required",
            }),
        };
    };

    match state
        .investments
        .delete(id, &password, state.deadline())
        .await?
    {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse {
            message: "investment deleted",
        })),
        DeleteOutcome::NotFound => Err(not_found(id)),
        DeleteOutcome::PasswordMismatch => {
            tracing::warn!(investment_id = id, "delete rejected: password mismatch");
            Err(ApiError::Unauthorized {
                reason: "password does not match",
            })
        }
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound {
        resource: "investment",
        id: id.to_string(),
    }
}

/// Investment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/investments",
            get(list_investments).post(create_investment),
        )
        .route(
            "/api/investments/{id}",
            get(get_investment)
                .patch(update_investment)
                .delete(delete_investment),
        )
}
