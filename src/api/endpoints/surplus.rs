//! Surplus planning endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::surplus::{PlanRequest, SurplusPlan};

/// `POST /surplus/plan`
pub async fn plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<SurplusPlan>, ApiError> {
    let plan = state.surplus.plan(request).await?;
    Ok(Json(plan))
}

/// `GET /surplus/inventory`
pub async fn inventory(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.surplus.inventory()?))
}

/// `GET /surplus/demand`
pub async fn demand(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.surplus.demand()?))
}
