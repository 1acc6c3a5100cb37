//! `POST /hospital/rank` — the core ranking endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::ranking::types::{RankRequest, RankingResponse};

pub async fn rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingResponse>, ApiError> {
    let response = state.ranker.rank(request).await?;
    Ok(Json(response))
}
