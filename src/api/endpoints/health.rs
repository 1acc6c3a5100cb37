//! `GET /health` — service readiness and model inventory.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub facility_count: usize,
    pub occupancy_model: String,
    pub suitability_model: String,
    pub vulnerability_model: String,
    pub reasoning_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_model: Option<String>,
    pub allocations_recorded: u64,
    pub started_at: String,
}

pub async fn check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let allocations_recorded = state.shelter.ledger().count()?;
    Ok(Json(HealthResponse {
        status: "operational",
        facility_count: state.ranker.facility_count(),
        occupancy_model: state.ranker.occupancy_model().to_string(),
        suitability_model: state.ranker.suitability_model().to_string(),
        vulnerability_model: state.shelter.model_name().to_string(),
        reasoning_configured: state.ranker.reasoning_configured(),
        reasoning_model: state.ranker.reasoning_model(),
        allocations_recorded,
        started_at: state.started_at.clone(),
    }))
}
