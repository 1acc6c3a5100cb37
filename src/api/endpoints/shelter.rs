//! Shelter allocation endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::ledger::LedgerEntry;
use crate::shelter::{AllocationOutcome, AllocationRequest, ApplicantData, Assessment};

/// `POST /shelter/allocate` — assess and record on the ledger.
pub async fn allocate(
    State(state): State<AppState>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationOutcome>, ApiError> {
    let outcome = state.shelter.allocate(request)?;
    Ok(Json(outcome))
}

/// `POST /shelter/assess` — score only, nothing recorded.
pub async fn assess(
    State(state): State<AppState>,
    Json(applicant): Json<ApplicantData>,
) -> Result<Json<Assessment>, ApiError> {
    let assessment = state.shelter.assess(&applicant)?;
    Ok(Json(assessment))
}

/// `GET /shelter/allocation/:applicant_id`
pub async fn allocation(
    State(state): State<AppState>,
    Path(applicant_id): Path<String>,
) -> Result<Json<LedgerEntry>, ApiError> {
    let entry = state
        .shelter
        .ledger()
        .fetch(&applicant_id)?
        .ok_or_else(|| ApiError::NotFound(format!("no allocation for applicant {applicant_id}")))?;
    Ok(Json(entry))
}

#[derive(Debug, Serialize)]
pub struct ShelterStats {
    pub total_allocations: u64,
    pub scoring_model: String,
    pub system_status: &'static str,
}

/// `GET /shelter/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<ShelterStats>, ApiError> {
    Ok(Json(ShelterStats {
        total_allocations: state.shelter.ledger().count()?,
        scoring_model: state.shelter.model_name().to_string(),
        system_status: "operational",
    }))
}
