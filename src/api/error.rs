//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ledger::LedgerError;
use crate::ranking::RankingError;
use crate::shelter::ShelterError;
use crate::store::StoreError;
use crate::surplus::SurplusError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No candidate facilities within the requested radius")]
    NoCandidates,
    #[error("Service not ready: {0}")]
    ServiceNotReady(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Allocation already recorded: {0}")]
    DuplicateAllocation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NoCandidates => (
                StatusCode::NOT_FOUND,
                "NO_CANDIDATES",
                "No hospitals found within the specified radius".to_string(),
            ),
            ApiError::ServiceNotReady(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_NOT_READY",
                detail.clone(),
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                detail.clone(),
            ),
            ApiError::DuplicateAllocation(applicant_id) => (
                StatusCode::CONFLICT,
                "DUPLICATE_ALLOCATION",
                format!("Allocation already recorded for applicant {applicant_id}"),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::NoCandidatesInRadius => ApiError::NoCandidates,
            RankingError::ServiceNotReady(detail) => ApiError::ServiceNotReady(detail.to_string()),
            RankingError::InvalidRequest(detail) => ApiError::BadRequest(detail),
            RankingError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ShelterError> for ApiError {
    fn from(err: ShelterError) -> Self {
        match err {
            ShelterError::InvalidApplicant(detail) => ApiError::BadRequest(detail),
            ShelterError::Ledger(LedgerError::DuplicateApplicant(id)) => {
                ApiError::DuplicateAllocation(id)
            }
            ShelterError::Ledger(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SurplusError> for ApiError {
    fn from(err: SurplusError) -> Self {
        match err {
            SurplusError::InvalidRequest(detail) => ApiError::BadRequest(detail),
            SurplusError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateApplicant(id) => ApiError::DuplicateAllocation(id),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
