//! Live-context management endpoints — the write side of the operational
//! collections the ranking pipeline reads.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::AppState;
use crate::ranking::live;
use crate::ranking::LiveContext;
use crate::store::{DOCTOR_AVAILABILITY, HOSPITAL_UPDATES, PATIENT_LOAD};

#[derive(Debug, Serialize)]
pub struct WriteAck {
    pub status: &'static str,
    pub collection: &'static str,
    pub key: String,
}

fn record(
    state: &AppState,
    collection: &'static str,
    key_field: &str,
    document: Value,
) -> Result<Json<WriteAck>, ApiError> {
    let key = document
        .get(key_field)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::BadRequest(format!("missing required field: {key_field}")))?
        .to_string();

    state.store.put(collection, &key, document)?;
    tracing::debug!(collection, key = %key, "Live document recorded");
    Ok(Json(WriteAck {
        status: "recorded",
        collection,
        key,
    }))
}

/// `POST /live/hospital-update` — keyed by `hospital_id`.
pub async fn hospital_update(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<WriteAck>, ApiError> {
    record(&state, HOSPITAL_UPDATES, "hospital_id", document)
}

/// `POST /live/doctor-availability` — keyed by `doctor_id`.
pub async fn doctor_availability(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<WriteAck>, ApiError> {
    record(&state, DOCTOR_AVAILABILITY, "doctor_id", document)
}

/// `POST /live/patient-load` — keyed by `hospital_id`.
pub async fn patient_load(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<WriteAck>, ApiError> {
    record(&state, PATIENT_LOAD, "hospital_id", document)
}

/// `GET /live/snapshot` — the exact context the reasoning pass would see.
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<LiveContext>, ApiError> {
    let ctx = live::gather(state.store.as_ref(), true)?;
    Ok(Json(ctx))
}
