//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! All state flows through `AppState`; the CORS layer is permissive since
//! dispatch consoles are served from arbitrary origins in the field.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/hospital/rank", post(endpoints::hospital::rank))
        .route("/shelter/allocate", post(endpoints::shelter::allocate))
        .route("/shelter/assess", post(endpoints::shelter::assess))
        .route(
            "/shelter/allocation/:applicant_id",
            get(endpoints::shelter::allocation),
        )
        .route("/shelter/stats", get(endpoints::shelter::stats))
        .route("/surplus/plan", post(endpoints::surplus::plan))
        .route("/surplus/inventory", get(endpoints::surplus::inventory))
        .route("/surplus/demand", get(endpoints::surplus::demand))
        .route("/live/hospital-update", post(endpoints::live::hospital_update))
        .route(
            "/live/doctor-availability",
            post(endpoints::live::doctor_availability),
        )
        .route("/live/patient-load", post(endpoints::live::patient_load))
        .route("/live/snapshot", get(endpoints::live::snapshot))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
