//! End-to-end ranking orchestration.

use std::sync::Arc;

use crate::models::FacilityDirectory;
use crate::ranking::assembler::assemble;
use crate::ranking::features::{build_candidates, RadiusFilter};
use crate::ranking::live;
use crate::ranking::types::{RankRequest, RankingResponse};
use crate::ranking::RankingError;
use crate::reasoning::ReasoningReranker;
use crate::scoring::{OccupancyModel, SuitabilityModel};
use crate::store::KvStore;
use crate::telemetry::TelemetryProvider;

/// The full pipeline behind `POST /hospital/rank`.
///
/// Stages run in a fixed order: validate, build per-facility features
/// inside the radius, score and keep the top K, gather the live snapshot,
/// then hand everything to the reasoning rerank. Only the first two stages
/// can fail; from assembly onward every outcome is a complete response.
pub struct HospitalRanker {
    directory: Arc<FacilityDirectory>,
    telemetry: Arc<dyn TelemetryProvider>,
    occupancy: Arc<dyn OccupancyModel>,
    suitability: Arc<dyn SuitabilityModel>,
    store: Arc<dyn KvStore>,
    reranker: ReasoningReranker,
}

impl HospitalRanker {
    pub fn new(
        directory: Arc<FacilityDirectory>,
        telemetry: Arc<dyn TelemetryProvider>,
        occupancy: Arc<dyn OccupancyModel>,
        suitability: Arc<dyn SuitabilityModel>,
        store: Arc<dyn KvStore>,
        reranker: ReasoningReranker,
    ) -> Self {
        Self {
            directory,
            telemetry,
            occupancy,
            suitability,
            store,
            reranker,
        }
    }

    pub fn reasoning_configured(&self) -> bool {
        self.reranker.is_configured()
    }

    pub fn reasoning_model(&self) -> Option<String> {
        self.reranker.model_name()
    }

    pub fn facility_count(&self) -> usize {
        self.directory.len()
    }

    pub fn occupancy_model(&self) -> &'static str {
        self.occupancy.name()
    }

    pub fn suitability_model(&self) -> &'static str {
        self.suitability.name()
    }

    pub async fn rank(&self, request: RankRequest) -> Result<RankingResponse, RankingError> {
        validate(&request)?;

        let radius = RadiusFilter::from_km(request.radius_km);
        let rows = build_candidates(
            &request.patient_info,
            &self.directory,
            self.telemetry.as_ref(),
            self.occupancy.as_ref(),
            radius,
        )?;
        if rows.is_empty() {
            return Err(RankingError::NoCandidatesInRadius);
        }

        let candidates = assemble(rows, self.suitability.as_ref(), request.max_hospitals);
        tracing::debug!(
            candidates = candidates.len(),
            radius_km = request.radius_km,
            severity = request.patient_info.severity,
            "Assembled candidate ranking"
        );

        let live = live::gather(self.store.as_ref(), request.include_live_data)?;

        let response = self
            .reranker
            .rerank(
                &candidates,
                &live,
                request.ambulance_location.as_ref(),
                &request.patient_info,
            )
            .await;

        tracing::info!(
            hospitals = response.final_ranking.len(),
            model_used = ?response.model_used,
            "Ranking complete"
        );
        Ok(response)
    }
}

fn validate(request: &RankRequest) -> Result<(), RankingError> {
    let patient = &request.patient_info;
    if !(1..=5).contains(&patient.severity) {
        return Err(RankingError::InvalidRequest(format!(
            "severity must be 1-5, got {}",
            patient.severity
        )));
    }
    if !(-90.0..=90.0).contains(&patient.patient_lat)
        || !(-180.0..=180.0).contains(&patient.patient_lon)
    {
        return Err(RankingError::InvalidRequest(
            "patient coordinates out of range".to_string(),
        ));
    }
    if request.max_hospitals == 0 {
        return Err(RankingError::InvalidRequest(
            "max_hospitals must be at least 1".to_string(),
        ));
    }
    Ok(())
}
