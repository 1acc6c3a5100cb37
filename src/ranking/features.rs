//! Candidate feature construction and radius filtering.
//!
//! One `CandidateFeatures` row per known facility, built from a fresh
//! telemetry snapshot and the occupancy forecast, then filtered by radius.

use crate::geo::haversine_km;
use crate::models::{CandidateFeatures, Facility, FacilityDirectory};
use crate::ranking::types::PatientInfo;
use crate::ranking::RankingError;
use crate::scoring::OccupancyModel;
use crate::telemetry::TelemetryProvider;

const WAIT_EPSILON: f64 = 1e-6;

/// Radius handling is explicit: the unbounded mode is the default, matching
/// the simpler of the two historical call sites.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RadiusFilter {
    #[default]
    Unbounded,
    Within(f64),
}

impl RadiusFilter {
    /// Zero or negative radius means no filtering.
    pub fn from_km(radius_km: f64) -> Self {
        if radius_km > 0.0 {
            Self::Within(radius_km)
        } else {
            Self::Unbounded
        }
    }

    fn admits(&self, dist_km: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Within(limit) => dist_km <= *limit,
        }
    }
}

/// A facility with its derived features, pre-scoring.
#[derive(Debug, Clone)]
pub struct CandidateRow<'a> {
    pub facility: &'a Facility,
    pub features: CandidateFeatures,
}

/// Build the per-facility feature rows for this patient and drop anything
/// outside the radius.
///
/// An empty facility directory is a service-readiness failure, distinct
/// from "no candidates in radius" which the caller detects from an empty
/// result.
pub fn build_candidates<'a>(
    patient: &PatientInfo,
    directory: &'a FacilityDirectory,
    telemetry: &dyn TelemetryProvider,
    occupancy: &dyn OccupancyModel,
    radius: RadiusFilter,
) -> Result<Vec<CandidateRow<'a>>, RankingError> {
    if directory.is_empty() {
        return Err(RankingError::ServiceNotReady("facility reference data not loaded"));
    }

    let req_icu = patient.requires_icu();
    let mut rows = Vec::with_capacity(directory.len());

    for facility in directory.iter() {
        let dist_km = haversine_km(
            patient.patient_lon,
            patient.patient_lat,
            facility.longitude,
            facility.latitude,
        );
        if !radius.admits(dist_km) {
            continue;
        }

        let snapshot = telemetry.snapshot(facility);
        let pred_next_occupied = occupancy.predict(&snapshot, facility.total_beds);

        let pred_beds_available =
            (f64::from(facility.total_beds) - pred_next_occupied).max(0.0);
        let wait_time_est = pred_next_occupied
            / (f64::from(facility.total_beds) * snapshot.staffed_rate + WAIT_EPSILON);

        rows.push(CandidateRow {
            facility,
            features: CandidateFeatures {
                dist_km,
                pred_beds_available,
                wait_time_est,
                severity: patient.severity,
                req_icu,
                hospital_total_beds: facility.total_beds,
                hospital_icu_beds: facility.icu_beds,
            },
        });
    }

    Ok(rows)
}
