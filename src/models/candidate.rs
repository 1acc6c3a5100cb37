//! Derived per-request records flowing through the ranking pipeline.

use serde::{Deserialize, Serialize};

/// Feature row for one (patient, facility) pair. Computed once per request
/// per facility, consumed by the suitability model, discarded after scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFeatures {
    pub dist_km: f64,
    /// `total_beds - predicted_next_day_occupied`, floored at zero.
    pub pred_beds_available: f64,
    /// `predicted_next_day_occupied / (total_beds * staffed_rate + 1e-6)`.
    pub wait_time_est: f64,
    pub severity: u8,
    pub req_icu: bool,
    pub hospital_total_beds: u32,
    pub hospital_icu_beds: u32,
}

/// Assembler output: facility identity + features + suitability score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub hospital_id: String,
    pub hospital_name: String,
    pub hospital_latitude: f64,
    pub hospital_longitude: f64,
    pub features: CandidateFeatures,
    /// Suitability model output, 0-1.
    pub suitability_score: f64,
}
