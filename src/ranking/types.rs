//! Request and response contracts for the ranking endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{BedAvailability, IcuAvailability, Provenance, RiskLevel, SpecialistMatch};

/// Patient location and severity. Severity 1 (low) to 5 (critical);
/// severity >= 4 implies an ICU requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfo {
    pub patient_lon: f64,
    pub patient_lat: f64,
    pub severity: u8,
}

impl PatientInfo {
    pub fn requires_icu(&self) -> bool {
        self.severity >= 4
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbulanceLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambulance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
}

/// `POST /hospital/rank` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
    pub patient_info: PatientInfo,
    #[serde(default)]
    pub ambulance_location: Option<AmbulanceLocation>,
    #[serde(default = "default_include_live_data")]
    pub include_live_data: bool,
    #[serde(default = "default_max_hospitals")]
    pub max_hospitals: usize,
    /// Zero or negative means unbounded.
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_include_live_data() -> bool {
    true
}

fn default_max_hospitals() -> usize {
    5
}

fn default_radius_km() -> f64 {
    50.0
}

/// One row of the final ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub hospital_name: String,
    pub hospital_id: String,
    pub distance_km: f64,
    pub ml_suitability_score: f64,
    pub real_time_score: f64,
    pub final_score: f64,
    pub reasoning: String,
    pub estimated_wait_time_minutes: u32,
    pub bed_availability_status: BedAvailability,
    pub icu_availability: IcuAvailability,
    pub specialist_match: SpecialistMatch,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub primary_choice: String,
    pub backup_plan: String,
    pub transport_notes: String,
    pub hospital_prep: String,
}

/// `POST /hospital/rank` response body. Every terminal path of the
/// reranker produces this exact shape; degradation is only visible via
/// `model_used` and the textual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub final_ranking: Vec<RankingEntry>,
    pub critical_factors: Vec<String>,
    pub recommendations: Recommendations,
    pub overall_assessment: String,
    pub analysis_timestamp: String,
    pub model_used: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req: RankRequest = serde_json::from_str(
            r#"{"patient_info": {"patient_lon": 80.2, "patient_lat": 13.0, "severity": 3}}"#,
        )
        .unwrap();
        assert!(req.include_live_data);
        assert_eq!(req.max_hospitals, 5);
        assert_eq!(req.radius_km, 50.0);
        assert!(req.ambulance_location.is_none());
    }

    #[test]
    fn severity_four_requires_icu() {
        let low = PatientInfo { patient_lon: 0.0, patient_lat: 0.0, severity: 3 };
        let high = PatientInfo { patient_lon: 0.0, patient_lat: 0.0, severity: 4 };
        assert!(!low.requires_icu());
        assert!(high.requires_icu());
    }

    #[test]
    fn entry_serializes_wire_field_names() {
        let entry = RankingEntry {
            rank: 1,
            hospital_name: "Alpha".into(),
            hospital_id: "h-alpha".into(),
            distance_km: 2.5,
            ml_suitability_score: 0.9,
            real_time_score: 0.8,
            final_score: 0.85,
            reasoning: "closest".into(),
            estimated_wait_time_minutes: 10,
            bed_availability_status: BedAvailability::Available,
            icu_availability: IcuAvailability::NotAvailable,
            specialist_match: SpecialistMatch::Good,
            risk_level: RiskLevel::Low,
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["bed_availability_status"], "Available");
        assert_eq!(v["icu_availability"], "Not Available");
        assert_eq!(v["risk_level"], "Low");
    }
}
