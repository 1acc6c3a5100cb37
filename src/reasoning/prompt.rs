//! Prompt construction for the reranking pass.
//!
//! The prompt carries the assembled ranking, the live operational snapshot,
//! ambulance position and patient severity, and pins down both the output
//! contract and the decision-priority order any backend must honor.

use crate::models::RankedCandidate;
use crate::ranking::live::LiveContext;
use crate::ranking::types::{AmbulanceLocation, PatientInfo};

pub const SYSTEM_MESSAGE: &str = "You are an expert hospital allocation specialist. \
Analyze all provided data carefully and provide the most optimal hospital ranking \
for emergency patient care.";

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

/// Build the reranking prompt.
pub fn build_rerank_prompt(
    candidates: &[RankedCandidate],
    live: &LiveContext,
    ambulance: Option<&AmbulanceLocation>,
    patient: &PatientInfo,
) -> String {
    let ambulance_section = match ambulance {
        Some(a) => format!("- Current position: latitude {}, longitude {}", a.lat, a.lon),
        None => "- Position not reported".to_string(),
    };

    format!(
        r#"You are ranking hospitals for an emergency patient transport.

## PATIENT
- Location: latitude {patient_lat}, longitude {patient_lon}
- Severity: {severity}/5 (1 = low, 5 = critical)
- ICU required: {icu}

## AMBULANCE
{ambulance_section}

## MODEL PREDICTIONS
Hospitals ranked by the predictive models (distance, forecast bed
availability, suitability):

{rankings}

## LIVE OPERATIONAL DATA

### Facility status updates:
{hospital_updates}

### Staff availability:
{doctor_availability}

### Active patient load:
{patient_load}

## TASK
Rerank the hospitals from best to worst considering BOTH the model
predictions AND the live data. For each hospital explain the ranking,
estimate the wait, and assess risk.

## DECISION CRITERIA (strict priority order)
1. Patient safety and survival probability
2. Appropriate care level for severity
3. Real-time bed/ICU availability
4. Distance and transport time
5. Specialist availability matching patient needs
6. Current hospital load and capacity
7. Historical performance and reliability

## OUTPUT FORMAT
Respond with a single JSON object, no other text:
{{
    "final_ranking": [
        {{
            "rank": 1,
            "hospital_name": "...",
            "hospital_id": "...",
            "distance_km": 0.0,
            "ml_suitability_score": 0.0,
            "real_time_score": 0.0,
            "final_score": 0.0,
            "reasoning": "...",
            "estimated_wait_time_minutes": 0,
            "bed_availability_status": "Available|Limited|Full",
            "icu_availability": "Available|Not Available",
            "specialist_match": "Perfect|Good|Fair|Poor",
            "risk_level": "Low|Medium|High"
        }}
    ],
    "critical_factors": ["..."],
    "recommendations": {{
        "primary_choice": "...",
        "backup_plan": "...",
        "transport_notes": "...",
        "hospital_prep": "..."
    }},
    "overall_assessment": "..."
}}

Include every hospital from the model predictions exactly once. Scores are
0-1. Do not invent hospitals that are not in the model predictions."#,
        patient_lat = patient.patient_lat,
        patient_lon = patient.patient_lon,
        severity = patient.severity,
        icu = if patient.requires_icu() { "yes" } else { "no" },
        ambulance_section = ambulance_section,
        rankings = pretty(&candidates),
        hospital_updates = pretty(&live.hospital_updates),
        doctor_availability = pretty(&live.doctor_availability),
        patient_load = pretty(&live.patient_load),
    )
}
