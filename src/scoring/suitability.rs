//! Candidate suitability scoring.

use crate::models::CandidateFeatures;

/// Ranks a candidate's fit for the patient, 0-1.
pub trait SuitabilityModel: Send + Sync {
    fn predict(&self, features: &CandidateFeatures) -> f64;

    fn name(&self) -> &'static str;
}

/// Deterministic stand-in for the trained suitability classifier.
///
/// Weighted blend of proximity, predicted free beds, expected wait and ICU
/// fit. Severe patients needing ICU at a facility with none are heavily
/// penalized rather than excluded — exclusion is a dispatcher decision.
pub struct HeuristicSuitabilityModel;

impl HeuristicSuitabilityModel {
    const W_PROXIMITY: f64 = 0.35;
    const W_BEDS: f64 = 0.30;
    const W_WAIT: f64 = 0.15;
    const W_ICU: f64 = 0.20;
}

impl SuitabilityModel for HeuristicSuitabilityModel {
    fn predict(&self, features: &CandidateFeatures) -> f64 {
        // Half-score at 10 km, long tail beyond.
        let proximity = 1.0 / (1.0 + features.dist_km / 10.0);

        let capacity = f64::from(features.hospital_total_beds).max(1.0);
        let beds = (features.pred_beds_available / capacity).clamp(0.0, 1.0);

        // wait_time_est is a utilization-style ratio, not minutes.
        let wait = 1.0 / (1.0 + features.wait_time_est.max(0.0));

        let icu = if features.req_icu {
            if features.hospital_icu_beds == 0 {
                0.05
            } else {
                (f64::from(features.hospital_icu_beds) / 20.0).clamp(0.3, 1.0)
            }
        } else {
            1.0
        };

        let score = Self::W_PROXIMITY * proximity
            + Self::W_BEDS * beds
            + Self::W_WAIT * wait
            + Self::W_ICU * icu;

        score.clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "heuristic-suitability"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> CandidateFeatures {
        CandidateFeatures {
            dist_km: 5.0,
            pred_beds_available: 40.0,
            wait_time_est: 0.5,
            severity: 3,
            req_icu: false,
            hospital_total_beds: 100,
            hospital_icu_beds: 10,
        }
    }

    #[test]
    fn output_in_unit_interval() {
        let model = HeuristicSuitabilityModel;
        let cases = [
            features(),
            CandidateFeatures {
                dist_km: 500.0,
                pred_beds_available: 0.0,
                wait_time_est: 10.0,
                severity: 5,
                req_icu: true,
                hospital_total_beds: 10,
                hospital_icu_beds: 0,
            },
            CandidateFeatures {
                dist_km: 0.0,
                pred_beds_available: 200.0,
                wait_time_est: 0.0,
                severity: 1,
                req_icu: false,
                hospital_total_beds: 200,
                hospital_icu_beds: 50,
            },
        ];
        for f in cases {
            let s = model.predict(&f);
            assert!((0.0..=1.0).contains(&s), "score {s} out of range");
        }
    }

    #[test]
    fn closer_is_better_all_else_equal() {
        let model = HeuristicSuitabilityModel;
        let near = features();
        let mut far = features();
        far.dist_km = 40.0;
        assert!(model.predict(&near) > model.predict(&far));
    }

    #[test]
    fn more_free_beds_is_better() {
        let model = HeuristicSuitabilityModel;
        let mut empty = features();
        empty.pred_beds_available = 90.0;
        let mut full = features();
        full.pred_beds_available = 2.0;
        assert!(model.predict(&empty) > model.predict(&full));
    }

    #[test]
    fn icu_requirement_penalizes_facilities_without_icu() {
        let model = HeuristicSuitabilityModel;
        let mut with_icu = features();
        with_icu.req_icu = true;
        let mut without_icu = with_icu.clone();
        without_icu.hospital_icu_beds = 0;
        assert!(model.predict(&with_icu) > model.predict(&without_icu));
    }

    #[test]
    fn deterministic() {
        let model = HeuristicSuitabilityModel;
        let f = features();
        assert_eq!(model.predict(&f), model.predict(&f));
    }
}
