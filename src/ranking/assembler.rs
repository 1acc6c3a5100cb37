//! Suitability scoring and top-K assembly.

use std::cmp::Ordering;

use crate::models::RankedCandidate;
use crate::ranking::features::CandidateRow;
use crate::scoring::SuitabilityModel;

/// Score every candidate row, order descending by suitability and keep the
/// top `max_results`.
///
/// Score ties break on facility id ascending so results are reproducible
/// regardless of dataset ordering.
pub fn assemble(
    rows: Vec<CandidateRow<'_>>,
    suitability: &dyn SuitabilityModel,
    max_results: usize,
) -> Vec<RankedCandidate> {
    let mut candidates: Vec<RankedCandidate> = rows
        .into_iter()
        .map(|row| {
            let score = suitability.predict(&row.features);
            RankedCandidate {
                hospital_id: row.facility.id.clone(),
                hospital_name: row.facility.name.clone(),
                hospital_latitude: row.facility.latitude,
                hospital_longitude: row.facility.longitude,
                features: row.features,
                suitability_score: score,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.suitability_score
            .partial_cmp(&a.suitability_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.hospital_id.cmp(&b.hospital_id))
    });
    candidates.truncate(max_results);
    candidates
}
