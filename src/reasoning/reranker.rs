//! Reasoning rerank with multi-level degradation.
//!
//! One attempt per request, bounded by a timeout, three terminal paths:
//! the parsed reranking (validated), a synthesized ranking when the
//! response cannot be parsed, and a synthesized ranking when the service
//! is unavailable. All three produce the same response shape; callers
//! only observe the path through the provenance tag and textual notes.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    BedAvailability, IcuAvailability, Provenance, RankedCandidate, RiskLevel, SpecialistMatch,
};
use crate::ranking::live::LiveContext;
use crate::ranking::types::{
    AmbulanceLocation, PatientInfo, RankingEntry, RankingResponse, Recommendations,
};
use crate::reasoning::parser::{parse_reranking, ParsedReranking};
use crate::reasoning::{prompt, ReasoningBackend};

/// Placeholder real-time score when the response parse fails.
const PARSE_FALLBACK_REAL_TIME: f64 = 0.8;
/// Placeholder real-time score when the service is unavailable.
const UNAVAILABLE_REAL_TIME: f64 = 0.5;
/// Final-score damping applied in the parse-fallback synthesis.
const PARSE_FALLBACK_DAMPING: f64 = 0.9;
/// Predicted free beds above this count "Available", otherwise "Limited".
const AVAILABLE_BED_THRESHOLD: f64 = 5.0;

pub struct ReasoningReranker {
    backend: Option<Arc<dyn ReasoningBackend>>,
    timeout: Duration,
}

impl ReasoningReranker {
    pub fn new(backend: Option<Arc<dyn ReasoningBackend>>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model_name(&self) -> Option<String> {
        self.backend.as_ref().map(|b| b.model().to_string())
    }

    /// Run the rerank. Exactly one service attempt; every outcome is a
    /// complete, well-formed response.
    pub async fn rerank(
        &self,
        candidates: &[RankedCandidate],
        live: &LiveContext,
        ambulance: Option<&AmbulanceLocation>,
        patient: &PatientInfo,
    ) -> RankingResponse {
        let Some(backend) = &self.backend else {
            return synthesize_unavailable(candidates, "reasoning service not configured");
        };

        let rerank_prompt = prompt::build_rerank_prompt(candidates, live, ambulance, patient);

        let raw = match tokio::time::timeout(
            self.timeout,
            backend.complete(prompt::SYSTEM_MESSAGE, &rerank_prompt),
        )
        .await
        {
            Err(_elapsed) => {
                let note = format!(
                    "reasoning request timed out after {}s",
                    self.timeout.as_secs()
                );
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Reasoning call timed out");
                return synthesize_unavailable(candidates, &note);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Reasoning service unavailable");
                return synthesize_unavailable(candidates, &e.to_string());
            }
            Ok(Ok(text)) => text,
        };

        let parsed = match parse_reranking(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Reasoning response not parseable, synthesizing ranking");
                return synthesize_parse_fallback(candidates);
            }
        };

        match format_validated(parsed, candidates) {
            Some(response) => response,
            None => {
                tracing::warn!("Reasoning response failed validation, synthesizing ranking");
                synthesize_parse_fallback(candidates)
            }
        }
    }
}

/// Validate the parsed reranking against the candidate set and map it into
/// the wire shape.
///
/// The service may reorder and re-score but must return exactly the
/// candidate set: a missing, duplicated, or fabricated facility rejects
/// the whole response. Returns `None` on any violation so the caller
/// degrades to the parse-fallback synthesis.
fn format_validated(
    parsed: ParsedReranking,
    candidates: &[RankedCandidate],
) -> Option<RankingResponse> {
    if parsed.final_ranking.len() != candidates.len() {
        return None;
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    for entry in &parsed.final_ranking {
        let id = entry.hospital_id.as_deref()?;
        if !candidates.iter().any(|c| c.hospital_id == id) {
            return None;
        }
        if !seen.insert(id) {
            return None;
        }
    }

    // Order by the service's rank field, then re-number densely from 1 so
    // gaps or duplicate ranks in the output cannot leak to the caller.
    let mut entries = parsed.final_ranking;
    entries.sort_by_key(|e| e.rank.unwrap_or(u32::MAX));

    let mut final_ranking = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        // Containment was validated above; a miss here rejects the response.
        let candidate = candidates
            .iter()
            .find(|c| Some(c.hospital_id.as_str()) == entry.hospital_id.as_deref())?;

        let distance_km = entry.distance_km.unwrap_or(candidate.features.dist_km);
        let ml_score = entry
            .ml_suitability_score
            .unwrap_or(candidate.suitability_score);

        final_ranking.push(RankingEntry {
            rank: idx as u32 + 1,
            hospital_name: entry
                .hospital_name
                .unwrap_or_else(|| candidate.hospital_name.clone()),
            hospital_id: candidate.hospital_id.clone(),
            distance_km,
            ml_suitability_score: ml_score,
            real_time_score: entry.real_time_score.unwrap_or(PARSE_FALLBACK_REAL_TIME),
            final_score: entry.final_score.unwrap_or(ml_score),
            reasoning: entry
                .reasoning
                .unwrap_or_else(|| "No reasoning provided".to_string()),
            estimated_wait_time_minutes: entry
                .estimated_wait_time_minutes
                .map(|m| m.max(0.0).round() as u32)
                .unwrap_or_else(|| fallback_wait_minutes(distance_km)),
            bed_availability_status: BedAvailability::from_wire(
                entry.bed_availability_status.as_deref(),
            ),
            icu_availability: IcuAvailability::from_wire(entry.icu_availability.as_deref()),
            specialist_match: SpecialistMatch::from_wire(entry.specialist_match.as_deref()),
            risk_level: RiskLevel::from_wire(entry.risk_level.as_deref()),
        });
    }

    let critical_factors = parsed
        .critical_factors
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| vec!["Model predictions combined with live operational data".to_string()]);

    let recommendations = {
        let parsed_rec = parsed.recommendations.unwrap_or_default();
        let defaults = default_recommendations(&final_ranking);
        Recommendations {
            primary_choice: parsed_rec.primary_choice.unwrap_or(defaults.primary_choice),
            backup_plan: parsed_rec.backup_plan.unwrap_or(defaults.backup_plan),
            transport_notes: parsed_rec.transport_notes.unwrap_or(defaults.transport_notes),
            hospital_prep: parsed_rec.hospital_prep.unwrap_or(defaults.hospital_prep),
        }
    };

    Some(RankingResponse {
        final_ranking,
        critical_factors,
        recommendations,
        overall_assessment: parsed
            .overall_assessment
            .unwrap_or_else(|| "Reasoning-service ranking with live operational data".to_string()),
        analysis_timestamp: now_rfc3339(),
        model_used: Provenance::ReasoningService,
    })
}

/// Ranking synthesized from the assembled model scores when the response
/// exists but cannot be used.
fn synthesize_parse_fallback(candidates: &[RankedCandidate]) -> RankingResponse {
    let final_ranking: Vec<RankingEntry> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| RankingEntry {
            rank: idx as u32 + 1,
            hospital_name: c.hospital_name.clone(),
            hospital_id: c.hospital_id.clone(),
            distance_km: c.features.dist_km,
            ml_suitability_score: c.suitability_score,
            real_time_score: PARSE_FALLBACK_REAL_TIME,
            final_score: c.suitability_score * PARSE_FALLBACK_DAMPING,
            reasoning: format!(
                "Model recommendation with fallback analysis. Distance: {:.2} km, predicted free beds: {:.0}",
                c.features.dist_km, c.features.pred_beds_available
            ),
            estimated_wait_time_minutes: fallback_wait_minutes(c.features.dist_km),
            bed_availability_status: if c.features.pred_beds_available > AVAILABLE_BED_THRESHOLD {
                BedAvailability::Available
            } else {
                BedAvailability::Limited
            },
            icu_availability: IcuAvailability::Available,
            specialist_match: SpecialistMatch::Good,
            risk_level: RiskLevel::Medium,
        })
        .collect();

    let recommendations = default_recommendations(&final_ranking);

    RankingResponse {
        final_ranking,
        critical_factors: vec![
            "Model predictions based on historical data".to_string(),
            "Distance and accessibility".to_string(),
            "Predicted bed availability".to_string(),
        ],
        recommendations,
        overall_assessment:
            "Recommendation based on predictive models; reasoning output could not be parsed"
                .to_string(),
        analysis_timestamp: now_rfc3339(),
        model_used: Provenance::FallbackParse,
    }
}

/// Ranking synthesized when the reasoning service never produced output.
fn synthesize_unavailable(candidates: &[RankedCandidate], note: &str) -> RankingResponse {
    let final_ranking: Vec<RankingEntry> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| RankingEntry {
            rank: idx as u32 + 1,
            hospital_name: c.hospital_name.clone(),
            hospital_id: c.hospital_id.clone(),
            distance_km: c.features.dist_km,
            ml_suitability_score: c.suitability_score,
            real_time_score: UNAVAILABLE_REAL_TIME,
            final_score: c.suitability_score,
            reasoning: format!("Model recommendation (reasoning analysis unavailable: {note})"),
            estimated_wait_time_minutes: fallback_wait_minutes(c.features.dist_km),
            bed_availability_status: BedAvailability::Unknown,
            icu_availability: IcuAvailability::Unknown,
            specialist_match: SpecialistMatch::Unknown,
            risk_level: RiskLevel::Medium,
        })
        .collect();

    let recommendations = Recommendations {
        primary_choice: final_ranking
            .first()
            .map(|e| e.hospital_name.clone())
            .unwrap_or_else(|| "Contact emergency services".to_string()),
        backup_plan: "Manual verification of hospital availability recommended".to_string(),
        transport_notes: "Verify hospital capacity before transport".to_string(),
        hospital_prep: "Call ahead to confirm availability".to_string(),
    };

    RankingResponse {
        final_ranking,
        critical_factors: vec![
            format!("Reasoning service error: {note}"),
            "Falling back to model predictions only".to_string(),
        ],
        recommendations,
        overall_assessment: format!(
            "Reasoning analysis failed ({note}). Recommendation based on predictive models only."
        ),
        analysis_timestamp: now_rfc3339(),
        model_used: Provenance::FallbackUnavailable,
    }
}

/// Wait estimate from distance: 3 minutes per km, 5-minute floor.
fn fallback_wait_minutes(dist_km: f64) -> u32 {
    (dist_km * 3.0).round().max(5.0) as u32
}

fn default_recommendations(ranking: &[RankingEntry]) -> Recommendations {
    Recommendations {
        primary_choice: ranking
            .first()
            .map(|e| e.hospital_name.clone())
            .unwrap_or_else(|| "No hospitals available".to_string()),
        backup_plan: ranking
            .get(1)
            .map(|e| e.hospital_name.clone())
            .unwrap_or_else(|| "Contact emergency services".to_string()),
        transport_notes: "Standard emergency transport protocol".to_string(),
        hospital_prep: "Standard emergency preparation".to_string(),
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
