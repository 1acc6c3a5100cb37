//! Structured parse of the reasoning service's free-text response.
//!
//! The backend is asked for a single JSON object but may wrap it in prose
//! or markdown fences. Extraction takes the span from the first `{` to the
//! last `}` and parses that; anything else is a parse failure the reranker
//! degrades on. Fields are individually optional — missing values are
//! filled with named defaults downstream, never treated as errors.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no JSON object in response")]
    NoJsonObject,
    #[error("malformed JSON: {0}")]
    Json(String),
}

/// Raw reranking as the service returned it, pre-validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedReranking {
    #[serde(default)]
    pub final_ranking: Vec<ParsedEntry>,
    #[serde(default)]
    pub critical_factors: Option<Vec<String>>,
    #[serde(default)]
    pub recommendations: Option<ParsedRecommendations>,
    #[serde(default)]
    pub overall_assessment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedEntry {
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub ml_suitability_score: Option<f64>,
    #[serde(default)]
    pub real_time_score: Option<f64>,
    #[serde(default)]
    pub final_score: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Accepted as float — some backends emit `12.0` for minutes.
    #[serde(default)]
    pub estimated_wait_time_minutes: Option<f64>,
    #[serde(default)]
    pub bed_availability_status: Option<String>,
    #[serde(default)]
    pub icu_availability: Option<String>,
    #[serde(default)]
    pub specialist_match: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedRecommendations {
    #[serde(default)]
    pub primary_choice: Option<String>,
    #[serde(default)]
    pub backup_plan: Option<String>,
    #[serde(default)]
    pub transport_notes: Option<String>,
    #[serde(default)]
    pub hospital_prep: Option<String>,
}

/// The span from the first `{` to the last `}`, if any.
fn extract_braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the service's raw text into a `ParsedReranking`.
pub fn parse_reranking(text: &str) -> Result<ParsedReranking, ParseError> {
    let json = extract_braced(text).ok_or(ParseError::NoJsonObject)?;
    serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_json() {
        let text = r#"{
            "final_ranking": [
                {"rank": 1, "hospital_id": "h1", "hospital_name": "Alpha",
                 "final_score": 0.91, "risk_level": "Low"}
            ],
            "critical_factors": ["ICU capacity"],
            "overall_assessment": "Clear best option"
        }"#;
        let parsed = parse_reranking(text).unwrap();
        assert_eq!(parsed.final_ranking.len(), 1);
        assert_eq!(parsed.final_ranking[0].hospital_id.as_deref(), Some("h1"));
        assert_eq!(parsed.final_ranking[0].final_score, Some(0.91));
        assert_eq!(parsed.critical_factors.unwrap(), vec!["ICU capacity"]);
    }

    #[test]
    fn parses_json_wrapped_in_prose_and_fences() {
        let text = "Here is my analysis:\n```json\n{\"final_ranking\": [{\"rank\": 1, \"hospital_id\": \"h2\"}]}\n```\nHope this helps.";
        let parsed = parse_reranking(text).unwrap();
        assert_eq!(parsed.final_ranking[0].hospital_id.as_deref(), Some("h2"));
    }

    #[test]
    fn free_text_without_braces_is_no_json_object() {
        let err = parse_reranking("I recommend Alpha General, it is closest.").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonObject));
    }

    #[test]
    fn reversed_braces_are_no_json_object() {
        let err = parse_reranking("} nothing here {").unwrap_err();
        assert!(matches!(err, ParseError::NoJsonObject));
    }

    #[test]
    fn broken_json_is_malformed() {
        let err = parse_reranking("{\"final_ranking\": [}").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn missing_fields_default_to_none() {
        let parsed = parse_reranking(r#"{"final_ranking": [{}]}"#).unwrap();
        let entry = &parsed.final_ranking[0];
        assert!(entry.rank.is_none());
        assert!(entry.hospital_id.is_none());
        assert!(entry.risk_level.is_none());
        assert!(parsed.recommendations.is_none());
    }

    #[test]
    fn float_wait_minutes_accepted() {
        let parsed = parse_reranking(
            r#"{"final_ranking": [{"hospital_id": "h1", "estimated_wait_time_minutes": 12.5}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.final_ranking[0].estimated_wait_time_minutes, Some(12.5));
    }
}
