//! Shelter vulnerability assessment and ledger-backed allocation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ledger::{AllocationLedger, AllocationRecord, LedgerError, LedgerReceipt};
use crate::models::Priority;

#[derive(Debug, thiserror::Error)]
pub enum ShelterError {
    #[error("invalid applicant data: {0}")]
    InvalidApplicant(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Applicant profile used for vulnerability scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantData {
    /// Poverty level, 0-100.
    pub poverty_level: f64,
    /// Months unemployed.
    pub unemployment_duration: u32,
    /// Household members, at least 1.
    pub family_size: u32,
    #[serde(default)]
    pub has_disability: bool,
    #[serde(default)]
    pub is_elderly: bool,
    #[serde(default)]
    pub is_single_parent: bool,
    #[serde(default)]
    pub minority_status: bool,
    #[serde(default)]
    pub special_circumstances: Vec<String>,
}

impl ApplicantData {
    fn validate(&self) -> Result<(), ShelterError> {
        if !(0.0..=100.0).contains(&self.poverty_level) {
            return Err(ShelterError::InvalidApplicant(format!(
                "poverty_level must be 0-100, got {}",
                self.poverty_level
            )));
        }
        if self.family_size == 0 {
            return Err(ShelterError::InvalidApplicant(
                "family_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Vulnerability score, 0-100, higher means more urgent.
pub trait VulnerabilityModel: Send + Sync {
    fn score(&self, applicant: &ApplicantData) -> f64;

    fn name(&self) -> &'static str;
}

/// Additive weighted scoring with per-factor caps.
///
/// poverty x0.25 capped at 25, unemployment months x2 capped at 20,
/// (family - 1) x3 capped at 15, disability +15, elderly +10, special
/// circumstances x3 capped at 15. Clamped to 0-100.
pub struct WeightedVulnerabilityModel;

impl VulnerabilityModel for WeightedVulnerabilityModel {
    fn score(&self, applicant: &ApplicantData) -> f64 {
        let mut score = 0.0;
        score += (applicant.poverty_level * 0.25).min(25.0);
        score += (f64::from(applicant.unemployment_duration) * 2.0).min(20.0);
        score += (f64::from(applicant.family_size.saturating_sub(1)) * 3.0).min(15.0);
        if applicant.has_disability {
            score += 15.0;
        }
        if applicant.is_elderly {
            score += 10.0;
        }
        score += (applicant.special_circumstances.len() as f64 * 3.0).min(15.0);
        score.clamp(0.0, 100.0)
    }

    fn name(&self) -> &'static str {
        "weighted-vulnerability-v1"
    }
}

/// `POST /shelter/allocate` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationRequest {
    pub applicant_id: String,
    pub applicant_data: ApplicantData,
    pub shelter_unit_id: String,
}

/// `POST /shelter/allocate` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub applicant_id: String,
    pub vulnerability_score: f64,
    pub priority: Priority,
    pub shelter_unit_id: String,
    pub receipt: LedgerReceipt,
}

/// `POST /shelter/assess` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub vulnerability_score: f64,
    pub priority: Priority,
    pub scoring_model: String,
}

pub struct ShelterService {
    model: Arc<dyn VulnerabilityModel>,
    ledger: Arc<dyn AllocationLedger>,
}

impl ShelterService {
    pub fn new(model: Arc<dyn VulnerabilityModel>, ledger: Arc<dyn AllocationLedger>) -> Self {
        Self { model, ledger }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub fn ledger(&self) -> &dyn AllocationLedger {
        self.ledger.as_ref()
    }

    /// Score only; nothing is recorded.
    pub fn assess(&self, applicant: &ApplicantData) -> Result<Assessment, ShelterError> {
        applicant.validate()?;
        let score = round2(self.model.score(applicant));
        Ok(Assessment {
            vulnerability_score: score,
            priority: Priority::from_score(score),
            scoring_model: self.model.name().to_string(),
        })
    }

    /// Score and record on the ledger. The allocation only succeeds when
    /// the ledger write is confirmed; a duplicate or unconfirmed write
    /// fails the whole request.
    pub fn allocate(&self, request: AllocationRequest) -> Result<AllocationOutcome, ShelterError> {
        if request.applicant_id.trim().is_empty() {
            return Err(ShelterError::InvalidApplicant(
                "applicant_id must not be empty".to_string(),
            ));
        }
        let assessment = self.assess(&request.applicant_data)?;

        let receipt = self.ledger.record(AllocationRecord {
            applicant_id: request.applicant_id.clone(),
            vulnerability_score: assessment.vulnerability_score,
            priority: assessment.priority,
            shelter_unit_id: request.shelter_unit_id.clone(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        })?;

        tracing::info!(
            applicant_id = %request.applicant_id,
            score = assessment.vulnerability_score,
            priority = assessment.priority.as_str(),
            sequence = receipt.sequence,
            "Shelter allocation recorded"
        );

        Ok(AllocationOutcome {
            applicant_id: request.applicant_id,
            vulnerability_score: assessment.vulnerability_score,
            priority: assessment.priority,
            shelter_unit_id: request.shelter_unit_id,
            receipt,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, UnconfirmedLedger};

    fn applicant() -> ApplicantData {
        ApplicantData {
            poverty_level: 40.0,
            unemployment_duration: 3,
            family_size: 4,
            has_disability: false,
            is_elderly: false,
            is_single_parent: false,
            minority_status: false,
            special_circumstances: vec![],
        }
    }

    fn service(ledger: Arc<dyn AllocationLedger>) -> ShelterService {
        ShelterService::new(Arc::new(WeightedVulnerabilityModel), ledger)
    }

    #[test]
    fn weighted_score_adds_capped_factors() {
        // 40*0.25=10 poverty, 3*2=6 unemployment, (4-1)*3=9 family
        let score = WeightedVulnerabilityModel.score(&applicant());
        assert_eq!(score, 25.0);
    }

    #[test]
    fn factor_caps_hold_at_boundaries() {
        let maxed = ApplicantData {
            poverty_level: 100.0,       // capped 25
            unemployment_duration: 60,  // capped 20
            family_size: 20,            // capped 15
            has_disability: true,       // 15
            is_elderly: true,           // 10
            is_single_parent: true,
            minority_status: true,
            special_circumstances: vec!["a".into(); 12], // capped 15
        };
        assert_eq!(WeightedVulnerabilityModel.score(&maxed), 100.0);

        let minimal = ApplicantData {
            poverty_level: 0.0,
            unemployment_duration: 0,
            family_size: 1,
            has_disability: false,
            is_elderly: false,
            is_single_parent: false,
            minority_status: false,
            special_circumstances: vec![],
        };
        assert_eq!(WeightedVulnerabilityModel.score(&minimal), 0.0);
    }

    #[test]
    fn assess_maps_score_to_priority_band() {
        let svc = service(Arc::new(MemoryLedger::new()));
        let mut critical = applicant();
        critical.poverty_level = 100.0;
        critical.unemployment_duration = 24;
        critical.has_disability = true;
        critical.is_elderly = true;
        let out = svc.assess(&critical).unwrap();
        assert!(out.vulnerability_score >= 70.0);
        assert_eq!(out.priority, Priority::Critical);
    }

    #[test]
    fn assess_rejects_out_of_range_poverty() {
        let svc = service(Arc::new(MemoryLedger::new()));
        let mut bad = applicant();
        bad.poverty_level = 120.0;
        assert!(matches!(
            svc.assess(&bad),
            Err(ShelterError::InvalidApplicant(_))
        ));
    }

    #[test]
    fn allocate_records_on_ledger() {
        let ledger = Arc::new(MemoryLedger::new());
        let svc = service(ledger.clone());
        let out = svc
            .allocate(AllocationRequest {
                applicant_id: "app-9".into(),
                applicant_data: applicant(),
                shelter_unit_id: "unit-3".into(),
            })
            .unwrap();
        assert_eq!(out.receipt.sequence, 1);
        assert_eq!(ledger.count().unwrap(), 1);
        let entry = ledger.fetch("app-9").unwrap().unwrap();
        assert_eq!(entry.record.shelter_unit_id, "unit-3");
        assert_eq!(entry.record.vulnerability_score, out.vulnerability_score);
    }

    #[test]
    fn allocate_fails_when_write_unconfirmed() {
        let svc = service(Arc::new(UnconfirmedLedger));
        let err = svc
            .allocate(AllocationRequest {
                applicant_id: "app-1".into(),
                applicant_data: applicant(),
                shelter_unit_id: "unit-1".into(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ShelterError::Ledger(LedgerError::ConfirmationTimeout)
        ));
    }

    #[test]
    fn allocate_rejects_duplicate_applicant() {
        let svc = service(Arc::new(MemoryLedger::new()));
        let request = || AllocationRequest {
            applicant_id: "app-1".into(),
            applicant_data: applicant(),
            shelter_unit_id: "unit-1".into(),
        };
        svc.allocate(request()).unwrap();
        let err = svc.allocate(request()).unwrap_err();
        assert!(matches!(
            err,
            ShelterError::Ledger(LedgerError::DuplicateApplicant(_))
        ));
    }

    #[test]
    fn allocate_rejects_blank_applicant_id() {
        let svc = service(Arc::new(MemoryLedger::new()));
        let err = svc
            .allocate(AllocationRequest {
                applicant_id: "  ".into(),
                applicant_data: applicant(),
                shelter_unit_id: "unit-1".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ShelterError::InvalidApplicant(_)));
    }
}
