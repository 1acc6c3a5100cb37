//! Write-once allocation ledger.
//!
//! Every confirmed shelter allocation is appended exactly once, keyed by
//! applicant id, and assigned a monotonic sequence number plus a
//! confirmation id that the verification URL embeds. A record that cannot
//! be confirmed fails the allocation; a second record for the same
//! applicant is rejected outright.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Priority;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("allocation already recorded for applicant {0}")]
    DuplicateApplicant(String),
    #[error("ledger confirmation timeout")]
    ConfirmationTimeout,
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// What gets written: the assessment outcome bound to a shelter unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub applicant_id: String,
    pub vulnerability_score: f64,
    pub priority: Priority,
    pub shelter_unit_id: String,
    pub recorded_at: String,
}

/// Confirmation returned for a successful write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub confirmation_id: String,
    pub sequence: u64,
    pub verification_url: String,
}

/// A confirmed entry as read back from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(flatten)]
    pub record: AllocationRecord,
    pub confirmation_id: String,
    pub sequence: u64,
}

pub trait AllocationLedger: Send + Sync {
    /// Append the record. Write-once per applicant; a confirmed write
    /// returns a receipt with a dense, monotonic sequence number.
    fn record(&self, record: AllocationRecord) -> Result<LedgerReceipt, LedgerError>;

    fn fetch(&self, applicant_id: &str) -> Result<Option<LedgerEntry>, LedgerError>;

    fn count(&self) -> Result<u64, LedgerError>;
}

/// In-memory ledger. BTreeMap so iteration and `count` are deterministic;
/// sequence numbers come from the entry count under the same write lock,
/// which stays monotonic because entries are never removed.
#[derive(Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<String, LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AllocationLedger for MemoryLedger {
    fn record(&self, record: AllocationRecord) -> Result<LedgerReceipt, LedgerError> {
        let mut entries = self.entries.write().map_err(|_| LedgerError::LockPoisoned)?;
        if entries.contains_key(&record.applicant_id) {
            return Err(LedgerError::DuplicateApplicant(record.applicant_id));
        }

        let sequence = entries.len() as u64 + 1;
        let confirmation_id = Uuid::new_v4().to_string();
        let receipt = LedgerReceipt {
            confirmation_id: confirmation_id.clone(),
            sequence,
            verification_url: format!("/shelter/allocation/{}", record.applicant_id),
        };

        let applicant_id = record.applicant_id.clone();
        entries.insert(
            applicant_id,
            LedgerEntry {
                record,
                confirmation_id,
                sequence,
            },
        );
        Ok(receipt)
    }

    fn fetch(&self, applicant_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.get(applicant_id).cloned())
    }

    fn count(&self) -> Result<u64, LedgerError> {
        let entries = self.entries.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(entries.len() as u64)
    }
}

/// Ledger whose writes never confirm. Test double for the failure path.
#[cfg(test)]
pub struct UnconfirmedLedger;

#[cfg(test)]
impl AllocationLedger for UnconfirmedLedger {
    fn record(&self, _record: AllocationRecord) -> Result<LedgerReceipt, LedgerError> {
        Err(LedgerError::ConfirmationTimeout)
    }

    fn fetch(&self, _applicant_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(None)
    }

    fn count(&self) -> Result<u64, LedgerError> {
        Ok(0)
    }
}
