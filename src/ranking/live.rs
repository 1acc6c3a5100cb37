//! Live operational context for the reasoning pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{KvStore, StoreError, DOCTOR_AVAILABILITY, HOSPITAL_UPDATES, PATIENT_LOAD};

/// Snapshot of the three live collections, passed whole to the reasoning
/// service. No filtering happens here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveContext {
    pub hospital_updates: Vec<Value>,
    pub doctor_availability: Vec<Value>,
    pub patient_load: Vec<Value>,
}

impl LiveContext {
    pub fn is_empty(&self) -> bool {
        self.hospital_updates.is_empty()
            && self.doctor_availability.is_empty()
            && self.patient_load.is_empty()
    }
}

/// Pull the current operational snapshot from the store. When the caller
/// opts out of live data, returns three empty collections.
pub fn gather(store: &dyn KvStore, include_live_data: bool) -> Result<LiveContext, StoreError> {
    if !include_live_data {
        return Ok(LiveContext::default());
    }

    Ok(LiveContext {
        hospital_updates: store.list(HOSPITAL_UPDATES)?,
        doctor_availability: store.list(DOCTOR_AVAILABILITY)?,
        patient_load: store.list(PATIENT_LOAD)?,
    })
}
