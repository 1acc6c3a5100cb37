//! Shared state for the API layer.

use std::sync::Arc;

use crate::ranking::HospitalRanker;
use crate::shelter::ShelterService;
use crate::store::KvStore;
use crate::surplus::SurplusPlanner;

/// Shared context for all routes. Everything inside is `Arc`-shared and
/// immutable after startup apart from the store's interior locks.
#[derive(Clone)]
pub struct AppState {
    pub ranker: Arc<HospitalRanker>,
    pub shelter: Arc<ShelterService>,
    pub surplus: Arc<SurplusPlanner>,
    pub store: Arc<dyn KvStore>,
    pub started_at: String,
}

impl AppState {
    pub fn new(
        ranker: Arc<HospitalRanker>,
        shelter: Arc<ShelterService>,
        surplus: Arc<SurplusPlanner>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            ranker,
            shelter,
            surplus,
            store,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
