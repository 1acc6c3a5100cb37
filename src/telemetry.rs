//! Per-facility occupancy telemetry.
//!
//! True bed telemetry is not available in every deployment, so snapshots
//! are synthesized when no real feed exists. That policy lives behind a
//! trait: the scoring code never calls a random number generator directly,
//! and tests inject a seeded provider for reproducible rankings.

use std::sync::Mutex;

use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::Facility;

/// Ephemeral occupancy snapshot for one facility. Lifetime: one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveOccupancySnapshot {
    /// Currently occupied beds.
    pub occupied: f64,
    /// Yesterday's occupancy (lag-1).
    pub occ_lag1: f64,
    /// Occupancy seven days ago.
    pub occ_lag7: f64,
    /// 7-day rolling mean of occupancy.
    pub occ_roll7: f64,
    /// 7-day rolling admission rate.
    pub adm_roll7: f64,
    /// Yesterday's admission rate.
    pub adm_lag1: f64,
    /// Yesterday's discharge rate.
    pub dis_lag1: f64,
    /// Day of week, Monday = 0.
    pub day_of_week: u8,
    /// Effective staffing rate relative to nominal (around 1.0).
    pub staffed_rate: f64,
}

/// Source of live occupancy snapshots, one per facility per request.
pub trait TelemetryProvider: Send + Sync {
    fn snapshot(&self, facility: &Facility) -> LiveOccupancySnapshot;

    /// Human-readable tag reported by the health endpoint.
    fn name(&self) -> &'static str;
}

/// Synthesizes plausible telemetry where no real feed exists.
///
/// Distribution mirrors the historical training setup: occupancy uniform
/// in 10..80, lag-7 at 95% of current, admission/discharge rates uniform
/// in 0..10, staffing rate uniform in 0.8..1.2. With a seed the stream is
/// fully deterministic.
pub struct SyntheticTelemetryProvider {
    rng: Mutex<StdRng>,
}

impl SyntheticTelemetryProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticTelemetryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryProvider for SyntheticTelemetryProvider {
    fn snapshot(&self, facility: &Facility) -> LiveOccupancySnapshot {
        let mut rng = match self.rng.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Occupancy never synthesized above the facility's capacity.
        let cap = f64::from(facility.total_beds);
        let occupied = f64::from(rng.gen_range(10..80u32)).min(cap);

        LiveOccupancySnapshot {
            occupied,
            occ_lag1: occupied,
            occ_lag7: occupied * 0.95,
            // Single-sample rolling window collapses to the current value.
            occ_roll7: occupied,
            adm_roll7: rng.gen_range(0.0..10.0),
            adm_lag1: rng.gen_range(0.0..10.0),
            dis_lag1: rng.gen_range(0.0..10.0),
            day_of_week: Utc::now().weekday().num_days_from_monday() as u8,
            staffed_rate: rng.gen_range(0.8..1.2),
        }
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility() -> Facility {
        Facility {
            id: "h1".into(),
            name: "Test Hospital".into(),
            latitude: 13.0,
            longitude: 80.0,
            total_beds: 100,
            icu_beds: 10,
        }
    }

    #[test]
    fn seeded_provider_is_deterministic() {
        let f = facility();
        let a = SyntheticTelemetryProvider::with_seed(42);
        let b = SyntheticTelemetryProvider::with_seed(42);
        for _ in 0..5 {
            let sa = a.snapshot(&f);
            let sb = b.snapshot(&f);
            assert_eq!(sa.occupied, sb.occupied);
            assert_eq!(sa.adm_roll7, sb.adm_roll7);
            assert_eq!(sa.staffed_rate, sb.staffed_rate);
        }
    }

    #[test]
    fn snapshot_within_expected_ranges() {
        let f = facility();
        let provider = SyntheticTelemetryProvider::with_seed(7);
        for _ in 0..50 {
            let s = provider.snapshot(&f);
            assert!(s.occupied >= 10.0 && s.occupied < 80.0);
            assert!((s.occ_lag7 - s.occupied * 0.95).abs() < 1e-9);
            assert!(s.adm_roll7 >= 0.0 && s.adm_roll7 < 10.0);
            assert!(s.staffed_rate >= 0.8 && s.staffed_rate < 1.2);
            assert!(s.day_of_week < 7);
        }
    }

    #[test]
    fn occupancy_capped_at_facility_beds() {
        let mut small = facility();
        small.total_beds = 15;
        let provider = SyntheticTelemetryProvider::with_seed(1);
        for _ in 0..50 {
            let s = provider.snapshot(&small);
            assert!(s.occupied <= 15.0);
        }
    }
}
