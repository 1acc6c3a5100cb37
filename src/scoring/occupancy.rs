//! Next-day occupancy forecasting.

use crate::telemetry::LiveOccupancySnapshot;

/// Predicts next-day occupied beds from the live snapshot.
pub trait OccupancyModel: Send + Sync {
    /// Predicted occupied beds for tomorrow, in `[0, total_beds]`.
    fn predict(&self, snapshot: &LiveOccupancySnapshot, total_beds: u32) -> f64;

    fn name(&self) -> &'static str;
}

/// Deterministic stand-in for the trained next-day occupancy model.
///
/// Autoregressive blend of the lag features plus net admissions, with a
/// small weekend dip. Output clamped to the facility's capacity.
pub struct HeuristicOccupancyModel;

impl OccupancyModel for HeuristicOccupancyModel {
    fn predict(&self, snapshot: &LiveOccupancySnapshot, total_beds: u32) -> f64 {
        let baseline =
            0.55 * snapshot.occ_lag1 + 0.30 * snapshot.occ_roll7 + 0.15 * snapshot.occ_lag7;
        let net_flow = snapshot.adm_lag1 - snapshot.dis_lag1;
        // Saturday/Sunday admissions run lighter.
        let weekday_factor = if snapshot.day_of_week >= 5 { 0.95 } else { 1.0 };

        ((baseline + net_flow) * weekday_factor).clamp(0.0, f64::from(total_beds))
    }

    fn name(&self) -> &'static str {
        "heuristic-occupancy"
    }
}
