//! Predictive model seams for the ranking pipeline.
//!
//! Both models are injected strategy objects: the pipeline never
//! special-cases "model missing". The heuristic implementations here stand
//! in for the trained gradient-boosted artifacts and are fully
//! deterministic; the health endpoint reports which implementation is
//! loaded so degraded scoring is always visible.

pub mod occupancy;
pub mod suitability;

pub use occupancy::{HeuristicOccupancyModel, OccupancyModel};
pub use suitability::{HeuristicSuitabilityModel, SuitabilityModel};
