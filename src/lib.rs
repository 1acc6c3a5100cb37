//! Emergency resource matching for humanitarian logistics.
//!
//! The core is the hospital ranking pipeline: geospatial candidate filter,
//! occupancy and suitability models, top-K assembly, then a reasoning
//! rerank with deterministic multi-level degradation. Around it sit the
//! shelter allocation ledger and the food-surplus planner, all served
//! over one HTTP API.

pub mod api;
pub mod config;
pub mod geo;
pub mod ledger;
pub mod models;
pub mod ranking;
pub mod reasoning;
pub mod scoring;
pub mod shelter;
pub mod store;
pub mod surplus;
pub mod telemetry;
