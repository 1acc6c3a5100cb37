//! Hospital ranking pipeline.
//!
//! Candidate build → suitability assembly → optional live-context gather →
//! reasoning rerank (with deterministic degradation) → wire response.

pub mod assembler;
pub mod features;
pub mod live;
pub mod pipeline;
pub mod types;

pub use features::RadiusFilter;
pub use live::LiveContext;
pub use pipeline::HospitalRanker;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// Reference data or models absent — a 500-class condition on every
    /// request until resolved, never conflated with an empty radius.
    #[error("ranking service not ready: {0}")]
    ServiceNotReady(&'static str),
    /// Normal, expected outcome: nothing within the requested radius.
    #[error("no candidate facilities within the requested radius")]
    NoCandidatesInRadius,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
