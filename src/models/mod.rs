pub mod candidate;
pub mod enums;
pub mod facility;

pub use candidate::{CandidateFeatures, RankedCandidate};
pub use enums::{BedAvailability, IcuAvailability, Priority, Provenance, RiskLevel, SpecialistMatch};
pub use facility::{Facility, FacilityDirectory};
