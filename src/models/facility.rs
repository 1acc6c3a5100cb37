//! Static facility reference data.
//!
//! Loaded once at process start and never mutated by the ranking core.
//! The bundled dataset covers the Chennai metro pilot; a deployment points
//! `AIDRELAY_FACILITY_DATA` at its own JSON file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default facility dataset, bundled with the binary.
const BUNDLED_FACILITIES: &str = include_str!("../../data/facilities.json");

#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    #[error("cannot read facility dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("facility dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate facility id: {0}")]
    DuplicateId(String),
}

/// A hospital/medical unit with static capacity attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_beds: u32,
    pub icu_beds: u32,
}

/// Ordered facility set with id lookup. Effectively immutable after load.
pub struct FacilityDirectory {
    facilities: Vec<Facility>,
    by_id: HashMap<String, usize>,
}

impl FacilityDirectory {
    pub fn new(facilities: Vec<Facility>) -> Result<Self, FacilityError> {
        let mut by_id = HashMap::with_capacity(facilities.len());
        for (idx, f) in facilities.iter().enumerate() {
            if by_id.insert(f.id.clone(), idx).is_some() {
                return Err(FacilityError::DuplicateId(f.id.clone()));
            }
        }
        Ok(Self { facilities, by_id })
    }

    /// Parse a directory from a JSON array of facilities.
    pub fn from_json(json: &str) -> Result<Self, FacilityError> {
        let facilities: Vec<Facility> = serde_json::from_str(json)?;
        Self::new(facilities)
    }

    /// Load from a file path, or fall back to the bundled dataset.
    pub fn load(path: Option<&Path>) -> Result<Self, FacilityError> {
        match path {
            Some(p) => {
                let json = std::fs::read_to_string(p).map_err(|source| FacilityError::Io {
                    path: p.display().to_string(),
                    source,
                })?;
                let dir = Self::from_json(&json)?;
                tracing::info!(count = dir.len(), path = %p.display(), "Facility dataset loaded");
                Ok(dir)
            }
            None => {
                let dir = Self::from_json(BUNDLED_FACILITIES)?;
                tracing::info!(count = dir.len(), "Bundled facility dataset loaded");
                Ok(dir)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Facility> {
        self.by_id.get(id).map(|&idx| &self.facilities[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}
