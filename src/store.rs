//! Pluggable key-value store for live operational data.
//!
//! The ranking core only ever reads from the store; writes happen through
//! the management endpoints. `MemoryStore` is the volatile default — a
//! persistent backend can be swapped in behind the same trait.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;

/// Collection names used by the live-context gatherer.
pub const HOSPITAL_UPDATES: &str = "hospital_updates";
pub const DOCTOR_AVAILABILITY: &str = "doctor_availability";
pub const PATIENT_LOAD: &str = "patient_load";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Minimal document store over JSON values, keyed by (collection, key).
pub trait KvStore: Send + Sync {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;
    fn put(&self, collection: &str, key: &str, value: Value) -> Result<(), StoreError>;
    fn delete(&self, collection: &str, key: &str) -> Result<bool, StoreError>;
    /// All documents in a collection, in deterministic key order.
    fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;
}

/// In-memory store backed by RwLock.
/// BTreeMap per collection keeps `list` order deterministic.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let guard = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.get(collection).and_then(|c| c.get(key)).cloned())
    }

    fn put(&self, collection: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut guard = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let mut guard = self.collections.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard
            .get_mut(collection)
            .map(|c| c.remove(key).is_some())
            .unwrap_or(false))
    }

    fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let guard = self.collections.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_then_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put(HOSPITAL_UPDATES, "h1", json!({"beds_open": 12}))
            .unwrap();
        let doc = store.get(HOSPITAL_UPDATES, "h1").unwrap().unwrap();
        assert_eq!(doc["beds_open"], 12);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get("nowhere", "nothing").unwrap().is_none());
    }

    #[test]
    fn list_is_key_ordered() {
        let store = MemoryStore::new();
        store.put("c", "b", json!({"id": "b"})).unwrap();
        store.put("c", "a", json!({"id": "a"})).unwrap();
        store.put("c", "z", json!({"id": "z"})).unwrap();
        let docs = store.list("c").unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "z"]);
    }

    #[test]
    fn put_overwrites_existing_key() {
        let store = MemoryStore::new();
        store.put("c", "k", json!(1)).unwrap();
        store.put("c", "k", json!(2)).unwrap();
        assert_eq!(store.get("c", "k").unwrap().unwrap(), json!(2));
        assert_eq!(store.list("c").unwrap().len(), 1);
    }

    #[test]
    fn delete_reports_presence() {
        let store = MemoryStore::new();
        store.put("c", "k", json!(1)).unwrap();
        assert!(store.delete("c", "k").unwrap());
        assert!(!store.delete("c", "k").unwrap());
        assert!(store.list("c").unwrap().is_empty());
    }

    #[test]
    fn collections_are_isolated() {
        let store = MemoryStore::new();
        store.put(DOCTOR_AVAILABILITY, "d1", json!({"on_call": true})).unwrap();
        assert!(store.list(PATIENT_LOAD).unwrap().is_empty());
        assert_eq!(store.list(DOCTOR_AVAILABILITY).unwrap().len(), 1);
    }
}
