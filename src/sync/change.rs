//! Per-store change detection.
//!
//! Decides whether a freshly observed snapshot is different enough from
//! the last one to warrant arming a remote write. The comparison is
//! deliberately cheap and shaped per store: a version counter for the big
//! composite stores, version plus key-set for the date-keyed maps, and
//! full structural comparison only for the small preference blobs.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use serde_json::Value;

use crate::store::{ChangeStrategy, StoreHandle, StoreId};

#[derive(Debug, Clone, PartialEq)]
enum Fingerprint {
    Version(u64),
    KeySet { version: u64, keys: BTreeSet<String> },
    Value(Value),
}

fn fingerprint(handle: &dyn StoreHandle) -> Fingerprint {
    match handle.change_strategy() {
        ChangeStrategy::Versioned => Fingerprint::Version(handle.version()),
        ChangeStrategy::KeySet => {
            let keys = match handle.snapshot_value() {
                Value::Object(map) => map.keys().cloned().collect(),
                _ => BTreeSet::new(),
            };
            Fingerprint::KeySet {
                version: handle.version(),
                keys,
            }
        }
        ChangeStrategy::DeepEqual => Fingerprint::Value(handle.snapshot_value()),
    }
}

/// Tracks one fingerprint per store, updated on every observation.
pub struct ChangeDetector {
    fingerprints: Mutex<HashMap<StoreId, Fingerprint>>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            fingerprints: Mutex::new(HashMap::new()),
        }
    }

    /// Records the current state as the baseline without reporting a
    /// change. Called once per store after the bootstrap merge, so the
    /// merge itself never triggers a write.
    pub fn prime(&self, handle: &dyn StoreHandle) {
        self.fingerprints
            .lock()
            .expect("detector lock poisoned")
            .insert(handle.id(), fingerprint(handle));
    }

    /// Observes the store's current state; returns whether it changed
    /// since the previous observation.
    pub fn observe(&self, handle: &dyn StoreHandle) -> bool {
        let current = fingerprint(handle);
        let mut fingerprints = self.fingerprints.lock().expect("detector lock poisoned");
        let changed = match fingerprints.get(&handle.id()) {
            Some(previous) => *previous != current,
            // Never observed: treat as changed so nothing is dropped.
            None => true,
        };
        fingerprints.insert(handle.id(), current);
        changed
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}
