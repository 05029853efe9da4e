//! Local store layer: independently persisted in-memory collections.
//!
//! Each store owns one kind of application data, hands out cloned
//! snapshots, and invokes subscriber callbacks synchronously on every
//! mutation. Mutations always go through [`Store::update`], which bumps a
//! monotonically increasing version counter; the sync engine relies on
//! that counter (not on pointer identity) to detect changes.

mod registry;

pub use registry::{Store, StoreRegistry, SubscriptionId};

use std::fmt;

use serde_json::Value;

use crate::error::SyncError;

/// Identity of one local collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreId {
    Profile,
    Diary,
    Workouts,
    Programs,
    Schedule,
    Chat,
    FoodLibrary,
    ExercisePrefs,
}

impl StoreId {
    /// All stores the standard registry wires up.
    pub fn all() -> [StoreId; 8] {
        [
            StoreId::Profile,
            StoreId::Diary,
            StoreId::Workouts,
            StoreId::Programs,
            StoreId::Schedule,
            StoreId::Chat,
            StoreId::FoodLibrary,
            StoreId::ExercisePrefs,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreId::Profile => "profile",
            StoreId::Diary => "diary",
            StoreId::Workouts => "workouts",
            StoreId::Programs => "programs",
            StoreId::Schedule => "schedule",
            StoreId::Chat => "chat",
            StoreId::FoodLibrary => "foodLibrary",
            StoreId::ExercisePrefs => "exercisePrefs",
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the change detector decides whether a store snapshot warrants a
/// remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStrategy {
    /// Version counter comparison. Used for the large composite stores
    /// where every mutation is significant.
    Versioned,
    /// Version counter plus key-set comparison, for the date-keyed maps.
    KeySet,
    /// Structural comparison of the serialized value, for small preference
    /// blobs where a mutation may not actually change anything.
    DeepEqual,
}

/// Type-erased view of a [`Store`], so the registry and the sync engine
/// can treat heterogeneous stores uniformly.
pub trait StoreHandle: Send + Sync {
    fn id(&self) -> StoreId;

    /// Current mutation counter. Bumped on every `update` and `replace`.
    fn version(&self) -> u64;

    /// Current state serialized to JSON.
    fn snapshot_value(&self) -> Value;

    /// Replaces local state wholesale. Bootstrap-only.
    fn replace_value(&self, value: Value) -> Result<(), SyncError>;

    /// Store-specific emptiness predicate, evaluated on current state.
    fn is_empty(&self) -> bool;

    /// Store-specific validity filter for remote data. A remote value that
    /// fails this is treated as absent.
    fn accepts_remote(&self, value: &Value) -> bool;

    fn change_strategy(&self) -> ChangeStrategy;

    /// Registers a mutation observer, invoked synchronously after every
    /// mutation commits.
    fn subscribe(&self, observer: Box<dyn Fn() + Send + Sync>) -> SubscriptionId;

    /// Removes a previously registered observer. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
