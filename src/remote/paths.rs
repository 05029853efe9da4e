//! Logical path scheme for the remote document hierarchy.
//!
//! ```text
//! users/{uid}                          profile (one document)
//! users/{uid}/diary/{date}             one document per day
//! users/{uid}/workouts/{date}          one document per day
//! users/{uid}/settings/programs        one document each
//! users/{uid}/settings/schedule
//! users/{uid}/settings/chat
//! users/{uid}/settings/foodLibrary
//! users/{uid}/settings/exercisePrefs
//! ```

use crate::store::StoreId;

/// Where a store lives remotely: a single document, or one document per
/// key under a common prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTarget {
    Doc(String),
    Collection(String),
}

/// Maps a store to its remote location for the given user.
pub fn target(store: StoreId, uid: &str) -> DocTarget {
    match store {
        StoreId::Profile => DocTarget::Doc(format!("users/{uid}")),
        StoreId::Diary => DocTarget::Collection(format!("users/{uid}/diary")),
        StoreId::Workouts => DocTarget::Collection(format!("users/{uid}/workouts")),
        StoreId::Programs
        | StoreId::Schedule
        | StoreId::Chat
        | StoreId::FoodLibrary
        | StoreId::ExercisePrefs => {
            DocTarget::Doc(format!("users/{uid}/settings/{}", store.as_str()))
        }
    }
}

/// Path of one keyed document inside a collection prefix.
pub fn keyed(prefix: &str, key: &str) -> String {
    format!("{prefix}/{key}")
}
