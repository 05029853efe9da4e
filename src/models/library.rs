use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Macro nutrients per 100 g.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A user-defined food in the personal library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub per_100g: Macros,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, per_100g: Macros) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            per_100g,
        }
    }
}

/// Exercise preferences: favorites, per-exercise color tags, and
/// user-created exercises. Small and infrequently changing, so the sync
/// engine compares it structurally rather than by version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrefs {
    pub favorites: Vec<String>,
    pub color_tags: BTreeMap<String, String>,
    pub custom_exercises: Vec<String>,
}

impl ExercisePrefs {
    pub fn is_default(&self) -> bool {
        self.favorites.is_empty() && self.color_tags.is_empty() && self.custom_exercises.is_empty()
    }
}
