use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which meal of the day a diary entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meal::Breakfast => write!(f, "breakfast"),
            Meal::Lunch => write!(f, "lunch"),
            Meal::Dinner => write!(f, "dinner"),
            Meal::Snack => write!(f, "snack"),
        }
    }
}

/// One logged food with its computed macros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub meal: Meal,
    pub grams: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl FoodEntry {
    pub fn new(name: impl Into<String>, meal: Meal, grams: f64, calories: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            meal,
            grams,
            calories,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
        }
    }

    pub fn with_macros(mut self, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fat_g = fat_g;
        self
    }
}

/// The nutrition diary for one calendar day. Stored remotely as one
/// document per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiaryDay {
    pub entries: Vec<FoodEntry>,
    pub water_ml: u32,
}

impl DiaryDay {
    pub fn total_calories(&self) -> f64 {
        self.entries.iter().map(|e| e.calories).sum()
    }
}
