use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is training toward. Drives calorie target suggestions
/// elsewhere in the app; the sync engine only moves it around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    #[default]
    Maintain,
    LoseWeight,
    GainMuscle,
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessGoal::Maintain => write!(f, "maintain"),
            FitnessGoal::LoseWeight => write!(f, "lose weight"),
            FitnessGoal::GainMuscle => write!(f, "gain muscle"),
        }
    }
}

/// The user's profile document.
///
/// `onboarded` is set once the local onboarding flow completes. A profile
/// that has not finished onboarding counts as empty for bootstrap purposes,
/// and a remote profile without the flag is never imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: FitnessGoal,
    pub daily_calorie_target: Option<u32>,
    pub onboarded: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn with_goal(mut self, goal: FitnessGoal) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_body(mut self, height_cm: f64, weight_kg: f64) -> Self {
        self.height_cm = Some(height_cm);
        self.weight_kg = Some(weight_kg);
        self
    }

    /// Marks onboarding as complete and stamps the update time.
    pub fn complete_onboarding(mut self) -> Self {
        self.onboarded = true;
        self.updated_at = Some(Utc::now());
        self
    }
}
