use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One performed set within a workout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub exercise: String,
    pub reps: u32,
    pub weight_kg: f64,
}

impl ExerciseSet {
    pub fn new(exercise: impl Into<String>, reps: u32, weight_kg: f64) -> Self {
        Self {
            exercise: exercise.into(),
            reps,
            weight_kg,
        }
    }
}

/// A completed (or in-progress) workout. The day's sessions are stored
/// remotely as one document per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub program_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub duration_min: Option<u32>,
    pub sets: Vec<ExerciseSet>,
    pub notes: Option<String>,
}

impl WorkoutSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            program_id: None,
            started_at: Utc::now(),
            duration_min: None,
            sets: Vec::new(),
            notes: None,
        }
    }

    pub fn with_program(mut self, program_id: Uuid) -> Self {
        self.program_id = Some(program_id);
        self
    }

    pub fn with_sets(mut self, sets: Vec<ExerciseSet>) -> Self {
        self.sets = sets;
        self
    }
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new()
    }
}
