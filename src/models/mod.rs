//! Domain models for the VitaTrack local stores.

mod chat;
mod diary;
mod library;
mod profile;
mod program;
mod workout;

pub use chat::{ChatMessage, ChatRole};
pub use diary::{DiaryDay, FoodEntry, Meal};
pub use library::{ExercisePrefs, FoodItem, Macros};
pub use profile::{FitnessGoal, Profile};
pub use program::{Program, ProgramDay, ScheduleEntry};
pub use workout::{ExerciseSet, WorkoutSession};
