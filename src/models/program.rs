use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of a training program, e.g. "Push day" with its exercise list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDay {
    pub name: String,
    pub exercises: Vec<String>,
}

/// A reusable training program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub days: Vec<ProgramDay>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            days: Vec::new(),
        }
    }

    pub fn with_days(mut self, days: Vec<ProgramDay>) -> Self {
        self.days = days;
        self
    }
}

/// Assignment of one program day to a weekday (0 = Monday .. 6 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub weekday: u8,
    pub program_id: Uuid,
    pub day_index: usize,
}

impl ScheduleEntry {
    pub fn new(weekday: u8, program_id: Uuid, day_index: usize) -> Self {
        Self {
            weekday,
            program_id,
            day_index,
        }
    }
}
