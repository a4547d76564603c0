// Workout history handed to the persistence layer
//
// A finished session produces one WorkoutRecord. The player profile keeps
// records per exercise in memory; storing them is up to the caller, which is
// why everything here derives serde and nothing here touches the disk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseKind;

/// Outcome of one workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub exercise: ExerciseKind,
    /// Wall-clock time the workout finished (ms since the Unix epoch)
    pub recorded_at_ms: u64,
    /// Reps completed in each set, partial last set included
    pub set_reps: Vec<u32>,
}

impl WorkoutRecord {
    pub fn total_reps(&self) -> u32 {
        self.set_reps.iter().sum()
    }

    pub fn sets(&self) -> usize {
        self.set_reps.len()
    }
}

/// Player identity plus per-exercise workout history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    history: BTreeMap<ExerciseKind, Vec<WorkoutRecord>>,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: BTreeMap::new(),
        }
    }

    /// Append a record to its exercise's history
    pub fn add_record(&mut self, record: WorkoutRecord) {
        self.history.entry(record.exercise).or_default().push(record);
    }

    /// History for one exercise, oldest first
    pub fn records(&self, exercise: ExerciseKind) -> &[WorkoutRecord] {
        self.history
            .get(&exercise)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn latest(&self, exercise: ExerciseKind) -> Option<&WorkoutRecord> {
        self.records(exercise).last()
    }

    /// Reps across every recorded workout of an exercise
    pub fn lifetime_reps(&self, exercise: ExerciseKind) -> u32 {
        self.records(exercise).iter().map(WorkoutRecord::total_reps).sum()
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new("Player")
    }
}
