use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A workout template. The exercise list is ordered and may repeat an
/// exercise id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ProgramExercise>,
}

impl Record for Program {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramExercise {
    pub exercise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sets: Option<u32>,
    /// Free-form rep target such as "5", "8-12" or "max".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProgramExercise {
    pub fn new(exercise_id: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            target_sets: None,
            target_reps: None,
            notes: None,
        }
    }
}
