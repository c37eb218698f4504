use serde::{Deserialize, Serialize};

use crate::store::Record;

/// An exercise definition. Built-ins carry fixed kebab-case ids and are never
/// written to the store; custom rows get a generated id and `is_custom = true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_exercise: Option<String>,
}

impl Record for Exercise {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Attributes accepted when creating a custom exercise.
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub category: Option<String>,
    pub side: Option<String>,
    pub base_exercise: Option<String>,
}

impl NewExercise {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Field changes for a custom exercise. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub muscle_group: Option<String>,
    pub category: Option<String>,
    pub side: Option<String>,
    pub base_exercise: Option<String>,
}
