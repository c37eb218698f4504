use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A workout as persisted in the `workoutLogs` collection. `date` is an
/// RFC 3339 UTC timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub logged_exercises: Vec<LoggedExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
}

impl Record for WorkoutLog {
    fn id(&self) -> &str {
        &self.id
    }
}

impl WorkoutLog {
    pub fn set_count(&self) -> usize {
        self.logged_exercises
            .iter()
            .map(|exercise| exercise.sets.len())
            .sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.logged_exercises
            .iter()
            .flat_map(|exercise| exercise.sets.iter())
            .map(SetLog::volume)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub exercise_id: String,
    #[serde(default)]
    pub sets: Vec<SetLog>,
}

impl LoggedExercise {
    pub fn empty(exercise_id: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            sets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_failure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_slow_eccentric: Option<bool>,
}

impl SetLog {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            weight,
            reps,
            is_failure: None,
            is_paused: None,
            is_slow_eccentric: None,
        }
    }

    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

#[cfg(test)]
mod tests {
    use super::{LoggedExercise, SetLog, WorkoutLog};

    #[test]
    fn serializes_with_camel_case_keys_and_omits_unset_flags() {
        let log = WorkoutLog {
            id: "w1".to_string(),
            date: "2026-01-05T10:00:00Z".to_string(),
            logged_exercises: vec![LoggedExercise {
                exercise_id: "squat".to_string(),
                sets: vec![SetLog {
                    is_failure: Some(true),
                    ..SetLog::new(100.0, 5)
                }],
            }],
            program_id: None,
        };

        let value = serde_json::to_value(&log).expect("log should serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "w1",
                "date": "2026-01-05T10:00:00Z",
                "loggedExercises": [{
                    "exerciseId": "squat",
                    "sets": [{"weight": 100.0, "reps": 5, "isFailure": true}]
                }]
            })
        );
    }

    #[test]
    fn totals_sum_across_exercises() {
        let log = WorkoutLog {
            id: "w2".to_string(),
            date: "2026-01-05T10:00:00Z".to_string(),
            logged_exercises: vec![
                LoggedExercise {
                    exercise_id: "squat".to_string(),
                    sets: vec![SetLog::new(100.0, 5), SetLog::new(100.0, 5)],
                },
                LoggedExercise {
                    exercise_id: "bench-press".to_string(),
                    sets: vec![SetLog::new(60.0, 8)],
                },
            ],
            program_id: Some("p1".to_string()),
        };
        assert_eq!(log.set_count(), 3);
        assert_eq!(log.total_volume(), 1480.0);
    }
}
