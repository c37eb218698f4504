//! The in-progress workout.
//!
//! A session holds at most one draft `WorkoutLog`. Every edit goes through
//! `&mut self`, so the draft has a single writer and edits apply in call
//! order. Nothing reaches the store until `finish`, which writes the pruned
//! draft in one put and only then clears it.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::binding::CollectionBinding;
use crate::domain::{
    new_record_id, now_utc_rfc3339, Collection, LoggedExercise, Program, SetLog, WorkoutLog,
};
use crate::store::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSummary {
    pub exercises: usize,
    pub exercises_with_sets: usize,
    pub sets: usize,
    pub volume: f64,
}

pub struct WorkoutSession {
    logs: CollectionBinding<WorkoutLog>,
    programs: CollectionBinding<Program>,
    draft: Option<WorkoutLog>,
    active_index: usize,
}

impl WorkoutSession {
    pub fn new(store: Arc<Database>) -> Self {
        Self {
            logs: CollectionBinding::new(Arc::clone(&store), Collection::WorkoutLogs.as_str()),
            programs: CollectionBinding::new(store, Collection::Programs.as_str()),
            draft: None,
            active_index: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.draft.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn current_workout(&self) -> Option<&WorkoutLog> {
        self.draft.as_ref()
    }

    pub fn active_exercise_index(&self) -> usize {
        self.active_index
    }

    /// The exercise under the cursor, if any.
    pub fn active_exercise(&self) -> Option<&LoggedExercise> {
        self.draft
            .as_ref()
            .and_then(|draft| draft.logged_exercises.get(self.active_index))
    }

    /// Last storage failure seen while finishing or loading a program.
    pub fn last_error(&self) -> Option<&str> {
        self.logs.error().or(self.programs.error())
    }

    /// Begin a new empty draft. An unfinished draft is replaced.
    pub fn start(&mut self, program_id: Option<&str>) -> &WorkoutLog {
        if let Some(previous) = &self.draft {
            warn!(id = %previous.id, "replacing unfinished workout draft");
        }
        let draft = WorkoutLog {
            id: new_record_id(),
            date: now_utc_rfc3339(),
            logged_exercises: Vec::new(),
            program_id: program_id.map(str::to_string),
        };
        info!(id = %draft.id, program_id = ?draft.program_id, "started workout");
        self.active_index = 0;
        self.draft.insert(draft)
    }

    /// Begin a draft pre-filled with one empty entry per program exercise, in
    /// program order. Returns `None` and stays as-is if the program is missing.
    pub fn start_from_program(&mut self, program_id: &str) -> Option<&WorkoutLog> {
        let Some(program) = self.programs.get(program_id) else {
            warn!(program_id, "program not found; workout not started");
            return None;
        };

        self.start(Some(program_id));
        let draft = self.draft.as_mut()?;
        draft.logged_exercises = program
            .exercises
            .iter()
            .map(|entry| LoggedExercise::empty(entry.exercise_id.clone()))
            .collect();
        debug!(
            program_id,
            exercises = draft.logged_exercises.len(),
            "seeded workout from program"
        );
        self.draft.as_ref()
    }

    /// Append an exercise and move the cursor onto it.
    pub fn add_exercise(&mut self, exercise_id: &str) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        draft
            .logged_exercises
            .push(LoggedExercise::empty(exercise_id));
        self.active_index = draft.logged_exercises.len() - 1;
        true
    }

    pub fn log_set(&mut self, exercise_index: usize, set: SetLog) -> bool {
        let Some(exercise) = self
            .draft
            .as_mut()
            .and_then(|draft| draft.logged_exercises.get_mut(exercise_index))
        else {
            return false;
        };
        exercise.sets.push(set);
        true
    }

    /// Remove one set; later sets shift down.
    pub fn delete_set(&mut self, exercise_index: usize, set_index: usize) -> bool {
        let Some(exercise) = self
            .draft
            .as_mut()
            .and_then(|draft| draft.logged_exercises.get_mut(exercise_index))
        else {
            return false;
        };
        if set_index >= exercise.sets.len() {
            return false;
        }
        exercise.sets.remove(set_index);
        true
    }

    pub fn next_exercise(&mut self) -> bool {
        let Some(draft) = self.draft.as_ref() else {
            return false;
        };
        if self.active_index + 1 >= draft.logged_exercises.len() {
            return false;
        }
        self.active_index += 1;
        true
    }

    pub fn previous_exercise(&mut self) -> bool {
        if self.draft.is_none() || self.active_index == 0 {
            return false;
        }
        self.active_index -= 1;
        true
    }

    /// Persist the draft with empty exercises dropped. On a storage failure
    /// the draft is kept untouched so the caller can retry.
    pub fn finish(&mut self) -> bool {
        let Some(draft) = self.draft.as_ref() else {
            return false;
        };
        let committed = WorkoutLog {
            logged_exercises: draft
                .logged_exercises
                .iter()
                .filter(|exercise| !exercise.sets.is_empty())
                .cloned()
                .collect(),
            ..draft.clone()
        };

        if !self.logs.save(&committed) {
            warn!(
                id = %committed.id,
                error = self.logs.error().unwrap_or("unknown"),
                "failed to save workout; draft kept"
            );
            return false;
        }

        info!(
            id = %committed.id,
            exercises = committed.logged_exercises.len(),
            sets = committed.set_count(),
            "finished workout"
        );
        self.draft = None;
        self.active_index = 0;
        true
    }

    /// Drop the draft without saving anything.
    pub fn discard(&mut self) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        info!(id = %draft.id, "discarded workout");
        self.active_index = 0;
        true
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.draft.as_ref().map(|draft| SessionSummary {
            exercises: draft.logged_exercises.len(),
            exercises_with_sets: draft
                .logged_exercises
                .iter()
                .filter(|exercise| !exercise.sets.is_empty())
                .count(),
            sets: draft.set_count(),
            volume: draft.total_volume(),
        })
    }
}
