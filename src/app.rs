use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::binding::CollectionBinding;
use crate::catalog::ExerciseCatalog;
use crate::catalog::ProgramCatalog;
use crate::config::ConfigError;
use crate::domain::{
    normalize_optional, Collection, Exercise, ExercisePatch, NewExercise, Program, Setting,
    WorkoutLog,
};
use crate::history::History;
use crate::progress::{self, GroupedExercises, ProgressDeltas, ProgressPoint, TimeRange};
use crate::session::WorkoutSession;
use crate::store::{Database, StorageError};

/// Application root: owns the connection manager and hands it to every
/// binding it builds.
pub struct App {
    store: Arc<Database>,
    exercises: ExerciseCatalog,
    programs: ProgramCatalog,
    history: History,
    settings: CollectionBinding<Setting>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub exercise: Exercise,
    pub range: String,
    pub points: Vec<ProgressPoint>,
    pub deltas: ProgressDeltas,
}

impl App {
    pub fn open(db_path: &Path) -> Result<Self, AppError> {
        let store = Arc::new(Database::new(db_path.display().to_string()));
        store.init()?;

        let exercises = ExerciseCatalog::open(Arc::clone(&store));
        let mut programs = ProgramCatalog::open(Arc::clone(&store));
        programs.ensure_seeded();
        if let Some(message) = programs.error() {
            return Err(AppError::Rejected(format!(
                "failed to seed built-in programs: {message}"
            )));
        }
        let history = History::open(Arc::clone(&store));
        let settings = CollectionBinding::open(Arc::clone(&store), Collection::Settings.as_str());

        Ok(Self {
            store,
            exercises,
            programs,
            history,
            settings,
        })
    }

    pub fn store(&self) -> &Arc<Database> {
        &self.store
    }

    pub fn exercise_catalog(&self) -> &ExerciseCatalog {
        &self.exercises
    }

    pub fn program_catalog_mut(&mut self) -> &mut ProgramCatalog {
        &mut self.programs
    }

    pub fn new_session(&self) -> WorkoutSession {
        WorkoutSession::new(Arc::clone(&self.store))
    }

    pub fn list_exercises(&self, custom_only: bool) -> Vec<Exercise> {
        if custom_only {
            self.exercises.customs().to_vec()
        } else {
            self.exercises.items()
        }
    }

    pub fn show_exercise(&self, query: &str) -> Result<Exercise, AppError> {
        self.exercises
            .resolve(query)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("exercise '{query}'")))
    }

    pub fn add_exercise(&mut self, new: NewExercise) -> Result<Exercise, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "exercise name must not be empty".to_string(),
            ));
        }
        let id = self
            .exercises
            .create_with_id(new)
            .ok_or_else(|| rejected("create exercise", self.exercises.error()))?;
        self.exercises
            .find(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("exercise '{id}'")))
    }

    /// Apply `patch` to a custom exercise. A blank optional field clears it.
    pub fn edit_exercise(
        &mut self,
        query: &str,
        patch: ExercisePatch,
    ) -> Result<Exercise, AppError> {
        let exercise = self.show_exercise(query)?;
        if !exercise.is_custom {
            return Err(AppError::Rejected(format!(
                "exercise '{}' is built in and cannot be edited",
                exercise.id
            )));
        }
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(AppError::InvalidArgument(
                "exercise name must not be empty".to_string(),
            ));
        }
        let id = exercise.id.clone();
        let edited = Exercise {
            name: patch.name.unwrap_or(exercise.name),
            muscle_group: patch
                .muscle_group
                .map_or(exercise.muscle_group, |value| normalize_optional(Some(&value))),
            category: patch
                .category
                .map_or(exercise.category, |value| normalize_optional(Some(&value))),
            side: patch
                .side
                .map_or(exercise.side, |value| normalize_optional(Some(&value))),
            base_exercise: patch
                .base_exercise
                .map_or(exercise.base_exercise, |value| normalize_optional(Some(&value))),
            ..exercise
        };
        if !self.exercises.update(edited) {
            return Err(rejected("edit exercise", self.exercises.error()));
        }
        self.exercises
            .find(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("exercise '{id}'")))
    }

    pub fn remove_exercise(&mut self, query: &str) -> Result<Exercise, AppError> {
        let exercise = self.show_exercise(query)?;
        if !exercise.is_custom {
            return Err(AppError::Rejected(format!(
                "exercise '{}' is built in and cannot be removed",
                exercise.id
            )));
        }
        if !self.exercises.remove_exercise(&exercise.id) {
            return Err(rejected("remove exercise", self.exercises.error()));
        }
        Ok(exercise)
    }

    pub fn list_programs(&self) -> Vec<Program> {
        self.programs.items()
    }

    pub fn show_program(&self, id: &str) -> Result<Program, AppError> {
        self.programs
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("program '{id}'")))
    }

    pub fn new_program(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Program, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "program name must not be empty".to_string(),
            ));
        }
        let id = self
            .programs
            .create_with_id(name, description)
            .ok_or_else(|| rejected("create program", self.programs.error()))?;
        self.show_program(&id)
    }

    pub fn remove_program(&mut self, id: &str) -> Result<Program, AppError> {
        let program = self.show_program(id)?;
        if self.programs.is_builtin(id) {
            return Err(AppError::Rejected(format!(
                "program '{id}' is built in and cannot be removed"
            )));
        }
        if !self.programs.delete(id) {
            return Err(rejected("remove program", self.programs.error()));
        }
        Ok(program)
    }

    pub fn add_program_exercise(
        &mut self,
        program_id: &str,
        exercise_query: &str,
        target_sets: Option<u32>,
        target_reps: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Program, AppError> {
        self.ensure_editable_program(program_id)?;
        let exercise_id = self.show_exercise(exercise_query)?.id;
        if !self.programs.add_exercise_to_program(
            program_id,
            &exercise_id,
            target_sets,
            target_reps,
            notes,
        ) {
            return Err(rejected("add exercise to program", self.programs.error()));
        }
        self.show_program(program_id)
    }

    /// `position` is 1-based.
    pub fn remove_program_exercise(
        &mut self,
        program_id: &str,
        position: usize,
    ) -> Result<Program, AppError> {
        let program = self.ensure_editable_program(program_id)?;
        let index = position
            .checked_sub(1)
            .filter(|index| *index < program.exercises.len())
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "position {position} is out of range (program has {} exercise(s))",
                    program.exercises.len()
                ))
            })?;
        if !self.programs.remove_exercise_from_program(program_id, index) {
            return Err(rejected(
                "remove exercise from program",
                self.programs.error(),
            ));
        }
        self.show_program(program_id)
    }

    fn ensure_editable_program(&self, program_id: &str) -> Result<Program, AppError> {
        let program = self.show_program(program_id)?;
        if self.programs.is_builtin(program_id) {
            return Err(AppError::Rejected(format!(
                "program '{program_id}' is built in and cannot be edited"
            )));
        }
        Ok(program)
    }

    pub fn exercise_name(&self, id: &str) -> String {
        self.exercises.display_name(id)
    }

    pub fn list_workouts(&mut self) -> Vec<WorkoutLog> {
        self.history.refresh();
        self.history.logs()
    }

    pub fn show_workout(&mut self, id: &str) -> Result<WorkoutLog, AppError> {
        self.history
            .select(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("workout '{id}'")))
    }

    pub fn remove_workout(&mut self, id: &str) -> Result<WorkoutLog, AppError> {
        let workout = self.show_workout(id)?;
        if !self.history.delete(id) {
            return Err(rejected("remove workout", self.history.error()));
        }
        Ok(workout)
    }

    /// Delete one set from a stored workout. Positions are 1-based. An
    /// exercise left without sets is dropped, as on finish.
    pub fn remove_workout_set(
        &mut self,
        id: &str,
        exercise_position: usize,
        set_position: usize,
    ) -> Result<WorkoutLog, AppError> {
        let mut workout = self.show_workout(id)?;
        let exercise_index = exercise_position
            .checked_sub(1)
            .filter(|index| *index < workout.logged_exercises.len())
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "exercise {exercise_position} is out of range (workout has {} exercise(s))",
                    workout.logged_exercises.len()
                ))
            })?;
        let entry = &mut workout.logged_exercises[exercise_index];
        let set_index = set_position
            .checked_sub(1)
            .filter(|index| *index < entry.sets.len())
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "set {set_position} is out of range (exercise has {} set(s))",
                    entry.sets.len()
                ))
            })?;
        entry.sets.remove(set_index);
        if entry.sets.is_empty() {
            workout.logged_exercises.remove(exercise_index);
        }
        if !self.history.update(workout.clone()) {
            return Err(rejected("edit workout", self.history.error()));
        }
        Ok(workout)
    }

    pub fn export_workouts(&mut self) -> Result<String, AppError> {
        self.history.refresh();
        Ok(self.history.export_json()?)
    }

    pub fn progress(
        &mut self,
        exercise_query: &str,
        range: TimeRange,
        now: OffsetDateTime,
    ) -> Result<ProgressReport, AppError> {
        let exercise = self.show_exercise(exercise_query)?;
        self.history.refresh();
        let points = progress::daily_progress(self.history.raw(), Some(&exercise.id), range, now);
        let deltas = progress::deltas(&points);
        Ok(ProgressReport {
            exercise,
            range: range.to_string(),
            points,
            deltas,
        })
    }

    /// One point per stored workout containing the exercise, oldest first.
    pub fn workout_progress(&mut self, exercise_query: &str) -> Result<ProgressReport, AppError> {
        let exercise = self.show_exercise(exercise_query)?;
        self.history.refresh();
        let points = progress::exercise_progress(self.history.raw(), &exercise.id);
        let deltas = progress::deltas(&points);
        Ok(ProgressReport {
            exercise,
            range: "per-workout".to_string(),
            points,
            deltas,
        })
    }

    pub fn exercises_with_history(&mut self) -> GroupedExercises {
        self.history.refresh();
        progress::exercises_with_history(&self.exercises.items(), self.history.raw())
    }

    pub fn list_settings(&self) -> Vec<Setting> {
        let mut settings = self.settings.items().to_vec();
        settings.sort_by(|left, right| left.id.cmp(&right.id));
        settings
    }

    pub fn get_setting(&mut self, key: &str) -> Result<Setting, AppError> {
        self.settings
            .get(key)
            .ok_or_else(|| AppError::NotFound(format!("setting '{key}'")))
    }

    /// Store `raw` as JSON when it parses as JSON, otherwise as a string.
    pub fn set_setting(&mut self, key: &str, raw: &str) -> Result<Setting, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::InvalidArgument(
                "setting key must not be empty".to_string(),
            ));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        let setting = Setting {
            id: key.to_string(),
            value,
        };
        if !self.settings.save(&setting) {
            return Err(rejected("save setting", self.settings.error()));
        }
        Ok(setting)
    }
}

fn rejected(action: &str, error: Option<&str>) -> AppError {
    match error {
        Some(message) => AppError::Rejected(format!("{action} failed: {message}")),
        None => AppError::Rejected(format!("{action} was rejected")),
    }
}

#[derive(Debug)]
pub enum AppError {
    Storage(StorageError),
    Config(ConfigError),
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidArgument(String),
    NotFound(String),
    Rejected(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Json(err) => write!(f, "JSON error: {}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::Rejected(message) => write!(f, "{}", message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Storage(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound(_) => None,
            AppError::Rejected(_) => None,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        AppError::Storage(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Json(value)
    }
}

#[cfg(test)]
mod tests;
