use std::sync::Arc;

use tracing::{info, warn};

use super::builtin;
use crate::binding::CollectionBinding;
use crate::domain::{
    new_record_id, normalize_optional, Collection, LoggedExercise, Program, ProgramExercise,
};
use crate::store::Database;

/// Workout programs. Built-in programs are seeded into the `programs`
/// collection and are read-only afterwards; everything else is user-owned.
pub struct ProgramCatalog {
    builtins: Vec<Program>,
    programs: CollectionBinding<Program>,
}

impl ProgramCatalog {
    pub fn open(store: Arc<Database>) -> Self {
        Self {
            builtins: builtin::programs(),
            programs: CollectionBinding::open(store, Collection::Programs.as_str()),
        }
    }

    /// Write every built-in program that is missing from the store. Matching
    /// is by id, so running this repeatedly never duplicates rows. Returns the
    /// number of rows written.
    pub fn ensure_seeded(&mut self) -> usize {
        if !self.programs.load() {
            return 0;
        }
        let missing = self
            .builtins
            .iter()
            .filter(|program| !self.programs.items().iter().any(|row| row.id == program.id))
            .cloned()
            .collect::<Vec<_>>();

        let mut written = 0;
        for program in &missing {
            if self.programs.save(program) {
                written += 1;
            } else {
                warn!(id = %program.id, "failed to seed built-in program");
            }
        }
        if written > 0 {
            info!(written, "seeded built-in programs");
        }
        written
    }

    /// Persisted rows plus any built-ins not yet seeded, sorted by name.
    pub fn items(&self) -> Vec<Program> {
        let mut merged = self.programs.items().to_vec();
        for program in &self.builtins {
            if !merged.iter().any(|row| row.id == program.id) {
                merged.push(program.clone());
            }
        }
        merged.sort_by(|left, right| {
            left.name
                .to_lowercase()
                .cmp(&right.name.to_lowercase())
                .then_with(|| left.id.cmp(&right.id))
        });
        merged
    }

    pub fn loading(&self) -> bool {
        self.programs.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.programs.error()
    }

    pub fn reload(&mut self) -> bool {
        self.programs.load()
    }

    pub fn is_builtin(&self, id: &str) -> bool {
        builtin::is_builtin_program(id)
    }

    pub fn find(&self, id: &str) -> Option<Program> {
        self.programs
            .items()
            .iter()
            .chain(&self.builtins)
            .find(|program| program.id == id)
            .cloned()
    }

    pub fn create(&mut self, name: &str, description: Option<&str>) -> bool {
        self.create_with_id(name, description).is_some()
    }

    /// Returns the generated id on success. Blank names are rejected.
    pub fn create_with_id(&mut self, name: &str, description: Option<&str>) -> Option<String> {
        self.insert(name, description, Vec::new())
    }

    /// Replace a user program wholesale.
    pub fn update(&mut self, program: Program) -> bool {
        if program.name.trim().is_empty() || self.is_builtin(&program.id) {
            return false;
        }
        let program = Program {
            name: program.name.trim().to_string(),
            ..program
        };
        self.programs.save(&program)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.is_builtin(id) {
            return false;
        }
        self.programs.delete(id)
    }

    /// Append one exercise to a program using a whole-row read-modify-write.
    pub fn add_exercise_to_program(
        &mut self,
        program_id: &str,
        exercise_id: &str,
        target_sets: Option<u32>,
        target_reps: Option<&str>,
        notes: Option<&str>,
    ) -> bool {
        if self.is_builtin(program_id) {
            return false;
        }
        let Some(mut program) = self.programs.get(program_id) else {
            return false;
        };
        program.exercises.push(ProgramExercise {
            exercise_id: exercise_id.to_string(),
            target_sets,
            target_reps: normalize_optional(target_reps),
            notes: normalize_optional(notes),
        });
        self.programs.save(&program)
    }

    /// Remove the exercise at `index` in the program as it is stored right
    /// now. Out-of-range indices are refused.
    pub fn remove_exercise_from_program(&mut self, program_id: &str, index: usize) -> bool {
        if self.is_builtin(program_id) {
            return false;
        }
        let Some(mut program) = self.programs.get(program_id) else {
            return false;
        };
        if index >= program.exercises.len() {
            return false;
        }
        program.exercises.remove(index);
        self.programs.save(&program)
    }

    /// Turn a finished or in-progress workout into a reusable program. Each
    /// logged exercise becomes one entry with its set count as the target and
    /// the first set's reps as the rep target.
    pub fn save_workout_as_program(
        &mut self,
        name: &str,
        logged: &[LoggedExercise],
    ) -> Option<String> {
        let exercises = logged
            .iter()
            .map(|entry| ProgramExercise {
                target_sets: Some(u32::try_from(entry.sets.len()).unwrap_or(u32::MAX)),
                target_reps: entry.sets.first().map(|set| set.reps.to_string()),
                ..ProgramExercise::new(entry.exercise_id.clone())
            })
            .collect();
        self.insert(name, None, exercises)
    }

    fn insert(
        &mut self,
        name: &str,
        description: Option<&str>,
        exercises: Vec<ProgramExercise>,
    ) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let program = Program {
            id: new_record_id(),
            name: name.to_string(),
            description: normalize_optional(description),
            exercises,
        };
        if !self.programs.save(&program) {
            return None;
        }
        info!(id = %program.id, name = %program.name, "created program");
        Some(program.id)
    }
}
