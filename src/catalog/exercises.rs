use std::sync::Arc;

use tracing::info;

use super::builtin;
use crate::binding::CollectionBinding;
use crate::domain::{new_record_id, normalize_optional, Collection, Exercise, NewExercise};
use crate::store::Database;

/// Built-in exercises merged with the user's custom rows.
pub struct ExerciseCatalog {
    builtins: Vec<Exercise>,
    customs: CollectionBinding<Exercise>,
}

impl ExerciseCatalog {
    pub fn open(store: Arc<Database>) -> Self {
        Self {
            builtins: builtin::exercises(),
            customs: CollectionBinding::open(store, Collection::Exercises.as_str()),
        }
    }

    /// Built-ins first, then custom rows in store order.
    pub fn items(&self) -> Vec<Exercise> {
        self.builtins
            .iter()
            .chain(self.customs.items())
            .cloned()
            .collect()
    }

    pub fn builtins(&self) -> &[Exercise] {
        &self.builtins
    }

    pub fn customs(&self) -> &[Exercise] {
        self.customs.items()
    }

    pub fn loading(&self) -> bool {
        self.customs.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.customs.error()
    }

    pub fn reload(&mut self) -> bool {
        self.customs.load()
    }

    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.builtins
            .iter()
            .chain(self.customs.items())
            .find(|exercise| exercise.id == id)
    }

    /// Exact id match first, then a case-insensitive name match.
    pub fn resolve(&self, query: &str) -> Option<&Exercise> {
        let query = query.trim();
        self.find(query).or_else(|| {
            self.builtins
                .iter()
                .chain(self.customs.items())
                .find(|exercise| exercise.name.eq_ignore_ascii_case(query))
        })
    }

    pub fn display_name(&self, id: &str) -> String {
        self.find(id)
            .map_or_else(|| id.to_string(), |exercise| exercise.name.clone())
    }

    pub fn create(&mut self, new: NewExercise) -> bool {
        self.create_with_id(new).is_some()
    }

    /// Returns the generated id on success. Blank names are rejected.
    pub fn create_with_id(&mut self, new: NewExercise) -> Option<String> {
        let name = new.name.trim();
        if name.is_empty() {
            return None;
        }

        let exercise = Exercise {
            id: new_record_id(),
            name: name.to_string(),
            is_custom: true,
            muscle_group: normalize_optional(new.muscle_group.as_deref()),
            category: normalize_optional(new.category.as_deref()),
            side: normalize_optional(new.side.as_deref()),
            base_exercise: normalize_optional(new.base_exercise.as_deref()),
        };
        if !self.customs.save(&exercise) {
            return None;
        }
        info!(id = %exercise.id, name = %exercise.name, "created custom exercise");
        Some(exercise.id)
    }

    /// Replace a custom exercise wholesale. Built-ins are immutable.
    pub fn update(&mut self, exercise: Exercise) -> bool {
        if exercise.name.trim().is_empty() || !self.is_custom(&exercise.id) {
            return false;
        }
        let exercise = Exercise {
            name: exercise.name.trim().to_string(),
            is_custom: true,
            ..exercise
        };
        self.customs.save(&exercise)
    }

    /// Delete a custom exercise. Anything not present in the merged list, or
    /// present but not marked custom, is refused.
    pub fn remove_exercise(&mut self, id: &str) -> bool {
        if !self.is_custom(id) {
            return false;
        }
        self.customs.delete(id)
    }

    fn is_custom(&self, id: &str) -> bool {
        self.find(id).is_some_and(|exercise| exercise.is_custom)
    }
}
