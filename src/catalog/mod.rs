//! Built-in catalog content merged with user-created rows.

pub mod builtin;
mod exercises;
mod programs;

pub use exercises::ExerciseCatalog;
pub use programs::ProgramCatalog;
