pub mod collection;
pub mod exercise;
pub mod program;
pub mod setting;
pub mod workout;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

pub use collection::Collection;
pub use exercise::{Exercise, ExercisePatch, NewExercise};
pub use program::{Program, ProgramExercise};
pub use setting::Setting;
pub use workout::{LoggedExercise, SetLog, WorkoutLog};

pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn now_utc_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("RFC3339 formatting for UTC timestamp should never fail")
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
