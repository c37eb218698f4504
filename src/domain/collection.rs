use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Named collections in the embedded database. Every row in every collection
/// is keyed by a string `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Exercises,
    Programs,
    WorkoutLogs,
    Settings,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Exercises,
        Collection::Programs,
        Collection::WorkoutLogs,
        Collection::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Exercises => "exercises",
            Collection::Programs => "programs",
            Collection::WorkoutLogs => "workoutLogs",
            Collection::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = UnknownCollectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == value)
            .ok_or_else(|| UnknownCollectionError {
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCollectionError {
    value: String,
}

impl UnknownCollectionError {
    pub fn name(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for UnknownCollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown collection '{}': expected one of {}",
            self.value,
            Collection::ALL
                .iter()
                .map(|collection| collection.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for UnknownCollectionError {}

#[cfg(test)]
mod tests {
    use super::Collection;
    use std::str::FromStr;

    #[test]
    fn parses_every_fixed_collection_name() {
        for collection in Collection::ALL {
            assert_eq!(
                Collection::from_str(collection.as_str()).unwrap(),
                collection
            );
        }
    }

    #[test]
    fn collection_names_are_case_sensitive() {
        assert!(Collection::from_str("workoutLogs").is_ok());
        assert!(Collection::from_str("workoutlogs").is_err());
    }

    #[test]
    fn unknown_collection_error_lists_valid_names() {
        let err = Collection::from_str("bodyweight").unwrap_err();
        assert_eq!(err.name(), "bodyweight");
        let message = err.to_string();
        assert!(message.contains("bodyweight"));
        assert!(message.contains("exercises, programs, workoutLogs, settings"));
    }
}
