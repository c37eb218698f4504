use std::cmp::Reverse;
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::binding::CollectionBinding;
use crate::domain::{Collection, WorkoutLog};
use crate::store::Database;

/// Read and maintain finished workouts.
pub struct History {
    logs: CollectionBinding<WorkoutLog>,
    selected: Option<WorkoutLog>,
}

impl History {
    pub fn open(store: Arc<Database>) -> Self {
        Self {
            logs: CollectionBinding::open(store, Collection::WorkoutLogs.as_str()),
            selected: None,
        }
    }

    /// Every stored workout, newest first.
    pub fn logs(&self) -> Vec<WorkoutLog> {
        let mut logs = self.logs.items().to_vec();
        logs.sort_by_cached_key(|log| Reverse(date_key(&log.date)));
        logs
    }

    /// Unsorted snapshot, as stored.
    pub fn raw(&self) -> &[WorkoutLog] {
        self.logs.items()
    }

    pub fn loading(&self) -> bool {
        self.logs.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.logs.error()
    }

    pub fn refresh(&mut self) -> bool {
        self.logs.load()
    }

    pub fn select(&mut self, id: &str) -> Option<&WorkoutLog> {
        self.selected = self.logs.get(id);
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&WorkoutLog> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let deleted = self.logs.delete(id);
        if deleted && self.selected.as_ref().is_some_and(|log| log.id == id) {
            self.clear_selection();
        }
        deleted
    }

    /// Re-save an edited workout wholesale and select it.
    pub fn update(&mut self, log: WorkoutLog) -> bool {
        if !self.logs.save(&log) {
            return false;
        }
        self.selected = Some(log);
        true
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.logs.items())
    }
}

pub fn export_file_name(today: Date) -> String {
    format!(
        "gymtrack-export-{:04}-{:02}-{:02}.json",
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

pub fn parse_log_date(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

/// Total order for sorting: unparseable dates rank oldest, ties fall back
/// to the raw text.
fn date_key(raw: &str) -> (Option<OffsetDateTime>, String) {
    (parse_log_date(raw), raw.to_string())
}
