//! Derived progress metrics over stored workouts. Everything here is a pure
//! function of `WorkoutLog` rows; nothing is persisted.

use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::domain::{Exercise, SetLog, WorkoutLog};
use crate::history::parse_log_date;

pub const MAX_CHART_POINTS: usize = 60;

/// Epley estimate of a one-rep max. A set with no reps estimates nothing.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if reps == 0 {
        return 0.0;
    }
    epley(weight, reps)
}

/// Unguarded Epley formula used by the daily chart; zero reps yield `weight`.
pub fn epley(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + f64::from(reps) / 30.0)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub date: String,
    #[serde(rename = "estimated1RM")]
    pub estimated_one_rep_max: f64,
    pub max_weight: f64,
    pub total_volume: f64,
    pub total_reps: u32,
}

impl ProgressPoint {
    fn empty(date: String) -> Self {
        Self {
            date,
            estimated_one_rep_max: 0.0,
            max_weight: 0.0,
            total_volume: 0.0,
            total_reps: 0,
        }
    }

    fn absorb(&mut self, set: &SetLog, estimate: fn(f64, u32) -> f64) {
        self.estimated_one_rep_max = self
            .estimated_one_rep_max
            .max(estimate(set.weight, set.reps));
        self.max_weight = self.max_weight.max(set.weight);
        self.total_volume += set.volume();
        self.total_reps += set.reps;
    }
}

/// One point per workout that contains `exercise_id`, oldest first.
pub fn exercise_progress(logs: &[WorkoutLog], exercise_id: &str) -> Vec<ProgressPoint> {
    let mut points = logs
        .iter()
        .filter_map(|log| {
            let entry = log
                .logged_exercises
                .iter()
                .find(|entry| entry.exercise_id == exercise_id)?;
            let mut point = ProgressPoint::empty(log.date.clone());
            entry
                .sets
                .iter()
                .for_each(|set| point.absorb(set, estimate_one_rep_max));
            Some((parse_log_date(&log.date), point))
        })
        .collect::<Vec<_>>();
    points.sort_by(|(left, _), (right, _)| left.cmp(right));
    points.into_iter().map(|(_, point)| point).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    SevenDays,
    ThirtyDays,
    NinetyDays,
    OneYear,
    #[default]
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::SevenDays,
        TimeRange::ThirtyDays,
        TimeRange::NinetyDays,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::SevenDays => "7D",
            TimeRange::ThirtyDays => "30D",
            TimeRange::NinetyDays => "90D",
            TimeRange::OneYear => "1Y",
            TimeRange::All => "ALL",
        }
    }

    pub fn cutoff(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let days = match self {
            TimeRange::SevenDays => 7,
            TimeRange::ThirtyDays => 30,
            TimeRange::NinetyDays => 90,
            TimeRange::OneYear => 365,
            TimeRange::All => return None,
        };
        Some(now - Duration::days(days))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str() == normalized)
            .ok_or_else(|| ParseTimeRangeError {
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeRangeError {
    value: String,
}

impl fmt::Display for ParseTimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid time range '{}': expected one of {}",
            self.value,
            TimeRange::ALL
                .iter()
                .map(|range| range.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseTimeRangeError {}

/// Aggregate per UTC day inside `range`, optionally restricted to one
/// exercise. Days are keyed `YYYY-MM-DD`, sorted ascending and thinned to at
/// most `MAX_CHART_POINTS`.
pub fn daily_progress(
    logs: &[WorkoutLog],
    exercise_id: Option<&str>,
    range: TimeRange,
    now: OffsetDateTime,
) -> Vec<ProgressPoint> {
    let cutoff = range.cutoff(now);
    let mut days: BTreeMap<String, ProgressPoint> = BTreeMap::new();

    for log in logs {
        let Some(when) = parse_log_date(&log.date) else {
            continue;
        };
        if cutoff.is_some_and(|cutoff| when < cutoff) {
            continue;
        }
        let day = utc_day(when);
        let point = days
            .entry(day.clone())
            .or_insert_with(|| ProgressPoint::empty(day));
        for entry in &log.logged_exercises {
            if exercise_id.is_some_and(|wanted| wanted != entry.exercise_id) {
                continue;
            }
            entry.sets.iter().for_each(|set| point.absorb(set, epley));
        }
    }

    downsample(days.into_values().collect(), MAX_CHART_POINTS)
}

fn utc_day(when: OffsetDateTime) -> String {
    let date = when.to_offset(time::UtcOffset::UTC).date();
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn downsample<T>(points: Vec<T>, target: usize) -> Vec<T> {
    if points.len() <= target || target == 0 {
        return points;
    }
    let step = points.len() as f64 / target as f64;
    let picks = (0..target)
        .map(|index| (index as f64 * step).floor() as usize)
        .collect::<Vec<_>>();
    points
        .into_iter()
        .enumerate()
        .filter(|(index, _)| picks.contains(index))
        .map(|(_, point)| point)
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDeltas {
    pub one_rm: i64,
    pub max_weight: i64,
    pub volume: i64,
    pub reps: i64,
}

/// Rounded percentage change from the first point to the last.
pub fn deltas(points: &[ProgressPoint]) -> ProgressDeltas {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return ProgressDeltas::default();
    };
    if points.len() < 2 {
        return ProgressDeltas::default();
    }
    ProgressDeltas {
        one_rm: percent_change(first.estimated_one_rep_max, last.estimated_one_rep_max),
        max_weight: percent_change(first.max_weight, last.max_weight),
        volume: percent_change(first.total_volume, last.total_volume),
        reps: percent_change(f64::from(first.total_reps), f64::from(last.total_reps)),
    }
}

fn percent_change(from: f64, to: f64) -> i64 {
    if from == 0.0 {
        return 0;
    }
    (((to - from) / from) * 100.0).round() as i64
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistory {
    pub exercise: Exercise,
    pub workout_count: usize,
    pub has_data: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupedExercises {
    pub with_data: Vec<ExerciseHistory>,
    pub without_data: Vec<ExerciseHistory>,
}

/// Split exercises by whether any workout logged at least one set for them.
pub fn exercises_with_history(exercises: &[Exercise], logs: &[WorkoutLog]) -> GroupedExercises {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in logs.iter().flat_map(|log| log.logged_exercises.iter()) {
        if !entry.sets.is_empty() {
            *counts.entry(entry.exercise_id.as_str()).or_default() += 1;
        }
    }

    let (mut with_data, mut without_data): (Vec<_>, Vec<_>) = exercises
        .iter()
        .map(|exercise| {
            let workout_count = counts.get(exercise.id.as_str()).copied().unwrap_or(0);
            ExerciseHistory {
                exercise: exercise.clone(),
                workout_count,
                has_data: workout_count > 0,
            }
        })
        .partition(|entry| entry.has_data);

    with_data.sort_by(|left, right| right.workout_count.cmp(&left.workout_count));
    without_data.sort_by(|left, right| left.exercise.name.cmp(&right.exercise.name));
    GroupedExercises {
        with_data,
        without_data,
    }
}
