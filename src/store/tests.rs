use super::{Database, StorageError};
use crate::domain::{Exercise, LoggedExercise, Program, ProgramExercise, SetLog, WorkoutLog};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

fn unique_workspace() -> PathBuf {
    let root = std::env::temp_dir().join(format!("gymtrack-store-test-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&root).expect("temp workspace should be creatable");
    root
}

fn database_in(root: &std::path::Path) -> Database {
    Database::new(root.join("data/gymtrack.sqlite").display().to_string())
}

fn sample_exercise(id: &str) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: "Zercher Squat".to_string(),
        is_custom: true,
        muscle_group: Some("Legs".to_string()),
        category: Some("compound".to_string()),
        side: None,
        base_exercise: Some("squat".to_string()),
    }
}

#[test]
fn connect_is_lazy_and_opens_once() {
    let root = unique_workspace();
    let db = database_in(&root);
    assert!(!db.is_open());
    assert_eq!(db.open_count(), 0);

    db.connect().expect("connect should open");
    db.connect().expect("second connect should reuse connection");
    let _: Vec<Exercise> = db.get_all("exercises").expect("read should work");

    assert!(db.is_open());
    assert_eq!(db.open_count(), 1);
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn concurrent_first_callers_share_a_single_open() {
    let root = unique_workspace();
    let db = Arc::new(database_in(&root));

    let handles = (0..8)
        .map(|_| {
            let db = Arc::clone(&db);
            std::thread::spawn(move || db.connect())
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle
            .join()
            .expect("thread should not panic")
            .expect("connect should succeed");
    }

    assert_eq!(db.open_count(), 1);
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn close_clears_cache_and_next_operation_reopens() {
    let root = unique_workspace();
    let db = database_in(&root);
    db.init().expect("init should open");
    db.put("exercises", &sample_exercise("e1"))
        .expect("put should work");

    db.close();
    assert!(!db.is_open());

    let found: Option<Exercise> = db.get_by_id("exercises", "e1").expect("get should reopen");
    assert!(found.is_some());
    assert!(db.is_open());
    assert_eq!(db.open_count(), 2);
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn failed_open_is_not_cached_and_can_be_retried() {
    let root = unique_workspace();
    let blocker = root.join("data");
    std::fs::write(&blocker, "not a directory").expect("blocker file should be writable");
    let db = database_in(&root);

    let err = db.init().expect_err("open under a file path should fail");
    assert!(matches!(err, StorageError::Io(_)));
    assert!(!db.is_open());
    assert_eq!(db.open_count(), 0);

    std::fs::remove_file(&blocker).expect("blocker should be removable");
    db.init().expect("retry should open once the path is usable");
    assert!(db.is_open());
    assert_eq!(db.open_count(), 1);
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn unknown_collection_is_a_storage_error() {
    let root = unique_workspace();
    let db = database_in(&root);

    let err = db
        .put("bodyweight", &sample_exercise("e1"))
        .expect_err("unknown collection should fail");
    assert!(matches!(err, StorageError::UnknownCollection(_)));
    assert!(err.to_string().contains("bodyweight"));

    assert!(db.get_all::<Exercise>("Exercises").is_err());
    assert!(db.remove("nope", "e1").is_err());
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn put_then_get_round_trips_every_entity_shape() {
    let root = unique_workspace();
    let db = database_in(&root);

    let exercise = sample_exercise("e1");
    let stored = db.put("exercises", &exercise).expect("put should work");
    assert_eq!(stored, exercise);
    assert_eq!(
        db.get_by_id::<Exercise>("exercises", "e1")
            .expect("get should work"),
        Some(exercise)
    );

    let program = Program {
        id: "p1".to_string(),
        name: "Upper".to_string(),
        description: Some("bench day".to_string()),
        exercises: vec![
            ProgramExercise {
                target_sets: Some(3),
                target_reps: Some("8-12".to_string()),
                ..ProgramExercise::new("bench-press")
            },
            ProgramExercise {
                target_reps: Some("max".to_string()),
                notes: Some("strict".to_string()),
                ..ProgramExercise::new("pull-ups")
            },
            ProgramExercise::new("bench-press"),
        ],
    };
    db.put("programs", &program).expect("put should work");
    assert_eq!(
        db.get_by_id::<Program>("programs", "p1")
            .expect("get should work"),
        Some(program)
    );

    let log = WorkoutLog {
        id: "w1".to_string(),
        date: "2026-03-01T09:30:00Z".to_string(),
        logged_exercises: vec![LoggedExercise {
            exercise_id: "squat".to_string(),
            sets: vec![
                SetLog::new(102.5, 5),
                SetLog {
                    is_paused: Some(true),
                    is_slow_eccentric: Some(false),
                    ..SetLog::new(90.0, 8)
                },
            ],
        }],
        program_id: Some("p1".to_string()),
    };
    db.put("workoutLogs", &log).expect("put should work");
    assert_eq!(
        db.get_by_id::<WorkoutLog>("workoutLogs", "w1")
            .expect("get should work"),
        Some(log)
    );
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn put_upserts_by_id() {
    let root = unique_workspace();
    let db = database_in(&root);

    let mut exercise = sample_exercise("e1");
    db.put("exercises", &exercise).expect("put should work");
    exercise.name = "Safety Bar Squat".to_string();
    db.put("exercises", &exercise).expect("upsert should work");

    let all: Vec<Exercise> = db.get_all("exercises").expect("read should work");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Safety Bar Squat");
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn missing_rows_are_none_and_missing_deletes_succeed() {
    let root = unique_workspace();
    let db = database_in(&root);

    assert_eq!(
        db.get_by_id::<Exercise>("exercises", "absent")
            .expect("lookup should work"),
        None
    );
    db.remove("exercises", "absent")
        .expect("deleting a missing key should be a no-op");

    db.put("exercises", &sample_exercise("e1"))
        .expect("put should work");
    db.remove("exercises", "e1").expect("delete should work");
    assert!(db
        .get_all::<Exercise>("exercises")
        .expect("read should work")
        .is_empty());
    let _ = std::fs::remove_dir_all(root);
}
