use super::{App, AppError};
use crate::catalog::builtin;
use crate::domain::{ExercisePatch, NewExercise, SetLog};
use crate::progress::TimeRange;
use serde_json::json;
use std::path::PathBuf;
use time::OffsetDateTime;
use uuid::Uuid;

fn unique_workspace() -> PathBuf {
    let root = std::env::temp_dir().join(format!("gymtrack-app-test-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&root).expect("temp workspace should be creatable");
    root
}

fn open_app(root: &std::path::Path) -> App {
    App::open(&root.join("data/gymtrack.sqlite")).expect("app should open")
}

#[test]
fn open_creates_the_database_and_seeds_programs_once() {
    let root = unique_workspace();
    let app = open_app(&root);
    assert!(root.join("data/gymtrack.sqlite").exists());
    assert!(app.store().is_open());
    assert_eq!(app.list_programs().len(), builtin::programs().len());
    drop(app);

    let reopened = open_app(&root);
    assert_eq!(reopened.list_programs().len(), builtin::programs().len());
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn open_fails_when_the_parent_is_a_file() {
    let root = unique_workspace();
    std::fs::write(root.join("data"), "blocker").expect("blocker should be writable");
    let result = App::open(&root.join("data/gymtrack.sqlite"));
    assert!(matches!(result, Err(AppError::Storage(_))));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn exercise_commands_guard_builtins() {
    let root = unique_workspace();
    let mut app = open_app(&root);

    assert!(matches!(
        app.add_exercise(NewExercise::named("  ")),
        Err(AppError::InvalidArgument(_))
    ));
    let created = app
        .add_exercise(NewExercise {
            muscle_group: Some("Legs".to_string()),
            ..NewExercise::named("Belt Squat")
        })
        .expect("custom exercise should be created");
    assert!(created.is_custom);
    assert_eq!(app.list_exercises(true), vec![created.clone()]);
    assert_eq!(app.show_exercise("belt squat").expect("resolvable").id, created.id);

    assert!(matches!(
        app.remove_exercise("squat"),
        Err(AppError::Rejected(_))
    ));
    assert!(matches!(
        app.remove_exercise("nope"),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(app.remove_exercise(&created.id).expect("removable").id, created.id);
    assert!(app.list_exercises(true).is_empty());
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn program_commands_use_one_based_positions() {
    let root = unique_workspace();
    let mut app = open_app(&root);

    let program = app
        .new_program("Upper", Some("heavy"))
        .expect("program should be created");
    app.add_program_exercise(&program.id, "Bench Press", Some(3), Some("5"), None)
        .expect("bench should be added");
    let updated = app
        .add_program_exercise(&program.id, "pull-ups", None, None, Some("strict"))
        .expect("pull-ups should be added");
    assert_eq!(updated.exercises[0].exercise_id, "bench-press");

    assert!(matches!(
        app.remove_program_exercise(&program.id, 0),
        Err(AppError::InvalidArgument(_))
    ));
    assert!(matches!(
        app.remove_program_exercise(&program.id, 3),
        Err(AppError::InvalidArgument(_))
    ));
    let trimmed = app
        .remove_program_exercise(&program.id, 1)
        .expect("first exercise should be removed");
    assert_eq!(trimmed.exercises.len(), 1);
    assert_eq!(trimmed.exercises[0].exercise_id, "pull-ups");

    assert!(matches!(
        app.add_program_exercise(&program.id, "not an exercise", None, None, None),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        app.add_program_exercise("builtin-push", "squat", None, None, None),
        Err(AppError::Rejected(_))
    ));
    assert!(matches!(
        app.remove_program("builtin-legs"),
        Err(AppError::Rejected(_))
    ));
    app.remove_program(&program.id).expect("program should be removed");
    assert!(matches!(
        app.show_program(&program.id),
        Err(AppError::NotFound(_))
    ));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn finished_sessions_show_up_in_history_and_progress() {
    let root = unique_workspace();
    let mut app = open_app(&root);

    let mut session = app.new_session();
    session.start(None);
    session.add_exercise("squat");
    session.log_set(0, SetLog::new(100.0, 5));
    session.log_set(0, SetLog::new(105.0, 3));
    assert!(session.finish());

    let workouts = app.list_workouts();
    assert_eq!(workouts.len(), 1);
    let id = workouts[0].id.clone();
    assert_eq!(app.show_workout(&id).expect("workout exists").set_count(), 2);

    let report = app
        .progress("Squat", TimeRange::ThirtyDays, OffsetDateTime::now_utc())
        .expect("progress should compute");
    assert_eq!(report.exercise.id, "squat");
    assert_eq!(report.range, "30D");
    assert_eq!(report.points.len(), 1);
    assert_eq!(report.points[0].max_weight, 105.0);

    let grouped = app.exercises_with_history();
    assert_eq!(grouped.with_data.len(), 1);
    assert_eq!(grouped.with_data[0].exercise.id, "squat");

    let exported = app.export_workouts().expect("export should work");
    assert!(exported.contains(&id));

    app.remove_workout(&id).expect("workout should be removed");
    assert!(app.list_workouts().is_empty());
    assert!(matches!(app.show_workout(&id), Err(AppError::NotFound(_))));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn settings_store_json_or_plain_strings() {
    let root = unique_workspace();
    let mut app = open_app(&root);

    assert_eq!(
        app.set_setting("units", "kg").expect("set should work").value,
        json!("kg")
    );
    assert_eq!(
        app.set_setting("restSeconds", "90").expect("set should work").value,
        json!(90)
    );
    assert_eq!(
        app.get_setting("restSeconds").expect("setting exists").value,
        json!(90)
    );
    let keys = app
        .list_settings()
        .into_iter()
        .map(|setting| setting.id)
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["restSeconds", "units"]);
    assert!(matches!(app.get_setting("theme"), Err(AppError::NotFound(_))));
    assert!(matches!(
        app.set_setting(" ", "x"),
        Err(AppError::InvalidArgument(_))
    ));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn custom_exercises_can_be_edited_field_by_field() {
    let root = unique_workspace();
    let mut app = open_app(&root);
    let created = app
        .add_exercise(NewExercise {
            muscle_group: Some("Legs".to_string()),
            side: Some("left".to_string()),
            ..NewExercise::named("Belt Squat")
        })
        .expect("custom exercise should be created");

    let edited = app
        .edit_exercise(
            &created.id,
            ExercisePatch {
                name: Some(" Hip Belt Squat ".to_string()),
                side: Some(String::new()),
                ..ExercisePatch::default()
            },
        )
        .expect("custom exercise should be editable");
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.name, "Hip Belt Squat");
    assert_eq!(edited.muscle_group.as_deref(), Some("Legs"));
    assert!(edited.side.is_none());
    assert!(edited.is_custom);

    assert!(matches!(
        app.edit_exercise(
            &created.id,
            ExercisePatch {
                name: Some("   ".to_string()),
                ..ExercisePatch::default()
            }
        ),
        Err(AppError::InvalidArgument(_))
    ));
    assert!(matches!(
        app.edit_exercise("squat", ExercisePatch::default()),
        Err(AppError::Rejected(_))
    ));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn stored_workouts_can_lose_single_sets() {
    let root = unique_workspace();
    let mut app = open_app(&root);

    let mut session = app.new_session();
    session.start(None);
    session.add_exercise("squat");
    session.log_set(0, SetLog::new(100.0, 5));
    session.log_set(0, SetLog::new(110.0, 3));
    session.add_exercise("plank");
    session.log_set(1, SetLog::new(0.0, 60));
    assert!(session.finish());
    let id = app.list_workouts()[0].id.clone();

    assert!(matches!(
        app.remove_workout_set(&id, 3, 1),
        Err(AppError::InvalidArgument(_))
    ));
    assert!(matches!(
        app.remove_workout_set(&id, 1, 0),
        Err(AppError::InvalidArgument(_))
    ));

    let edited = app.remove_workout_set(&id, 1, 1).expect("set should be removed");
    assert_eq!(edited.logged_exercises[0].sets, vec![SetLog::new(110.0, 3)]);

    let edited = app.remove_workout_set(&id, 2, 1).expect("set should be removed");
    assert_eq!(edited.logged_exercises.len(), 1);
    assert_eq!(edited.logged_exercises[0].exercise_id, "squat");

    assert_eq!(app.list_workouts().len(), 1);
    let stored = app.show_workout(&id).expect("workout still exists");
    assert_eq!(stored, edited);

    let report = app.workout_progress("squat").expect("progress should compute");
    assert_eq!(report.range, "per-workout");
    assert_eq!(report.points.len(), 1);
    assert_eq!(report.points[0].max_weight, 110.0);
    let _ = std::fs::remove_dir_all(root);
}
