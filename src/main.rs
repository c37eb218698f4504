mod app;
mod binding;
mod catalog;
mod cli;
mod config;
mod db;
mod domain;
mod history;
mod logging;
mod progress;
mod session;
mod shell;
mod store;
mod ui;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use time::OffsetDateTime;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::{
        Commands, ExerciseSubcommands, HistorySubcommands, ProgramSubcommands,
        SettingsSubcommands,
    };

    let cli = cli::Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        cli::write_completions(args.shell, &mut io::stdout().lock());
        return Ok(());
    }

    let config = config::AppConfig::load(cli.config.as_deref())?;
    logging::init_logging(
        &logging::LogConfig::from_verbosity(config.log_level, cli.verbose)
            .with_format(cli.log_format.unwrap_or(config.log_format)),
    );
    let db_path = config::resolve_db_path(cli.db.as_deref(), &config);
    tracing::debug!(db_path = %db_path.display(), "opening database");
    let mut app = app::App::open(&db_path)?;

    match cli.command {
        Commands::Exercise(args) => match args.command {
            ExerciseSubcommands::Ls(list) => {
                let exercises = app.list_exercises(list.custom);
                if list.json {
                    print_json(&exercises);
                } else {
                    ui::print_exercise_list(&exercises);
                }
            }
            ExerciseSubcommands::Add(add) => {
                let exercise = app.add_exercise(domain::NewExercise {
                    name: add.name,
                    muscle_group: add.muscle_group,
                    category: add.category,
                    side: add.side,
                    base_exercise: add.base_exercise,
                })?;
                println!("created exercise {} {}", exercise.id, exercise.name);
            }
            ExerciseSubcommands::Edit(edit) => {
                let exercise = app.edit_exercise(
                    &edit.id,
                    domain::ExercisePatch {
                        name: edit.name,
                        muscle_group: edit.muscle_group,
                        category: edit.category,
                        side: edit.side,
                        base_exercise: edit.base_exercise,
                    },
                )?;
                ui::print_exercise(&exercise);
            }
            ExerciseSubcommands::Rm(target) => {
                let exercise = app.remove_exercise(&target.id)?;
                println!("removed exercise {} {}", exercise.id, exercise.name);
            }
            ExerciseSubcommands::Show(target) => {
                ui::print_exercise(&app.show_exercise(&target.id)?);
            }
        },
        Commands::Program(args) => match args.command {
            ProgramSubcommands::Ls(list) => {
                let programs = app.list_programs();
                if list.json {
                    print_json(&programs);
                } else {
                    ui::print_program_list(&programs, catalog::builtin::is_builtin_program);
                }
            }
            ProgramSubcommands::Show(target) => {
                let program = app.show_program(&target.id)?;
                ui::print_program(&program, |id| app.exercise_name(id));
            }
            ProgramSubcommands::New(new) => {
                let program = app.new_program(&new.name, new.description.as_deref())?;
                println!("created program {} {}", program.id, program.name);
            }
            ProgramSubcommands::Rm(target) => {
                let program = app.remove_program(&target.id)?;
                println!("removed program {} {}", program.id, program.name);
            }
            ProgramSubcommands::AddExercise(add) => {
                let program = app.add_program_exercise(
                    &add.program,
                    &add.exercise,
                    add.sets,
                    add.reps.as_deref(),
                    add.notes.as_deref(),
                )?;
                ui::print_program(&program, |id| app.exercise_name(id));
            }
            ProgramSubcommands::RmExercise(rm) => {
                let program = app.remove_program_exercise(&rm.program, rm.position)?;
                ui::print_program(&program, |id| app.exercise_name(id));
            }
        },
        Commands::Workout(args) => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal().then_some("gymtrack> ");
            let mut stdout = io::stdout().lock();
            shell::run_workout_shell(
                &mut app,
                args.program.as_deref(),
                stdin.lock(),
                &mut stdout,
                prompt,
            )?;
        }
        Commands::History(args) => match args.command {
            HistorySubcommands::Ls(list) => {
                let workouts = app.list_workouts();
                if list.json {
                    print_json(&workouts);
                } else {
                    ui::print_workout_list(&workouts);
                }
            }
            HistorySubcommands::Show(target) => {
                let workout = app.show_workout(&target.id)?;
                ui::print_workout(&workout, |id| app.exercise_name(id));
            }
            HistorySubcommands::Rm(target) => {
                let workout = app.remove_workout(&target.id)?;
                println!("removed workout {} from {}", workout.id, workout.date);
            }
            HistorySubcommands::RmSet(rm) => {
                let workout = app.remove_workout_set(&rm.workout, rm.exercise, rm.set)?;
                ui::print_workout(&workout, |id| app.exercise_name(id));
            }
            HistorySubcommands::Export(export) => {
                let json = app.export_workouts()?;
                let out = export.out.unwrap_or_else(|| {
                    PathBuf::from(history::export_file_name(OffsetDateTime::now_utc().date()))
                });
                if out.as_os_str() == "-" {
                    println!("{json}");
                } else {
                    std::fs::write(&out, format!("{json}\n"))?;
                    println!("exported workouts to {}", out.display());
                }
            }
        },
        Commands::Progress(args) => match args.exercise.as_deref() {
            Some(exercise) => {
                let report = if args.per_workout {
                    app.workout_progress(exercise)?
                } else {
                    let range = args.range.unwrap_or(config.default_range);
                    app.progress(exercise, range, OffsetDateTime::now_utc())?
                };
                if args.json {
                    print_json(&report);
                } else {
                    ui::print_progress(&report);
                }
            }
            None => {
                let groups = app.exercises_with_history();
                if args.json {
                    print_json(&groups);
                } else {
                    ui::print_exercise_groups(&groups);
                }
            }
        },
        Commands::Settings(args) => match args.command {
            SettingsSubcommands::Ls => ui::print_settings(&app.list_settings()),
            SettingsSubcommands::Get(get) => print_json(&app.get_setting(&get.key)?.value),
            SettingsSubcommands::Set(set) => {
                let setting = app.set_setting(&set.key, &set.value)?;
                println!("{} = {}", setting.id, setting.value);
            }
        },
        Commands::Completions(_) => unreachable!("completions are handled before opening the app"),
    }

    app.store().close();
    Ok(())
}
