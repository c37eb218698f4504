use std::io::Write;
use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::builder::PossibleValue;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::logging::LogFormat;
use crate::progress::TimeRange;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

/// Completion scripts carry the fixed value sets (ranges, log formats).
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut styled_command(), "gymtrack", out);
}

#[derive(Debug, Parser)]
#[command(name = "gymtrack")]
#[command(bin_name = "gymtrack")]
#[command(version)]
#[command(about = "A local-first workout tracker")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        global = true,
        env = "GYMTRACK_DB_PATH",
        help = "Path to the SQLite database (defaults to ~/.gymtrack/gymtrack.sqlite)."
    )]
    pub db: Option<String>,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = "GYMTRACK_CONFIG",
        help = "Path to a config.toml (defaults to $XDG_CONFIG_HOME/gymtrack/config.toml)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Raise log verbosity (repeatable)."
    )]
    pub verbose: u8,

    #[arg(
        long = "log-format",
        global = true,
        value_enum,
        ignore_case = true,
        help = "Log format on stderr."
    )]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

impl ValueEnum for LogFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[LogFormat::Pretty, LogFormat::Compact, LogFormat::Json]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.as_str()))
    }
}

impl ValueEnum for TimeRange {
    fn value_variants<'a>() -> &'a [Self] {
        &TimeRange::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let help = match self {
            TimeRange::SevenDays => "last 7 days",
            TimeRange::ThirtyDays => "last 30 days",
            TimeRange::NinetyDays => "last 90 days",
            TimeRange::OneYear => "last 365 days",
            TimeRange::All => "every logged workout",
        };
        Some(PossibleValue::new(self.as_str()).help(help))
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Browse and manage exercises.")]
    Exercise(ExerciseArgs),
    #[command(about = "Browse and manage programs.")]
    Program(ProgramArgs),
    #[command(about = "Log a workout interactively from stdin.")]
    Workout(WorkoutArgs),
    #[command(about = "Review, delete, or export finished workouts.")]
    History(HistoryArgs),
    #[command(about = "Show progress for one exercise, or which exercises have data.")]
    Progress(ProgressArgs),
    #[command(about = "Read and write stored settings.")]
    Settings(SettingsArgs),
    #[command(about = "Print a shell completion script.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ExerciseArgs {
    #[command(subcommand)]
    pub command: ExerciseSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ExerciseSubcommands {
    #[command(about = "List built-in and custom exercises.")]
    Ls(ExerciseListArgs),
    #[command(about = "Create a custom exercise.")]
    Add(ExerciseAddArgs),
    #[command(about = "Change fields of a custom exercise.")]
    Edit(ExerciseEditArgs),
    #[command(about = "Delete a custom exercise.")]
    Rm(IdArgs),
    #[command(about = "Show one exercise by id or name.")]
    Show(IdArgs),
}

#[derive(Debug, Args)]
pub struct ExerciseListArgs {
    #[arg(long, help = "Only list custom exercises.")]
    pub custom: bool,

    #[arg(long, help = "Print JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExerciseAddArgs {
    #[arg(help = "Exercise name.")]
    pub name: String,

    #[arg(short = 'm', long = "muscle-group", help = "Muscle group, e.g. Legs.")]
    pub muscle_group: Option<String>,

    #[arg(short = 'k', long, help = "Category: compound, isolation, or bodyweight.")]
    pub category: Option<String>,

    #[arg(long, help = "Side, e.g. left or right.")]
    pub side: Option<String>,

    #[arg(long = "base", help = "Id of the exercise this one varies.")]
    pub base_exercise: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExerciseEditArgs {
    #[arg(help = "Exercise id or name.")]
    pub id: String,

    #[arg(long, help = "New name.")]
    pub name: Option<String>,

    #[arg(short = 'm', long = "muscle-group", help = "Muscle group; empty clears it.")]
    pub muscle_group: Option<String>,

    #[arg(short = 'k', long, help = "Category; empty clears it.")]
    pub category: Option<String>,

    #[arg(long, help = "Side; empty clears it.")]
    pub side: Option<String>,

    #[arg(long = "base", help = "Base exercise id; empty clears it.")]
    pub base_exercise: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    #[arg(help = "Record id (exercises also accept a name).")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ProgramArgs {
    #[command(subcommand)]
    pub command: ProgramSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ProgramSubcommands {
    #[command(about = "List programs.")]
    Ls(JsonArgs),
    #[command(about = "Show one program.")]
    Show(IdArgs),
    #[command(about = "Create an empty program.")]
    New(ProgramNewArgs),
    #[command(about = "Delete a user program.")]
    Rm(IdArgs),
    #[command(name = "add-exercise", about = "Append an exercise to a program.")]
    AddExercise(ProgramAddExerciseArgs),
    #[command(name = "rm-exercise", about = "Remove the exercise at a 1-based position.")]
    RmExercise(ProgramRmExerciseArgs),
}

#[derive(Debug, Args)]
pub struct JsonArgs {
    #[arg(long, help = "Print JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ProgramNewArgs {
    #[arg(help = "Program name.")]
    pub name: String,

    #[arg(short = 'D', long, help = "Optional description.")]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProgramAddExerciseArgs {
    #[arg(help = "Program id.")]
    pub program: String,

    #[arg(help = "Exercise id or name.")]
    pub exercise: String,

    #[arg(short = 's', long, help = "Target number of sets.")]
    pub sets: Option<u32>,

    #[arg(short = 'r', long, help = "Target reps, e.g. 5 or 8-12.")]
    pub reps: Option<String>,

    #[arg(short = 'n', long, help = "Free-text notes.")]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProgramRmExerciseArgs {
    #[arg(help = "Program id.")]
    pub program: String,

    #[arg(help = "1-based position of the exercise.")]
    pub position: usize,
}

#[derive(Debug, Args)]
pub struct WorkoutArgs {
    #[arg(short = 'p', long, help = "Start from a program id.")]
    pub program: Option<String>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistorySubcommands,
}

#[derive(Debug, Subcommand)]
pub enum HistorySubcommands {
    #[command(about = "List workouts, newest first.")]
    Ls(JsonArgs),
    #[command(about = "Show one workout.")]
    Show(IdArgs),
    #[command(about = "Delete one workout.")]
    Rm(IdArgs),
    #[command(name = "rm-set", about = "Delete one set from a stored workout.")]
    RmSet(HistoryRmSetArgs),
    #[command(about = "Export every workout as JSON.")]
    Export(HistoryExportArgs),
}

#[derive(Debug, Args)]
pub struct HistoryRmSetArgs {
    #[arg(help = "Workout id.")]
    pub workout: String,

    #[arg(help = "1-based exercise position.")]
    pub exercise: usize,

    #[arg(help = "1-based set position.")]
    pub set: usize,
}

#[derive(Debug, Args)]
pub struct HistoryExportArgs {
    #[arg(
        short = 'o',
        long = "out",
        help = "Write to this file; use '-' for stdout. Defaults to gymtrack-export-<date>.json."
    )]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProgressArgs {
    #[arg(help = "Exercise id or name. Omit to list exercises with logged sets.")]
    pub exercise: Option<String>,

    #[arg(
        short = 'r',
        long,
        value_enum,
        ignore_case = true,
        help = "Time range; defaults to the configured range."
    )]
    pub range: Option<TimeRange>,

    #[arg(
        long = "per-workout",
        conflicts_with = "range",
        requires = "exercise",
        help = "One point per workout instead of per day."
    )]
    pub per_workout: bool,

    #[arg(long, help = "Print JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum SettingsSubcommands {
    #[command(about = "List every stored setting.")]
    Ls,
    #[command(about = "Print one setting.")]
    Get(SettingsGetArgs),
    #[command(about = "Store a setting; JSON values are kept as JSON.")]
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
pub struct SettingsGetArgs {
    #[arg(help = "Setting key.")]
    pub key: String,
}

#[derive(Debug, Args)]
pub struct SettingsSetArgs {
    #[arg(help = "Setting key.")]
    pub key: String,

    #[arg(help = "Value: JSON, or any other text stored as a string.")]
    pub value: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, ignore_case = true, help = "Target shell.")]
    pub shell: Shell,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
