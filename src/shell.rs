//! Line-oriented workout shell. One `WorkoutSession` is driven by commands
//! read from any `BufRead`; nothing is written to the store before `finish`.

use std::io::{BufRead, Write};

use crate::app::{App, AppError};
use crate::domain::{SetLog, WorkoutLog};
use crate::session::WorkoutSession;

pub const HELP: &str = "\
commands:
  add <exercise>                       add an exercise by id or name
  log <weight> <reps> [flags]          log a set on the active exercise
  log@<n> <weight> <reps> [flags]      log a set on exercise n
                                       flags: failure paused slow
  del <exercise#> <set#>               delete one set
  next | prev                          move between exercises
  show                                 print the workout so far
  save-program <name>                  save this workout as a program
  finish                               save the workout and exit
  discard                              drop the workout and exit
  quit                                 exit without saving";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add(String),
    Log {
        exercise: Option<usize>,
        set: SetLog,
    },
    Delete {
        exercise: usize,
        set: usize,
    },
    Next,
    Prev,
    Show,
    SaveProgram(String),
    Finish,
    Discard,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Finished(String),
    Discarded,
    Abandoned,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
/// Exercise and set numbers are taken 1-based and returned 0-based.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "add" => ShellCommand::Add(required_text(rest, "add <exercise>")?),
        "log" => ShellCommand::Log {
            exercise: None,
            set: parse_set(rest)?,
        },
        "del" | "delete" => {
            let args = rest.split_whitespace().collect::<Vec<_>>();
            let [exercise, set] = args.as_slice() else {
                return Err("usage: del <exercise#> <set#>".to_string());
            };
            ShellCommand::Delete {
                exercise: parse_position(exercise)?,
                set: parse_position(set)?,
            }
        }
        "next" => ShellCommand::Next,
        "prev" => ShellCommand::Prev,
        "show" => ShellCommand::Show,
        "save-program" => ShellCommand::SaveProgram(required_text(rest, "save-program <name>")?),
        "finish" => ShellCommand::Finish,
        "discard" => ShellCommand::Discard,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => match other.strip_prefix("log@") {
            Some(position) => ShellCommand::Log {
                exercise: Some(parse_position(position)?),
                set: parse_set(rest)?,
            },
            None => return Err(format!("unknown command '{head}'; try 'help'")),
        },
    };
    Ok(Some(command))
}

fn required_text(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position - 1),
        _ => Err(format!("'{raw}' is not a position (numbers start at 1)")),
    }
}

fn parse_set(rest: &str) -> Result<SetLog, String> {
    let mut parts = rest.split_whitespace();
    let (Some(weight), Some(reps)) = (parts.next(), parts.next()) else {
        return Err("usage: log <weight> <reps> [failure] [paused] [slow]".to_string());
    };
    let weight = weight
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| format!("'{weight}' is not a valid weight"))?;
    let reps = reps
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| format!("'{reps}' is not a valid rep count"))?;

    let mut set = SetLog::new(weight, reps);
    for flag in parts {
        match flag.to_ascii_lowercase().as_str() {
            "failure" | "f" => set.is_failure = Some(true),
            "paused" | "p" => set.is_paused = Some(true),
            "slow" | "s" => set.is_slow_eccentric = Some(true),
            other => return Err(format!("unknown set flag '{other}'")),
        }
    }
    Ok(set)
}

/// Render the draft with 1-based numbering and a marker on the active
/// exercise.
pub fn render_workout(
    draft: &WorkoutLog,
    active_index: usize,
    name_of: impl Fn(&str) -> String,
) -> String {
    let mut out = format!("workout {}", draft.id);
    if let Some(program_id) = draft.program_id.as_deref() {
        out.push_str(&format!(" (program {program_id})"));
    }
    out.push('\n');
    if draft.logged_exercises.is_empty() {
        out.push_str("  no exercises yet; use 'add <exercise>'\n");
        return out;
    }
    for (index, entry) in draft.logged_exercises.iter().enumerate() {
        let marker = if index == active_index { '>' } else { ' ' };
        out.push_str(&format!(
            "{marker} {}. {}\n",
            index + 1,
            name_of(&entry.exercise_id)
        ));
        if entry.sets.is_empty() {
            out.push_str("     (no sets)\n");
        }
        for (number, set) in entry.sets.iter().enumerate() {
            out.push_str(&format!("     {}) {}\n", number + 1, format_set(set)));
        }
    }
    out
}

pub fn format_set(set: &SetLog) -> String {
    let mut text = format!("{} x {}", set.weight, set.reps);
    let flags = [
        (set.is_failure, "failure"),
        (set.is_paused, "paused"),
        (set.is_slow_eccentric, "slow"),
    ]
    .into_iter()
    .filter(|(flag, _)| flag.unwrap_or(false))
    .map(|(_, label)| label)
    .collect::<Vec<_>>();
    if !flags.is_empty() {
        text.push_str(&format!(" [{}]", flags.join(", ")));
    }
    text
}

/// Run a workout to completion. `prompt` is echoed before each read when set.
pub fn run_workout_shell<R: BufRead, W: Write>(
    app: &mut App,
    program_id: Option<&str>,
    input: R,
    out: &mut W,
    prompt: Option<&str>,
) -> Result<ShellOutcome, AppError> {
    let mut session = app.new_session();
    match program_id {
        Some(program_id) => {
            if session.start_from_program(program_id).is_none() {
                return Err(AppError::NotFound(format!("program '{program_id}'")));
            }
        }
        None => {
            session.start(None);
        }
    }
    write_draft(app, &session, out)?;
    writeln!(out, "type 'help' for commands")?;

    let mut lines = input.lines();
    loop {
        if let Some(prompt) = prompt {
            write!(out, "{prompt}")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            writeln!(out, "input closed; workout not saved")?;
            return Ok(ShellOutcome::Abandoned);
        };
        let command = match parse_command(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "error: {message}")?;
                continue;
            }
        };
        if let Some(outcome) = apply(app, &mut session, command, out)? {
            return Ok(outcome);
        }
    }
}

fn apply<W: Write>(
    app: &mut App,
    session: &mut WorkoutSession,
    command: ShellCommand,
    out: &mut W,
) -> Result<Option<ShellOutcome>, AppError> {
    match command {
        ShellCommand::Add(query) => {
            let Some(exercise) = app.exercise_catalog().resolve(&query).cloned() else {
                writeln!(out, "error: unknown exercise '{query}'")?;
                return Ok(None);
            };
            session.add_exercise(&exercise.id);
            writeln!(
                out,
                "added {} as #{}",
                exercise.name,
                session.active_exercise_index() + 1
            )?;
        }
        ShellCommand::Log { exercise, set } => {
            let index = exercise.unwrap_or_else(|| session.active_exercise_index());
            let label = format_set(&set);
            if session.log_set(index, set) {
                writeln!(out, "logged {label} on #{}", index + 1)?;
            } else {
                writeln!(out, "error: no exercise #{}; use 'add' first", index + 1)?;
            }
        }
        ShellCommand::Delete { exercise, set } => {
            if session.delete_set(exercise, set) {
                writeln!(out, "deleted set {} of #{}", set + 1, exercise + 1)?;
            } else {
                writeln!(out, "error: no set {} on exercise #{}", set + 1, exercise + 1)?;
            }
        }
        ShellCommand::Next => {
            if !session.next_exercise() {
                writeln!(out, "already at the last exercise")?;
            }
            write_draft(app, session, out)?;
        }
        ShellCommand::Prev => {
            if !session.previous_exercise() {
                writeln!(out, "already at the first exercise")?;
            }
            write_draft(app, session, out)?;
        }
        ShellCommand::Show => write_draft(app, session, out)?,
        ShellCommand::SaveProgram(name) => {
            let logged = session
                .current_workout()
                .map(|draft| draft.logged_exercises.clone())
                .unwrap_or_default();
            match app
                .program_catalog_mut()
                .save_workout_as_program(&name, &logged)
            {
                Some(id) => writeln!(out, "saved program {id}")?,
                None => writeln!(out, "error: could not save program '{name}'")?,
            }
        }
        ShellCommand::Finish => {
            let id = session
                .current_workout()
                .map(|draft| draft.id.clone())
                .unwrap_or_default();
            let summary = session.summary();
            if !session.finish() {
                writeln!(
                    out,
                    "error: workout not saved: {}; fix the problem and finish again",
                    session.last_error().unwrap_or("unknown error")
                )?;
                return Ok(None);
            }
            if let Some(summary) = summary {
                writeln!(
                    out,
                    "saved workout {id}: {} exercise(s), {} set(s), volume {}",
                    summary.exercises_with_sets, summary.sets, summary.volume
                )?;
            }
            return Ok(Some(ShellOutcome::Finished(id)));
        }
        ShellCommand::Discard => {
            session.discard();
            writeln!(out, "workout discarded")?;
            return Ok(Some(ShellOutcome::Discarded));
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => {
            writeln!(out, "workout not saved")?;
            return Ok(Some(ShellOutcome::Abandoned));
        }
    }
    Ok(None)
}

fn write_draft<W: Write>(app: &App, session: &WorkoutSession, out: &mut W) -> Result<(), AppError> {
    if let Some(draft) = session.current_workout() {
        let rendered = render_workout(draft, session.active_exercise_index(), |id| {
            app.exercise_name(id)
        });
        write!(out, "{rendered}")?;
    }
    Ok(())
}
