use std::io::{self, IsTerminal};

use crate::app::ProgressReport;
use crate::domain::{Exercise, Program, Setting, WorkoutLog};
use crate::progress::GroupedExercises;
use crate::shell::format_set;

pub fn print_exercise_list(exercises: &[Exercise]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Exercises"));
    if exercises.is_empty() {
        println!("{}", palette.dim("no exercises"));
        return;
    }
    for exercise in exercises {
        println!("{}", format_exercise_row(exercise, &palette));
    }
    println!("{}", palette.dim(&format!("{} exercise(s)", exercises.len())));
}

fn format_exercise_row(exercise: &Exercise, palette: &Palette) -> String {
    let mut line = format!("{} {}", palette.id(&exercise.id), exercise.name);
    let details = [
        exercise.muscle_group.as_deref(),
        exercise.category.as_deref(),
        exercise.side.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    if !details.is_empty() {
        line.push(' ');
        line.push_str(&palette.label(&details.join(", ")));
    }
    if exercise.is_custom {
        line.push(' ');
        line.push_str(&palette.tag("custom"));
    }
    line
}

pub fn print_exercise(exercise: &Exercise) {
    let palette = Palette::auto();
    println!("{}", format_exercise_row(exercise, &palette));
    if let Some(base) = exercise.base_exercise.as_deref() {
        println!("  {}", palette.dim(&format!("variation of {base}")));
    }
}

pub fn print_program_list(programs: &[Program], is_builtin: impl Fn(&str) -> bool) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Programs"));
    if programs.is_empty() {
        println!("{}", palette.dim("no programs"));
        return;
    }
    for program in programs {
        let mut line = format!(
            "{} {} {}",
            palette.id(&program.id),
            program.name,
            palette.dim(&format!("({} exercise(s))", program.exercises.len()))
        );
        if is_builtin(&program.id) {
            line.push(' ');
            line.push_str(&palette.tag("built-in"));
        }
        println!("{line}");
    }
}

pub fn print_program(program: &Program, name_of: impl Fn(&str) -> String) {
    print!("{}", render_program(program, &Palette::auto(), name_of));
}

fn render_program(program: &Program, palette: &Palette, name_of: impl Fn(&str) -> String) -> String {
    let mut out = format!("{} {}\n", palette.id(&program.id), palette.heading(&program.name));
    if let Some(description) = program.description.as_deref() {
        out.push_str(&format!("  {}\n", palette.dim(description)));
    }
    for (index, entry) in program.exercises.iter().enumerate() {
        let mut line = format!("  {}. {}", index + 1, name_of(&entry.exercise_id));
        match (entry.target_sets, entry.target_reps.as_deref()) {
            (Some(sets), Some(reps)) => line.push_str(&format!(" {sets} x {reps}")),
            (Some(sets), None) => line.push_str(&format!(" {sets} set(s)")),
            (None, Some(reps)) => line.push_str(&format!(" x {reps}")),
            (None, None) => {}
        }
        if let Some(notes) = entry.notes.as_deref() {
            line.push(' ');
            line.push_str(&palette.dim(&format!("- {notes}")));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn print_workout_list(workouts: &[WorkoutLog]) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Workouts"));
    if workouts.is_empty() {
        println!("{}", palette.dim("no workouts yet"));
        return;
    }
    for workout in workouts {
        println!(
            "{} {} {}",
            palette.id(&workout.id),
            workout.date,
            palette.dim(&format!(
                "{} exercise(s), {} set(s), volume {}",
                workout.logged_exercises.len(),
                workout.set_count(),
                workout.total_volume()
            ))
        );
    }
}

pub fn print_workout(workout: &WorkoutLog, name_of: impl Fn(&str) -> String) {
    let palette = Palette::auto();
    println!("{} {}", palette.id(&workout.id), palette.heading(&workout.date));
    if let Some(program_id) = workout.program_id.as_deref() {
        println!("  {}", palette.dim(&format!("program {program_id}")));
    }
    for (index, entry) in workout.logged_exercises.iter().enumerate() {
        println!("  {}. {}", index + 1, name_of(&entry.exercise_id));
        for (number, set) in entry.sets.iter().enumerate() {
            println!("     {}) {}", number + 1, format_set(set));
        }
    }
}

pub fn print_progress(report: &ProgressReport) {
    let palette = Palette::auto();
    println!(
        "{} {}",
        palette.heading(&report.exercise.name),
        palette.dim(&format!("range {}", report.range))
    );
    if report.points.is_empty() {
        println!("{}", palette.dim("no sets logged in this range"));
        return;
    }
    for point in &report.points {
        println!(
            "  {}  e1RM {:.1}  max {}  volume {}  reps {}",
            point.date,
            point.estimated_one_rep_max,
            point.max_weight,
            point.total_volume,
            point.total_reps
        );
    }
    let deltas = &report.deltas;
    println!(
        "{}",
        palette.dim(&format!(
            "change: e1RM {}  max {}  volume {}  reps {}",
            signed_percent(deltas.one_rm),
            signed_percent(deltas.max_weight),
            signed_percent(deltas.volume),
            signed_percent(deltas.reps)
        ))
    );
}

fn signed_percent(value: i64) -> String {
    if value > 0 {
        format!("+{value}%")
    } else {
        format!("{value}%")
    }
}

pub fn print_exercise_groups(groups: &GroupedExercises) {
    let palette = Palette::auto();
    println!("{}", palette.heading("With history"));
    if groups.with_data.is_empty() {
        println!("{}", palette.dim("nothing logged yet"));
    }
    for entry in &groups.with_data {
        println!(
            "{} {} {}",
            palette.id(&entry.exercise.id),
            entry.exercise.name,
            palette.dim(&format!("{} workout(s)", entry.workout_count))
        );
    }
    println!(
        "{}",
        palette.dim(&format!(
            "{} exercise(s) without history",
            groups.without_data.len()
        ))
    );
}

pub fn print_settings(settings: &[Setting]) {
    let palette = Palette::auto();
    if settings.is_empty() {
        println!("{}", palette.dim("no settings stored"));
        return;
    }
    for setting in settings {
        println!("{} = {}", palette.id(&setting.id), setting.value);
    }
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn label(&self, text: &str) -> String {
        self.paint("35", &format!("({text})"))
    }

    fn tag(&self, text: &str) -> String {
        self.paint("90", &format!("#{text}"))
    }
}

#[cfg(test)]
mod tests {
    use super::{format_exercise_row, render_program, signed_percent, Palette};
    use crate::domain::{Exercise, Program, ProgramExercise};

    fn plain() -> Palette {
        Palette { enabled: false }
    }

    #[test]
    fn exercise_rows_show_details_and_custom_tag() {
        let exercise = Exercise {
            id: "x1".to_string(),
            name: "Belt Squat".to_string(),
            is_custom: true,
            muscle_group: Some("Legs".to_string()),
            category: None,
            side: Some("left".to_string()),
            base_exercise: None,
        };
        assert_eq!(
            format_exercise_row(&exercise, &plain()),
            "x1 Belt Squat (Legs, left) #custom"
        );
    }

    #[test]
    fn program_render_numbers_exercises_from_one() {
        let program = Program {
            id: "p1".to_string(),
            name: "Upper".to_string(),
            description: Some("heavy".to_string()),
            exercises: vec![
                ProgramExercise {
                    target_sets: Some(3),
                    target_reps: Some("5".to_string()),
                    ..ProgramExercise::new("bench-press")
                },
                ProgramExercise {
                    notes: Some("strict".to_string()),
                    ..ProgramExercise::new("pull-ups")
                },
            ],
        };
        let rendered = render_program(&program, &plain(), |id| id.to_uppercase());
        assert_eq!(
            rendered,
            "p1 Upper\n  heavy\n  1. BENCH-PRESS 3 x 5\n  2. PULL-UPS - strict\n"
        );
    }

    #[test]
    fn colors_wrap_text_only_when_enabled() {
        assert_eq!(plain().heading("Programs"), "Programs");
        let colored = Palette { enabled: true };
        assert_eq!(colored.dim("x"), "\x1b[2mx\x1b[0m");
    }

    #[test]
    fn percent_changes_carry_a_sign() {
        assert_eq!(signed_percent(12), "+12%");
        assert_eq!(signed_percent(0), "0%");
        assert_eq!(signed_percent(-5), "-5%");
    }
}
