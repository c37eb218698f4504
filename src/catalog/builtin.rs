use crate::domain::{Exercise, Program, ProgramExercise};

struct BuiltinExercise {
    id: &'static str,
    name: &'static str,
    muscle_group: &'static str,
    category: &'static str,
}

const fn ex(
    id: &'static str,
    name: &'static str,
    muscle_group: &'static str,
    category: &'static str,
) -> BuiltinExercise {
    BuiltinExercise {
        id,
        name,
        muscle_group,
        category,
    }
}

const COMPOUND: &str = "compound";
const ISOLATION: &str = "isolation";
const BODYWEIGHT: &str = "bodyweight";

const EXERCISES: &[BuiltinExercise] = &[
    ex("bench-press", "Bench Press", "Chest", COMPOUND),
    ex("incline-bench-press", "Incline Bench Press", "Chest", COMPOUND),
    ex("decline-bench-press", "Decline Bench Press", "Chest", COMPOUND),
    ex("dumbbell-bench-press", "Dumbbell Bench Press", "Chest", COMPOUND),
    ex("incline-dumbbell-press", "Incline Dumbbell Press", "Chest", COMPOUND),
    ex("dumbbell-flyes", "Dumbbell Flyes", "Chest", ISOLATION),
    ex("cable-crossover", "Cable Crossover", "Chest", ISOLATION),
    ex("chest-dips", "Chest Dips", "Chest", BODYWEIGHT),
    ex("push-ups", "Push-ups", "Chest", BODYWEIGHT),
    ex("machine-chest-press", "Machine Chest Press", "Chest", COMPOUND),
    ex("pec-deck-machine", "Pec Deck Machine", "Chest", ISOLATION),
    ex("deadlift", "Deadlift", "Back", COMPOUND),
    ex("barbell-row", "Barbell Row", "Back", COMPOUND),
    ex("seated-cable-row", "Seated Cable Row", "Back", COMPOUND),
    ex("lat-pulldown", "Lat Pulldown", "Back", COMPOUND),
    ex("pull-ups", "Pull-ups", "Back", BODYWEIGHT),
    ex("chin-ups", "Chin-ups", "Back", BODYWEIGHT),
    ex("dumbbell-row", "Single-Arm Dumbbell Row", "Back", COMPOUND),
    ex("t-bar-row", "T-Bar Row", "Back", COMPOUND),
    ex("face-pull", "Face Pull", "Back", ISOLATION),
    ex("good-morning", "Good Morning", "Back", COMPOUND),
    ex("pullover", "Dumbbell Pullover", "Back", ISOLATION),
    ex("overhead-press", "Overhead Press", "Shoulders", COMPOUND),
    ex("seated-dumbbell-press", "Seated Dumbbell Press", "Shoulders", COMPOUND),
    ex("lateral-raise", "Lateral Raise", "Shoulders", ISOLATION),
    ex("front-raise", "Front Raise", "Shoulders", ISOLATION),
    ex("reverse-flyes", "Reverse Flyes", "Shoulders", ISOLATION),
    ex("upright-row", "Upright Row", "Shoulders", COMPOUND),
    ex("shrugs", "Shrugs", "Shoulders", ISOLATION),
    ex("arnold-press", "Arnold Press", "Shoulders", COMPOUND),
    ex("push-press", "Push Press", "Shoulders", COMPOUND),
    ex("cable-lateral-raise", "Cable Lateral Raise", "Shoulders", ISOLATION),
    ex("squat", "Squat", "Legs", COMPOUND),
    ex("leg-press", "Leg Press", "Legs", COMPOUND),
    ex("lunges", "Lunges", "Legs", COMPOUND),
    ex("leg-extension", "Leg Extension", "Legs", ISOLATION),
    ex("leg-curl", "Leg Curl", "Legs", ISOLATION),
    ex("romanian-deadlift", "Romanian Deadlift", "Legs", COMPOUND),
    ex("calf-raise", "Calf Raise", "Legs", ISOLATION),
    ex("hack-squat", "Hack Squat", "Legs", COMPOUND),
    ex("bulgarian-split-squat", "Bulgarian Split Squat", "Legs", COMPOUND),
    ex("goblet-squat", "Goblet Squat", "Legs", COMPOUND),
    ex("front-squat", "Front Squat", "Legs", COMPOUND),
    ex("glute-bridge", "Glute Bridge", "Legs", ISOLATION),
    ex("hip-thrust", "Hip Thrust", "Legs", COMPOUND),
    ex("barbell-curl", "Barbell Curl", "Biceps", ISOLATION),
    ex("dumbbell-curl", "Dumbbell Curl", "Biceps", ISOLATION),
    ex("hammer-curl", "Hammer Curl", "Biceps", ISOLATION),
    ex("incline-dumbbell-curl", "Incline Dumbbell Curl", "Biceps", ISOLATION),
    ex("concentration-curl", "Concentration Curl", "Biceps", ISOLATION),
    ex("preacher-curl", "Preacher Curl", "Biceps", ISOLATION),
    ex("cable-curl", "Cable Curl", "Biceps", ISOLATION),
    ex("ez-bar-curl", "EZ Bar Curl", "Biceps", ISOLATION),
    ex("tricep-pushdown", "Tricep Pushdown", "Triceps", ISOLATION),
    ex("skull-crusher", "Skull Crusher", "Triceps", ISOLATION),
    ex("tricep-dips", "Tricep Dips", "Triceps", BODYWEIGHT),
    ex("close-grip-bench-press", "Close-Grip Bench Press", "Triceps", COMPOUND),
    ex("overhead-tricep-extension", "Overhead Tricep Extension", "Triceps", ISOLATION),
    ex("diamond-push-ups", "Diamond Push-ups", "Triceps", BODYWEIGHT),
    ex("rope-pushdown", "Rope Pushdown", "Triceps", ISOLATION),
    ex("plank", "Plank", "Core", BODYWEIGHT),
    ex("crunches", "Crunches", "Core", BODYWEIGHT),
    ex("leg-raises", "Leg Raises", "Core", BODYWEIGHT),
    ex("russian-twist", "Russian Twist", "Core", BODYWEIGHT),
    ex("hanging-knee-raise", "Hanging Knee Raise", "Core", BODYWEIGHT),
    ex("ab-rollout", "Ab Rollout", "Core", BODYWEIGHT),
    ex("bicycle-crunches", "Bicycle Crunches", "Core", BODYWEIGHT),
    ex("mountain-climbers", "Mountain Climbers", "Core", BODYWEIGHT),
    ex("cable-woodchoppers", "Cable Woodchoppers", "Core", ISOLATION),
    ex("deadbug", "Dead Bug", "Core", BODYWEIGHT),
    ex("clean-and-press", "Clean and Press", "Full Body", COMPOUND),
    ex("clean-and-jerk", "Clean and Jerk", "Full Body", COMPOUND),
    ex("snatch", "Snatch", "Full Body", COMPOUND),
    ex("kettlebell-swing", "Kettlebell Swing", "Full Body", COMPOUND),
    ex("thruster", "Thruster", "Full Body", COMPOUND),
    ex("burpee", "Burpee", "Full Body", BODYWEIGHT),
    ex("man-maker", "Man Maker", "Full Body", COMPOUND),
];

struct BuiltinProgram {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    exercises: &'static [(&'static str, u32, &'static str)],
}

const PROGRAMS: &[BuiltinProgram] = &[
    BuiltinProgram {
        id: "builtin-full-body-5x5-a",
        name: "Full Body 5x5 (A)",
        description: "Squat, bench and row for five sets of five.",
        exercises: &[("squat", 5, "5"), ("bench-press", 5, "5"), ("barbell-row", 5, "5")],
    },
    BuiltinProgram {
        id: "builtin-full-body-5x5-b",
        name: "Full Body 5x5 (B)",
        description: "Squat, press and a single heavy set of deadlifts.",
        exercises: &[("squat", 5, "5"), ("overhead-press", 5, "5"), ("deadlift", 1, "5")],
    },
    BuiltinProgram {
        id: "builtin-push",
        name: "Push",
        description: "Chest, shoulders and triceps.",
        exercises: &[
            ("bench-press", 4, "6-8"),
            ("overhead-press", 3, "8-10"),
            ("incline-dumbbell-press", 3, "8-12"),
            ("lateral-raise", 3, "12-15"),
            ("tricep-pushdown", 3, "10-12"),
        ],
    },
    BuiltinProgram {
        id: "builtin-pull",
        name: "Pull",
        description: "Back and biceps.",
        exercises: &[
            ("deadlift", 3, "5"),
            ("pull-ups", 3, "max"),
            ("barbell-row", 3, "8-10"),
            ("face-pull", 3, "15"),
            ("barbell-curl", 3, "10-12"),
        ],
    },
    BuiltinProgram {
        id: "builtin-legs",
        name: "Legs",
        description: "Quads, hamstrings and calves.",
        exercises: &[
            ("squat", 4, "6-8"),
            ("romanian-deadlift", 3, "8-10"),
            ("leg-press", 3, "10-12"),
            ("leg-curl", 3, "12"),
            ("calf-raise", 4, "15"),
        ],
    },
];

pub fn exercises() -> Vec<Exercise> {
    EXERCISES
        .iter()
        .map(|entry| Exercise {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            is_custom: false,
            muscle_group: Some(entry.muscle_group.to_string()),
            category: Some(entry.category.to_string()),
            side: None,
            base_exercise: None,
        })
        .collect()
}

pub fn programs() -> Vec<Program> {
    PROGRAMS
        .iter()
        .map(|entry| Program {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            description: Some(entry.description.to_string()),
            exercises: entry
                .exercises
                .iter()
                .map(|(exercise_id, sets, reps)| ProgramExercise {
                    target_sets: Some(*sets),
                    target_reps: Some((*reps).to_string()),
                    ..ProgramExercise::new(*exercise_id)
                })
                .collect(),
        })
        .collect()
}

pub fn is_builtin_exercise(id: &str) -> bool {
    EXERCISES.iter().any(|entry| entry.id == id)
}

pub fn is_builtin_program(id: &str) -> bool {
    PROGRAMS.iter().any(|entry| entry.id == id)
}
