//! Default exercise catalog and lift-family resolution (spec §9 "Lift family").
//!
//! Exercises that train the same pattern with a consistent strength
//! relationship (e.g. close-grip bench vs. flat bench) share a `LiftState`
//! through a canonical id and a coefficient, rather than each variant
//! tracking its own independent progression history.

use crate::error::{Error, Result};
use crate::types::{Equipment, MovementPattern, ProgressionPolicyType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One entry in the exercise catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseDef {
    pub id: String,
    pub name: String,
    pub movement_pattern: MovementPattern,
    /// The lift family this exercise's state is tracked under. Equal to
    /// `id` for canonical (non-aliased) exercises.
    pub canonical_family_id: String,
    /// Multiplier applied when reading/writing state through the
    /// canonical family: `variant_load = canonical_load * coefficient`.
    /// Always `1.0` for a canonical exercise.
    pub coefficient: f64,
    pub default_progression_policy: ProgressionPolicyType,
    pub substitutes: Vec<String>,
    pub equipment: Equipment,
}

/// The complete catalog of known exercises, keyed by exercise id.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDef>,
}

static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Reference to the cached default catalog, built once per process.
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds a fresh copy of the default catalog. Prefer
/// [`get_default_catalog`] outside of tests and custom-catalog callers.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: &str,
    name: &str,
    pattern: MovementPattern,
    policy: ProgressionPolicyType,
    substitutes: &[&str],
    equipment: Equipment,
) -> ExerciseDef {
    ExerciseDef {
        id: id.into(),
        name: name.into(),
        movement_pattern: pattern,
        canonical_family_id: id.into(),
        coefficient: 1.0,
        default_progression_policy: policy,
        substitutes: substitutes.iter().map(|s| s.to_string()).collect(),
        equipment,
    }
}

#[allow(clippy::too_many_arguments)]
fn alias(
    id: &str,
    name: &str,
    pattern: MovementPattern,
    canonical_family_id: &str,
    coefficient: f64,
    policy: ProgressionPolicyType,
    substitutes: &[&str],
    equipment: Equipment,
) -> ExerciseDef {
    ExerciseDef {
        id: id.into(),
        name: name.into(),
        movement_pattern: pattern,
        canonical_family_id: canonical_family_id.into(),
        coefficient,
        default_progression_policy: policy,
        substitutes: substitutes.iter().map(|s| s.to_string()).collect(),
        equipment,
    }
}

fn build_default_catalog_internal() -> Catalog {
    use Equipment::*;
    use MovementPattern::*;
    use ProgressionPolicyType::*;

    let mut exercises = HashMap::new();

    let defs = vec![
        exercise(
            "back_squat",
            "Barbell Back Squat",
            Squat,
            Linear,
            &["front_squat", "leg_press"],
            Barbell,
        ),
        alias(
            "front_squat",
            "Barbell Front Squat",
            Squat,
            "back_squat",
            0.85,
            Linear,
            &["back_squat"],
            Barbell,
        ),
        exercise(
            "conventional_deadlift",
            "Conventional Deadlift",
            HipHinge,
            Linear,
            &["trap_bar_deadlift", "romanian_deadlift"],
            Barbell,
        ),
        alias(
            "trap_bar_deadlift",
            "Trap Bar Deadlift",
            HipHinge,
            "conventional_deadlift",
            1.08,
            Linear,
            &["conventional_deadlift"],
            Barbell,
        ),
        exercise(
            "romanian_deadlift",
            "Romanian Deadlift",
            HipHinge,
            DoubleProgression,
            &["conventional_deadlift"],
            Barbell,
        ),
        exercise(
            "bench_press",
            "Barbell Bench Press",
            HorizontalPush,
            Linear,
            &["close_grip_bench_press", "dumbbell_bench_press"],
            Barbell,
        ),
        alias(
            "close_grip_bench_press",
            "Close-Grip Bench Press",
            HorizontalPush,
            "bench_press",
            0.9,
            Linear,
            &["bench_press"],
            Barbell,
        ),
        exercise(
            "dumbbell_bench_press",
            "Dumbbell Bench Press",
            HorizontalPush,
            DoubleProgression,
            &["bench_press"],
            Dumbbell,
        ),
        exercise(
            "overhead_press",
            "Barbell Overhead Press",
            VerticalPush,
            Linear,
            &["dumbbell_shoulder_press"],
            Barbell,
        ),
        exercise(
            "dumbbell_shoulder_press",
            "Dumbbell Shoulder Press",
            VerticalPush,
            DoubleProgression,
            &["overhead_press"],
            Dumbbell,
        ),
        exercise(
            "barbell_row",
            "Barbell Row",
            HorizontalPull,
            Linear,
            &["chest_supported_row", "seated_cable_row"],
            Barbell,
        ),
        exercise(
            "chest_supported_row",
            "Chest-Supported Row",
            HorizontalPull,
            DoubleProgression,
            &["barbell_row", "seated_cable_row"],
            Machine,
        ),
        exercise(
            "seated_cable_row",
            "Seated Cable Row",
            HorizontalPull,
            DoubleProgression,
            &["barbell_row", "chest_supported_row"],
            Cable,
        ),
        exercise(
            "weighted_pullup",
            "Weighted Pull-up",
            VerticalPull,
            TopSetBackoff,
            &["lat_pulldown"],
            Bodyweight,
        ),
        exercise(
            "lat_pulldown",
            "Lat Pulldown",
            VerticalPull,
            DoubleProgression,
            &["weighted_pullup"],
            Cable,
        ),
        exercise(
            "leg_press",
            "Leg Press",
            Squat,
            DoubleProgression,
            &["back_squat"],
            Machine,
        ),
        exercise(
            "leg_curl",
            "Seated Leg Curl",
            KneeFlexion,
            DoubleProgression,
            &[],
            Machine,
        ),
        exercise(
            "leg_extension",
            "Leg Extension",
            KneeExtension,
            DoubleProgression,
            &[],
            Machine,
        ),
        exercise(
            "lateral_raise",
            "Dumbbell Lateral Raise",
            ShoulderAbduction,
            DoubleProgression,
            &[],
            Dumbbell,
        ),
        exercise(
            "front_raise",
            "Dumbbell Front Raise",
            ShoulderFlexion,
            DoubleProgression,
            &[],
            Dumbbell,
        ),
        exercise(
            "barbell_curl",
            "Barbell Curl",
            ElbowFlexion,
            DoubleProgression,
            &["dumbbell_curl"],
            Barbell,
        ),
        exercise(
            "dumbbell_curl",
            "Dumbbell Curl",
            ElbowFlexion,
            DoubleProgression,
            &["barbell_curl"],
            Dumbbell,
        ),
        exercise(
            "triceps_pushdown",
            "Cable Triceps Pushdown",
            ElbowExtension,
            DoubleProgression,
            &["skull_crusher"],
            Cable,
        ),
        exercise(
            "skull_crusher",
            "Skull Crusher",
            ElbowExtension,
            DoubleProgression,
            &["triceps_pushdown"],
            Barbell,
        ),
    ];

    for def in defs {
        exercises.insert(def.id.clone(), def);
    }

    Catalog { exercises }
}

/// Resolve the `LiftState` key and load coefficient for an exercise id.
///
/// Returns `(canonical_family_id, coefficient)`. For a canonical exercise
/// this is `(id, 1.0)`. For an alias it's the family it rolls up into and
/// the multiplier used to translate loads between the alias and the
/// family's tracked state.
pub fn resolve_state_keys(catalog: &Catalog, exercise_id: &str) -> Result<(String, f64)> {
    let def = catalog
        .exercises
        .get(exercise_id)
        .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
    Ok((def.canonical_family_id.clone(), def.coefficient))
}

impl Catalog {
    /// Validate the catalog for internal consistency. Returns an empty
    /// Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, def) in &self.exercises {
            if id.is_empty() || def.id.is_empty() {
                errors.push("exercise has empty id".to_string());
            }
            if id != &def.id {
                errors.push(format!(
                    "exercise key '{id}' doesn't match def.id '{}'",
                    def.id
                ));
            }
            if def.name.is_empty() {
                errors.push(format!("exercise '{id}' has empty name"));
            }
            if def.coefficient <= 0.0 {
                errors.push(format!(
                    "exercise '{id}' has non-positive coefficient {}",
                    def.coefficient
                ));
            }
            if !self.exercises.contains_key(&def.canonical_family_id) {
                errors.push(format!(
                    "exercise '{id}' references dangling canonical family '{}'",
                    def.canonical_family_id
                ));
            }
            for sub in &def.substitutes {
                if !self.exercises.contains_key(sub) {
                    errors.push(format!(
                        "exercise '{id}' references non-existent substitute '{sub}'"
                    ));
                }
            }
        }

        errors
    }

    /// Exercises sharing a movement pattern with `exercise_id`, excluding
    /// itself, ordered by id for deterministic output. Supplements the
    /// catalog's explicit `substitutes` list with a pattern-based fallback.
    pub fn substitution_candidates(&self, exercise_id: &str) -> Vec<&ExerciseDef> {
        let Some(def) = self.exercises.get(exercise_id) else {
            return Vec::new();
        };
        let mut explicit: Vec<&ExerciseDef> = def
            .substitutes
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .collect();
        explicit.sort_by(|a, b| a.id.cmp(&b.id));
        explicit
    }
}
