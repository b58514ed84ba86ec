mod history_store;
mod templates;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strength_core::{
    AdjustmentKind, BiologicalSex, Config, Error, ExerciseSessionResult, ExperienceLevel, Load,
    ProgressionPolicyType, Result, RoundingPolicy, SessionIntent, SetPlan, SetResult, Unit,
    UserProfile, WorkoutHistory,
};

#[derive(Parser)]
#[command(name = "strength")]
#[command(about = "Strength training prescription engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the data directory (defaults to the config's data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the next session plan from a named template.
    Plan {
        /// Template id, e.g. push_day, pull_day, leg_day.
        #[arg(long)]
        template: String,

        /// Today's readiness score (0-100).
        #[arg(long, default_value_t = 75)]
        readiness: u8,

        /// Date the session is being planned for (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<String>,

        /// Lifter's training experience, used by the Direction and
        /// Magnitude policies.
        #[arg(long, value_enum, default_value_t = CliExperienceLevel::Intermediate)]
        experience: CliExperienceLevel,

        /// Lifter's biological sex, used by the Direction and Magnitude
        /// policies.
        #[arg(long, value_enum, default_value_t = CliBiologicalSex::Male)]
        sex: CliBiologicalSex,

        /// Lifter's body weight in pounds.
        #[arg(long, default_value_t = 0.0)]
        body_weight: f64,
    },

    /// Record a completed exercise's sets and update its lift state.
    Log {
        /// Exercise id, e.g. back_squat.
        #[arg(long)]
        exercise: String,

        /// Comma-separated reps per working set, e.g. 6,6,5.
        #[arg(long)]
        reps: String,

        /// Comma-separated load per working set, in pounds, e.g. 225,225,225.
        #[arg(long)]
        load: String,

        /// Comma-separated observed RIR per working set, e.g. 2,2,1.
        #[arg(long)]
        rir: Option<String>,

        /// Mark this session as a deload.
        #[arg(long)]
        deload: bool,

        /// Date the session was performed (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        date: Option<String>,
    },

    /// Recompute the remaining sets of an in-progress exercise given what
    /// was just completed.
    Adjust {
        /// Progression policy in effect for this exercise.
        #[arg(long, value_enum)]
        policy: CliProgressionPolicy,

        /// Target RIR for the prescription.
        #[arg(long, default_value_t = 2.0)]
        target_rir: f64,

        /// Load actually lifted on the completed set, in pounds.
        #[arg(long)]
        completed_load: f64,

        /// Reps actually performed on the completed set.
        #[arg(long)]
        completed_reps: u32,

        /// Observed RIR on the completed set.
        #[arg(long)]
        completed_rir: f64,

        /// Comma-separated planned loads for the remaining sets, in pounds.
        #[arg(long)]
        remaining_loads: String,

        /// Backoff percentage for a top-set-backoff exercise.
        #[arg(long, default_value_t = 0.9)]
        backoff_percentage: f64,

        /// Load nudge per RIR point of deviation from target, for a
        /// rir-autoregulation exercise.
        #[arg(long, default_value_t = 0.025)]
        adjustment_per_rir: f64,

        /// Clamp on the magnitude of any single RIR-driven nudge.
        #[arg(long, default_value_t = 0.10)]
        max_adjustment_per_set: f64,

        /// Allow an RIR-driven nudge to increase load; when absent,
        /// upward nudges are clamped to zero.
        #[arg(long, default_value_t = true)]
        allow_upward_adjustment: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl From<CliExperienceLevel> for ExperienceLevel {
    fn from(value: CliExperienceLevel) -> Self {
        match value {
            CliExperienceLevel::Beginner => ExperienceLevel::Beginner,
            CliExperienceLevel::Intermediate => ExperienceLevel::Intermediate,
            CliExperienceLevel::Advanced => ExperienceLevel::Advanced,
            CliExperienceLevel::Elite => ExperienceLevel::Elite,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliBiologicalSex {
    Male,
    Female,
}

impl From<CliBiologicalSex> for BiologicalSex {
    fn from(value: CliBiologicalSex) -> Self {
        match value {
            CliBiologicalSex::Male => BiologicalSex::Male,
            CliBiologicalSex::Female => BiologicalSex::Female,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliProgressionPolicy {
    Linear,
    DoubleProgression,
    TopSetBackoff,
    RirAutoregulation,
    PercentageE1rm,
}

impl From<CliProgressionPolicy> for ProgressionPolicyType {
    fn from(value: CliProgressionPolicy) -> Self {
        match value {
            CliProgressionPolicy::Linear => ProgressionPolicyType::Linear,
            CliProgressionPolicy::DoubleProgression => ProgressionPolicyType::DoubleProgression,
            CliProgressionPolicy::TopSetBackoff => ProgressionPolicyType::TopSetBackoff,
            CliProgressionPolicy::RirAutoregulation => ProgressionPolicyType::RirAutoregulation,
            CliProgressionPolicy::PercentageE1rm => ProgressionPolicyType::PercentageE1rm,
        }
    }
}

fn main() -> Result<()> {
    strength_core::logging::init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Plan {
            template,
            readiness,
            date,
            experience,
            sex,
            body_weight,
        } => {
            let profile = UserProfile {
                experience: experience.into(),
                sex: sex.into(),
                body_weight: Load::new(body_weight, Unit::Pounds),
            };
            cmd_plan(&data_dir, &config, &profile, &template, readiness, date.as_deref())
        }
        Commands::Log {
            exercise,
            reps,
            load,
            rir,
            deload,
            date,
        } => cmd_log(&data_dir, &exercise, &reps, &load, rir.as_deref(), deload, date.as_deref()),
        Commands::Adjust {
            policy,
            target_rir,
            completed_load,
            completed_reps,
            completed_rir,
            remaining_loads,
            backoff_percentage,
            adjustment_per_rir,
            max_adjustment_per_set,
            allow_upward_adjustment,
        } => cmd_adjust(
            policy.into(),
            target_rir,
            completed_load,
            completed_reps,
            completed_rir,
            &remaining_loads,
            backoff_percentage,
            adjustment_per_rir,
            max_adjustment_per_set,
            allow_upward_adjustment,
            &config.rounding,
        ),
    }
}

fn parse_date(date: Option<&str>) -> Result<chrono::NaiveDate> {
    match date {
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| Error::InvalidInput(format!("invalid date {s:?}: {e}"))),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

fn history_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("history.json")
}

fn cmd_plan(
    data_dir: &std::path::Path,
    config: &Config,
    profile: &UserProfile,
    template_id: &str,
    readiness: u8,
    date: Option<&str>,
) -> Result<()> {
    let catalog = strength_core::build_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  - {error}");
        }
        return Err(Error::CatalogValidation("invalid catalog".into()));
    }

    let template = templates::find_template(template_id)
        .ok_or_else(|| Error::InvalidInput(format!("unknown template: {template_id}")))?;

    let history = history_store::load(&history_path(data_dir))?;
    let today = parse_date(date)?;

    let plan = strength_core::recommend_session_for_template(
        &catalog,
        config,
        profile,
        &history,
        today,
        readiness,
        &template,
        SessionIntent::General,
    )?;

    display_plan(&plan);
    Ok(())
}

fn display_plan(plan: &strength_core::SessionPlan) {
    println!("\n== session plan ({}) ==", plan.template_id.as_deref().unwrap_or("ad-hoc"));
    if plan.is_deload {
        println!("  deload session: {:?}", plan.deload_reason);
    }
    for exercise in &plan.exercises {
        println!(
            "\n  {} — direction: {:?} ({:?})",
            exercise.exercise_id, exercise.direction, exercise.direction_reason
        );
        for set in &exercise.sets {
            let kind = if set.is_warmup { "warmup" } else { "working" };
            println!(
                "    set {:>2} [{}]: {:.1} {:?} x {} reps (target rir {:.1})",
                set.set_index, kind, set.target_load.value, set.target_load.unit, set.target_reps, set.target_rir
            );
        }
    }
}

fn parse_csv_f64(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| Error::InvalidInput(format!("invalid number {part:?}: {e}")))
        })
        .collect()
}

fn parse_csv_u32(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| Error::InvalidInput(format!("invalid number {part:?}: {e}")))
        })
        .collect()
}

fn cmd_log(
    data_dir: &std::path::Path,
    exercise_id: &str,
    reps: &str,
    load: &str,
    rir: Option<&str>,
    was_deload: bool,
    date: Option<&str>,
) -> Result<()> {
    let catalog = strength_core::build_default_catalog();
    if !catalog.exercises.contains_key(exercise_id) {
        return Err(Error::UnknownExercise(exercise_id.to_string()));
    }

    let reps = parse_csv_u32(reps)?;
    let loads = parse_csv_f64(load)?;
    if reps.len() != loads.len() {
        return Err(Error::InvalidInput(
            "reps and load lists must be the same length".into(),
        ));
    }
    let rirs: Vec<Option<f64>> = match rir {
        Some(s) => parse_csv_f64(s)?.into_iter().map(Some).collect(),
        None => vec![None; reps.len()],
    };
    if rirs.len() != reps.len() {
        return Err(Error::InvalidInput(
            "rir list must match reps/load length".into(),
        ));
    }

    let session_date = parse_date(date)?;
    let def = &catalog.exercises[exercise_id];
    let adjustment_kind = if was_deload {
        AdjustmentKind::Deload
    } else {
        AdjustmentKind::Progression
    };

    let sets: Vec<SetResult> = reps
        .iter()
        .zip(loads.iter())
        .zip(rirs.iter())
        .map(|((&r, &l), &rir)| SetResult {
            reps: r,
            load: Load::new(l, Unit::Pounds),
            rir_observed: rir,
            completed: true,
            is_warmup: false,
        })
        .collect();

    let prescription = strength_core::SetPrescription::new(
        sets.len() as u32,
        strength_core::RepRange::new(1, 50)?,
        2.0,
        120,
        strength_core::LoadStrategy::Absolute,
        Load::new(5.0, Unit::Pounds),
    )?;

    let result = ExerciseSessionResult {
        exercise_id: exercise_id.to_string(),
        prescription,
        sets,
        adjustment_kind,
    };

    let history_file = history_path(data_dir);
    let history = history_store::update(&history_file, |history: &mut WorkoutHistory| {
        let previous_lift_states = history.lift_states.clone();
        let (family_id, next_state) = strength_core::engine::update_lift_state(
            &catalog,
            &history.lift_states,
            exercise_id,
            &result,
            session_date,
            adjustment_kind,
        )?;
        history.lift_states.insert(family_id, next_state);
        history.sessions.push(strength_core::CompletedSession {
            date: session_date,
            template_id: None,
            exercise_results: vec![result.clone()],
            was_deload,
            adjustment_kind,
            previous_lift_states,
            readiness_score: 75,
        });
        Ok(())
    })?;

    let (family_id, _) = strength_core::resolve_state_keys(&catalog, exercise_id)?;
    let state = &history.lift_states[&family_id];
    println!("✓ logged session for {}", def.name);
    println!(
        "  rolling e1RM: {:.1}  last working weight: {:.1}{:?}",
        state.rolling_e1rm, state.last_working_weight.value, state.last_working_weight.unit
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_adjust(
    policy: ProgressionPolicyType,
    target_rir: f64,
    completed_load: f64,
    completed_reps: u32,
    completed_rir: f64,
    remaining_loads: &str,
    backoff_percentage: f64,
    adjustment_per_rir: f64,
    max_adjustment_per_set: f64,
    allow_upward_adjustment: bool,
    rounding_policy: &RoundingPolicy,
) -> Result<()> {
    let completed = vec![SetResult {
        reps: completed_reps,
        load: Load::new(completed_load, Unit::Pounds),
        rir_observed: Some(completed_rir),
        completed: true,
        is_warmup: false,
    }];

    let remaining: Vec<SetPlan> = parse_csv_f64(remaining_loads)?
        .into_iter()
        .enumerate()
        .map(|(i, value)| SetPlan {
            set_index: i as u32 + 2,
            target_load: Load::new(value, Unit::Pounds),
            target_reps: completed_reps,
            target_rir,
            rest_seconds: 120,
            is_warmup: false,
            rounding_policy: *rounding_policy,
        })
        .collect();

    let adjusted = strength_core::adjust_during_session(
        &completed,
        &remaining,
        policy,
        target_rir,
        backoff_percentage,
        adjustment_per_rir,
        max_adjustment_per_set,
        allow_upward_adjustment,
        rounding_policy,
    );

    println!("\n== adjusted remaining sets ==");
    for set in &adjusted {
        println!(
            "  set {:>2}: {:.1} {:?} x {} reps",
            set.set_index, set.target_load.value, set.target_load.unit, set.target_reps
        );
    }
    Ok(())
}
