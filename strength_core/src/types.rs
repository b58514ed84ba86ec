//! Core domain types for the strength prescription engine (spec §3, §9).
//!
//! Variant-heavy entities are closed enumerations; exhaustive matching is
//! required everywhere they're consumed.

use crate::load::{Load, RoundingPolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Closed enumerations
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Male,
    Female,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionIntent {
    Heavy,
    Volume,
    Light,
    General,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    Insufficient,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Squat,
    HipHinge,
    HorizontalPush,
    VerticalPush,
    HorizontalPull,
    VerticalPull,
    KneeExtension,
    KneeFlexion,
    ShoulderAbduction,
    ShoulderFlexion,
    ElbowFlexion,
    ElbowExtension,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Hold,
    DecreaseSlightly,
    Deload,
    ResetAfterBreak,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DirectionReason {
    SessionDeload,
    ExtendedBreak,
    TrainingGap,
    InsufficientData,
    RepeatedFailures,
    MinorFatigueSignal,
    GrinderSuccess,
    AcuteReadiness,
    TrendCaution,
    MetTarget,
    MaintainLoad,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Progression,
    ReadinessCut,
    BreakReset,
    Deload,
    None,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeloadReason {
    ScheduledDeload,
    HighAccumulatedFatigue,
    PerformanceDecline,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionPolicyType {
    Linear,
    DoubleProgression,
    TopSetBackoff,
    RirAutoregulation,
    PercentageE1rm,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    Absolute,
    RpeAutoregulated,
    PercentageE1rm,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Weekly,
    Biweekly,
    Monthly,
}

/// Equipment an exercise requires, used to check substitution candidates
/// against what a lifter actually has available (spec §6 catalog
/// contract: `Exercise (name, equipment, primaryMuscles, movementPattern)`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
}

/// The caller-supplied lifter profile the Direction and Magnitude
/// policies key their experience/sex/body-weight-sensitive rules on
/// (spec §4.2, §6 `recommendSession(date, userProfile, ...)`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub experience: ExperienceLevel,
    pub sex: BiologicalSex,
    pub body_weight: Load,
}

// ============================================================================
// Rep range
// ============================================================================

/// An inclusive rep range `[lo..hi]`. `lo <= hi` is an invariant checked
/// at construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    pub lo: u32,
    pub hi: u32,
}

impl RepRange {
    pub fn new(lo: u32, hi: u32) -> crate::error::Result<Self> {
        if lo > hi {
            return Err(crate::error::Error::InvalidInput(format!(
                "rep range lo ({lo}) > hi ({hi})"
            )));
        }
        Ok(Self { lo, hi })
    }

    pub fn single(reps: u32) -> Self {
        Self { lo: reps, hi: reps }
    }

    pub fn contains(&self, reps: u32) -> bool {
        reps >= self.lo && reps <= self.hi
    }

    pub fn clamp(&self, reps: u32) -> u32 {
        reps.clamp(self.lo, self.hi)
    }
}

// ============================================================================
// Prescription / plan / result
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetPrescription {
    pub set_count: u32,
    pub target_reps_range: RepRange,
    pub target_rir: f64,
    pub rest_seconds: u32,
    pub load_strategy: LoadStrategy,
    pub increment: Load,
    /// Fraction of the top set's daily max that backoff sets are
    /// prescribed at, for a `topSetBackoff` exercise (spec §4.4.3).
    /// Unused by other load strategies.
    pub backoff_percentage: f64,
    /// Minimum reps the prior top set must have hit (alongside the rep
    /// range's upper bound) to unlock a top-set-load advance (spec
    /// §4.4.3). Unused by other load strategies.
    pub minimum_top_set_reps: u32,
    /// Load nudge applied per RIR point of deviation from target, both
    /// in-session (`adjustment.rs`) and cross-session
    /// (`rir_autoregulation.rs`). Spec §4.6 default: 2.5%/RIR.
    pub adjustment_per_rir: f64,
    /// Clamp on the magnitude of any single RIR-driven nudge. Spec §4.6
    /// default: 10%.
    pub max_adjustment_per_set: f64,
    /// When false, an RIR-driven nudge that computes positive (i.e. a
    /// load increase) is clamped to zero instead (spec §4.6).
    pub allow_upward_adjustment: bool,
}

impl SetPrescription {
    pub fn new(
        set_count: u32,
        target_reps_range: RepRange,
        target_rir: f64,
        rest_seconds: u32,
        load_strategy: LoadStrategy,
        increment: Load,
    ) -> crate::error::Result<Self> {
        if set_count < 1 {
            return Err(crate::error::Error::InvalidInput(
                "set_count must be >= 1".into(),
            ));
        }
        if target_rir < 0.0 {
            return Err(crate::error::Error::InvalidInput(
                "target_rir must be >= 0".into(),
            ));
        }
        Ok(Self {
            set_count,
            target_reps_range,
            target_rir,
            rest_seconds,
            load_strategy,
            increment,
            backoff_percentage: 0.9,
            minimum_top_set_reps: 0,
            adjustment_per_rir: 0.025,
            max_adjustment_per_set: 0.10,
            allow_upward_adjustment: true,
        })
    }

    /// Override the default backoff percentage used by `topSetBackoff`.
    pub fn with_backoff_percentage(mut self, backoff_percentage: f64) -> crate::error::Result<Self> {
        if !(0.0..=1.0).contains(&backoff_percentage) {
            return Err(crate::error::Error::InvalidInput(
                "backoff_percentage must be in [0, 1]".into(),
            ));
        }
        self.backoff_percentage = backoff_percentage;
        Ok(self)
    }

    /// Override the minimum top-set reps required to advance the load
    /// for a `topSetBackoff` exercise (spec §4.4.3).
    pub fn with_minimum_top_set_reps(mut self, minimum_top_set_reps: u32) -> Self {
        self.minimum_top_set_reps = minimum_top_set_reps;
        self
    }

    /// Override the RIR-nudge knobs used by in-session adjustment and
    /// RIR autoregulation (spec §4.6).
    pub fn with_rir_adjustment_config(
        mut self,
        adjustment_per_rir: f64,
        max_adjustment_per_set: f64,
        allow_upward_adjustment: bool,
    ) -> crate::error::Result<Self> {
        if max_adjustment_per_set < 0.0 {
            return Err(crate::error::Error::InvalidInput(
                "max_adjustment_per_set must be >= 0".into(),
            ));
        }
        self.adjustment_per_rir = adjustment_per_rir;
        self.max_adjustment_per_set = max_adjustment_per_set;
        self.allow_upward_adjustment = allow_upward_adjustment;
        Ok(self)
    }
}

/// One prescribed set. Invariant: `target_load` is quantized under
/// `rounding_policy` and `target_reps` falls within the prescription's
/// rep range (checked by constructors, not re-derived here).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetPlan {
    pub set_index: u32,
    pub target_load: Load,
    pub target_reps: u32,
    pub target_rir: f64,
    pub rest_seconds: u32,
    pub is_warmup: bool,
    pub rounding_policy: RoundingPolicy,
}

/// One performed set. A *working set* is `completed && !is_warmup && reps > 0`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetResult {
    pub reps: u32,
    pub load: Load,
    pub rir_observed: Option<f64>,
    pub completed: bool,
    pub is_warmup: bool,
}

impl SetResult {
    pub fn is_working_set(&self) -> bool {
        self.completed && !self.is_warmup && self.reps > 0
    }

    /// RPE ~= 10 - RIR. A grinder set has RIR <= 0 or RPE >= 8.5.
    pub fn is_grinder(&self) -> bool {
        match self.rir_observed {
            Some(rir) => rir <= 0.0 || (10.0 - rir) >= 8.5,
            None => false,
        }
    }
}

// ============================================================================
// Exercise / session plan
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePlan {
    pub exercise_id: String,
    pub prescription: SetPrescription,
    pub sets: Vec<SetPlan>,
    pub direction: Option<Direction>,
    pub direction_reason: Option<DirectionReason>,
    pub recommended_adjustment_kind: Option<AdjustmentKind>,
    pub progression_policy: ProgressionPolicyType,
    pub in_session_policy: ProgressionPolicyType,
    pub substitutions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionPlan {
    pub template_id: Option<String>,
    pub exercises: Vec<ExercisePlan>,
    pub is_deload: bool,
    pub deload_reason: Option<DeloadReason>,
}

impl SessionPlan {
    /// Invariant 3/5: `is_deload == true` implies a reason is set and every
    /// exercise's adjustment kind is `Deload`.
    pub fn check_deload_coherence(&self) -> bool {
        if !self.is_deload {
            return true;
        }
        self.deload_reason.is_some()
            && self
                .exercises
                .iter()
                .all(|e| e.recommended_adjustment_kind == Some(AdjustmentKind::Deload))
    }
}

// ============================================================================
// Completed session / exercise result
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSessionResult {
    pub exercise_id: String,
    pub prescription: SetPrescription,
    pub sets: Vec<SetResult>,
    pub adjustment_kind: AdjustmentKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletedSession {
    pub date: NaiveDate,
    pub template_id: Option<String>,
    pub exercise_results: Vec<ExerciseSessionResult>,
    pub was_deload: bool,
    pub adjustment_kind: AdjustmentKind,
    pub previous_lift_states: HashMap<String, LiftState>,
    pub readiness_score: u8,
}

// ============================================================================
// Lift state
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct E1rmSample {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiftState {
    pub exercise_id: String,
    pub last_working_weight: Load,
    pub rolling_e1rm: f64,
    pub failure_count: u32,
    pub high_rpe_streak: u32,
    pub success_streak: u32,
    pub successful_sessions_count: u32,
    pub last_deload_date: Option<NaiveDate>,
    pub trend: Trend,
    pub e1rm_history: Vec<E1rmSample>,
    pub last_session_date: Option<NaiveDate>,
}

impl LiftState {
    pub fn new(exercise_id: impl Into<String>, unit: crate::load::Unit) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            last_working_weight: Load::zero(unit),
            rolling_e1rm: 0.0,
            failure_count: 0,
            high_rpe_streak: 0,
            success_streak: 0,
            successful_sessions_count: 0,
            last_deload_date: None,
            trend: Trend::Insufficient,
            e1rm_history: Vec::new(),
            last_session_date: None,
        }
    }

    /// Invariant 4: non-negativity of all counters/loads.
    pub fn check_invariants(&self) -> crate::error::Result<()> {
        if self.last_working_weight.value < 0.0 {
            return Err(crate::error::Error::InconsistentState(
                "last_working_weight negative".into(),
            ));
        }
        if self.rolling_e1rm < 0.0 {
            return Err(crate::error::Error::InconsistentState(
                "rolling_e1rm negative".into(),
            ));
        }
        if self.e1rm_history.len() > 10 {
            return Err(crate::error::Error::InconsistentState(
                "e1rm_history exceeds 10 samples".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Readiness / volume history
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReadinessRecord {
    pub date: NaiveDate,
    pub score: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct WorkoutHistory {
    pub sessions: Vec<CompletedSession>,
    pub lift_states: HashMap<String, LiftState>,
    pub readiness_history: Vec<ReadinessRecord>,
    pub recent_volume_by_date: HashMap<NaiveDate, f64>,
}

impl WorkoutHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Direction / magnitude results
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DirectionDecision {
    pub direction: Direction,
    pub primary_reason: DirectionReason,
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Magnitude {
    pub load_multiplier: f64,
    pub absolute_increment: Load,
    pub adjustment_kind: AdjustmentKind,
    /// Working sets to trim from the exercise's prescription (floored at
    /// 1 remaining set by the caller). Nonzero for an acute-readiness
    /// hold or a session-level deload.
    pub volume_set_delta: u32,
}

// ============================================================================
// Signals consumed by the direction policy
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiftSignals<'a> {
    pub exercise_id: &'a str,
    pub prescription: &'a SetPrescription,
    pub last_working_weight: Option<Load>,
    pub rolling_e1rm: f64,
    pub fail_streak: u32,
    pub high_rpe_streak: u32,
    pub days_since_last_exposure: Option<i64>,
    pub days_since_last_deload: Option<i64>,
    pub trend: Trend,
    pub success_streak: u32,
    pub successful_sessions_count: u32,
    pub last_session_avg_rir: Option<f64>,
    pub last_session_met_lower_bound: bool,
    pub today_readiness: u8,
    pub recent_readiness_scores: &'a [u8],
    pub experience: ExperienceLevel,
    pub sex: BiologicalSex,
    pub body_weight: Load,
    pub session_deload: bool,
    pub session_intent: SessionIntent,
    pub movement_pattern: MovementPattern,
    /// The prior session's raw performed sets for this lift, if any,
    /// consumed by Double Progression and RIR Autoregulation.
    pub last_session_sets: Option<&'a [SetResult]>,
    /// This lift's e1RM sample history, consumed by the performance-
    /// decline deload trigger (spec §9).
    pub e1rm_history: &'a [E1rmSample],
}
