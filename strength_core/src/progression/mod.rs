//! Progression Policies: the five strategies spec §4.4 uses to turn a
//! `Direction`/`Magnitude` decision and a lift's recent performance into
//! the next session's working load and rep target.

mod double;
mod linear;
mod percentage_e1rm;
mod rir_autoregulation;
pub mod top_set_backoff;

use crate::error::Result;
use crate::load::{Load, RoundingPolicy};
use crate::types::{Direction, Magnitude, ProgressionPolicyType, RepRange, SetPrescription, SetResult};

/// Everything a progression strategy needs to compute the next
/// prescription for one lift.
#[derive(Clone, Copy, Debug)]
pub struct ProgressionInput<'a> {
    pub prescription: &'a SetPrescription,
    pub direction: Direction,
    pub magnitude: Magnitude,
    pub last_working_weight: Load,
    pub rolling_e1rm: f64,
    pub rounding_policy: &'a RoundingPolicy,
    pub last_session_sets: Option<&'a [SetResult]>,
}

/// The computed next working load and rep target. `SetPlan` generation
/// (warmups, set count, rest) happens one layer up in `engine`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressionOutput {
    pub working_load: Load,
    pub target_reps: u32,
}

/// Dispatch to the strategy named by `policy`.
pub fn compute_next_load(
    policy: ProgressionPolicyType,
    input: &ProgressionInput,
) -> Result<ProgressionOutput> {
    match policy {
        ProgressionPolicyType::Linear => linear::compute(input),
        ProgressionPolicyType::DoubleProgression => double::compute(input),
        ProgressionPolicyType::TopSetBackoff => top_set_backoff::compute(input),
        ProgressionPolicyType::RirAutoregulation => rir_autoregulation::compute(input),
        ProgressionPolicyType::PercentageE1rm => percentage_e1rm::compute(input),
    }
}

/// Shared helper: apply a magnitude's multiplier and/or absolute
/// increment to a base load, then quantize it. Most strategies only
/// differ in how they pick the *base* load and rep target; the final
/// scale-then-round step is identical.
fn scale_and_round(base: Load, magnitude: &Magnitude, rounding_policy: &RoundingPolicy) -> Load {
    let scaled = base.scale(magnitude.load_multiplier);
    let bumped = if magnitude.absolute_increment.value > 0.0 {
        scaled.add(magnitude.absolute_increment)
    } else {
        scaled
    };
    bumped.round(rounding_policy)
}

/// Highest rep count achieved across the last session's working sets,
/// or `None` if there were no working sets.
fn max_working_reps(sets: &[SetResult]) -> Option<u32> {
    sets.iter()
        .filter(|s| s.is_working_set())
        .map(|s| s.reps)
        .max()
}

/// Did every working set in the last session hit at least `target.hi`?
fn all_sets_hit_top_of_range(sets: &[SetResult], target: RepRange) -> bool {
    let working: Vec<&SetResult> = sets.iter().filter(|s| s.is_working_set()).collect();
    !working.is_empty() && working.iter().all(|s| s.reps >= target.hi)
}
