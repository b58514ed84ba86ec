//! In-Session Adjustment (spec §4.6): reacts to sets as they're
//! completed, before the session ends. Only the RIR-autoregulation and
//! top-set+backoff policies adjust mid-session; the others hold the plan
//! fixed until the post-session State Update.

use crate::e1rm::brzycki_e1rm;
use crate::load::RoundingPolicy;
use crate::progression::top_set_backoff::backoff_load;
use crate::types::{ProgressionPolicyType, SetPlan, SetResult};

/// Recompute the remaining sets in a session given what's been completed
/// so far. Returns a new plan for `remaining_sets`; `completed_sets` are
/// not touched.
///
/// `adjustment_per_rir`, `max_adjustment_per_set`, and
/// `allow_upward_adjustment` come from the exercise's own
/// `SetPrescription` (spec §4.6); they are not crate-wide constants
/// since every exercise can tune its own autoregulation sensitivity.
#[allow(clippy::too_many_arguments)]
pub fn adjust_during_session(
    completed_sets: &[SetResult],
    remaining_sets: &[SetPlan],
    policy: ProgressionPolicyType,
    target_rir: f64,
    backoff_percentage: f64,
    adjustment_per_rir: f64,
    max_adjustment_per_set: f64,
    allow_upward_adjustment: bool,
    rounding_policy: &RoundingPolicy,
) -> Vec<SetPlan> {
    match policy {
        ProgressionPolicyType::RirAutoregulation => adjust_rir_autoregulation(
            completed_sets,
            remaining_sets,
            target_rir,
            adjustment_per_rir,
            max_adjustment_per_set,
            allow_upward_adjustment,
            rounding_policy,
        ),
        ProgressionPolicyType::TopSetBackoff => {
            adjust_top_set_backoff(completed_sets, remaining_sets, backoff_percentage, rounding_policy)
        }
        ProgressionPolicyType::Linear
        | ProgressionPolicyType::DoubleProgression
        | ProgressionPolicyType::PercentageE1rm => remaining_sets.to_vec(),
    }
}

#[allow(clippy::too_many_arguments)]
fn adjust_rir_autoregulation(
    completed_sets: &[SetResult],
    remaining_sets: &[SetPlan],
    target_rir: f64,
    adjustment_per_rir: f64,
    max_adjustment_per_set: f64,
    allow_upward_adjustment: bool,
    rounding_policy: &RoundingPolicy,
) -> Vec<SetPlan> {
    let Some(last) = completed_sets.iter().filter(|s| s.is_working_set()).last() else {
        return remaining_sets.to_vec();
    };
    let Some(observed_rir) = last.rir_observed else {
        return remaining_sets.to_vec();
    };

    let deviation = observed_rir - target_rir;
    let mut nudge = (deviation * adjustment_per_rir).clamp(-max_adjustment_per_set, max_adjustment_per_set);
    if !allow_upward_adjustment && nudge > 0.0 {
        nudge = 0.0;
    }

    remaining_sets
        .iter()
        .cloned()
        .map(|mut plan| {
            plan.target_load = plan.target_load.scale(1.0 + nudge).round(rounding_policy);
            plan
        })
        .collect()
}

fn adjust_top_set_backoff(
    completed_sets: &[SetResult],
    remaining_sets: &[SetPlan],
    backoff_percentage: f64,
    rounding_policy: &RoundingPolicy,
) -> Vec<SetPlan> {
    let Some(top_set) = completed_sets.iter().find(|s| s.is_working_set()) else {
        return remaining_sets.to_vec();
    };

    let daily_max = brzycki_e1rm(top_set.load.value, top_set.reps);
    let daily_max_load = crate::load::Load::new(daily_max, top_set.load.unit);
    let backoff = backoff_load(daily_max_load, backoff_percentage, rounding_policy);

    remaining_sets
        .iter()
        .cloned()
        .map(|mut plan| {
            if plan.is_warmup {
                return plan;
            }
            plan.target_load = backoff;
            plan
        })
        .collect()
}
