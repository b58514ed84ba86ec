//! Top-set + backoff (spec §4.4.3): one heavy top set projected from the
//! rolling e1RM via the Brzycki formula, with backoff sets computed
//! separately (by the engine) as a percentage of the top set.

use super::{scale_and_round, ProgressionInput, ProgressionOutput};
use crate::e1rm::brzycki_e1rm;
use crate::error::{Error, Result};
use crate::load::{Load, Unit};
use crate::types::Direction;

pub fn compute(input: &ProgressionInput) -> Result<ProgressionOutput> {
    let target_reps = input.prescription.target_reps_range.lo;

    if input.rolling_e1rm <= 0.0 {
        if input.last_working_weight.value <= 0.0 {
            return Err(Error::InsufficientHistoryForStrategy(
                "top_set_backoff requires a rolling e1RM or a last working weight".into(),
            ));
        }
        let working_load = scale_and_round(
            input.last_working_weight,
            &input.magnitude,
            input.rounding_policy,
        );
        return Ok(ProgressionOutput {
            working_load,
            target_reps,
        });
    }

    let unit = input.last_working_weight.unit;
    let projected = brzycki_top_set_load(input.rolling_e1rm, target_reps, unit);

    let working_load = match input.direction {
        Direction::Increase => {
            if met_progressive_overload_gate(input) {
                scale_and_round(projected, &input.magnitude, input.rounding_policy)
            } else {
                scale_and_round(
                    input.last_working_weight,
                    &input.magnitude,
                    input.rounding_policy,
                )
            }
        }
        Direction::Hold => scale_and_round(projected, &input.magnitude, input.rounding_policy),
        Direction::DecreaseSlightly | Direction::ResetAfterBreak | Direction::Deload => {
            scale_and_round(
                input.last_working_weight,
                &input.magnitude,
                input.rounding_policy,
            )
        }
    };

    Ok(ProgressionOutput {
        working_load,
        target_reps,
    })
}

/// Did last session's top set meet the rep count needed to earn a load
/// increase (spec §4.4.3 step 2)? With no session history to gate on,
/// defaults to allowing the advance.
fn met_progressive_overload_gate(input: &ProgressionInput) -> bool {
    let Some(sets) = input.last_session_sets else {
        return true;
    };
    let Some(top_reps) = super::max_working_reps(sets) else {
        return true;
    };
    let threshold = input
        .prescription
        .target_reps_range
        .hi
        .max(input.prescription.minimum_top_set_reps);
    top_reps >= threshold
}

/// Load (in `unit`) that the Brzycki formula predicts will yield
/// `target_reps` at the given e1RM. Inverse of `brzycki_e1rm`.
fn brzycki_top_set_load(e1rm: f64, target_reps: u32, unit: Unit) -> Load {
    let reps = target_reps.min(36).max(1) as f64;
    Load::new(e1rm * (37.0 - reps) / 36.0, unit)
}

/// Backoff load for a given top-set load, rounded under `rounding_policy`.
pub fn backoff_load(
    top_set: Load,
    backoff_percentage: f64,
    rounding_policy: &crate::load::RoundingPolicy,
) -> Load {
    top_set.scale(backoff_percentage).round(rounding_policy)
}
