//! Double progression (spec §4.4.2): climb reps within a fixed rep range
//! before adding load. Only once every working set hits the top of the
//! range does the weight go up and reps reset to the bottom.

use super::{all_sets_hit_top_of_range, max_working_reps, scale_and_round, ProgressionInput, ProgressionOutput};
use crate::error::Result;
use crate::types::Direction;

pub fn compute(input: &ProgressionInput) -> Result<ProgressionOutput> {
    let range = input.prescription.target_reps_range;

    if !matches!(input.direction, Direction::Increase | Direction::Hold) {
        let working_load = scale_and_round(
            input.last_working_weight,
            &input.magnitude,
            input.rounding_policy,
        );
        return Ok(ProgressionOutput {
            working_load,
            target_reps: range.lo,
        });
    }

    let ready_to_add_load = input
        .last_session_sets
        .is_some_and(|sets| all_sets_hit_top_of_range(sets, range));

    if ready_to_add_load && input.direction == Direction::Increase {
        let working_load = scale_and_round(
            input.last_working_weight,
            &input.magnitude,
            input.rounding_policy,
        );
        return Ok(ProgressionOutput {
            working_load,
            target_reps: range.lo,
        });
    }

    // Still climbing reps at the current weight: one rep more than last
    // session's best working set, clamped to the range.
    let next_reps = input
        .last_session_sets
        .and_then(max_working_reps)
        .map(|reps| range.clamp(reps + 1))
        .unwrap_or(range.lo);

    Ok(ProgressionOutput {
        working_load: input.last_working_weight.round(input.rounding_policy),
        target_reps: next_reps,
    })
}
