//! Linear progression (spec §4.4.1): add a fixed, movement-pattern-sized
//! increment every time the direction policy says to increase; otherwise
//! scale by the magnitude's multiplier.

use super::{scale_and_round, ProgressionInput, ProgressionOutput};
use crate::error::Result;
use crate::types::Direction;

pub fn compute(input: &ProgressionInput) -> Result<ProgressionOutput> {
    let working_load = scale_and_round(
        input.last_working_weight,
        &input.magnitude,
        input.rounding_policy,
    );

    let target_reps = match input.direction {
        // A heavier load is prescribed at the bottom of the rep range.
        Direction::Increase => input.prescription.target_reps_range.lo,
        Direction::Hold => input.prescription.target_reps_range.hi,
        // A lighter load leaves room to work at the top of the range.
        Direction::DecreaseSlightly | Direction::ResetAfterBreak | Direction::Deload => {
            input.prescription.target_reps_range.hi
        }
    };

    Ok(ProgressionOutput {
        working_load,
        target_reps,
    })
}
