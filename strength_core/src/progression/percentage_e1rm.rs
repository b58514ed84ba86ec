//! Percentage-of-e1RM (spec §4.4.5): every working set is prescribed as
//! a percentage of the rolling e1RM, derived via the Brzycki formula
//! from the prescription's target rep count.

use super::{scale_and_round, ProgressionInput, ProgressionOutput};
use crate::error::{Error, Result};
use crate::load::Load;

/// The percentage table is keyed off the prescription's rep target
/// directly; direction only scales the result via the Magnitude Policy,
/// same as every other strategy's `scale_and_round` call.
pub fn compute(input: &ProgressionInput) -> Result<ProgressionOutput> {
    let target_reps = input.prescription.target_reps_range.lo;

    if input.rolling_e1rm <= 0.0 {
        if input.last_working_weight.value <= 0.0 {
            return Err(Error::InsufficientHistoryForStrategy(
                "percentage_e1rm requires a rolling e1RM or a last working weight".into(),
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

    let reps = target_reps.min(36).max(1) as f64;
    let percentage_of_e1rm = (37.0 - reps) / 36.0;
    let base = Load::new(
        input.rolling_e1rm * percentage_of_e1rm,
        input.last_working_weight.unit,
    );

    let working_load = scale_and_round(base, &input.magnitude, input.rounding_policy);

    Ok(ProgressionOutput {
        working_load,
        target_reps,
    })
}
