//! RIR autoregulation (spec §4.4.4): nudge load based on how far last
//! session's observed reps-in-reserve sat from the prescription's target,
//! then let the Magnitude Policy's multiplier/increment apply on top.

use super::{scale_and_round, ProgressionInput, ProgressionOutput};
use crate::error::Result;
use crate::types::Direction;

fn average_observed_rir(input: &ProgressionInput) -> Option<f64> {
    let sets = input.last_session_sets?;
    let observed: Vec<f64> = sets
        .iter()
        .filter(|s| s.is_working_set())
        .filter_map(|s| s.rir_observed)
        .collect();
    if observed.is_empty() {
        return None;
    }
    Some(observed.iter().sum::<f64>() / observed.len() as f64)
}

pub fn compute(input: &ProgressionInput) -> Result<ProgressionOutput> {
    let target_reps = match input.direction {
        Direction::Increase => input.prescription.target_reps_range.lo,
        Direction::Hold
        | Direction::DecreaseSlightly
        | Direction::ResetAfterBreak
        | Direction::Deload => input.prescription.target_reps_range.hi,
    };

    let mut nudge = match average_observed_rir(input) {
        Some(avg_rir) => {
            let deviation = avg_rir - input.prescription.target_rir;
            (deviation * input.prescription.adjustment_per_rir)
                .clamp(-input.prescription.max_adjustment_per_set, input.prescription.max_adjustment_per_set)
        }
        None => 0.0,
    };
    if !input.prescription.allow_upward_adjustment && nudge > 0.0 {
        nudge = 0.0;
    }

    let nudged_base = input.last_working_weight.scale(1.0 + nudge);
    let working_load = scale_and_round(nudged_base, &input.magnitude, input.rounding_policy);

    Ok(ProgressionOutput {
        working_load,
        target_reps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{Load, RoundingMode, RoundingPolicy, Unit};
    use crate::types::{AdjustmentKind, LoadStrategy, Magnitude, RepRange, SetPrescription, SetResult};

    fn prescription() -> SetPrescription {
        SetPrescription::new(
            3,
            RepRange::new(5, 8).unwrap(),
            2.0,
            150,
            LoadStrategy::RpeAutoregulated,
            Load::new(5.0, Unit::Pounds),
        )
        .unwrap()
    }

    fn hold_magnitude() -> Magnitude {
        Magnitude {
            load_multiplier: 1.0,
            absolute_increment: Load::zero(Unit::Pounds),
            adjustment_kind: AdjustmentKind::None,
            volume_set_delta: 0,
        }
    }

    fn working_set(rir: f64) -> SetResult {
        SetResult {
            reps: 6,
            load: Load::new(200.0, Unit::Pounds),
            rir_observed: Some(rir),
            completed: true,
            is_warmup: false,
        }
    }

    #[test]
    fn higher_than_target_rir_nudges_load_up() {
        let prescription = prescription();
        let rounding = RoundingPolicy::new(5.0, Unit::Pounds, RoundingMode::Nearest);
        let sets = vec![working_set(4.0), working_set(4.0)]; // target is 2.0
        let input = ProgressionInput {
            prescription: &prescription,
            direction: Direction::Increase,
            magnitude: hold_magnitude(),
            last_working_weight: Load::new(200.0, Unit::Pounds),
            rolling_e1rm: 240.0,
            rounding_policy: &rounding,
            last_session_sets: Some(&sets),
        };
        let output = compute(&input).unwrap();
        assert!(output.working_load.value > 200.0);
    }

    #[test]
    fn lower_than_target_rir_nudges_load_down() {
        let prescription = prescription();
        let rounding = RoundingPolicy::new(5.0, Unit::Pounds, RoundingMode::Nearest);
        let sets = vec![working_set(0.0), working_set(0.0)];
        let input = ProgressionInput {
            prescription: &prescription,
            direction: Direction::Hold,
            magnitude: hold_magnitude(),
            last_working_weight: Load::new(200.0, Unit::Pounds),
            rolling_e1rm: 240.0,
            rounding_policy: &rounding,
            last_session_sets: Some(&sets),
        };
        let output = compute(&input).unwrap();
        assert!(output.working_load.value < 200.0);
    }

    #[test]
    fn no_observed_rir_leaves_load_unnudged() {
        let prescription = prescription();
        let rounding = RoundingPolicy::new(5.0, Unit::Pounds, RoundingMode::Nearest);
        let input = ProgressionInput {
            prescription: &prescription,
            direction: Direction::Hold,
            magnitude: hold_magnitude(),
            last_working_weight: Load::new(200.0, Unit::Pounds),
            rolling_e1rm: 240.0,
            rounding_policy: &rounding,
            last_session_sets: None,
        };
        let output = compute(&input).unwrap();
        assert_eq!(output.working_load.value, 200.0);
    }

    #[test]
    fn nudge_is_clamped() {
        let prescription = prescription();
        let rounding = RoundingPolicy::new(5.0, Unit::Pounds, RoundingMode::Nearest);
        let sets = vec![working_set(10.0)]; // wildly above target
        let input = ProgressionInput {
            prescription: &prescription,
            direction: Direction::Hold,
            magnitude: hold_magnitude(),
            last_working_weight: Load::new(200.0, Unit::Pounds),
            rolling_e1rm: 240.0,
            rounding_policy: &rounding,
            last_session_sets: Some(&sets),
        };
        let output = compute(&input).unwrap();
        // deviation (10 - 2) * 0.025 = 0.20, clamped to the prescription's
        // 0.10 max_adjustment_per_set; 200 * 1.10 = 220.
        assert_eq!(output.working_load.value, 220.0);
    }

    #[test]
    fn upward_nudge_clamped_to_zero_when_disallowed() {
        let prescription = prescription()
            .with_rir_adjustment_config(0.025, 0.10, false)
            .unwrap();
        let rounding = RoundingPolicy::new(5.0, Unit::Pounds, RoundingMode::Nearest);
        let sets = vec![working_set(4.0), working_set(4.0)]; // above target, would nudge up
        let input = ProgressionInput {
            prescription: &prescription,
            direction: Direction::Increase,
            magnitude: hold_magnitude(),
            last_working_weight: Load::new(200.0, Unit::Pounds),
            rolling_e1rm: 240.0,
            rounding_policy: &rounding,
            last_session_sets: Some(&sets),
        };
        let output = compute(&input).unwrap();
        assert_eq!(output.working_load.value, 200.0);
    }
}
