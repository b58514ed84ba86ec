//! State Update: recomputes a lift's persisted state from a completed
//! session (spec §4.7). Pure function — takes the prior state and a
//! session result, returns the next state; never mutates in place.

use crate::e1rm::{brzycki_e1rm, classify_trend, push_e1rm_sample, update_rolling_e1rm};
use crate::error::Result;
use crate::types::{E1rmSample, ExerciseSessionResult, LiftState};
use chrono::NaiveDate;

/// Minimum RIR for a set to count toward the high-RPE streak (mirrors
/// `SetResult::is_grinder`'s RPE >= 8.5 / RIR <= 1 threshold).
const GRINDER_RIR_CEILING: f64 = 1.0;

/// Step 1-8 of the post-session recompute, in the order spec §4.7 lists
/// them:
/// 1. Identify working sets.
/// 2. Compute this session's e1RM from the best working set.
/// 3. Blend it into the rolling e1RM.
/// 4. Append to (and cap) the e1RM history.
/// 5. Update `last_working_weight` from the heaviest completed working set.
/// 6. Update failure/success streaks against the prescription's rep floor.
/// 7. Update the high-RPE (grinder) streak.
/// 8. Update deload/session dates and recompute the trend.
pub fn apply_session_update(
    prior: &LiftState,
    result: &ExerciseSessionResult,
    session_date: NaiveDate,
    was_deload: bool,
) -> Result<LiftState> {
    // 1. Working sets only; warmups and incomplete sets don't count.
    let working: Vec<_> = result.sets.iter().filter(|s| s.is_working_set()).collect();

    if working.is_empty() {
        return Ok(prior.clone());
    }

    let mut next = prior.clone();

    // 2. Best working set by estimated 1RM, not just heaviest load —
    // a higher-rep set at lower weight can project a higher e1RM.
    let session_e1rm = working
        .iter()
        .map(|s| brzycki_e1rm(s.load.value, s.reps))
        .fold(0.0_f64, f64::max);

    // 3.
    next.rolling_e1rm = update_rolling_e1rm(prior.rolling_e1rm, session_e1rm);

    // 4.
    push_e1rm_sample(
        &mut next.e1rm_history,
        E1rmSample {
            date: session_date,
            value: session_e1rm,
        },
    );

    // 5. Heaviest completed working set's load, in its own unit.
    let heaviest = working
        .iter()
        .map(|s| s.load)
        .fold(working[0].load, |acc, load| {
            if load.value_in(acc.unit) > acc.value {
                load
            } else {
                acc
            }
        });
    next.last_working_weight = heaviest;

    // 6. Met the prescription's rep floor on every working set?
    let met_floor = working
        .iter()
        .all(|s| s.reps >= result.prescription.target_reps_range.lo);
    if met_floor {
        next.failure_count = 0;
        next.success_streak = prior.success_streak + 1;
        next.successful_sessions_count = prior.successful_sessions_count + 1;
    } else {
        next.failure_count = prior.failure_count + 1;
        next.success_streak = 0;
    }

    // 7. Any grinder-level set extends the high-RPE streak; a clean
    // session resets it.
    let any_grinder = working
        .iter()
        .any(|s| s.rir_observed.is_some_and(|rir| rir <= GRINDER_RIR_CEILING));
    next.high_rpe_streak = if any_grinder {
        prior.high_rpe_streak + 1
    } else {
        0
    };

    // 8.
    if was_deload {
        next.last_deload_date = Some(session_date);
    }
    next.last_session_date = Some(session_date);
    next.trend = classify_trend(&next.e1rm_history);

    next.check_invariants()?;
    Ok(next)
}
