//! Direction Policy: decides whether a lift should increase, hold, back
//! off slightly, deload, or reset after a break (spec §4.2).
//!
//! Rules are evaluated in strict priority order — the first matching rule
//! wins. This mirrors a priority-ordered `if`/`else if` chain rather than
//! a scored vote, so reordering rules changes behavior.

use crate::types::{Direction, DirectionDecision, DirectionReason, ExperienceLevel, LiftSignals, SessionIntent, Trend};
use serde::{Deserialize, Serialize};

/// Configurable thresholds for the Direction Policy (spec §6
/// `DirectionPolicyConfig`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DirectionPolicyConfig {
    /// Consecutive failed sessions (missed the prescription's rep-range
    /// floor) before the policy deloads the lift outright.
    pub failure_streak_threshold: u32,
    /// Consecutive high-RPE (grinder) sessions, short of outright
    /// failure, that count as a sustained fatigue signal.
    pub high_rpe_streak_threshold: u32,
    /// Gap, in days, past which a lift is treated as a training gap
    /// (break-reset tier 1, spec §4.3).
    pub training_gap_days: i64,
    /// Gap, in days, past which a lift is treated as an extended break
    /// subject to long-hiatus detraining (spec §4.2 rule 2).
    pub extended_break_days: i64,
    /// Readiness score (0-100) below which today's session is cut back.
    pub low_readiness_threshold: u8,
    /// Observed RIR at or below which a session counts as a grinder
    /// (RPE >= 8.5, i.e. RIR <= 1.5).
    pub grinder_rir_ceiling: f64,
}

impl Default for DirectionPolicyConfig {
    fn default() -> Self {
        Self {
            failure_streak_threshold: 2,
            high_rpe_streak_threshold: 2,
            training_gap_days: 8,
            extended_break_days: 14,
            low_readiness_threshold: 55,
            grinder_rir_ceiling: 1.5,
        }
    }
}

/// Decide the direction for a single lift given its signals.
///
/// Rule order (first match wins):
/// 1. Session-level deload in effect.
/// 2. Extended break (>= `extendedBreakDays` since last exposure).
/// 3. Training gap (`[trainingGapDays, extendedBreakDays)`).
/// 4. Cold start / insufficient data.
/// 5. Repeated failure streak (deload at the threshold; a single
///    failure for an experienced lifter on a hard day only backs off).
/// 6. Grinder set without failure — branches on experience, intent,
///    and how many grinder sessions have stacked up.
/// 7. Acute low readiness today.
/// 8. Declining e1RM trend with no active success streak.
/// 9. Clean target met at or above target RIR -> increase.
/// 10. Default -> hold.
pub fn decide_direction(signals: &LiftSignals, config: &DirectionPolicyConfig) -> DirectionDecision {
    let is_grinder = signals
        .last_session_avg_rir
        .is_some_and(|rir| rir <= config.grinder_rir_ceiling);

    let decision = if signals.session_deload {
        DirectionDecision {
            direction: Direction::Deload,
            primary_reason: DirectionReason::SessionDeload,
            explanation: "session-level deload is in effect".into(),
        }
    } else if signals
        .days_since_last_exposure
        .is_some_and(|d| d >= config.extended_break_days)
    {
        DirectionDecision {
            direction: Direction::ResetAfterBreak,
            primary_reason: DirectionReason::ExtendedBreak,
            explanation: format!(
                "{} days since last exposure exceeds the extended-break threshold",
                signals.days_since_last_exposure.unwrap()
            ),
        }
    } else if signals
        .days_since_last_exposure
        .is_some_and(|d| d >= config.training_gap_days)
    {
        DirectionDecision {
            direction: Direction::ResetAfterBreak,
            primary_reason: DirectionReason::TrainingGap,
            explanation: format!(
                "{} days since last exposure triggers a training-gap reset",
                signals.days_since_last_exposure.unwrap()
            ),
        }
    } else if signals.days_since_last_exposure.is_none()
        || (signals.successful_sessions_count < 2 && signals.last_working_weight.is_none())
    {
        DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::InsufficientData,
            explanation: "no prior working weight or successful session recorded".into(),
        }
    } else if signals.fail_streak >= config.failure_streak_threshold {
        DirectionDecision {
            direction: Direction::Deload,
            primary_reason: DirectionReason::RepeatedFailures,
            explanation: format!("{} consecutive failed sessions", signals.fail_streak),
        }
    } else if signals.fail_streak == 1
        && signals.experience >= ExperienceLevel::Intermediate
        && matches!(signals.session_intent, SessionIntent::Heavy | SessionIntent::General)
    {
        DirectionDecision {
            direction: Direction::DecreaseSlightly,
            primary_reason: DirectionReason::MinorFatigueSignal,
            explanation: "single failure on a hard day for an experienced lifter".into(),
        }
    } else if is_grinder {
        grinder_decision(signals)
    } else if signals.today_readiness < config.low_readiness_threshold {
        DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::AcuteReadiness,
            explanation: format!(
                "today's readiness score {} is below threshold",
                signals.today_readiness
            ),
        }
    } else if signals.trend == Trend::Declining && signals.success_streak == 0 {
        DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::TrendCaution,
            explanation: "e1RM trend is declining; holding rather than pushing further".into(),
        }
    } else if signals.last_session_met_lower_bound
        && signals
            .last_session_avg_rir
            .is_some_and(|rir| rir >= signals.prescription.target_rir)
    {
        DirectionDecision {
            direction: Direction::Increase,
            primary_reason: DirectionReason::MetTarget,
            explanation: "last session met the prescription's rep target".into(),
        }
    } else {
        DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::MaintainLoad,
            explanation: "no rule triggered a change; maintaining current load".into(),
        }
    };

    tracing::info!(
        exercise_id = signals.exercise_id,
        direction = ?decision.direction,
        reason = ?decision.primary_reason,
        "direction policy decision"
    );

    decision
}

/// Rule 6: a grinder session (RPE >= 8.5) that didn't outright fail.
/// A beginner is never pushed past a grinder set. An experienced lifter
/// backs off on a heavy/general/volume day, or once a light day's
/// grinder effort has stacked up; a single grinder on a light day is
/// tolerated.
fn grinder_decision(signals: &LiftSignals) -> DirectionDecision {
    if signals.experience == ExperienceLevel::Beginner {
        return DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::GrinderSuccess,
            explanation: "beginner grinder set; holding rather than pushing further".into(),
        };
    }

    let sustained_on_light_day =
        signals.session_intent == SessionIntent::Light && signals.high_rpe_streak <= 1;

    if sustained_on_light_day {
        DirectionDecision {
            direction: Direction::Hold,
            primary_reason: DirectionReason::GrinderSuccess,
            explanation: "light-day grinder effort, not yet sustained".into(),
        }
    } else {
        DirectionDecision {
            direction: Direction::DecreaseSlightly,
            primary_reason: DirectionReason::MinorFatigueSignal,
            explanation: "grinder-level effort on a heavy/general/volume day or repeated on a light day".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{Load, Unit};
    use crate::types::{
        BiologicalSex, LoadStrategy, MovementPattern, RepRange, SetPrescription,
    };

    fn base_prescription() -> SetPrescription {
        SetPrescription::new(
            3,
            RepRange::new(5, 8).unwrap(),
            2.0,
            120,
            LoadStrategy::Absolute,
            Load::new(5.0, Unit::Pounds),
        )
        .unwrap()
    }

    fn base_signals<'a>(prescription: &'a SetPrescription) -> LiftSignals<'a> {
        LiftSignals {
            exercise_id: "back_squat",
            prescription,
            last_working_weight: Some(Load::new(225.0, Unit::Pounds)),
            rolling_e1rm: 280.0,
            fail_streak: 0,
            high_rpe_streak: 0,
            days_since_last_exposure: Some(3),
            days_since_last_deload: Some(20),
            trend: Trend::Stable,
            success_streak: 2,
            successful_sessions_count: 5,
            last_session_avg_rir: Some(2.0),
            last_session_met_lower_bound: true,
            today_readiness: 75,
            recent_readiness_scores: &[75, 80, 70],
            experience: ExperienceLevel::Intermediate,
            sex: BiologicalSex::Male,
            body_weight: Load::new(180.0, Unit::Pounds),
            session_deload: false,
            session_intent: SessionIntent::General,
            movement_pattern: MovementPattern::Squat,
            last_session_sets: None,
            e1rm_history: &[],
        }
    }

    #[test]
    fn session_deload_overrides_everything() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.session_deload = true;
        signals.fail_streak = 10; // would otherwise also match a rule below
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Deload);
        assert_eq!(decision.primary_reason, DirectionReason::SessionDeload);
    }

    #[test]
    fn extended_break_resets() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.days_since_last_exposure = Some(90);
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::ResetAfterBreak);
        assert_eq!(decision.primary_reason, DirectionReason::ExtendedBreak);
    }

    #[test]
    fn training_gap_resets_but_not_as_extended_break() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.days_since_last_exposure = Some(10);
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::ResetAfterBreak);
        assert_eq!(decision.primary_reason, DirectionReason::TrainingGap);
    }

    #[test]
    fn insufficient_data_without_known_gap() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.days_since_last_exposure = None;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::InsufficientData);
    }

    #[test]
    fn insufficient_data_with_few_sessions_and_no_prior_weight() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.last_working_weight = None;
        signals.successful_sessions_count = 1;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::InsufficientData);
    }

    #[test]
    fn repeated_failures_trigger_deload() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.fail_streak = 2;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Deload);
        assert_eq!(decision.primary_reason, DirectionReason::RepeatedFailures);
    }

    #[test]
    fn single_failure_on_heavy_day_for_intermediate_backs_off_slightly() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.fail_streak = 1;
        signals.session_intent = SessionIntent::Heavy;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::DecreaseSlightly);
        assert_eq!(decision.primary_reason, DirectionReason::MinorFatigueSignal);
    }

    #[test]
    fn single_failure_on_light_day_for_intermediate_does_not_back_off() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.fail_streak = 1;
        signals.session_intent = SessionIntent::Light;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_ne!(decision.primary_reason, DirectionReason::MinorFatigueSignal);
    }

    #[test]
    fn beginner_grinder_holds() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.experience = ExperienceLevel::Beginner;
        signals.last_session_avg_rir = Some(0.5);
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::GrinderSuccess);
    }

    #[test]
    fn intermediate_grinder_on_general_day_backs_off() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.last_session_avg_rir = Some(0.5);
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::DecreaseSlightly);
        assert_eq!(decision.primary_reason, DirectionReason::MinorFatigueSignal);
    }

    #[test]
    fn intermediate_grinder_on_light_day_first_time_holds() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.last_session_avg_rir = Some(0.5);
        signals.session_intent = SessionIntent::Light;
        signals.high_rpe_streak = 0;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::GrinderSuccess);
    }

    #[test]
    fn low_readiness_triggers_hold() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.today_readiness = 20;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::AcuteReadiness);
    }

    #[test]
    fn declining_trend_with_no_success_streak_holds() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.trend = Trend::Declining;
        signals.success_streak = 0;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::TrendCaution);
    }

    #[test]
    fn declining_trend_with_active_success_streak_still_increases() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.trend = Trend::Declining;
        signals.success_streak = 3;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Increase);
    }

    #[test]
    fn met_target_at_or_above_target_rir_increases() {
        let prescription = base_prescription();
        let signals = base_signals(&prescription);
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Increase);
        assert_eq!(decision.primary_reason, DirectionReason::MetTarget);
    }

    #[test]
    fn met_target_below_target_rir_does_not_increase() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.last_session_avg_rir = Some(1.8); // below target_rir of 2.0, above grinder ceiling
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::MaintainLoad);
    }

    #[test]
    fn default_fallback_maintains_load() {
        let prescription = base_prescription();
        let mut signals = base_signals(&prescription);
        signals.last_session_met_lower_bound = false;
        let decision = decide_direction(&signals, &DirectionPolicyConfig::default());
        assert_eq!(decision.direction, Direction::Hold);
        assert_eq!(decision.primary_reason, DirectionReason::MaintainLoad);
    }
}
