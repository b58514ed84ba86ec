//! Deload Policy: session-level decision to deload every lift in a
//! session at once (spec §4.5). Distinct from the Direction Policy's
//! per-lift `Deload` direction, which only fires once this policy has
//! already said yes.

use crate::types::{DeloadReason, E1rmSample, LiftSignals, ScheduleType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configurable knobs for the Deload Policy (spec §6 `DeloadConfig`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DeloadConfig {
    pub schedule_type: ScheduleType,
    /// Number of schedule periods between scheduled deloads.
    pub schedule_every_n_periods: u32,
    /// Ratio of the last 7 days' kg-volume to the preceding 28-day
    /// average weekly volume that, combined with low readiness, signals
    /// high accumulated fatigue (spec §4.5 rule 2).
    pub accumulated_fatigue_volume_ratio_threshold: f64,
    /// Today's readiness must fall below this for the volume-ratio
    /// trigger to fire (spec §4.5 rule 2).
    pub accumulated_fatigue_readiness_threshold: u8,
    /// Fraction the load is cut by when a session-level deload fires:
    /// `loadMultiplier = 1 - intensityReduction` (spec §6).
    pub intensity_reduction: f64,
    /// Working sets trimmed from every exercise when a session-level
    /// deload fires, floored at 1 remaining set.
    pub volume_reduction: u32,
    /// Whether the performance-decline trigger (spec §9 Open Question)
    /// is active at all. The spec leaves this an explicit implementer
    /// choice rather than a silent default, so it must be toggled on
    /// deliberately instead of being baked into the rule priority order.
    pub enable_performance_decline_trigger: bool,
}

impl Default for DeloadConfig {
    fn default() -> Self {
        Self {
            schedule_type: ScheduleType::Weekly,
            schedule_every_n_periods: 6,
            accumulated_fatigue_volume_ratio_threshold: 1.3,
            accumulated_fatigue_readiness_threshold: 60,
            intensity_reduction: 0.10,
            volume_reduction: 1,
            enable_performance_decline_trigger: false,
        }
    }
}

impl DeloadConfig {
    fn schedule_period_days(&self) -> i64 {
        let period_days = match self.schedule_type {
            ScheduleType::Weekly => 7,
            ScheduleType::Biweekly => 14,
            ScheduleType::Monthly => 30,
        };
        period_days * self.schedule_every_n_periods as i64
    }
}

/// Sum of `recent_volume_by_date` over the 7 days ending on (and
/// including) `today`, against the average weekly volume over the
/// trailing 28 days ending on `today`. `None` if there's no baseline to
/// compare against (division by zero).
fn accumulated_fatigue_ratio(
    recent_volume_by_date: &HashMap<NaiveDate, f64>,
    today: NaiveDate,
) -> Option<f64> {
    let recent_sum: f64 = (0..7)
        .map(|offset| {
            recent_volume_by_date
                .get(&(today - chrono::Duration::days(offset)))
                .copied()
                .unwrap_or(0.0)
        })
        .sum();

    let baseline_sum: f64 = (0..28)
        .map(|offset| {
            recent_volume_by_date
                .get(&(today - chrono::Duration::days(offset)))
                .copied()
                .unwrap_or(0.0)
        })
        .sum();
    let baseline_weekly_avg = baseline_sum / 4.0;

    if baseline_weekly_avg <= 0.0 {
        return None;
    }
    Some(recent_sum / baseline_weekly_avg)
}

/// Two consecutive declining e1RM samples within the most recent three
/// samples (spec §9 Open Question: "Two consecutive declining e1RM
/// samples in the most recent three samples of any main lift").
fn two_consecutive_declines_in_last_three(history: &[E1rmSample]) -> bool {
    if history.len() < 3 {
        return false;
    }
    let last_three = &history[history.len() - 3..];
    last_three[1].value < last_three[0].value && last_three[2].value < last_three[1].value
}

/// Decide whether the whole session should be a deload.
///
/// Scheduled deloads take priority over accumulated-fatigue ones, which
/// in turn take priority over the optional performance-decline trigger,
/// matching the Direction Policy's "first matching rule wins" shape.
pub fn decide_session_deload(
    today: NaiveDate,
    days_since_last_deload: Option<i64>,
    lift_signals: &[LiftSignals],
    recent_volume_by_date: &HashMap<NaiveDate, f64>,
    config: &DeloadConfig,
) -> Option<DeloadReason> {
    if days_since_last_deload.is_some_and(|d| d >= config.schedule_period_days()) {
        return Some(DeloadReason::ScheduledDeload);
    }

    if lift_signals.is_empty() {
        return None;
    }

    let today_readiness = lift_signals[0].today_readiness;
    if let Some(ratio) = accumulated_fatigue_ratio(recent_volume_by_date, today) {
        if ratio >= config.accumulated_fatigue_volume_ratio_threshold
            && today_readiness < config.accumulated_fatigue_readiness_threshold
        {
            return Some(DeloadReason::HighAccumulatedFatigue);
        }
    }

    if config.enable_performance_decline_trigger {
        let declining = lift_signals.iter().any(|s| {
            s.success_streak == 0 && two_consecutive_declines_in_last_three(s.e1rm_history)
        });
        if declining {
            return Some(DeloadReason::PerformanceDecline);
        }
    }

    None
}
