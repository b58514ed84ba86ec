//! Magnitude Policy: turns a `Direction` into a concrete load change
//! (spec §4.3) — experience-scaled increments, break-reset tiers keyed
//! on days since last exposure, and the session-deload intensity cut.

use crate::load::{Load, Unit};
use crate::types::{AdjustmentKind, Direction, DirectionReason, ExperienceLevel, Magnitude, MovementPattern};
use serde::{Deserialize, Serialize};

/// Per-movement-pattern increment cap in pounds, applied after the
/// experience scale so no lifter's increment ever exceeds it regardless
/// of the prescription's configured increment.
fn increment_cap_lb(pattern: MovementPattern) -> f64 {
    use MovementPattern::*;
    match pattern {
        Squat | HipHinge => 10.0,
        HorizontalPush | VerticalPush | HorizontalPull | VerticalPull => 5.0,
        KneeExtension | KneeFlexion => 5.0,
        ShoulderAbduction | ShoulderFlexion | ElbowFlexion | ElbowExtension => 2.5,
    }
}

/// Per-movement-pattern increment cap in kilograms. Kept as its own
/// table rather than a conversion of `increment_cap_lb` so the caps
/// land on the round numbers a kg-plated lifter actually loads.
fn increment_cap_kg(pattern: MovementPattern) -> f64 {
    use MovementPattern::*;
    match pattern {
        Squat | HipHinge => 5.0,
        HorizontalPush | VerticalPush | HorizontalPull | VerticalPull => 2.5,
        KneeExtension | KneeFlexion => 2.5,
        ShoulderAbduction | ShoulderFlexion | ElbowFlexion | ElbowExtension => 1.0,
    }
}

/// Increment cap in `unit`, selected directly from the unit's own table
/// rather than converted from the other — spec §4.3 treats the two as
/// independent caps, not unit conversions of one canonical value.
fn increment_cap(pattern: MovementPattern, unit: Unit) -> f64 {
    match unit {
        Unit::Pounds => increment_cap_lb(pattern),
        Unit::Kilograms => increment_cap_kg(pattern),
    }
}

/// Experience-scaled fraction of the prescription's base increment a
/// lifter actually gets: beginners progress fastest, elite lifters
/// slowest.
fn experience_increment_scale(experience: ExperienceLevel) -> f64 {
    match experience {
        ExperienceLevel::Beginner => 1.0,
        ExperienceLevel::Intermediate => 0.8,
        ExperienceLevel::Advanced => 0.6,
        ExperienceLevel::Elite => 0.5,
    }
}

/// Fraction shaved off load on a `decreaseSlightly` direction, scaled by
/// experience: more experienced lifters get a slightly deeper cut since
/// they can tolerate (and need) a more decisive correction.
fn acute_reduction(experience: ExperienceLevel) -> f64 {
    match experience {
        ExperienceLevel::Beginner => 0.02,
        ExperienceLevel::Intermediate => 0.03,
        ExperienceLevel::Advanced => 0.04,
        ExperienceLevel::Elite => 0.05,
    }
}

/// Configurable knobs for the Magnitude Policy (spec §6 `MagnitudePolicyConfig`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct MagnitudePolicyConfig {
    /// Break-reset multiplier for an 8-13 day gap.
    pub break_tier_1_multiplier: f64,
    /// Break-reset multiplier for a 14-27 day gap.
    pub break_tier_2_multiplier: f64,
    /// Break-reset multiplier for a 28-55 day gap.
    pub break_tier_3_multiplier: f64,
    /// Break-reset multiplier for a 56-83 day gap.
    pub break_tier_4_multiplier: f64,
    /// Break-reset multiplier for a gap of 84 days or more.
    pub break_tier_5_multiplier: f64,
    /// Working sets trimmed from an exercise's prescription on an
    /// acute-readiness hold (spec's `DeloadConfig.volumeReduction`,
    /// reused here since the readiness cut is a per-lift decision, not
    /// a session-level one).
    pub readiness_cut_volume_reduction: u32,
}

impl Default for MagnitudePolicyConfig {
    fn default() -> Self {
        Self {
            break_tier_1_multiplier: 0.95,
            break_tier_2_multiplier: 0.90,
            break_tier_3_multiplier: 0.85,
            break_tier_4_multiplier: 0.80,
            break_tier_5_multiplier: 0.75,
            readiness_cut_volume_reduction: 1,
        }
    }
}

impl MagnitudePolicyConfig {
    /// Break-reset multiplier for a gap of `days` since last exposure.
    /// Callers only invoke this once the direction policy has already
    /// classified the gap as `TrainingGap`/`ExtendedBreak` (>= 8 days).
    fn break_tier_multiplier(&self, days: i64) -> f64 {
        match days {
            d if d >= 84 => self.break_tier_5_multiplier,
            d if d >= 56 => self.break_tier_4_multiplier,
            d if d >= 28 => self.break_tier_3_multiplier,
            d if d >= 14 => self.break_tier_2_multiplier,
            _ => self.break_tier_1_multiplier,
        }
    }
}

/// Compute the magnitude of a prescribed change for one lift.
///
/// `base_increment` and `current_unit` come from the exercise's own
/// prescription; callers convert as needed before applying the result to
/// a `Load` in another unit.
#[allow(clippy::too_many_arguments)]
pub fn compute_magnitude(
    direction: Direction,
    reason: DirectionReason,
    movement_pattern: MovementPattern,
    experience: ExperienceLevel,
    base_increment: Load,
    days_since_last_exposure: Option<i64>,
    current_unit: Unit,
    config: &MagnitudePolicyConfig,
    deload: &crate::deload::DeloadConfig,
) -> Magnitude {
    match direction {
        Direction::Increase => {
            let scale = experience_increment_scale(experience);
            let cap = increment_cap(movement_pattern, current_unit);
            let scaled = (base_increment.convert_to(current_unit).value * scale).min(cap);
            Magnitude {
                load_multiplier: 1.0,
                absolute_increment: Load::new(scaled, current_unit),
                adjustment_kind: AdjustmentKind::Progression,
                volume_set_delta: 0,
            }
        }
        Direction::Hold => {
            let (kind, volume_set_delta) = if reason == DirectionReason::AcuteReadiness {
                (AdjustmentKind::ReadinessCut, config.readiness_cut_volume_reduction)
            } else {
                (AdjustmentKind::None, 0)
            };
            Magnitude {
                load_multiplier: 1.0,
                absolute_increment: Load::zero(current_unit),
                adjustment_kind: kind,
                volume_set_delta,
            }
        }
        Direction::DecreaseSlightly => Magnitude {
            load_multiplier: 1.0 - acute_reduction(experience),
            absolute_increment: Load::zero(current_unit),
            adjustment_kind: AdjustmentKind::ReadinessCut,
            volume_set_delta: 0,
        },
        Direction::ResetAfterBreak => {
            let days = days_since_last_exposure.unwrap_or(0);
            Magnitude {
                load_multiplier: config.break_tier_multiplier(days),
                absolute_increment: Load::zero(current_unit),
                adjustment_kind: AdjustmentKind::BreakReset,
                volume_set_delta: 0,
            }
        }
        Direction::Deload => Magnitude {
            load_multiplier: 1.0 - deload.intensity_reduction,
            absolute_increment: Load::zero(current_unit),
            adjustment_kind: AdjustmentKind::Deload,
            volume_set_delta: deload.volume_reduction,
        },
    }
}
