//! Load, units, and plate-step rounding (spec §3, §4.1).
//!
//! `Load` is a non-negative scalar with a unit. Internal computations stay
//! in unrounded `f64`; rounding is applied only at the boundary where a
//! `SetPlan.targetLoad` or a `LiftState.lastWorkingWeight` is produced.

use serde::{Deserialize, Serialize};

/// 1 kg = this many lb. Fixed by spec; used for all unit conversions.
pub const KG_TO_LB: f64 = 2.2046226218;

/// Unit a `Load` is expressed in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Pounds,
    Kilograms,
}

/// A non-negative scalar load in a given unit. Negative values clamp to
/// zero at construction time — `Load` can never represent a negative
/// weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Load {
    pub value: f64,
    pub unit: Unit,
}

impl Load {
    /// Construct a `Load`, clamping negative inputs to zero.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            value: value.max(0.0),
            unit,
        }
    }

    pub fn zero(unit: Unit) -> Self {
        Self { value: 0.0, unit }
    }

    /// Convert to the target unit, returning a new `Load`.
    pub fn convert_to(self, target: Unit) -> Self {
        if self.unit == target {
            return self;
        }
        let value = match (self.unit, target) {
            (Unit::Kilograms, Unit::Pounds) => self.value * KG_TO_LB,
            (Unit::Pounds, Unit::Kilograms) => self.value / KG_TO_LB,
            _ => unreachable!("equal units handled above"),
        };
        Load { value, unit: target }
    }

    /// Value expressed in the given unit, without constructing a new `Load`.
    pub fn value_in(self, unit: Unit) -> f64 {
        self.convert_to(unit).value
    }

    /// Scale by a non-negative multiplier. Negative multipliers clamp the
    /// result to zero rather than producing a negative load.
    pub fn scale(self, multiplier: f64) -> Self {
        Load::new(self.value * multiplier, self.unit)
    }

    /// Add another load, converting it into `self`'s unit first.
    pub fn add(self, other: Load) -> Self {
        Load::new(self.value + other.value_in(self.unit), self.unit)
    }

    /// Round this load under the given policy, returning it in the
    /// policy's unit.
    pub fn round(self, policy: &RoundingPolicy) -> Load {
        policy.round(self)
    }
}

impl PartialOrd for Load {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value_in(Unit::Kilograms)
            .partial_cmp(&other.value_in(Unit::Kilograms))
    }
}

/// Rounding mode applied when quantizing to a plate-step increment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Half-up at exactly 0.5 of an increment (no banker's rounding).
    Nearest,
    Down,
    Up,
}

/// Quantizes loads to plate-achievable values in a fixed unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundingPolicy {
    pub increment: f64,
    pub unit: Unit,
    pub mode: RoundingMode,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(5.0, Unit::Pounds, RoundingMode::Nearest)
    }
}

impl RoundingPolicy {
    pub fn new(increment: f64, unit: Unit, mode: RoundingMode) -> Self {
        assert!(increment > 0.0, "rounding increment must be positive");
        Self {
            increment,
            unit,
            mode,
        }
    }

    /// Quantize a load to this policy's increment, returned in this
    /// policy's unit.
    pub fn round(&self, load: Load) -> Load {
        let value = load.value_in(self.unit);
        let steps = value / self.increment;
        let rounded_steps = match self.mode {
            RoundingMode::Down => steps.floor(),
            RoundingMode::Up => steps.ceil(),
            RoundingMode::Nearest => (steps + 0.5).floor(),
        };
        Load::new(rounded_steps * self.increment, self.unit)
    }

    /// True if `load` is already a multiple of `increment` (in this
    /// policy's unit) within the given tolerance.
    pub fn is_quantized(&self, load: Load, tolerance: f64) -> bool {
        let value = load.value_in(self.unit);
        let steps = value / self.increment;
        (steps - steps.round()).abs() <= tolerance / self.increment
    }
}
