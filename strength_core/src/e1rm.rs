//! Estimated one-rep-max: Brzycki formula, rolling update, and trend
//! classification (spec §9 "e1RM / Brzycki formula", §4.7).

use crate::types::{E1rmSample, Trend};

/// Brzycki estimated 1RM: `load * 36 / (37 - reps)`. Reps must be < 37,
/// the point at which the formula diverges; reps >= 37 saturate at the
/// value for 36 reps rather than producing a negative or infinite result.
pub fn brzycki_e1rm(load: f64, reps: u32) -> f64 {
    let reps = reps.min(36).max(1);
    load * 36.0 / (37.0 - reps as f64)
}

/// Blend a freshly observed session e1RM into the rolling estimate.
/// `rolling = 0.3 * session + 0.7 * previous`, except the first sample
/// seeds the rolling value outright.
pub fn update_rolling_e1rm(previous_rolling: f64, session_e1rm: f64) -> f64 {
    if previous_rolling <= 0.0 {
        return session_e1rm;
    }
    0.3 * session_e1rm + 0.7 * previous_rolling
}

/// Minimum sample count for a trend verdict other than `Insufficient`.
const MIN_TREND_SAMPLES: usize = 3;

/// Number of most-recent samples considered for trend classification.
const TREND_WINDOW: usize = 6;

/// Fraction of the window's mean e1RM a session-over-session slope must
/// clear, in either direction, before the trend counts as
/// `Improving`/`Declining` rather than `Stable`. Relative rather than a
/// fixed absolute slope so the band scales with the lifter's own load —
/// a 0.5 kg/session drift is noise for a 300 kg squat and a real signal
/// for a 20 kg lateral raise.
const TREND_SENSITIVITY_BAND: f64 = 0.01;

/// Classify the trend of a lift's e1RM history via an ordinary
/// least-squares slope over the most recent samples, oldest first.
///
/// Samples must already be sorted by date ascending; this function does
/// not re-sort, preserving the caller's canonical accumulation order.
pub fn classify_trend(history: &[E1rmSample]) -> Trend {
    let window_start = history.len().saturating_sub(TREND_WINDOW);
    let window = &history[window_start..];

    if window.len() < MIN_TREND_SAMPLES {
        return Trend::Insufficient;
    }

    let n = window.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, sample) in window.iter().enumerate() {
        let x = i as f64;
        let y = sample.value;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = n * sum_xx - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return Trend::Stable;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let mean = sum_y / n;
    let threshold = mean.abs() * TREND_SENSITIVITY_BAND;

    if slope > threshold {
        Trend::Improving
    } else if slope < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Push a new sample onto an e1RM history, keeping only the most recent
/// 10 entries (spec invariant: `e1rm_history` caps at 10 samples).
pub fn push_e1rm_sample(history: &mut Vec<E1rmSample>, sample: E1rmSample) {
    history.push(sample);
    if history.len() > 10 {
        history.remove(0);
    }
}
