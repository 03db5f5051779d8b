use eyre::{bail, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Saturation bounds for words-per-minute values coming from the host.
pub const MIN_WPM: f64 = 50.0;
pub const MAX_WPM: f64 = 1500.0;

/// Characters counted as one "word" for duration purposes. A fixed density
/// convention, not a true word count, so ragged extraction artifacts pace
/// the same as clean prose.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Growth shape for the in-session WPM ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RampCurve {
    Linear,
    EaseIn,
    EaseOut,
}

impl Default for RampCurve {
    fn default() -> Self {
        RampCurve::Linear
    }
}

impl RampCurve {
    /// Map ramp progress in [0, 1] to curved progress in [0, 1].
    /// Monotonic, with f(0) = 0 and f(1) = 1.
    fn apply(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            RampCurve::Linear => x,
            RampCurve::EaseIn => x * x,
            RampCurve::EaseOut => 1.0 - (1.0 - x) * (1.0 - x),
        }
    }
}

impl FromStr for RampCurve {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(RampCurve::Linear),
            "ease-in" | "easein" => Ok(RampCurve::EaseIn),
            "ease-out" | "easeout" => Ok(RampCurve::EaseOut),
            other => bail!("unknown ramp curve: {}", other),
        }
    }
}

/// In-session WPM ramp configuration. `rate` is the WPM gained per
/// `interval_secs` of continuous play time; a non-positive rate or interval
/// disables the ramp entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampSettings {
    pub rate: f64,
    pub interval_secs: f64,
    /// Effective WPM starts at this percentage of the base WPM.
    pub start_percent: f64,
    pub curve: RampCurve,
}

impl Default for RampSettings {
    fn default() -> Self {
        Self {
            rate: 0.0,
            interval_secs: 15.0,
            start_percent: 70.0,
            curve: RampCurve::Linear,
        }
    }
}

impl RampSettings {
    pub fn is_enabled(&self) -> bool {
        self.rate > 0.0 && self.interval_secs > 0.0
    }
}

/// Display duration in milliseconds for a line of `char_count` characters at
/// `wpm`. Returns 0 for empty lines or a non-positive speed; otherwise
/// `(chars / 5) * (60000 / wpm)`.
pub fn saccade_line_duration_ms(char_count: usize, wpm: f64) -> f64 {
    if char_count == 0 || wpm <= 0.0 {
        return 0.0;
    }
    (char_count as f64 / CHARS_PER_WORD) * (60_000.0 / wpm)
}

/// Effective WPM after `elapsed_play_ms` of continuous play.
///
/// Starts at `start_percent%` of the (clamped) base and accumulates
/// `rate` WPM per `interval_secs`. Below the base the start-to-base gap is
/// traversed along the configured curve; past the base, growth continues
/// linearly at the same rate. Monotonic non-decreasing in elapsed time.
///
/// Elapsed time must cover play time only; the caller freezes it across a
/// pause/resume boundary.
pub fn effective_wpm(base_wpm: f64, elapsed_play_ms: f64, ramp: &RampSettings) -> f64 {
    let base = base_wpm.clamp(MIN_WPM, MAX_WPM);
    if !ramp.is_enabled() {
        return base;
    }

    let start_percent = ramp.start_percent.clamp(1.0, 100.0);
    let start = base * start_percent / 100.0;
    let gap = base - start;

    let elapsed_secs = elapsed_play_ms.max(0.0) / 1000.0;
    let gain = ramp.rate * (elapsed_secs / ramp.interval_secs);

    if gain >= gap {
        base + (gain - gap)
    } else {
        start + ramp.curve.apply(gain / gap) * gap
    }
}
