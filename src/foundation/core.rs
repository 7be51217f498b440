use crate::foundation::error::{EaserError, EaserResult};

/// Duration or delay in whole milliseconds.
pub type Millis = u64;

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Frame rate used to sample transitions.
    pub const SIXTY: Self = Self { num: 60, den: 1 };

    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> EaserResult<Self> {
        if den == 0 {
            return Err(EaserError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(EaserError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in milliseconds.
    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames sampled for `duration_ms`, using floor semantics.
    ///
    /// `floor(fps * duration_ms / 1000)`, computed in integers so 1000ms at 60fps is exactly 60.
    pub fn frame_count(self, duration_ms: Millis) -> usize {
        let frames = u128::from(duration_ms) * u128::from(self.num)
            / (1000 * u128::from(self.den));
        usize::try_from(frames).unwrap_or(usize::MAX)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self::SIXTY
    }
}

/// Round `v` to one decimal place, the precision used for rendered lengths.
pub(crate) fn round_tenth(v: f64) -> f64 {
    let r = (v * 10.0).round() / 10.0;
    // Avoid rendering "-0".
    if r == 0.0 { 0.0 } else { r }
}

/// Format a number without a trailing `.0` and with at most `max_decimals` decimals.
pub(crate) fn format_number(v: f64, max_decimals: usize) -> String {
    let s = format!("{v:.max_decimals$}");
    if !s.contains('.') {
        return s;
    }
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
