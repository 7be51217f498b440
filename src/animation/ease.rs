/// Easing curves used to map normalized animation progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    #[default]
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => ease(t, 0.0, 1.0, 1.0),
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// Sample at elapsed time `t` of `duration`, moving from `start` by `change`.
    pub fn sample(self, t: f64, start: f64, change: f64, duration: f64) -> f64 {
        match self {
            Self::InOutQuad => ease(t, start, change, duration),
            _ if duration <= 0.0 => start + change,
            _ => start + change * self.apply(t / duration),
        }
    }
}

/// Quadratic ease-in/out in Penner form.
///
/// `t` is elapsed time, `start` the start value, `change` the total change and `duration` the
/// total time. `ease(0, b, c, d) == b` and `ease(d, b, c, d) == b + c`.
pub fn ease(t: f64, start: f64, change: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return start + change;
    }
    let u = t / (duration / 2.0);
    if u < 1.0 {
        return start + change / 2.0 * u * u;
    }
    let u = u - 1.0;
    start + change / 2.0 * -(u * (u - 2.0) - 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
