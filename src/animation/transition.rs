use crate::animation::ease::Ease;
use crate::animation::runnable::Runnable;
use crate::foundation::core::{Fps, Millis};
use crate::foundation::error::EaserResult;
use crate::value::context::{LengthContext, TargetRef};
use crate::value::parse::{Mode, RawValue};

/// Immutable value-transition declaration: move `property` from `from` to `to` over `duration`.
///
/// Every builder method consumes the declaration and returns a new one:
///
/// ```
/// use easer::Transition;
///
/// let grow = Transition::new()
///     .from(0)
///     .to("12rem")
///     .property("width")
///     .duration(500);
/// assert_eq!(grow.duration_ms(), 500);
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Transition {
    from: Option<RawValue>,
    to: Option<RawValue>,
    property: Option<String>,
    #[serde(rename = "duration")]
    duration_ms: Millis,
    #[serde(rename = "delay")]
    delay_ms: Millis,
    mode: Mode,
    target: Option<TargetRef>,
    ease: Ease,
}

impl Transition {
    /// Empty declaration: style mode, zero duration, quadratic ease-in/out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration from JSON.
    pub fn from_json_str(s: &str) -> EaserResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Start value; defaults to `0`.
    pub fn from(self, value: impl Into<RawValue>) -> Self {
        Self {
            from: Some(value.into()),
            ..self
        }
    }

    /// End value (required).
    pub fn to(self, value: impl Into<RawValue>) -> Self {
        Self {
            to: Some(value.into()),
            ..self
        }
    }

    /// Property to animate (required).
    pub fn property(self, name: impl Into<String>) -> Self {
        Self {
            property: Some(name.into()),
            ..self
        }
    }

    /// Animation length in milliseconds.
    pub fn duration(self, ms: Millis) -> Self {
        Self {
            duration_ms: ms,
            ..self
        }
    }

    /// Wait before the first frame.
    pub fn delay(self, ms: Millis) -> Self {
        Self {
            delay_ms: ms,
            ..self
        }
    }

    /// Write CSS-style strings (the default).
    pub fn style(self) -> Self {
        Self {
            mode: Mode::Style,
            ..self
        }
    }

    /// Write bare numbers to a plain property.
    pub fn value(self) -> Self {
        Self {
            mode: Mode::Value,
            ..self
        }
    }

    /// Target handed to the length context for `em` and `%` lookups.
    pub fn target(self, target: impl Into<TargetRef>) -> Self {
        Self {
            target: Some(target.into()),
            ..self
        }
    }

    /// Easing curve.
    pub fn ease(self, ease: Ease) -> Self {
        Self { ease, ..self }
    }

    /// Quadratic ease-in/out.
    pub fn ease_in_out(self) -> Self {
        self.ease(Ease::InOutQuad)
    }

    /// Declared start value, if set.
    pub fn from_value(&self) -> Option<&RawValue> {
        self.from.as_ref()
    }

    /// Declared end value, if set.
    pub fn to_value(&self) -> Option<&RawValue> {
        self.to.as_ref()
    }

    /// Animation length in milliseconds.
    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    /// Delay before the first frame in milliseconds.
    pub fn delay_ms(&self) -> Millis {
        self.delay_ms
    }

    /// Application mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Target reference, if set.
    pub fn target_ref(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    /// Easing curve.
    pub fn easing(&self) -> Ease {
        self.ease
    }

    /// Property name as it will be applied.
    ///
    /// Style properties are written in camelCase, so `margin-top` becomes `marginTop`.
    pub fn property_name(&self) -> Option<String> {
        let name = self.property.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(match self.mode {
            Mode::Style => camel_case(name),
            Mode::Value => name.to_owned(),
        })
    }

    /// Build the executable node for this declaration.
    pub fn build(&self, context: Option<&dyn LengthContext>, fps: Fps) -> EaserResult<Runnable> {
        Runnable::new(self, context, fps)
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, part) in name.split('-').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
