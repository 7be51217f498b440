use std::fmt;

use crate::foundation::error::{EaserError, EaserResult};
use crate::value::color::{Color, parse_color};
use crate::value::context::{LengthContext, TargetRef};
use crate::value::unit::Unit;

/// Raw declaration input: a bare number or a string such as `"12px"` or `"#fff"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Bare number.
    Number(f64),
    /// Unit-suffixed length, unitless number or color string.
    Text(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// How a transition writes to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// CSS-style property: lengths render with a unit suffix (`"12px"`).
    #[default]
    Style,
    /// Plain numeric property: values render as bare numbers.
    Value,
}

/// Typed, interpolable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// Unitless number.
    Scalar(f64),
    /// Number with a CSS length unit.
    Styled(f64, Unit),
    /// Canonical color.
    Color(Color),
}

impl Value {
    /// Short variant name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Styled(..) => "length",
            Self::Color(_) => "color",
        }
    }

    /// Unit carried by the value, if any.
    pub fn unit(&self) -> Option<Unit> {
        match self {
            Self::Styled(_, u) => Some(*u),
            _ => None,
        }
    }
}

/// Interpolation endpoints after unit reconciliation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoints {
    /// Numeric endpoints in `unit` (px whenever a conversion happened).
    Numeric {
        /// Start value.
        from: f64,
        /// End value.
        to: f64,
        /// Unit the numbers are expressed in.
        unit: Unit,
        /// `true` when at least one side was resolved to px through the context.
        converted: bool,
    },
    /// Color endpoints.
    Color {
        /// Start color.
        from: Color,
        /// End color.
        to: Color,
    },
}

/// Parses raw inputs into [`Value`]s and resolves relative units to pixels.
#[derive(Clone, Copy, Default)]
pub struct ValueConverter<'a> {
    mode: Mode,
    context: Option<&'a dyn LengthContext>,
    target: Option<&'a TargetRef>,
    property: Option<&'a str>,
}

impl fmt::Debug for ValueConverter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueConverter")
            .field("mode", &self.mode)
            .field("has_context", &self.context.is_some())
            .field("target", &self.target)
            .field("property", &self.property)
            .finish()
    }
}

impl<'a> ValueConverter<'a> {
    /// Converter with no context; only same-unit and px values can be reconciled.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Attach the layout metrics used for relative units.
    pub fn with_context(mut self, context: &'a dyn LengthContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach the target handed to the context for `em` and `%` lookups.
    pub fn with_target(mut self, target: &'a TargetRef) -> Self {
        self.target = Some(target);
        self
    }

    /// Associate the animated property, required for `%`.
    pub fn with_property(mut self, property: &'a str) -> Self {
        self.property = Some(property);
        self
    }

    /// Parse `raw` under this converter's mode.
    pub fn parse(&self, raw: &RawValue) -> EaserResult<Value> {
        parse(raw, self.mode)
    }

    /// Resolve a numeric value to pixels.
    pub fn resolve_to_pixels(&self, value: &Value) -> EaserResult<f64> {
        let (n, unit) = match *value {
            Value::Scalar(n) => return Ok(n),
            Value::Styled(n, unit) => (n, unit),
            Value::Color(_) => {
                return Err(EaserError::type_mismatch("a color has no pixel value"));
            }
        };
        if unit == Unit::Px {
            return Ok(n);
        }

        let ctx = self.context.ok_or_else(|| {
            EaserError::context(format!(
                "cannot resolve \"{n}{unit}\" without a length context"
            ))
        })?;
        let target = || {
            self.target.ok_or_else(|| {
                EaserError::context(format!("cannot resolve \"{n}{unit}\" without a target"))
            })
        };

        match unit {
            Unit::Px => Ok(n),
            Unit::Rem => Ok(n * ctx.root_font_size_px()?),
            Unit::Em => Ok(n * ctx.parent_font_size_px(target()?)?),
            Unit::Percent => {
                let property = self.property.ok_or_else(|| {
                    EaserError::config("a percentage needs an associated property")
                })?;
                Ok(ctx.parent_computed_value_px(target()?, property)? / 100.0 * n)
            }
            Unit::Vh => Ok(ctx.viewport_height_px()? / 100.0 * n),
            Unit::Vw => Ok(ctx.viewport_width_px()? / 100.0 * n),
        }
    }

    /// Bring `from` and `to` into one interpolable space.
    ///
    /// Same units stay as they are; otherwise every side carrying a unit is resolved to px and
    /// unitless sides are taken as px.
    pub fn reconcile(&self, from: &Value, to: &Value) -> EaserResult<Endpoints> {
        match (from, to) {
            (Value::Color(a), Value::Color(b)) => {
                return Ok(Endpoints::Color { from: *a, to: *b });
            }
            (Value::Color(_), _) | (_, Value::Color(_)) => {
                return Err(EaserError::type_mismatch(format!(
                    "cannot interpolate {} into {}",
                    from.kind_name(),
                    to.kind_name()
                )));
            }
            _ => {}
        }

        let number = |v: &Value| match *v {
            Value::Scalar(n) | Value::Styled(n, _) => n,
            Value::Color(_) => 0.0,
        };

        match (from.unit(), to.unit()) {
            (None, None) => Ok(Endpoints::Numeric {
                from: number(from),
                to: number(to),
                unit: Unit::Px,
                converted: false,
            }),
            (Some(a), Some(b)) if a == b => Ok(Endpoints::Numeric {
                from: number(from),
                to: number(to),
                unit: a,
                converted: false,
            }),
            (a, b) => Ok(Endpoints::Numeric {
                from: self.resolve_to_pixels(from)?,
                to: self.resolve_to_pixels(to)?,
                unit: Unit::Px,
                converted: a.is_some_and(Unit::is_relative) || b.is_some_and(Unit::is_relative),
            }),
        }
    }
}

/// Parse a raw input into a typed [`Value`].
///
/// Numbers and unitless strings become [`Value::Styled`] px in [`Mode::Style`] and
/// [`Value::Scalar`] otherwise. Strings are tried as colors first, then as `<number><unit>`.
pub fn parse(raw: &RawValue, mode: Mode) -> EaserResult<Value> {
    match raw {
        RawValue::Number(n) => {
            if !n.is_finite() {
                return Err(EaserError::parse(format!("non-finite number {n}")));
            }
            Ok(match mode {
                Mode::Style => Value::Styled(*n, Unit::Px),
                Mode::Value => Value::Scalar(*n),
            })
        }
        RawValue::Text(s) => match parse_color(s) {
            Some(color) => color.map(Value::Color),
            None => parse_length(s, mode),
        },
    }
}

fn parse_length(s: &str, mode: Mode) -> EaserResult<Value> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&c) = bytes.get(end) {
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return Err(EaserError::parse(format!("no numeric value in \"{s}\"")));
    }

    let number: f64 = s[..end]
        .parse()
        .map_err(|_| EaserError::parse(format!("invalid number \"{}\"", &s[digits_start..end])))?;
    let suffix = s[end..].trim();
    if suffix.is_empty() {
        return Ok(match mode {
            Mode::Style => Value::Styled(number, Unit::Px),
            Mode::Value => Value::Scalar(number),
        });
    }
    Ok(Value::Styled(number, suffix.parse()?))
}

#[cfg(test)]
#[path = "../../tests/unit/value/parse.rs"]
mod tests;
