use crate::encode::sink::RenderedValue;
use crate::foundation::core::{format_number, round_tenth};
use crate::value::color::Color;
use crate::value::unit::Unit;

/// One sampled interpolation result, tagged with the mode that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Length written to a style property.
    Style(f64),
    /// Number written to a plain property.
    Value(f64),
    /// `[r, g, b, a]` color.
    Color([f64; 4]),
}

impl Frame {
    /// Render an intermediate frame: lengths are rounded to a tenth of `unit`.
    pub fn render(&self, unit: Unit) -> RenderedValue {
        match *self {
            Self::Style(v) => {
                RenderedValue::Text(format!("{}{}", format_number(round_tenth(v), 1), unit.suffix()))
            }
            Self::Value(v) => RenderedValue::Number(v),
            Self::Color(c) => RenderedValue::Text(Color::from_channels(c).to_css()),
        }
    }

    /// Render a declared endpoint without tenth rounding.
    pub fn render_exact(&self, unit: Unit) -> RenderedValue {
        match *self {
            Self::Style(v) => {
                RenderedValue::Text(format!("{}{}", format_number(v, 4), unit.suffix()))
            }
            _ => self.render(unit),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/frame.rs"]
mod tests;
