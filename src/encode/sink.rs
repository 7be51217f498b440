use std::fmt;

use crate::foundation::core::format_number;
use crate::foundation::error::EaserResult;

/// Value handed to a [`Sink`]: a CSS-style string or a bare number.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderedValue {
    /// Rendered string such as `"12.5px"` or `"rgba(0,0,0,1)"`.
    Text(String),
    /// Bare number for plain properties.
    Number(f64),
}

impl RenderedValue {
    /// Borrow the string form, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// The numeric form, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(v) => f.write_str(&format_number(*v, 6)),
        }
    }
}

/// Target that receives rendered values.
///
/// Ordering contract: values for one property arrive in frame order, and the last value applied
/// for a transition that played to completion is its declared end value.
pub trait Sink {
    /// Write `value` to `property` on the target.
    fn apply(&mut self, property: &str, value: &RenderedValue) -> EaserResult<()>;

    /// Called by the runtime with the clock time before each tick's `apply`.
    fn on_tick(&mut self, _now_ms: f64) {}
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn apply(&mut self, property: &str, value: &RenderedValue) -> EaserResult<()> {
        (**self).apply(property, value)
    }

    fn on_tick(&mut self, now_ms: f64) {
        (**self).on_tick(now_ms);
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn apply(&mut self, property: &str, value: &RenderedValue) -> EaserResult<()> {
        (**self).apply(property, value)
    }

    fn on_tick(&mut self, now_ms: f64) {
        (**self).on_tick(now_ms);
    }
}

/// One value received by a [`RecordingSink`].
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    /// Clock time of the tick that applied the value.
    pub at_ms: f64,
    /// Property name.
    pub property: String,
    /// Rendered value.
    pub value: RenderedValue,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSink {
    now_ms: f64,
    /// Values in the order they were applied.
    pub(crate) applied: Vec<Applied>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow everything applied so far.
    pub fn applied(&self) -> &[Applied] {
        &self.applied
    }

    /// Values applied to one property, in order.
    pub fn values_for<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a RenderedValue> {
        self.applied
            .iter()
            .filter(move |a| a.property == property)
            .map(|a| &a.value)
    }

    /// Last value applied to `property`.
    pub fn last_for(&self, property: &str) -> Option<&RenderedValue> {
        self.applied
            .iter()
            .rev()
            .find(|a| a.property == property)
            .map(|a| &a.value)
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.applied.clear();
    }
}

impl Sink for RecordingSink {
    fn apply(&mut self, property: &str, value: &RenderedValue) -> EaserResult<()> {
        self.applied.push(Applied {
            at_ms: self.now_ms,
            property: property.to_owned(),
            value: value.clone(),
        });
        Ok(())
    }

    fn on_tick(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
