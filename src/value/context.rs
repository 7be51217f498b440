use std::collections::BTreeMap;

use crate::foundation::error::{EaserError, EaserResult};

/// Opaque reference to the visual target a transition animates.
///
/// Selecting what the reference points at is up to the embedder; the core only hands it back to
/// the [`LengthContext`] when a relative unit needs a parent metric.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TargetRef(pub String);

impl TargetRef {
    /// Wrap a target name or selector.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Target name or selector.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ambient layout metrics used to resolve relative units to pixels.
pub trait LengthContext {
    /// Root (document) font size in px, the `rem` baseline.
    fn root_font_size_px(&self) -> EaserResult<f64>;
    /// Font size of the target's parent in px, the `em` baseline.
    fn parent_font_size_px(&self, target: &TargetRef) -> EaserResult<f64>;
    /// Parent's computed value of `property` in px, the `%` baseline.
    fn parent_computed_value_px(&self, target: &TargetRef, property: &str) -> EaserResult<f64>;
    /// Viewport height in px.
    fn viewport_height_px(&self) -> EaserResult<f64>;
    /// Viewport width in px.
    fn viewport_width_px(&self) -> EaserResult<f64>;
}

/// Per-target metrics in a [`StaticLengthContext`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParentMetrics {
    /// Parent font size in px; falls back to the root font size.
    pub font_size_px: Option<f64>,
    /// Parent computed values in px, keyed by property name.
    pub computed_px: BTreeMap<String, f64>,
}

/// Fixed-metric [`LengthContext`], typically loaded from JSON.
///
/// ```json
/// {
///   "root_font_size_px": 16,
///   "viewport_width_px": 1280,
///   "viewport_height_px": 720,
///   "parents": { ".box": { "font_size_px": 20, "computed_px": { "width": 400 } } }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticLengthContext {
    /// Root font size in px.
    pub root_font_size_px: f64,
    /// Viewport width in px.
    pub viewport_width_px: f64,
    /// Viewport height in px.
    pub viewport_height_px: f64,
    /// Parent metrics keyed by target reference.
    pub parents: BTreeMap<TargetRef, ParentMetrics>,
}

impl Default for StaticLengthContext {
    fn default() -> Self {
        Self {
            root_font_size_px: 16.0,
            viewport_width_px: 1280.0,
            viewport_height_px: 720.0,
            parents: BTreeMap::new(),
        }
    }
}

impl StaticLengthContext {
    /// Parse and validate a context from JSON.
    pub fn from_json_str(s: &str) -> EaserResult<Self> {
        let ctx: Self = serde_json::from_str(s)?;
        ctx.validate()?;
        Ok(ctx)
    }

    /// Set the metrics for one parent.
    pub fn with_parent(mut self, target: impl Into<TargetRef>, metrics: ParentMetrics) -> Self {
        self.parents.insert(target.into(), metrics);
        self
    }

    /// Reject non-finite or negative metrics.
    pub fn validate(&self) -> EaserResult<()> {
        let check = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(EaserError::config(format!("{name} must be finite and >= 0")))
            }
        };
        check("root_font_size_px", self.root_font_size_px)?;
        check("viewport_width_px", self.viewport_width_px)?;
        check("viewport_height_px", self.viewport_height_px)?;
        for (target, metrics) in &self.parents {
            if let Some(fs) = metrics.font_size_px {
                check(&format!("parents[{}].font_size_px", target.as_str()), fs)?;
            }
        }
        Ok(())
    }
}

impl LengthContext for StaticLengthContext {
    fn root_font_size_px(&self) -> EaserResult<f64> {
        Ok(self.root_font_size_px)
    }

    fn parent_font_size_px(&self, target: &TargetRef) -> EaserResult<f64> {
        Ok(self
            .parents
            .get(target)
            .and_then(|m| m.font_size_px)
            .unwrap_or(self.root_font_size_px))
    }

    fn parent_computed_value_px(&self, target: &TargetRef, property: &str) -> EaserResult<f64> {
        self.parents
            .get(target)
            .and_then(|m| m.computed_px.get(property).copied())
            .ok_or_else(|| {
                EaserError::context(format!(
                    "no computed \"{property}\" for the parent of \"{}\"",
                    target.as_str()
                ))
            })
    }

    fn viewport_height_px(&self) -> EaserResult<f64> {
        Ok(self.viewport_height_px)
    }

    fn viewport_width_px(&self) -> EaserResult<f64> {
        Ok(self.viewport_width_px)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/value/context.rs"]
mod tests;
