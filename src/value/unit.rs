use std::fmt;
use std::str::FromStr;

use crate::foundation::error::EaserError;

/// CSS length unit carried by a [`Value::Styled`](crate::Value::Styled).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Absolute pixels.
    Px,
    /// Multiple of the root font size.
    Rem,
    /// Multiple of the parent font size.
    Em,
    /// Percentage of the parent's computed value for the same property.
    Percent,
    /// Percentage of the viewport height.
    Vh,
    /// Percentage of the viewport width.
    Vw,
}

impl Unit {
    /// CSS suffix used when rendering a value in this unit.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
            Self::Em => "em",
            Self::Percent => "%",
            Self::Vh => "vh",
            Self::Vw => "vw",
        }
    }

    /// `true` when resolving to pixels needs a [`LengthContext`](crate::LengthContext).
    pub fn is_relative(self) -> bool {
        !matches!(self, Self::Px)
    }
}

impl FromStr for Unit {
    type Err = EaserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "px" => Ok(Self::Px),
            "rem" => Ok(Self::Rem),
            "em" => Ok(Self::Em),
            "%" => Ok(Self::Percent),
            "vh" => Ok(Self::Vh),
            "vw" => Ok(Self::Vw),
            other => Err(EaserError::unit(format!("unknown unit \"{other}\""))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
