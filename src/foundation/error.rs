/// Crate-wide result alias.
pub type EaserResult<T> = Result<T, EaserError>;

/// Errors raised while building or playing an animation tree.
///
/// `Parse`, `Unit`, `Context`, `TypeMismatch` and `Config` are construction-time errors: they
/// are returned synchronously while a [`Runnable`](crate::Runnable) or tree is being built and
/// never deferred into playback. `Sink` and `Clock` are runtime errors surfaced from ticks.
#[derive(thiserror::Error, Debug)]
pub enum EaserError {
    /// A raw value string had no usable numeric or color token.
    #[error("parse error: {0}")]
    Parse(String),

    /// A unit suffix is not one of the supported length units.
    #[error("unit error: {0}")]
    Unit(String),

    /// A relative unit had to be resolved without a length context or target.
    #[error("context error: {0}")]
    Context(String),

    /// `from` and `to` resolve to incompatible value kinds (color vs numeric).
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A declaration is missing a required field or carries an invalid one.
    #[error("config error: {0}")]
    Config(String),

    /// The external target rejected an applied value.
    #[error("sink error: {0}")]
    Sink(String),

    /// The tick source failed to schedule a tick.
    #[error("clock error: {0}")]
    Clock(String),

    /// JSON (de)serialization of declarations or config failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EaserError {
    /// Build an [`EaserError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build an [`EaserError::Unit`].
    pub fn unit(msg: impl Into<String>) -> Self {
        Self::Unit(msg.into())
    }

    /// Build an [`EaserError::Context`].
    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    /// Build an [`EaserError::TypeMismatch`].
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Build an [`EaserError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`EaserError::Sink`].
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build an [`EaserError::Clock`].
    pub fn clock(msg: impl Into<String>) -> Self {
        Self::Clock(msg.into())
    }

    /// Build an [`EaserError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors raised while building a node.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::Parse(_) | Self::Unit(_) | Self::Context(_) | Self::TypeMismatch(_) | Self::Config(_)
        )
    }

    /// `true` for errors raised while a tree is playing.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Sink(_) | Self::Clock(_))
    }
}

impl From<serde_json::Error> for EaserError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
