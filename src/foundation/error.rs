/// Convenience result type used across leaffall.
pub type LeafFallResult<T> = Result<T, LeafFallError>;

/// Top-level error taxonomy used by the scene, render and gallery APIs.
#[derive(thiserror::Error, Debug)]
pub enum LeafFallError {
    /// Invalid user-provided configuration or call sequence.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while fetching or decoding sprite and gallery assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors raised by drawing surfaces or frame sinks.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LeafFallError {
    /// Build a [`LeafFallError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LeafFallError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`LeafFallError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LeafFallError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
