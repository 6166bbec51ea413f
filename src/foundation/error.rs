/// Convenience result type used across Panoply.
pub type PanoplyResult<T> = Result<T, PanoplyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Expected absence (an unresolved keyframe, a dangling state handle, a missing
/// viewport) is never an error; those surface as `None` or empty rects.
#[derive(thiserror::Error, Debug)]
pub enum PanoplyError {
    /// Invalid authoring data (bad unit strings, step counts, scene contents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing scene data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanoplyError {
    /// Build a [`PanoplyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PanoplyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
