/// Convenience result type used across the stage.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by stage and host APIs.
///
/// Only configuration problems surface to callers of [`crate::Stage`]; the other variants are
/// produced by a [`crate::Page`] host and absorbed by the orchestrator, each degrading a single
/// visual feature.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// Invalid caller-provided data or misuse of a one-shot API.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid stage configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Persistent storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Media playback was refused by the runtime.
    #[error("media error: {0}")]
    Media(String),

    /// The drawing context for the background effect could not be acquired.
    #[error("render context error: {0}")]
    RenderContext(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`StageError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StageError::RenderContext`] value.
    pub fn render_context(msg: impl Into<String>) -> Self {
        Self::RenderContext(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
