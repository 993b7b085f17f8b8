/// Convenience result type used across scrollstage.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// Invalid section, offset or sequencer configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors while validating or sampling keyframes and timelines.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while evaluating a page or section for a scroll position.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Misuse of host resources (listeners, frame callbacks, element refs).
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// Errors when serializing or deserializing page documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`StageError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StageError::Lifecycle`] value.
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prefix the message with `ctx`, keeping the error kind.
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{ctx}: {m}")),
            Self::Animation(m) => Self::Animation(format!("{ctx}: {m}")),
            Self::Evaluation(m) => Self::Evaluation(format!("{ctx}: {m}")),
            Self::Lifecycle(m) => Self::Lifecycle(format!("{ctx}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{ctx}: {m}")),
            Self::Other(e) => Self::Other(e.context(ctx.to_string())),
        }
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
