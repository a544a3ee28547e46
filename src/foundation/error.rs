/// Convenience result type used across Orrery.
pub type OrreryResult<T> = Result<T, OrreryError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Recoverable per-layer failures (missing image reference, degenerate clock
/// geometry, zero-radius orbit) are logged and skipped at the call site and
/// never surface through this type; see the scene builder and behavior
/// managers. `OrreryError` is reserved for API-boundary failures.
#[derive(thiserror::Error, Debug)]
pub enum OrreryError {
    /// Invalid user-provided scene configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while building the sprite scene from configuration.
    #[error("scene error: {0}")]
    Scene(String),

    /// Errors reported by the rendering backend capability interface.
    #[error("backend error: {0}")]
    Backend(String),

    /// Errors raised inside a behavior manager tick or recompute.
    #[error("behavior error: {0}")]
    Behavior(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrreryError {
    /// Build an [`OrreryError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`OrreryError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build an [`OrreryError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build an [`OrreryError::Behavior`] value.
    pub fn behavior(msg: impl Into<String>) -> Self {
        Self::Behavior(msg.into())
    }
}
