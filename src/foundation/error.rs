/// Convenience result type used across the crate.
pub type BezelResult<T> = Result<T, BezelError>;

/// Top-level error taxonomy.
///
/// Nothing in the redraw path escalates these to callers; they surface at configuration and CLI
/// boundaries and are logged everywhere else.
#[derive(thiserror::Error, Debug)]
pub enum BezelError {
    /// Invalid configuration or geometry input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The render surface could not be provisioned for a draw.
    #[error("surface error: {0}")]
    Surface(String),

    /// Fetching or decoding the grain texture failed.
    #[error("texture error: {0}")]
    Texture(String),

    /// Errors when serializing or deserializing configuration and wire types.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BezelError {
    /// Build a [`BezelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BezelError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`BezelError::Texture`] value.
    pub fn texture(msg: impl Into<String>) -> Self {
        Self::Texture(msg.into())
    }

    /// Build a [`BezelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
