/// Convenience result type used across Grail.
pub type GrailResult<T> = Result<T, GrailError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GrailError {
    /// Invalid user-provided values (sizes, colors, geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// A control message addressed a layer that does not exist.
    #[error("invalid layer: {0}")]
    InvalidLayer(u32),

    /// A control message could not be decoded into a command.
    #[error("message error: {0}")]
    Message(String),

    /// Errors while rasterizing the scene or warping an output.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GrailError {
    /// Build a [`GrailError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GrailError::InvalidLayer`] value.
    pub fn invalid_layer(id: u32) -> Self {
        Self::InvalidLayer(id)
    }

    /// Build a [`GrailError::Message`] value.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    /// Build a [`GrailError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GrailError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
