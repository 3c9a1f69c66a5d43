//! Error type shared by the core and render crates.

use thiserror::Error;

/// Errors raised while building or drawing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphicsError {
    /// A draw call received a target or argument it cannot use.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// An unknown option name or a parameter spec that does not fit its attribute.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A shape or config could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for graphics operations.
pub type GraphicsResult<T> = Result<T, GraphicsError>;

impl From<serde_json::Error> for GraphicsError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            // Unknown attribute names and mistyped specs surface as data errors.
            serde_json::error::Category::Data => GraphicsError::Configuration(err.to_string()),
            _ => GraphicsError::Serialization(err.to_string()),
        }
    }
}
