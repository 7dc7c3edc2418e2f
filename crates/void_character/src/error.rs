//! Error types for character configuration

use thiserror::Error;

/// Character controller errors
#[derive(Debug, Error)]
pub enum CharacterError {
    /// A tunable that must be a positive finite number is not
    #[error("Tunable `{name}` must be positive and finite, got {value}")]
    InvalidTunable { name: &'static str, value: f32 },

    /// Configuration text could not be parsed
    #[error("Failed to parse mover configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for character operations
pub type Result<T> = std::result::Result<T, CharacterError>;
