//! Error types for schemas and the schema registry

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema errors
///
/// Registering and looking up schemas never fails, so every variant here
/// comes from encoding, decoding, or loading configuration.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to decode schema: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode schema: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unknown field in schema payload: {field}")]
    UnknownField { field: String },

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// Whether the error was caused by a malformed or mis-shaped payload
    pub fn is_decode(&self) -> bool {
        matches!(self, SchemaError::Decode(_) | SchemaError::UnknownField { .. })
    }
}
