//! Error types for xcspec-core

use thiserror::Error;

use openapi_engine::ParseError;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Duplicate domain: {0}")]
    DuplicateDomain(String),

    #[error("Alias {alias} of {domain} is already used by {existing}")]
    AliasConflict {
        alias: String,
        domain: String,
        existing: String,
    },

    #[error("{0} collides with a reserved action command")]
    ReservedCommand(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Spec error: {0}")]
    Spec(#[from] ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
