//! Error types for the OpenAPI engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Engine error types
///
/// Only load-time problems surface here. Resolution misses are `None` and
/// synthesis problems degrade to absent values.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid OpenAPI spec format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("No spec files found in {}", .0.display())]
    NoSpecFiles(PathBuf),

    #[error("No valid spec files loaded from {}", .0.display())]
    NoValidSpecs(PathBuf),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
