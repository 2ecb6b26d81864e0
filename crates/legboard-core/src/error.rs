//! Core error types for legboard-core.
//!
//! Provider failures are transient by design: the refresh loop reports them
//! and keeps the last good snapshot on screen, so nothing here is fatal to
//! the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for legboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while fetching a snapshot from a provider.
///
/// All variants are recoverable: the controller stores a user-facing message
/// and retries on the next timer tick.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network-level failure (DNS, connect, timeout)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint URL could not be parsed
    #[error("Invalid provider URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The proxy rejected the shared credential
    #[error("Provider rejected credentials (HTTP 401)")]
    Unauthorized,

    /// Upstream answered with a non-2xx status
    #[error("Provider returned HTTP {status}")]
    Status { status: u16 },

    /// Body was not a valid snapshot document
    #[error("Malformed snapshot payload: {0}")]
    Malformed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
