//! Error types for zonesync
//!
//! This module defines all error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonesync
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (connection, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote API answered with a non-success status code
    #[error("Remote command {command} failed with code {code}: {message}")]
    Remote {
        /// Command name, e.g. `dns-rows-list`
        command: String,
        /// Status code returned by the API
        code: u32,
        /// Human readable result text
        message: String,
    },

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// The configured zone directory does not exist
    #[error("Zone directory not found: {}", .0.display())]
    ZoneDirMissing(PathBuf),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Something that was looked up does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a remote status error
    pub fn remote(command: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self::Remote {
            command: command.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
