//! Error types and handling for the Barracks CLI
//!
//! Provides structured error types for all CLI operations with proper context
//! and error chains for debugging.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Barracks CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Comprehensive error types for Barracks CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    // ═══════════════════════════════════════════════════════════════
    // Network & HTTP Errors
    // ═══════════════════════════════════════════════════════════════
    /// The request never produced a response (DNS, TLS, connection reset, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API error response from server
    #[error("Barracks API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Invalid API response format
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A URL could not be parsed or joined
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Endpoint name missing from the registry
    #[error("Unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    // ═══════════════════════════════════════════════════════════════
    // Authentication & Authorization
    // ═══════════════════════════════════════════════════════════════
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Authentication token is missing or invalid
    #[error("Missing or invalid authentication token. Run 'barracks login' first")]
    MissingToken,

    /// Token expired or invalid
    #[error("Token expired or invalid: {0}")]
    TokenExpired(String),

    // ═══════════════════════════════════════════════════════════════
    // Configuration & File Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    // ═══════════════════════════════════════════════════════════════
    // Serialization & Encoding Errors
    // ═══════════════════════════════════════════════════════════════
    /// Failed to deserialize data
    #[error("Deserialization failed: {0}")]
    DeserializationError(String),

    // ═══════════════════════════════════════════════════════════════
    // I/O Errors
    // ═══════════════════════════════════════════════════════════════
    /// File operation failed
    #[error("File operation failed: {path}: {reason}")]
    FileError { path: PathBuf, reason: String },

    /// Directory operation failed
    #[error("Directory operation failed: {path}: {reason}")]
    DirError { path: PathBuf, reason: String },

    /// Permission denied
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    // ═══════════════════════════════════════════════════════════════
    // Validation & Input Errors
    // ═══════════════════════════════════════════════════════════════
    /// Invalid input argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    // ═══════════════════════════════════════════════════════════════
    // Other Errors
    // ═══════════════════════════════════════════════════════════════
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Cancelled by user
    #[error("Operation cancelled")]
    Cancelled,
}

impl CliError {
    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingToken | Self::TokenExpired(_) => 1,
            Self::InvalidArgument(_) | Self::MissingArgument(_) => 2,
            Self::AuthFailed(_) => 3,
            Self::Transport(_) | Self::InvalidUrl { .. } => 4,
            Self::ApiError { .. } | Self::InvalidResponse(_) => 5,
            Self::PermissionDenied { .. } => 13,
            Self::UnknownEndpoint(_) | Self::Internal(_) => 70,
            Self::Cancelled => 130,
            _ => 1,
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                path: PathBuf::from("<unknown>"),
                reason: "Not found".to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: PathBuf::from("<unknown>"),
            },
            _ => Self::FileError {
                path: PathBuf::from("<unknown>"),
                reason: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::FileError {
                path: PathBuf::from("<unknown>"),
                reason: err.to_string(),
            }
        } else if err.is_syntax() {
            Self::DeserializationError(format!("JSON syntax error: {err}"))
        } else {
            Self::DeserializationError(err.to_string())
        }
    }
}
