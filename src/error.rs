//! Error types for the Aircall MCP server.

use thiserror::Error;

/// Library-level error type for Aircall operations.
#[derive(Error, Debug)]
pub enum AircallError {
    #[error(
        "Missing Aircall credentials. Set AIRCALL_API_ID and AIRCALL_API_TOKEN \
         environment variables or pass them to the client."
    )]
    CredentialsMissing,

    #[error("Invalid Aircall API credentials")]
    InvalidCredentials,

    #[error("Permission denied for this resource")]
    PermissionDenied,

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limit exceeded ({limit} req/min)")]
    RateLimitExceeded { limit: usize },

    #[error("Aircall API temporarily unavailable")]
    UpstreamUnavailable { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("{message}")]
    RequestFailed { message: String, status: Option<u16> },

    #[error("Invalid parameters - {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid response from Aircall: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl AircallError {
    /// HTTP status code that produced this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AircallError::InvalidCredentials => Some(401),
            AircallError::PermissionDenied => Some(403),
            AircallError::NotFound => Some(404),
            AircallError::RateLimitExceeded { .. } => Some(429),
            AircallError::UpstreamUnavailable { status } => Some(*status),
            AircallError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Build a transport-level failure with no HTTP status.
    pub fn request_failed(message: impl Into<String>) -> Self {
        AircallError::RequestFailed {
            message: message.into(),
            status: None,
        }
    }
}

/// Result type alias for Aircall operations.
pub type Result<T> = std::result::Result<T, AircallError>;
