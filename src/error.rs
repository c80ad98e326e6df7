//! Error types for the stylist desk client.

use reqwest::StatusCode;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors talking to the stylist REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, TLS...).
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The server answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        endpoint: String,
        status: StatusCode,
        message: Option<String>,
    },

    /// The server answered 2xx but flagged `success: false`.
    #[error("{endpoint} was refused: {}", message.as_deref().unwrap_or("no message"))]
    Refused {
        endpoint: String,
        message: Option<String>,
    },

    /// The body could not be decoded into the expected shape.
    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl ApiError {
    /// The message the server put in its body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Refused { message, .. } => message.as_deref(),
            Self::Transport { .. } | Self::InvalidResponse { .. } => None,
        }
    }

    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Collapse an API error into the single user-facing string channel.
///
/// Server-supplied messages win; everything else falls back to `default`.
/// Transport failures and semantically-refused 2xx responses are not
/// distinguished here.
pub fn error_message(err: &ApiError, default: &str) -> String {
    match err.server_message() {
        Some(msg) if !msg.trim().is_empty() => msg.to_string(),
        _ => default.to_string(),
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
