//! Error types for restbind
//!
//! This module defines the error taxonomy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Retryability is a property of the variant: transport-level failures,
//! rate-limit rejections, and server errors are retried per policy;
//! validation, auth, client, and decode failures are surfaced immediately.

use thiserror::Error;

/// The main error type for restbind
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors (never retried)
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown argument '{name}' for endpoint '{endpoint}'")]
    UnknownArgument { endpoint: String, name: String },

    #[error("Unresolved path placeholder '{{{name}}}'")]
    UnresolvedPlaceholder { name: String },

    // ============================================================================
    // Authentication Errors (never retried)
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("HTTP 401: {body}")]
    Unauthorized { body: String },

    // ============================================================================
    // Transport Errors (retried per policy)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rate limited, window resets at {reset_at}")]
    RateLimited { reset_at: i64 },

    #[error("Server error HTTP {status}: {body}")]
    Server { status: u16, body: String },

    // ============================================================================
    // Client Errors (not retried)
    // ============================================================================
    #[error("HTTP {status}: {body}")]
    Client { status: u16, body: String },

    // ============================================================================
    // Decode Errors (not retried)
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O and Generic Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unknown-argument error
    pub fn unknown_argument(endpoint: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownArgument {
            endpoint: endpoint.into(),
            name: name.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// Create a client error
    pub fn client(status: u16, body: impl Into<String>) -> Self {
        Self::Client {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The HTTP status code that produced this error, when one was observed
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::RateLimited { .. } => Some(429),
            Error::Server { status, .. } | Error::Client { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable under ordinary retry policy
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::Timeout { .. }
                | Error::RateLimited { .. }
                | Error::Server { .. }
        )
    }
}

/// Result type alias for restbind
pub type Result<T> = std::result::Result<T, Error>;
