//! Error types used throughout the transport

use thiserror::Error;

/// Failures of the credential exchange.
///
/// Every variant is terminal for the call that triggered the refresh; the
/// transport never attempts the HTTP send after one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("401 Unauthorized. Please verify your client id and client secret.")]
    InvalidCredentials,

    #[error("400 Bad Request: {0}")]
    BadRequest(String),

    #[error("credential exchange returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("credential exchange unreachable: {0}")]
    Network(String),

    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

/// Main error type returned by the transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Failed to decode request payload: {0}")]
    Decode(String),

    #[error("Server error (HTTP 500): {body}")]
    Server { body: String },

    #[error("Client error (HTTP {status}): {body}")]
    Client { status: u16, body: String },

    #[error("Unexpected HTTP status {status} {reason}: {body}")]
    UnexpectedStatus { status: u16, reason: String, body: String },

    #[error("Retries exhausted after {attempts} attempts (last failure: {last_failure})")]
    RetriesExhausted { attempts: u32, last_failure: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransportError {
    /// HTTP status carried by the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { .. } => Some(500),
            Self::Client { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Decode(_) => "decode",
            Self::Server { .. } => "server",
            Self::Client { .. } => "client",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;
