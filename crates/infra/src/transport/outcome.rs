//! Classification of one physical HTTP attempt

use bytes::Bytes;
use querylink_domain::constants::SESSION_ID_HEADER;
use querylink_domain::{SessionToken, TransportError};
use reqwest::{Response, StatusCode};
use tracing::{error, warn};

use crate::errors::describe_http_error;

/// Result of one physical attempt.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// HTTP 200 with the full body and the session token the server
    /// assigned, if it sent one.
    Success { body: Bytes, session: Option<SessionToken> },
    /// 503 or a transport-level failure; worth another attempt.
    Retryable(String),
    /// HTTP 4xx
    ClientError { status: u16, body: String },
    /// HTTP 500
    ServerError { body: String },
    /// Any other status
    Unexpected { status: u16, reason: String, body: String },
}

impl ResponseOutcome {
    /// Classify a received response, reading its body.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Self::Retryable("HTTP 503 Service Unavailable".into());
        }

        if status == StatusCode::OK {
            let session = session_header(&response);
            return match response.bytes().await {
                Ok(body) => Self::Success { body, session },
                Err(err) => Self::Retryable(describe_http_error(&err)),
            };
        }

        let code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("unknown status").to_string();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status = code, error = %err, "Failed to read error response body");
                String::new()
            }
        };
        error!(status = code, body = %body, "Backend returned an error response");

        match code {
            500 => Self::ServerError { body },
            400..=499 => Self::ClientError { status: code, body },
            _ => Self::Unexpected { status: code, reason, body },
        }
    }

    /// Classify a request that never produced a response.
    ///
    /// # Errors
    /// Failures that are not transient (malformed request, redirect loop)
    /// are returned as terminal errors.
    pub fn from_error(err: reqwest::Error) -> Result<Self, TransportError> {
        if is_transient(&err) {
            return Ok(Self::Retryable(describe_http_error(&err)));
        }
        let infra: crate::errors::InfraError = err.into();
        Err(infra.into())
    }

    /// Terminal error for a non-success, non-retryable outcome.
    ///
    /// Returns `None` for `Success` and `Retryable`.
    pub fn into_error(self) -> Option<TransportError> {
        match self {
            Self::ClientError { status, body } => Some(TransportError::Client { status, body }),
            Self::ServerError { body } => Some(TransportError::Server { body }),
            Self::Unexpected { status, reason, body } => {
                Some(TransportError::UnexpectedStatus { status, reason, body })
            }
            Self::Success { .. } | Self::Retryable(_) => None,
        }
    }
}

/// Connection resets, refused connections, timeouts and interrupted bodies.
fn is_transient(err: &reqwest::Error) -> bool {
    !err.is_builder()
        && !err.is_redirect()
        && (err.is_timeout() || err.is_connect() || err.is_request() || err.is_body())
}

fn session_header(response: &Response) -> Option<SessionToken> {
    response
        .headers()
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(SessionToken::from)
}
