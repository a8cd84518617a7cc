//! Mapping of HTTP failures onto session errors

use drive_core::SessionError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Result type alias for drive client operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Error body returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Convert a reqwest failure into a session error
pub(crate) fn transport_error(err: reqwest::Error) -> SessionError {
    if err.is_timeout() {
        SessionError::Timeout
    } else if err.is_decode() {
        SessionError::Parse(err.to_string())
    } else {
        SessionError::Transport(err.to_string())
    }
}

/// Convert an invalid URL into a session error
pub(crate) fn url_error(err: url::ParseError) -> SessionError {
    SessionError::InvalidUrl(err.to_string())
}

/// Map a failed HTTP status and its message onto a session error
pub(crate) fn status_error(status: StatusCode, message: String) -> SessionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SessionError::Unauthorized(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => SessionError::Timeout,
        _ => SessionError::server_error(status.as_u16(), message),
    }
}
