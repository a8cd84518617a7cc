//! Error types for vehicle state access

use thiserror::Error;

/// Result type for vehicle state operations
pub type StateResult<T> = Result<T, StateError>;

/// Result type for session requests
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised while reading the vehicle state
#[derive(Debug, Error)]
pub enum StateError {
    /// No status document has been fetched yet
    #[error("No data available")]
    NoData,

    /// A key is missing from the status document.
    ///
    /// Guarded accessors turn this into an absent value.
    #[error("Missing key in vehicle status: {0}")]
    MissingKey(String),

    /// A field holds a value outside of its known set of literals
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The status response did not have the expected shape
    #[error("Invalid status response: {0}")]
    InvalidResponse(String),

    /// Failure reported by the session client
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl StateError {
    /// Create an invalid value error for a field
    pub fn invalid_value(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Errors that can occur while requesting a resource from the backend
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport/communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to parse the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl SessionError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}
