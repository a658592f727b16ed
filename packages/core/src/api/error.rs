//! Admin API error types
//!
//! Every failure is recoverable at the component boundary and renders
//! as a single user-visible message.

use thiserror::Error;

/// Errors that can occur when talking to the admin API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response other than 401
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Parse(String),

    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// 401 response; the session must be re-established
    #[error("Authentication required: {0}")]
    Auth(String),

    /// 2xx response whose body reports a failure
    #[error("Server rejected request: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Whether this error should send the user back through login
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}
