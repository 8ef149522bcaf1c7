//! Error types for API calls.

use thiserror::Error;

use crate::models::HealthReport;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by a [`CloudApi`](crate::CloudApi) call.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The call did not complete before its deadline.
    #[error("request '{0}' timed out")]
    Timeout(&'static str),

    /// The caller is not allowed to see the resource (HTTP 403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The API answered with a non-success status.
    #[error("api returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The health endpoint answered with a failure status but a well-formed
    /// health report.
    #[error("api is {}: {}", .0.status.as_str(), .0.message)]
    Unhealthy(HealthReport),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured API URL is unusable.
    #[error("invalid api url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns true for a permission-denied answer.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
