//! Error types for Terna API operations.
//!
//! This module defines [`TernaError`] which covers every failure that can occur
//! while configuring the client, exchanging credentials, fetching data, or
//! normalizing a response. An empty upstream result is not an error: it is
//! reported as `Ok(None)` by the fetching operations.

use thiserror::Error;

/// HTTP status codes that indicate a transient, retryable failure.
pub const RETRYABLE_STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];

/// Errors that can occur during Terna API operations.
#[derive(Error, Debug)]
pub enum TernaError {
    /// The client was constructed with missing or invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The credential exchange was rejected by the authentication endpoint.
    #[error("Authentication failed with HTTP {status}: {message}")]
    Authentication {
        /// HTTP status code returned by the authentication endpoint.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// A data endpoint answered with a non-success status.
    #[error("Request to {endpoint} failed with HTTP {status}: {message}")]
    Request {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data returned by the API.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Converting a normalized table into another representation failed.
    #[error("Table error: {0}")]
    Table(String),
}

impl TernaError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the error carries a rate-limit or server-error status.
    ///
    /// The client never retries on its own; this is a hint for callers that do.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status()
            .is_some_and(|status| RETRYABLE_STATUS_CODES.contains(&status))
    }
}

/// Result type alias using [`TernaError`].
pub type Result<T> = std::result::Result<T, TernaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            let err = TernaError::Request {
                endpoint: "gettotalload".to_string(),
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{status} should be retryable");
        }

        let err = TernaError::Authentication {
            status: 401,
            message: "invalid_client".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = TernaError::Network("connection reset".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Network error: connection reset");
    }
}
