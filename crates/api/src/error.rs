//! Error types for the Autopilot subgraph client.

use thiserror::Error;

/// Errors that can occur when fetching vault data.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL error: {0}")]
    GraphQL(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid address format.
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out (attempt {attempts})")]
    Timeout { attempts: u32 },
}

/// High-level classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport failures: connection, timeout, HTTP status.
    Network,
    /// The subgraph answered with GraphQL errors.
    Upstream,
    /// The response did not have the expected shape.
    Parse,
    /// The caller passed something unusable.
    Validation,
}

impl ApiError {
    /// Classify this error.
    pub fn error_category(&self) -> ErrorCategory {
        match self {
            Self::Request(e) if e.is_decode() => ErrorCategory::Parse,
            Self::Request(_) | Self::Timeout { .. } => ErrorCategory::Network,
            Self::GraphQL(_) => ErrorCategory::Upstream,
            Self::Parse(_) => ErrorCategory::Parse,
            Self::InvalidAddress(_) => ErrorCategory::Validation,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, timeouts, 5xx and 429 responses are transient.
    /// GraphQL errors are answers, not failures, and are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                    })
            }
            Self::Timeout { .. } => true,
            Self::GraphQL(_) | Self::Parse(_) | Self::InvalidAddress(_) => false,
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
