//! Error types for pagefetch
//!
//! This module defines all error types used throughout the crate.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! Inside the orchestration loop most variants are attempt-level failures and
//! are recovered locally. Only [`FetchError::FetchExhausted`] and
//! [`FetchError::Timeout`] ever leave [`crate::fetch::FetchOrchestrator::orchestrate`].

use thiserror::Error;

/// The primary error type for pagefetch operations.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Target URL is not http or https
    #[error("Only http/https URLs are allowed")]
    UnsupportedScheme,

    /// Target host is loopback, private, or link-local
    #[error("Target host is not allowed")]
    BlockedHost,

    /// Target URL is missing, too long, or does not parse
    #[error("{0}")]
    InvalidUrl(String),

    /// Upstream answered with a non-2xx status
    #[error("Request failed: {status} {reason}")]
    HttpError { status: u16, reason: String },

    /// Declared or observed body size exceeded the byte limit
    #[error("{0}")]
    TooLarge(String),

    /// The attempt's deadline fired while it was in flight
    #[error("Request cancelled: deadline elapsed")]
    Cancelled,

    /// The orchestration deadline elapsed before any attempt succeeded
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Transport-level failure (connect, TLS, redirect limit, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The extractor could not process the document
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Every (strategy, URL) attempt failed or produced empty text
    #[error("{0}")]
    FetchExhausted(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status the `/fetch` shell answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            FetchError::InvalidUrl(_) | FetchError::UnsupportedScheme => 400,
            FetchError::BlockedHost => 403,
            _ => 502,
        }
    }

    /// Returns `true` for failures produced by validating the target before
    /// any network traffic.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUrl(_) | FetchError::UnsupportedScheme | FetchError::BlockedHost
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Cancelled
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// A specialized `Result` type for pagefetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Config("missing port".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing port");
    }

    #[test]
    fn test_http_error_display() {
        let err = FetchError::HttpError {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "Request failed: 503 Service Unavailable");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FetchError = io_err.into();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(FetchError::InvalidUrl("bad".into()).status_code(), 400);
        assert_eq!(FetchError::UnsupportedScheme.status_code(), 400);
        assert_eq!(FetchError::BlockedHost.status_code(), 403);
        assert_eq!(FetchError::Timeout(10).status_code(), 502);
        assert_eq!(
            FetchError::FetchExhausted("Request failed: 404 Not Found".into()).status_code(),
            502
        );
    }

    #[test]
    fn test_is_rejection() {
        assert!(FetchError::BlockedHost.is_rejection());
        assert!(FetchError::UnsupportedScheme.is_rejection());
        assert!(!FetchError::Cancelled.is_rejection());
        assert!(!FetchError::TooLarge("x".into()).is_rejection());
    }

    #[test]
    fn test_exhausted_carries_last_message() {
        let err = FetchError::FetchExhausted("Response exceeded 10 bytes".into());
        assert_eq!(err.to_string(), "Response exceeded 10 bytes");
    }
}
