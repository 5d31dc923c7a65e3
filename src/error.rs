//! Error types for video-dl-client
//!
//! This module provides the error handling for the library, including:
//! - Per-operation error types matching the client's surface (format probe,
//!   submission, status polling, history refresh, file retrieval)
//! - A top-level [`Error`] aggregating them for callers that do not care
//!   which operation failed
//!
//! All operation errors are non-fatal to the client as a whole: each is
//! caught at its call site, surfaced as a transient notification, and leaves
//! prior state consistent.

use crate::types::{JobId, Status};
use thiserror::Error;

/// Result type alias for video-dl-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for video-dl-client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "remote.base_url")
        key: Option<String>,
    },

    /// Format probe failed
    #[error("format resolution error: {0}")]
    Format(#[from] FormatError),

    /// Download submission failed
    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),

    /// Status poll failed
    #[error("poll error: {0}")]
    Poll(#[from] PollError),

    /// Full-history refresh failed
    #[error("history error: {0}")]
    History(#[from] HistoryError),

    /// File retrieval failed
    #[error("retrieval error: {0}")]
    Retrieve(#[from] RetrieveError),

    /// Shutdown in progress - not accepting new submissions
    #[error("shutdown in progress: not accepting new submissions")]
    ShuttingDown,
}

/// Errors from the format-probe endpoint (`GET /formats/{url}`)
#[derive(Debug, Error)]
pub enum FormatError {
    /// Request could not be sent or the response body could not be decoded
    #[error("format probe failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("format probe rejected with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the remote API
        status: reqwest::StatusCode,
    },
}

/// Errors from the submission endpoint (`POST /download`)
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Request could not be sent or the response body could not be decoded
    #[error("submission failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("submission rejected with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the remote API
        status: reqwest::StatusCode,
    },
}

/// Errors from the status endpoint (`GET /status/{id}`)
///
/// A poller that hits one of these transitions to stopped (or consumes its
/// failure tolerance budget, if configured). The affected job's last-known
/// state is left unchanged.
#[derive(Debug, Error)]
pub enum PollError {
    /// Request could not be sent or the response body could not be decoded
    #[error("status poll failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("status poll rejected with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the remote API
        status: reqwest::StatusCode,
    },
}

/// Errors from the full-history endpoint (`GET /downloads`)
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Request could not be sent or the response body could not be decoded
    #[error("history refresh failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("history refresh rejected with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the remote API
        status: reqwest::StatusCode,
    },
}

/// Errors from file retrieval (`GET /download/{id}/file` plus the local save)
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Request could not be sent or the payload could not be read
    #[error("file retrieval failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("file retrieval rejected with HTTP {status}")]
    Rejected {
        /// HTTP status returned by the remote API
        status: reqwest::StatusCode,
    },

    /// The job is not known to the store
    #[error("job {0} not found")]
    UnknownJob(JobId),

    /// The job has not reached the completed state
    #[error("job {id} is {status}, not completed")]
    NotCompleted {
        /// The job whose file was requested
        id: JobId,
        /// The job's current status
        status: Status,
    },

    /// The suggested filename is unusable even after sanitization
    #[error("unusable filename: {name:?}")]
    InvalidFilename {
        /// The filename as suggested by the caller
        name: String,
    },

    /// Writing the payload to disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file already exists at the target path and collisions are configured to skip
    #[error("file already exists: {}", .path.display())]
    FileExists {
        /// The colliding target path
        path: std::path::PathBuf,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_errors_convert_into_error() {
        let err: Error = FormatError::Rejected {
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
        .into();
        assert!(matches!(err, Error::Format(_)));

        let err: Error = SubmitError::Rejected {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
        .into();
        assert!(matches!(err, Error::Submit(_)));

        let err: Error = HistoryError::Rejected {
            status: reqwest::StatusCode::NOT_FOUND,
        }
        .into();
        assert!(matches!(err, Error::History(_)));
    }

    #[test]
    fn test_error_messages_name_the_operation() {
        let err = Error::from(PollError::Rejected {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        });
        assert!(err.to_string().contains("status poll"));

        let err = Error::from(RetrieveError::NotCompleted {
            id: JobId::from("J1"),
            status: Status::Downloading,
        });
        assert!(err.to_string().contains("not completed"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::Config {
            message: "poll interval must be non-zero".to_string(),
            key: Some("polling.interval".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: poll interval must be non-zero"
        );
    }
}
