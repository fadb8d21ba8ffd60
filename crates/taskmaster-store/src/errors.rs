//! Error types for the store subsystem.
//!
//! [`StoreError`] is the primary error type returned by the task store and
//! both backends. It provides specific variants for the common failure
//! modes while keeping the surface small enough for exhaustive matching.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error (local backend).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// HTTP transport error (remote backend).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("api error: status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the server.
        body: String,
    },

    /// Authentication failed or no valid session is available.
    #[error("auth error: {0}")]
    Auth(String),

    /// A task field failed validation before persistence.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Due date/time conversion failed.
    #[error(transparent)]
    Schedule(#[from] taskmaster_core::ScheduleError),

    /// Filesystem error (session persistence).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_error_display() {
        let err = StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("sqlite error"));
    }

    #[test]
    fn api_error_display() {
        let err = StoreError::Api {
            status: 409,
            body: "duplicate key".into(),
        };
        assert_eq!(err.to_string(), "api error: status 409: duplicate key");
    }

    #[test]
    fn not_found_display() {
        let err = StoreError::TaskNotFound("task_abc".into());
        assert_eq!(err.to_string(), "task not found: task_abc");
    }

    #[test]
    fn schedule_error_passes_through() {
        let err: StoreError = taskmaster_core::ScheduleError::InvalidDate("x".into()).into();
        assert!(err.to_string().contains("invalid due date"));
    }
}
