//! Error types for due-date scheduling.

use thiserror::Error;

/// Errors that can occur when encoding or decoding a due date/time.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The stored due date string did not parse as `YYYY-MM-DD`.
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// The stored due time string did not parse as `HH:MM`.
    #[error("invalid due time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    /// The timezone name was not recognized by the IANA database.
    #[error("unknown timezone '{0}'")]
    UnknownZone(String),
}

/// Convenience type alias for schedule results.
pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_display() {
        let err = ScheduleError::InvalidDate("2025-13-99".into());
        assert_eq!(
            err.to_string(),
            "invalid due date '2025-13-99' (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn invalid_time_display() {
        let err = ScheduleError::InvalidTime("25:00".into());
        assert!(err.to_string().contains("expected HH:MM"));
    }

    #[test]
    fn unknown_zone_display() {
        let err = ScheduleError::UnknownZone("Mars/Olympus_Mons".into());
        assert_eq!(err.to_string(), "unknown timezone 'Mars/Olympus_Mons'");
    }
}
