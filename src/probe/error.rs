//! Activity probe error types.

use thiserror::Error;

/// Errors that can occur while sampling user activity.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProbeError {
    /// No activity source exists on this platform.
    #[error("activity probing is not supported on this platform")]
    Unsupported,

    /// The OS returned a value that cannot be a duration.
    #[error("invalid idle time reported by the system: {0}")]
    InvalidIdleTime(f64),

    /// The OS query failed.
    #[error("activity query failed: {0}")]
    QueryFailed(String),
}

impl ProbeError {
    /// Returns true if retrying can never succeed on this machine.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unsupported => "idle detection requires macOS; sessions are treated as active",
            Self::InvalidIdleTime(_) => "check that a display and input devices are attached",
            Self::QueryFailed(_) => "restart aware; the window server may be unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::InvalidIdleTime(-1.0);
        assert!(err.to_string().contains("-1"));

        let err = ProbeError::QueryFailed("boom".to_string());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_is_permanent() {
        assert!(ProbeError::Unsupported.is_permanent());
        assert!(!ProbeError::QueryFailed("x".into()).is_permanent());
        assert!(!ProbeError::InvalidIdleTime(f64::NAN).is_permanent());
    }

    #[test]
    fn test_suggestion() {
        assert!(ProbeError::Unsupported.suggestion().contains("macOS"));
    }
}
