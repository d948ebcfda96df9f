//! Error taxonomy for the attendance engine.

use std::fmt;

use thiserror::Error;

use crate::constants::messages;
use crate::types::NoticeLevel;

/// Remote operation that a transport failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetching the attendance history
    Fetch,
    /// Submitting a check-in
    Submit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::Submit => f.write_str("submit"),
        }
    }
}

/// Errors surfaced by the attendance engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// A required session field is absent or unusable
    #[error("Session field missing: {0}")]
    SessionMissing(&'static str),

    /// Identity string too short to pick two distinct positions
    #[error("Identity number too short for a challenge: {length} characters")]
    InsufficientLength { length: usize },

    /// One of the digit slots was empty on submit
    #[error("Both digits are required")]
    MissingInput,

    /// Submitted digits did not match the challenge positions
    #[error("Submitted digits do not match the challenge")]
    DigitMismatch,

    /// Network or protocol failure talking to the attendance service
    #[error("Transport failure during {operation}: {reason}")]
    TransportFailure { operation: Operation, reason: String },

    /// The service received the check-in but did not confirm it
    #[error("Check-in rejected by service: {0}")]
    SubmissionRejected(String),

    /// A check-in is already in flight
    #[error("A check-in submission is already in progress")]
    SubmissionInFlight,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AttendanceError {
    /// Notice level used when presenting this error
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::MissingInput | Self::SubmissionInFlight => NoticeLevel::Warning,
            Self::TransportFailure {
                operation: Operation::Fetch,
                ..
            } => NoticeLevel::Warning,
            _ => NoticeLevel::Danger,
        }
    }

    /// User-facing message for this error
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SessionMissing(_) => messages::SESSION_MISSING,
            Self::InsufficientLength { .. } => messages::INVALID_IDENTITY,
            Self::MissingInput => messages::MISSING_INPUT,
            Self::DigitMismatch => messages::DIGIT_MISMATCH,
            Self::TransportFailure { operation, .. } => match operation {
                Operation::Fetch => messages::FETCH_FAILED,
                Operation::Submit => messages::CHECK_IN_TRANSPORT,
            },
            Self::SubmissionRejected(_) => messages::CHECK_IN_REJECTED,
            Self::SubmissionInFlight => messages::SUBMISSION_IN_FLIGHT,
            Self::Config(_) => messages::CONFIG,
        }
    }

    /// Returns false for errors that end the attendance view (redirect to login)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SessionMissing(_) | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_and_submit_failures_present_differently() {
        let fetch = AttendanceError::TransportFailure {
            operation: Operation::Fetch,
            reason: "timeout".to_string(),
        };
        let submit = AttendanceError::TransportFailure {
            operation: Operation::Submit,
            reason: "timeout".to_string(),
        };

        assert_eq!(fetch.level(), NoticeLevel::Warning);
        assert_eq!(submit.level(), NoticeLevel::Danger);
        assert_eq!(fetch.user_message(), messages::FETCH_FAILED);
        assert_eq!(submit.user_message(), messages::CHECK_IN_TRANSPORT);
    }

    #[test]
    fn test_only_session_and_config_are_fatal() {
        assert!(!AttendanceError::SessionMissing("ID").is_recoverable());
        assert!(!AttendanceError::Config("bad url".into()).is_recoverable());
        assert!(AttendanceError::DigitMismatch.is_recoverable());
        assert!(AttendanceError::SubmissionRejected("no".into()).is_recoverable());
    }
}
