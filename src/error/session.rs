// Session workflow error types and constants

use crate::error::ErrorCode;
use crate::model::{ProbePosition, RemErrorType};
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 3001-3006
pub struct SessionErrorCodes;

impl SessionErrorCodes {
    /// An operation needed a session before one was created
    pub const NO_ACTIVE_SESSION: i32 = 3001;

    /// Measurement attempted without a correctly placed probe tube
    pub const PROBE_NOT_POSITIONED: i32 = 3002;

    /// The session references a hearing aid missing from the catalog
    pub const HEARING_AID_NOT_FOUND: i32 = 3003;

    /// Session state Mutex was poisoned
    pub const STATE_POISONED: i32 = 3004;

    /// The service was already disposed
    pub const DISPOSED: i32 = 3005;

    /// Measurement stimulus level is NaN or infinite
    pub const INVALID_INPUT_LEVEL: i32 = 3006;
}

/// Log a session error with structured context
///
/// Emits the error code, component and message so a failed precondition can
/// be traced back to the UI action that triggered it.
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=RemSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Session workflow errors
///
/// Precondition violations carry fixed messages the UI shows verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// No session has been created yet
    NoActiveSession,

    /// Probe tube is not at the correct depth
    ProbeNotPositioned { position: ProbePosition },

    /// Hearing aid id is not in the catalog
    HearingAidNotFound { id: String },

    /// Session state lock was poisoned
    StatePoisoned,

    /// Service used after dispose
    Disposed,

    /// Stimulus level is not a finite number
    InvalidInputLevel { level: f64 },
}

impl SessionError {
    /// Category reported alongside the message
    pub fn kind(&self) -> RemErrorType {
        match self {
            SessionError::NoActiveSession => RemErrorType::NoSession,
            SessionError::ProbeNotPositioned { .. } => RemErrorType::ProbePosition,
            SessionError::HearingAidNotFound { .. } => RemErrorType::HearingAidLookup,
            SessionError::InvalidInputLevel { .. } => RemErrorType::InvalidInput,
            SessionError::StatePoisoned | SessionError::Disposed => RemErrorType::Internal,
        }
    }
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::NoActiveSession => SessionErrorCodes::NO_ACTIVE_SESSION,
            SessionError::ProbeNotPositioned { .. } => SessionErrorCodes::PROBE_NOT_POSITIONED,
            SessionError::HearingAidNotFound { .. } => SessionErrorCodes::HEARING_AID_NOT_FOUND,
            SessionError::StatePoisoned => SessionErrorCodes::STATE_POISONED,
            SessionError::Disposed => SessionErrorCodes::DISPOSED,
            SessionError::InvalidInputLevel { .. } => SessionErrorCodes::INVALID_INPUT_LEVEL,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::NoActiveSession => "No active session".to_string(),
            SessionError::ProbeNotPositioned { .. } => {
                "Probe tube not correctly positioned".to_string()
            }
            SessionError::HearingAidNotFound { .. } => "Hearing aid not found".to_string(),
            SessionError::StatePoisoned => "Session state lock poisoned".to_string(),
            SessionError::Disposed => "Service has been disposed".to_string(),
            SessionError::InvalidInputLevel { .. } => {
                "Input level must be a finite number".to_string()
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_codes() {
        assert_eq!(SessionError::NoActiveSession.code(), 3001);
        assert_eq!(
            SessionError::ProbeNotPositioned {
                position: ProbePosition::TooShallow
            }
            .code(),
            3002
        );
        assert_eq!(
            SessionError::HearingAidNotFound {
                id: "ha9".to_string()
            }
            .code(),
            3003
        );
        assert_eq!(SessionError::StatePoisoned.code(), 3004);
        assert_eq!(SessionError::Disposed.code(), 3005);
        assert_eq!(
            SessionError::InvalidInputLevel { level: f64::NAN }.code(),
            3006
        );
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(SessionError::NoActiveSession.message(), "No active session");
        assert_eq!(
            SessionError::ProbeNotPositioned {
                position: ProbePosition::NotInserted
            }
            .message(),
            "Probe tube not correctly positioned"
        );
        assert_eq!(
            SessionError::HearingAidNotFound {
                id: "ha9".to_string()
            }
            .message(),
            "Hearing aid not found"
        );
    }

    #[test]
    fn test_display_includes_code() {
        let display = format!("{}", SessionError::NoActiveSession);
        assert!(display.contains("SessionError"));
        assert!(display.contains("3001"));
        assert!(display.contains("No active session"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(SessionError::NoActiveSession.kind(), RemErrorType::NoSession);
        assert_eq!(
            SessionError::ProbeNotPositioned {
                position: ProbePosition::TooDeep
            }
            .kind(),
            RemErrorType::ProbePosition
        );
        assert_eq!(SessionError::Disposed.kind(), RemErrorType::Internal);
        assert_eq!(
            SessionError::InvalidInputLevel {
                level: f64::INFINITY
            }
            .kind(),
            RemErrorType::InvalidInput
        );
    }
}
