// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Error code range: 1001-1005
pub struct AudioErrorCodes;

impl AudioErrorCodes {
    /// Failed to open an output stream
    pub const STREAM_OPEN_FAILED: i32 = 1001;

    /// Hardware error occurred
    pub const HARDWARE_ERROR: i32 = 1002;

    /// Mutex was poisoned
    pub const LOCK_POISONED: i32 = 1003;

    /// Presentation level is not a finite number
    pub const INVALID_LEVEL: i32 = 1004;

    /// Rendering a signal to a file failed
    pub const EXPORT_FAILED: i32 = 1005;
}

/// Log an audio error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=PlaybackEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These errors cover test-signal playback: opening output streams, device
/// access and offline rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Failed to open audio stream
    StreamOpenFailed { reason: String },

    /// Hardware error occurred
    HardwareError { details: String },

    /// Mutex was poisoned
    LockPoisoned { component: String },

    /// Level (dB) is NaN or infinite
    InvalidLevel { level: f64 },

    /// WAV rendering failed
    ExportFailed { reason: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::StreamOpenFailed { .. } => AudioErrorCodes::STREAM_OPEN_FAILED,
            AudioError::HardwareError { .. } => AudioErrorCodes::HARDWARE_ERROR,
            AudioError::LockPoisoned { .. } => AudioErrorCodes::LOCK_POISONED,
            AudioError::InvalidLevel { .. } => AudioErrorCodes::INVALID_LEVEL,
            AudioError::ExportFailed { .. } => AudioErrorCodes::EXPORT_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::StreamOpenFailed { reason } => {
                format!("Failed to open audio stream: {}", reason)
            }
            AudioError::HardwareError { details } => format!("Hardware error: {}", details),
            AudioError::LockPoisoned { component } => {
                format!("Lock poisoned for component: {}", component)
            }
            AudioError::InvalidLevel { level } => {
                format!("Signal level must be a finite dB value (got {})", level)
            }
            AudioError::ExportFailed { reason } => format!("Signal export failed: {}", reason),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

/// Convert from std::io::Error to AudioError
impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::HardwareError {
            details: err.to_string(),
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        AudioError::ExportFailed {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_error_codes() {
        assert_eq!(
            AudioError::StreamOpenFailed {
                reason: "test".to_string()
            }
            .code(),
            1001
        );
        assert_eq!(
            AudioError::HardwareError {
                details: "test".to_string()
            }
            .code(),
            1002
        );
        assert_eq!(
            AudioError::LockPoisoned {
                component: "test".to_string()
            }
            .code(),
            1003
        );
        assert_eq!(AudioError::InvalidLevel { level: f64::INFINITY }.code(), 1004);
        assert_eq!(
            AudioError::ExportFailed {
                reason: "test".to_string()
            }
            .code(),
            1005
        );
    }

    #[test]
    fn test_audio_error_messages() {
        let err = AudioError::LockPoisoned {
            component: "playback".to_string(),
        };
        assert!(err.message().contains("playback"));

        let err = AudioError::InvalidLevel { level: f64::NAN };
        assert!(err.message().contains("finite"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test error");
        let audio_err: AudioError = io_err.into();

        match audio_err {
            AudioError::HardwareError { details } => {
                assert!(details.contains("test error"));
            }
            _ => panic!("Expected HardwareError variant"),
        }
    }
}
