// Error types for the REM trainer
//
// This module defines custom error types for session workflow and audio
// playback operations, providing structured error handling with stable
// numeric codes the practice UI can switch on.

mod audio;
mod session;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling at the
/// presentation boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
