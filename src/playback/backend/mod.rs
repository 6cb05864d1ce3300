//! Output backends for test-signal playback.
//!
//! A backend turns a [`Voice`] into a live output. The returned handle owns
//! everything the backend created for that voice; dropping it stops the
//! sound and releases the device resources, on every path including errors.

use crate::error::AudioError;

use super::signal::{Voice, VoiceInfo};

/// Trait implemented by audio output backends.
pub trait OutputBackend: Send + Sync {
    /// Start playing `voice` until the returned handle is dropped.
    fn open(&self, voice: Voice) -> Result<Box<dyn ActiveOutput>, AudioError>;

    fn name(&self) -> &'static str;
}

/// A playing voice. Dropping the handle stops it.
pub trait ActiveOutput: Send {
    fn info(&self) -> VoiceInfo;
}

mod offline;
pub use offline::OfflineBackend;

#[cfg(feature = "device_output")]
mod cpal;
#[cfg(feature = "device_output")]
pub use self::cpal::CpalOutputBackend;

/// Backend used when none is injected: the audio device when the
/// `device_output` feature is enabled, otherwise the offline backend.
pub fn default_backend() -> std::sync::Arc<dyn OutputBackend> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "device_output")] {
            std::sync::Arc::new(CpalOutputBackend::new())
        } else {
            std::sync::Arc::new(OfflineBackend::new())
        }
    }
}
