// Playback module - test-signal preview
//
// The engine holds at most one active output. Starting a new signal stops
// the previous one first; stopping is idempotent and never fails, and a
// poisoned lock is recovered so the current handle is still dropped. After
// `shutdown` the slot is closed and no further output opens.

pub mod backend;
pub mod signal;
pub mod wav;

pub use backend::{default_backend, ActiveOutput, OfflineBackend, OutputBackend};
#[cfg(feature = "device_output")]
pub use backend::CpalOutputBackend;
pub use signal::{
    level_to_gain, pan_for_ear, pan_gains, NoiseLoop, SweepGenerator, Voice, VoiceInfo,
};
pub use wav::render_to_wav;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::PlaybackConfig;
use crate::error::{log_audio_error, AudioError};
use crate::model::{Ear, SignalType};

#[derive(Default)]
struct OutputSlot {
    output: Option<Box<dyn ActiveOutput>>,
    closed: bool,
}

/// Single-voice preview player
pub struct PlaybackEngine {
    backend: Arc<dyn OutputBackend>,
    config: PlaybackConfig,
    active: Mutex<OutputSlot>,
}

impl PlaybackEngine {
    pub fn new(config: PlaybackConfig, backend: Arc<dyn OutputBackend>) -> Self {
        tracing::debug!("[Playback] Using {} output backend", backend.name());
        Self {
            backend,
            config,
            active: Mutex::new(OutputSlot::default()),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    fn lock_active(&self) -> MutexGuard<'_, OutputSlot> {
        self.active.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("[Playback] Recovering poisoned output slot");
            poisoned.into_inner()
        })
    }

    /// Start `signal_type` at `level_db` in `ear`, replacing any current signal
    ///
    /// The previous output is released before the new one opens. If opening
    /// fails nothing is left playing.
    ///
    /// # Errors
    /// - `InvalidLevel` for a NaN or infinite level
    /// - `StreamOpenFailed` when the device fails or the engine is shut down
    pub fn play(
        &self,
        signal_type: SignalType,
        level_db: f64,
        ear: Ear,
    ) -> Result<VoiceInfo, AudioError> {
        let voice = Voice::new(signal_type, level_db, ear, &self.config)?;
        let mut slot = self.lock_active();
        if slot.closed {
            return Err(AudioError::StreamOpenFailed {
                reason: "Playback engine has been shut down".to_string(),
            });
        }

        if let Some(previous) = slot.output.take() {
            tracing::debug!(
                "[Playback] Stopping {} before starting {}",
                previous.info().signal_type,
                signal_type
            );
            drop(previous);
        }

        match self.backend.open(voice) {
            Ok(output) => {
                let info = output.info();
                slot.output = Some(output);
                tracing::info!(
                    "[Playback] Playing {} at {:.1} dB in {} ear (gain {:.3})",
                    info.signal_type,
                    info.level_db,
                    info.ear,
                    info.gain
                );
                Ok(info)
            }
            Err(err) => {
                log_audio_error(&err, "PlaybackEngine::play");
                Err(err)
            }
        }
    }

    /// Stop the current signal, if any. Returns whether something was playing.
    pub fn stop(&self) -> bool {
        Self::release(&mut self.lock_active())
    }

    /// Stop the current signal and refuse every later `play`
    ///
    /// Closing and stopping happen under the same lock, so a `play` racing
    /// with this call either finishes first and is stopped here, or fails.
    pub fn shutdown(&self) -> bool {
        let mut slot = self.lock_active();
        slot.closed = true;
        Self::release(&mut slot)
    }

    fn release(slot: &mut OutputSlot) -> bool {
        match slot.output.take() {
            Some(output) => {
                tracing::info!("[Playback] Stopped {}", output.info().signal_type);
                drop(output);
                true
            }
            None => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lock_active().output.is_some()
    }

    pub fn current(&self) -> Option<VoiceInfo> {
        self.lock_active().output.as_ref().map(|output| output.info())
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (PlaybackEngine, OfflineBackend) {
        let backend = OfflineBackend::new();
        let engine = PlaybackEngine::new(PlaybackConfig::default(), Arc::new(backend.clone()));
        (engine, backend)
    }

    #[test]
    fn test_stop_without_playback_is_noop() {
        let (engine, backend) = engine();
        assert!(!engine.stop());
        assert!(!engine.stop());
        assert_eq!(backend.opened_outputs(), 0);
    }

    #[test]
    fn test_last_call_wins() {
        let (engine, backend) = engine();
        engine.play(SignalType::WhiteNoise, 65.0, Ear::Left).unwrap();
        engine
            .play(SignalType::PureToneSweep, 70.0, Ear::Right)
            .unwrap();

        assert_eq!(backend.opened_outputs(), 2);
        assert_eq!(backend.active_outputs(), 1);
        let current = engine.current().unwrap();
        assert_eq!(current.signal_type, SignalType::PureToneSweep);
        assert_eq!(current.ear, Ear::Right);
    }

    #[test]
    fn test_stop_releases_output() {
        let (engine, backend) = engine();
        engine.play(SignalType::IcraNoise, 60.0, Ear::Right).unwrap();
        assert!(engine.is_playing());
        assert!(engine.stop());
        assert!(!engine.is_playing());
        assert_eq!(backend.active_outputs(), 0);
        assert!(!engine.stop());
    }

    #[test]
    fn test_invalid_level_keeps_current_signal() {
        let (engine, backend) = engine();
        engine.play(SignalType::WhiteNoise, 65.0, Ear::Left).unwrap();
        assert!(engine
            .play(SignalType::WhiteNoise, f64::INFINITY, Ear::Left)
            .is_err());
        assert!(engine.is_playing());
        assert_eq!(backend.active_outputs(), 1);
    }

    #[test]
    fn test_shutdown_refuses_later_play() {
        let (engine, backend) = engine();
        engine.play(SignalType::PinkNoise, 65.0, Ear::Right).unwrap();
        assert!(engine.shutdown());
        assert!(!engine.shutdown());

        let err = engine
            .play(SignalType::PinkNoise, 65.0, Ear::Right)
            .unwrap_err();
        assert!(matches!(err, AudioError::StreamOpenFailed { .. }));
        assert_eq!(backend.opened_outputs(), 1);
        assert_eq!(backend.active_outputs(), 0);
    }

    #[test]
    fn test_concurrent_play_and_shutdown_leave_nothing_open() {
        let (engine, backend) = engine();
        let engine = Arc::new(engine);

        let players: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let ear = if i % 2 == 0 { Ear::Left } else { Ear::Right };
                    for _ in 0..50 {
                        let _ = engine.play(SignalType::WhiteNoise, 60.0, ear);
                    }
                })
            })
            .collect();
        engine.shutdown();
        for player in players {
            player.join().unwrap();
        }

        assert!(!engine.is_playing());
        assert_eq!(backend.active_outputs(), 0);
    }

    #[test]
    fn test_drop_releases_output() {
        let (engine, backend) = engine();
        engine.play(SignalType::SpeechNoise, 65.0, Ear::Left).unwrap();
        drop(engine);
        assert_eq!(backend.active_outputs(), 0);
    }
}
