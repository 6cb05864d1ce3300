//! CPAL output backend for desktop platforms (Linux, macOS, Windows)
//!
//! `cpal::Stream` cannot cross threads on every platform, so each voice gets
//! a small owner thread that builds the stream, plays it and parks until the
//! handle is dropped. Dropping the handle closes the stop channel and joins
//! the thread, which drops the stream.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use ::cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::{log_audio_error, AudioError};
use crate::playback::signal::{Voice, VoiceInfo};

use super::{ActiveOutput, OutputBackend};

/// Output backend on the host's default output device
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalOutputBackend;

impl CpalOutputBackend {
    pub fn new() -> Self {
        Self
    }
}

fn build_output_stream(mut voice: Voice) -> Result<::cpal::Stream, AudioError> {
    let host = ::cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| AudioError::StreamOpenFailed {
            reason: "No default output device found".to_string(),
        })?;

    let config = device
        .default_output_config()
        .map_err(|e| AudioError::StreamOpenFailed {
            reason: format!("Failed to get default output config: {:?}", e),
        })?;

    let stream_config: ::cpal::StreamConfig = config.clone().into();
    let channels = stream_config.channels as usize;
    if stream_config.sample_rate.0 != voice.info().sample_rate {
        tracing::warn!(
            "[Playback] Device rate {} Hz differs from voice rate {} Hz; sweep timing will scale",
            stream_config.sample_rate.0,
            voice.info().sample_rate
        );
    }

    let err_fn = |err| tracing::error!("[Playback] Output stream error: {}", err);

    let stream = match config.sample_format() {
        ::cpal::SampleFormat::F32 => device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &::cpal::OutputCallbackInfo| {
                voice.render(data, channels);
            },
            err_fn,
            None,
        ),
        _ => {
            return Err(AudioError::StreamOpenFailed {
                reason: "Only F32 sample format is currently supported for output".to_string(),
            })
        }
    }
    .map_err(|e| AudioError::StreamOpenFailed {
        reason: format!("{:?}", e),
    })?;

    stream.play().map_err(|e| AudioError::HardwareError {
        details: format!("Output start failed: {}", e),
    })?;

    Ok(stream)
}

impl OutputBackend for CpalOutputBackend {
    fn open(&self, voice: Voice) -> Result<Box<dyn ActiveOutput>, AudioError> {
        let info = voice.info();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name("rem-playback".to_string())
            .spawn(move || match build_output_stream(voice) {
                Ok(stream) => {
                    let _ = ready_tx.send(Ok(()));
                    // Returns once the handle drops its sender
                    let _ = stop_rx.recv();
                    drop(stream);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            })?;

        let started = ready_rx.recv().unwrap_or_else(|_| {
            Err(AudioError::HardwareError {
                details: "playback thread exited before reporting".to_string(),
            })
        });

        match started {
            Ok(()) => Ok(Box::new(CpalOutput {
                info,
                stop_tx: Some(stop_tx),
                thread: Some(thread),
            })),
            Err(err) => {
                let _ = thread.join();
                log_audio_error(&err, "CpalOutputBackend::open");
                Err(err)
            }
        }
    }

    fn name(&self) -> &'static str {
        "cpal"
    }
}

struct CpalOutput {
    info: VoiceInfo,
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ActiveOutput for CpalOutput {
    fn info(&self) -> VoiceInfo {
        self.info
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        drop(self.stop_tx.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("[Playback] Playback thread panicked during shutdown");
            }
        }
    }
}
