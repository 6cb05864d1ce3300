// Offline rendering of test signals to WAV files

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::AudioError;

use super::signal::Voice;

const CHANNELS: u16 = 2;
const BLOCK_FRAMES: usize = 1024;

/// Render `seconds` of `voice` as a stereo 32-bit float WAV file
///
/// Returns the number of frames written. The voice keeps its position, so a
/// second call continues where the first stopped.
pub fn render_to_wav<P: AsRef<Path>>(
    voice: &mut Voice,
    seconds: f32,
    path: P,
) -> Result<usize, AudioError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(AudioError::ExportFailed {
            reason: format!("duration must be a non-negative number of seconds (got {})", seconds),
        });
    }

    let sample_rate = voice.info().sample_rate;
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let total_frames = (sample_rate as f32 * seconds) as usize;
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    let mut block = vec![0.0f32; BLOCK_FRAMES * CHANNELS as usize];

    let mut remaining = total_frames;
    while remaining > 0 {
        let frames = remaining.min(BLOCK_FRAMES);
        let samples = &mut block[..frames * CHANNELS as usize];
        voice.render(samples, CHANNELS as usize);
        for &sample in samples.iter() {
            writer.write_sample(sample)?;
        }
        remaining -= frames;
    }

    writer.finalize()?;
    tracing::debug!(
        "[Playback] Rendered {} frames of {} to {:?}",
        total_frames,
        voice.info().signal_type,
        path.as_ref()
    );
    Ok(total_frames)
}
