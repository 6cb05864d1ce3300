//! Test-signal synthesis
//!
//! Two sources feed every preview:
//! - an exponential sine sweep that glides from the start to the end
//!   frequency and then holds the end frequency until stopped
//! - a looped buffer of uniform white noise
//!
//! Speech, pink, white and ICRA noise all play the same white-noise loop. The
//! signal type is still carried on the voice so a shaped-noise source can be
//! added per type later.
//!
//! Level maps to linear gain as `10^((level - reference) / 20)` and the ear
//! selects a hard stereo pan (left -1, right +1) with an equal-power law.

use std::f32::consts::{FRAC_PI_4, TAU};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::PlaybackConfig;
use crate::error::AudioError;
use crate::model::{Ear, SignalType};

/// Linear gain for `level_db` relative to `reference_db`
pub fn level_to_gain(level_db: f64, reference_db: f64) -> f32 {
    10f64.powf((level_db - reference_db) / 20.0) as f32
}

/// Stereo pan position for an ear: -1 is full left, +1 full right
pub fn pan_for_ear(ear: Ear) -> f32 {
    match ear {
        Ear::Left => -1.0,
        Ear::Right => 1.0,
    }
}

/// Equal-power (left, right) channel gains for a pan position in [-1, 1]
pub fn pan_gains(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    let (left, right) = (angle.cos(), angle.sin());
    // snap the hard-pan residue from cos(pi/2) to silence
    let snap = |g: f32| if g.abs() < 1e-6 { 0.0 } else { g };
    (snap(left), snap(right))
}

/// Sine sweep with an exponential frequency glide
#[derive(Debug, Clone)]
pub struct SweepGenerator {
    sample_rate: f32,
    start_hz: f32,
    end_hz: f32,
    duration_secs: f32,
    phase: f32,
    frame: u64,
}

impl SweepGenerator {
    pub fn new(sample_rate: u32, start_hz: f32, end_hz: f32, duration_secs: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as f32,
            start_hz,
            end_hz,
            duration_secs,
            phase: 0.0,
            frame: 0,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(
            config.sample_rate,
            config.sweep_start_hz,
            config.sweep_end_hz,
            config.sweep_duration_secs,
        )
    }

    /// Instantaneous frequency `t` seconds after the sweep started
    pub fn frequency_at(&self, t: f32) -> f32 {
        if self.duration_secs <= 0.0 || t >= self.duration_secs {
            return self.end_hz;
        }
        let progress = (t / self.duration_secs).max(0.0);
        self.start_hz * (self.end_hz / self.start_hz).powf(progress)
    }

    pub fn next_sample(&mut self) -> f32 {
        let t = self.frame as f32 / self.sample_rate;
        let sample = self.phase.sin();
        self.phase = (self.phase + TAU * self.frequency_at(t) / self.sample_rate) % TAU;
        self.frame += 1;
        sample
    }
}

/// Looping white-noise buffer
#[derive(Debug, Clone)]
pub struct NoiseLoop {
    buffer: Arc<Vec<f32>>,
    position: usize,
}

impl NoiseLoop {
    /// Fill a `loop_secs` buffer with uniform noise in [-1, 1]
    pub fn generate<R: Rng>(sample_rate: u32, loop_secs: f32, rng: &mut R) -> Self {
        let len = ((sample_rate as f32 * loop_secs) as usize).max(1);
        let buffer = (0..len).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        Self {
            buffer: Arc::new(buffer),
            position: 0,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        let mut rng = StdRng::from_entropy();
        Self::generate(config.sample_rate, config.noise_loop_secs, &mut rng)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = self.buffer[self.position];
        self.position = (self.position + 1) % self.buffer.len();
        sample
    }
}

#[derive(Debug, Clone)]
enum Source {
    Sweep(SweepGenerator),
    Noise(NoiseLoop),
}

impl Source {
    fn next_sample(&mut self) -> f32 {
        match self {
            Source::Sweep(sweep) => sweep.next_sample(),
            Source::Noise(noise) => noise.next_sample(),
        }
    }
}

/// Summary of a voice, safe to copy out of an output handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceInfo {
    pub signal_type: SignalType,
    pub level_db: f64,
    pub ear: Ear,
    pub gain: f32,
    pub left_gain: f32,
    pub right_gain: f32,
    pub sample_rate: u32,
}

/// A playable test signal: source, level and pan
#[derive(Debug, Clone)]
pub struct Voice {
    info: VoiceInfo,
    source: Source,
}

impl Voice {
    pub fn new(
        signal_type: SignalType,
        level_db: f64,
        ear: Ear,
        config: &PlaybackConfig,
    ) -> Result<Self, AudioError> {
        if !level_db.is_finite() {
            return Err(AudioError::InvalidLevel { level: level_db });
        }

        let source = if signal_type.is_noise() {
            Source::Noise(NoiseLoop::from_config(config))
        } else {
            Source::Sweep(SweepGenerator::from_config(config))
        };

        let (left_gain, right_gain) = pan_gains(pan_for_ear(ear));
        Ok(Self {
            info: VoiceInfo {
                signal_type,
                level_db,
                ear,
                gain: level_to_gain(level_db, config.reference_level_db),
                left_gain,
                right_gain,
                sample_rate: config.sample_rate,
            },
            source,
        })
    }

    pub fn info(&self) -> VoiceInfo {
        self.info
    }

    /// Fill an interleaved buffer of `channels` channels
    ///
    /// Stereo and wider buffers get the panned signal on the first two
    /// channels and silence elsewhere; mono buffers get the unpanned signal.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let VoiceInfo {
            gain,
            left_gain,
            right_gain,
            ..
        } = self.info;

        for frame in out.chunks_mut(channels) {
            let sample = self.source.next_sample() * gain;
            if channels == 1 {
                frame[0] = sample;
                continue;
            }
            for (ch, slot) in frame.iter_mut().enumerate() {
                *slot = match ch {
                    0 => sample * left_gain,
                    1 => sample * right_gain,
                    _ => 0.0,
                };
            }
        }
    }
}
