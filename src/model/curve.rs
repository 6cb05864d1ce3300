// Measured frequency-response curves
//
// A curve always carries one point per audiometric frequency in
// `FREQUENCIES`, in ascending order. Gains are unbounded when a curve is
// synthesized; interactive edits clamp to [ADJUST_MIN_GAIN_DB, ADJUST_MAX_GAIN_DB].

use serde::{Deserialize, Serialize};

use super::types::{Ear, MeasurementType, SignalType};

/// The eleven frequencies (Hz) every curve and target is sampled at
pub const FREQUENCIES: [u32; 11] = [
    125, 250, 500, 750, 1000, 1500, 2000, 3000, 4000, 6000, 8000,
];

/// Lowest gain an interactive adjustment may set
pub const ADJUST_MIN_GAIN_DB: f64 = 0.0;
/// Highest gain an interactive adjustment may set
pub const ADJUST_MAX_GAIN_DB: f64 = 80.0;

/// One (frequency, gain) sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    /// Frequency in Hz
    pub frequency: u32,
    /// Gain in dB
    pub gain: f64,
}

impl MeasurementPoint {
    pub fn new(frequency: u32, gain: f64) -> Self {
        Self { frequency, gain }
    }
}

/// A measured (or simulated) real-ear response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemCurve {
    pub measurement_type: MeasurementType,
    pub ear: Ear,
    pub signal_type: SignalType,
    /// Stimulus level in dB SPL
    pub input_level: f64,
    pub points: Vec<MeasurementPoint>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl RemCurve {
    /// Gain at `frequency`, if the curve has a point there
    pub fn gain_at(&self, frequency: u32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.frequency == frequency)
            .map(|p| p.gain)
    }

    /// Overwrite the gain at `frequency`, clamped to the adjustment range.
    ///
    /// Returns the stored value, or `None` when the frequency is not part of
    /// the curve.
    pub fn set_clamped_gain(&mut self, frequency: u32, gain: f64) -> Option<f64> {
        let point = self.points.iter_mut().find(|p| p.frequency == frequency)?;
        point.gain = clamp_adjusted_gain(gain);
        Some(point.gain)
    }

    /// True when the curve has exactly one point for each of `FREQUENCIES`
    pub fn has_standard_frequencies(&self) -> bool {
        self.points.len() == FREQUENCIES.len()
            && self
                .points
                .iter()
                .zip(FREQUENCIES.iter())
                .all(|(p, &f)| p.frequency == f)
    }
}

/// Clamp a gain to the interactive adjustment range
pub fn clamp_adjusted_gain(gain: f64) -> f64 {
    if gain.is_nan() {
        return ADJUST_MIN_GAIN_DB;
    }
    gain.clamp(ADJUST_MIN_GAIN_DB, ADJUST_MAX_GAIN_DB)
}

/// Round to one decimal place
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
