// MeasurementSimulator - synthetic real-ear response curves
//
// Each measurement type has an analytic base response sampled at the eleven
// audiometric frequencies. A jitter offset is added per point and the result
// is rounded to one decimal place:
//
//   REUR  ear canal resonance: 0 / 3 / 10 / 5 dB across <1k, 1-2k, 2-3k, >=3k
//   REOR  occlusion: +5 dB below 500 Hz, +2 dB to 1 kHz, -3 dB above
//   RECD  coupler difference: 3 / 5 / 8 / 12 dB across <500, 500-2k, 2-4k, >=4k
//   REAR  default gain + (input - 65) * 0.5
//   REIG  default gain
//   RESR  min(max output - input, max gain)

use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::model::{
    now_millis, round_tenth, Ear, MeasurementPoint, MeasurementType, RemCurve, SignalType,
    VentType, VirtualHearingAid, FREQUENCIES,
};

use super::jitter::JitterSource;
use super::vent::{NeutralVent, VentModel};

/// Parameters of one measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRequest {
    pub measurement_type: MeasurementType,
    pub ear: Ear,
    pub signal_type: SignalType,
    /// Stimulus level in dB SPL
    pub input_level: f64,
    pub vent_type: VentType,
}

fn unaided_gain(frequency: u32) -> f64 {
    match frequency {
        f if f < 1000 => 0.0,
        f if f < 2000 => 3.0,
        f if f < 3000 => 10.0,
        _ => 5.0,
    }
}

fn occluded_gain(frequency: u32) -> f64 {
    match frequency {
        f if f < 500 => 5.0,
        f if f < 1000 => 2.0,
        _ => -3.0,
    }
}

fn coupler_difference(frequency: u32) -> f64 {
    match frequency {
        f if f < 500 => 3.0,
        f if f < 2000 => 5.0,
        f if f < 4000 => 8.0,
        _ => 12.0,
    }
}

/// Synthesizes frequency-response curves for the practice workflow
#[derive(Clone)]
pub struct MeasurementSimulator {
    config: SimulationConfig,
    vent_model: Arc<dyn VentModel>,
}

impl MeasurementSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            vent_model: Arc::new(NeutralVent),
        }
    }

    /// Replace the vent response used for REOR curves
    pub fn with_vent_model(mut self, vent_model: Arc<dyn VentModel>) -> Self {
        self.vent_model = vent_model;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Noise-free gain for one frequency
    pub fn base_gain(
        &self,
        request: &MeasurementRequest,
        aid: &VirtualHearingAid,
        frequency: u32,
    ) -> f64 {
        match request.measurement_type {
            MeasurementType::Reur => unaided_gain(frequency),
            MeasurementType::Reor => {
                occluded_gain(frequency)
                    + self
                        .vent_model
                        .occluded_offset_db(request.vent_type, frequency)
            }
            MeasurementType::Recd => coupler_difference(frequency),
            MeasurementType::Rear => {
                aid.default_gain(frequency)
                    + (request.input_level - self.config.reference_input_level)
                        * self.config.rear_level_slope
            }
            MeasurementType::Reig => aid.default_gain(frequency),
            MeasurementType::Resr => (aid.max_output - request.input_level).min(aid.max_gain),
        }
    }

    /// Synthesize a full curve for `request` against `aid`
    pub fn simulate(
        &self,
        request: &MeasurementRequest,
        aid: &VirtualHearingAid,
        jitter: &mut dyn JitterSource,
    ) -> RemCurve {
        let points = FREQUENCIES
            .iter()
            .map(|&frequency| {
                let gain = self.base_gain(request, aid, frequency)
                    + jitter.offset(self.config.jitter_amplitude_db);
                MeasurementPoint::new(frequency, round_tenth(gain))
            })
            .collect();

        tracing::debug!(
            "[Simulator] {} {} curve for {} at {} dB SPL",
            request.measurement_type,
            request.ear,
            aid.id,
            request.input_level
        );

        RemCurve {
            measurement_type: request.measurement_type,
            ear: request.ear,
            signal_type: request.signal_type,
            input_level: request.input_level,
            points,
            timestamp: now_millis(),
        }
    }
}

impl Default for MeasurementSimulator {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
