// Vent response slot for occluded measurements
//
// The trainer does not model venting acoustics: a vent changes nothing in
// the simulated REOR. The trait keeps a place for a vent-dependent
// low-frequency offset so a richer model can be plugged into the simulator
// without touching the measurement API.

use crate::model::VentType;

/// Frequency-dependent offset (dB) a vent adds to the occluded response
pub trait VentModel: Send + Sync {
    fn occluded_offset_db(&self, vent: VentType, frequency: u32) -> f64;
}

/// Vent type has no acoustic effect
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralVent;

impl VentModel for NeutralVent {
    fn occluded_offset_db(&self, _vent: VentType, _frequency: u32) -> f64 {
        0.0
    }
}
