//! Measurement backends
//!
//! A backend turns a validated [`MeasurementRequest`] into a curve. The
//! contract is a future so a probe-microphone driver with real acquisition
//! latency can replace the simulator without changing callers. The simulated
//! backend resolves immediately.

use std::sync::Mutex;

use futures::future::{self, BoxFuture, FutureExt};

use crate::config::SimulationConfig;
use crate::error::SessionError;
use crate::model::{RemCurve, VirtualHearingAid};

use super::jitter::{JitterSource, UniformJitter};
use super::simulator::{MeasurementRequest, MeasurementSimulator};

/// Source of measured curves
pub trait MeasurementBackend: Send + Sync {
    fn measure(
        &self,
        request: MeasurementRequest,
        aid: VirtualHearingAid,
    ) -> BoxFuture<'static, Result<RemCurve, SessionError>>;

    fn name(&self) -> &'static str;
}

/// Backend driven by [`MeasurementSimulator`]
pub struct SimulatedBackend {
    simulator: MeasurementSimulator,
    jitter: Mutex<Box<dyn JitterSource>>,
}

impl SimulatedBackend {
    pub fn new(simulator: MeasurementSimulator, jitter: Box<dyn JitterSource>) -> Self {
        Self {
            simulator,
            jitter: Mutex::new(jitter),
        }
    }

    /// Simulator with entropy-seeded uniform jitter
    pub fn from_config(config: SimulationConfig) -> Self {
        Self::new(
            MeasurementSimulator::new(config),
            Box::new(UniformJitter::new()),
        )
    }

    fn simulate_now(
        &self,
        request: &MeasurementRequest,
        aid: &VirtualHearingAid,
    ) -> Result<RemCurve, SessionError> {
        let mut jitter = self
            .jitter
            .lock()
            .map_err(|_| SessionError::StatePoisoned)?;
        Ok(self.simulator.simulate(request, aid, jitter.as_mut()))
    }
}

impl MeasurementBackend for SimulatedBackend {
    fn measure(
        &self,
        request: MeasurementRequest,
        aid: VirtualHearingAid,
    ) -> BoxFuture<'static, Result<RemCurve, SessionError>> {
        // The curve is synthesized before the future is returned; awaiting it
        // never suspends.
        future::ready(self.simulate_now(&request, &aid)).boxed()
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ear, HearingAidCatalog, MeasurementType, SignalType, VentType};
    use crate::simulation::jitter::ZeroJitter;

    #[tokio::test]
    async fn test_simulated_backend_resolves_curve() {
        let backend = SimulatedBackend::new(MeasurementSimulator::default(), Box::new(ZeroJitter));
        let aid = HearingAidCatalog::builtin().get("ha1").unwrap().clone();
        let request = MeasurementRequest {
            measurement_type: MeasurementType::Reig,
            ear: Ear::Left,
            signal_type: SignalType::SpeechNoise,
            input_level: 65.0,
            vent_type: VentType::Closed,
        };

        let curve = backend.measure(request, aid.clone()).await.unwrap();
        assert_eq!(curve.measurement_type, MeasurementType::Reig);
        assert_eq!(curve.ear, Ear::Left);
        assert_eq!(curve.gain_at(1000), Some(aid.default_gain(1000)));
        assert_eq!(backend.name(), "simulated");
    }
}
