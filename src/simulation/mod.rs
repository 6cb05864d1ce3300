// Simulation module - synthetic measurements for the practice workflow
//
// 1. MeasurementSimulator: analytic per-type curve models
// 2. JitterSource: injectable randomness added to every point
// 3. MeasurementBackend: async seam between the workflow and curve source

pub mod backend;
pub mod jitter;
pub mod simulator;
pub mod vent;

pub use backend::{MeasurementBackend, SimulatedBackend};
pub use jitter::{FixedJitter, JitterSource, UniformJitter, ZeroJitter};
pub use simulator::{MeasurementRequest, MeasurementSimulator};
pub use vent::{NeutralVent, VentModel};
