// Domain model - data contracts for the REM practice workflow

pub mod curve;
pub mod hearing_aid;
pub mod session;
pub mod target;
pub mod types;

use std::time::{SystemTime, UNIX_EPOCH};

pub use curve::{
    clamp_adjusted_gain, round_tenth, MeasurementPoint, RemCurve, ADJUST_MAX_GAIN_DB,
    ADJUST_MIN_GAIN_DB, FREQUENCIES,
};
pub use hearing_aid::{HearingAidCatalog, VirtualHearingAid};
pub use session::RemSession;
pub use target::RemTarget;
pub use types::{
    Ear, HearingAidStyle, MeasurementType, PrescriptionMethod, ProbePosition, RemErrorType,
    SignalType, VentType,
};

/// Wall-clock milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
