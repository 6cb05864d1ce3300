// REMSession - the state of one practice run
//
// Plain data. Workflow rules (probe gating, recording, completion) live in
// `crate::session`, which implements them as methods on this type.

use serde::{Deserialize, Serialize};

use super::curve::RemCurve;
use super::target::RemTarget;
use super::types::{MeasurementType, ProbePosition, VentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemSession {
    pub id: String,
    pub patient_id: String,
    pub hearing_aid_id: String,
    /// Milliseconds since the Unix epoch
    pub start_time: u64,
    pub completed: bool,
    pub probe_tube_position: ProbePosition,
    pub vent_type: VentType,
    /// Every measurement taken, oldest first
    pub measurements: Vec<RemCurve>,
    pub targets: Vec<RemTarget>,
    /// Last measurement type performed
    pub current_step: MeasurementType,
    pub errors: Vec<String>,
    /// Last computed accuracy score (0-100)
    pub accuracy: f64,
}
