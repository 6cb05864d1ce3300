//! Session event types published to UI subscribers.

use serde::{Deserialize, Serialize};

use crate::model::{Ear, MeasurementType, ProbePosition, SignalType, VentType};

/// Workflow and playback events, one per state change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionCreated {
        session_id: String,
        patient_id: String,
        hearing_aid_id: String,
    },
    /// A previous session was dropped in favour of a new one
    SessionDiscarded {
        session_id: String,
        measurement_count: usize,
    },
    ProbePositioned {
        depth_mm: f64,
        position: ProbePosition,
    },
    VentChanged {
        vent_type: VentType,
    },
    MeasurementRecorded {
        measurement_type: MeasurementType,
        ear: Ear,
        point_count: usize,
    },
    /// A workflow operation was refused
    OperationRejected {
        operation: String,
        code: i32,
        message: String,
    },
    TargetsGenerated {
        count: usize,
    },
    AccuracyScored {
        measurement_type: MeasurementType,
        ear: Ear,
        score: f64,
    },
    SessionCompleted {
        session_id: String,
        accuracy: f64,
    },
    PlaybackStarted {
        signal_type: SignalType,
        level_db: f64,
        ear: Ear,
    },
    PlaybackStopped,
}
