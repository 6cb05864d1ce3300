// Session workflow - rules applied to a RemSession
//
// The session is an explicit value owned by whoever drives the workflow
// (the service facade keeps one in a slot). These methods are the only
// place probe gating and recording rules live:
// 1. a measurement is refused unless the probe is CORRECT
// 2. every refusal on an existing session is appended to `errors`
// 3. recording a measurement sets `current_step` to its type
// 4. targets are replaced wholesale, never merged

mod probe;
mod workflow;

pub use workflow::{SessionProgress, WorkflowStep};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::ProbeConfig;
use crate::error::{ErrorCode, SessionError};
use crate::model::{
    now_millis, Ear, MeasurementType, ProbePosition, RemCurve, RemSession, RemTarget, VentType,
};

const ID_SUFFIX_LEN: usize = 6;

fn session_id(start_time: u64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("rem-{}-{}", start_time, suffix)
}

impl RemSession {
    /// Fresh session: probe not inserted, nothing measured, REUR first
    pub fn new(patient_id: impl Into<String>, hearing_aid_id: impl Into<String>) -> Self {
        let start_time = now_millis();
        Self {
            id: session_id(start_time),
            patient_id: patient_id.into(),
            hearing_aid_id: hearing_aid_id.into(),
            start_time,
            completed: false,
            probe_tube_position: ProbePosition::NotInserted,
            vent_type: VentType::default(),
            measurements: Vec::new(),
            targets: Vec::new(),
            current_step: MeasurementType::Reur,
            errors: Vec::new(),
            accuracy: 0.0,
        }
    }

    /// Classify and store a probe insertion depth
    pub fn position_probe(&mut self, depth_mm: f64, limits: &ProbeConfig) -> ProbePosition {
        let position = ProbePosition::classify(depth_mm, limits);
        self.probe_tube_position = position;
        position
    }

    pub fn set_vent_type(&mut self, vent_type: VentType) {
        self.vent_type = vent_type;
    }

    /// Check that a measurement may be taken now
    ///
    /// A refusal is also appended to `errors`.
    pub fn ensure_ready_for_measurement(&mut self) -> Result<(), SessionError> {
        if self.probe_tube_position.is_correct() {
            return Ok(());
        }
        let err = SessionError::ProbeNotPositioned {
            position: self.probe_tube_position,
        };
        self.record_error(&err);
        Err(err)
    }

    pub fn record_error(&mut self, err: &SessionError) {
        self.errors.push(err.message());
    }

    /// Append a measurement and make its type the current step
    pub fn record_measurement(&mut self, curve: RemCurve) {
        self.current_step = curve.measurement_type;
        self.measurements.push(curve);
    }

    pub fn replace_targets(&mut self, targets: Vec<RemTarget>) {
        self.targets = targets;
    }

    pub fn record_accuracy(&mut self, score: f64) {
        self.accuracy = score;
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Most recent measurement of `measurement_type` for `ear`
    ///
    /// Later measurements supersede earlier ones of the same type and ear.
    pub fn latest_measurement(
        &self,
        measurement_type: MeasurementType,
        ear: Ear,
    ) -> Option<&RemCurve> {
        self.measurements
            .iter()
            .rev()
            .find(|m| m.measurement_type == measurement_type && m.ear == ear)
    }

    pub fn target_for(&self, measurement_type: MeasurementType, ear: Ear) -> Option<&RemTarget> {
        self.targets
            .iter()
            .find(|t| t.measurement_type == measurement_type && t.ear == ear)
    }

    /// Ear of the last measurement taken
    pub fn last_ear(&self) -> Option<Ear> {
        self.measurements.last().map(|m| m.ear)
    }

    /// Advisory progress through the workflow
    pub fn progress(&self) -> SessionProgress {
        let mut measured: Vec<MeasurementType> = Vec::new();
        for m in &self.measurements {
            if !measured.contains(&m.measurement_type) {
                measured.push(m.measurement_type);
            }
        }

        let probe_ready = self.probe_tube_position.is_correct();
        let has_targets = !self.targets.is_empty();

        let next_step = WorkflowStep::sequence().find(|step| match step {
            WorkflowStep::ProbePlacement => !probe_ready,
            WorkflowStep::TargetComparison => !has_targets,
            WorkflowStep::Adjustment => !self.completed,
            other => other
                .measurement_type()
                .is_some_and(|t| !measured.contains(&t)),
        });

        SessionProgress {
            probe_ready,
            measured,
            has_targets,
            completed: self.completed,
            next_step,
        }
    }
}
