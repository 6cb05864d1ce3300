//! Scripted practice run
//!
//! Drives one complete practice workflow against a [`RemService`]: session,
//! vent, probe placement, the REUR/REOR/REAR/REIG measurements, targets and
//! scoring. Used by the CLI and as an end-to-end smoke test of the service.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{
    Ear, MeasurementType, PrescriptionMethod, ProbePosition, RemCurve, RemTarget, SignalType,
    VentType,
};
use crate::service::RemService;
use crate::session::{SessionProgress, WorkflowStep};

/// Inputs of a practice run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticePlan {
    pub patient_id: String,
    pub hearing_aid_id: String,
    pub ear: Ear,
    pub probe_depth_mm: f64,
    pub vent_type: VentType,
    pub signal_type: SignalType,
    /// Stimulus level in dB SPL
    pub input_level: f64,
    pub prescription_method: PrescriptionMethod,
}

impl Default for PracticePlan {
    fn default() -> Self {
        Self {
            patient_id: "p1".to_string(),
            hearing_aid_id: "ha2".to_string(),
            ear: Ear::Right,
            probe_depth_mm: 25.0,
            vent_type: VentType::Closed,
            signal_type: SignalType::PureToneSweep,
            input_level: 65.0,
            prescription_method: PrescriptionMethod::NalNl2,
        }
    }
}

/// Score of one measurement against its matching target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetScore {
    pub measurement_type: MeasurementType,
    pub ear: Ear,
    pub accuracy: f64,
}

/// Outcome of a practice run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeReport {
    pub session_id: String,
    pub patient_id: String,
    pub hearing_aid_id: String,
    pub probe_position: ProbePosition,
    pub measurements: Vec<RemCurve>,
    pub targets: Vec<RemTarget>,
    pub scores: Vec<TargetScore>,
    /// Last score cached on the session
    pub accuracy: f64,
    pub progress: SessionProgress,
    pub errors: Vec<String>,
}

/// Run `plan` on `service`, replacing any active session
///
/// # Errors
/// Propagates the first refused workflow operation, for example a probe
/// depth outside the accepted range or an unknown hearing aid.
pub async fn run_practice(
    service: &RemService,
    plan: &PracticePlan,
) -> Result<PracticeReport, SessionError> {
    service.create_session(&plan.patient_id, &plan.hearing_aid_id)?;
    service.set_vent_type(plan.vent_type)?;
    let probe_position = service.position_probe_tube(plan.probe_depth_mm)?;

    let mut measurements = Vec::new();
    for measurement_type in WorkflowStep::sequence().filter_map(|step| step.measurement_type()) {
        let curve = service
            .perform_measurement(
                measurement_type,
                plan.ear,
                plan.signal_type,
                plan.input_level,
            )
            .await?;
        measurements.push(curve);
    }

    let targets =
        service.generate_targets_for(&plan.patient_id, plan.prescription_method, plan.ear)?;

    let mut scores = Vec::with_capacity(targets.len());
    for target in &targets {
        let measured = measurements
            .iter()
            .rev()
            .find(|m| m.measurement_type == target.measurement_type && m.ear == target.ear);
        if let Some(curve) = measured {
            scores.push(TargetScore {
                measurement_type: target.measurement_type,
                ear: target.ear,
                accuracy: service.calculate_accuracy(curve, target),
            });
        }
    }

    let session = service.complete_session()?;
    tracing::info!(
        "[Practice] Session {} finished: {} measurements, {} scores",
        session.id,
        session.measurements.len(),
        scores.len()
    );

    Ok(PracticeReport {
        progress: session.progress(),
        session_id: session.id,
        patient_id: session.patient_id,
        hearing_aid_id: session.hearing_aid_id,
        probe_position,
        measurements: session.measurements,
        targets: session.targets,
        scores,
        accuracy: session.accuracy,
        errors: session.errors,
    })
}
