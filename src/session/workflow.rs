// Workflow steps - advisory ordering of a practice session
//
// The clinical order is probe placement, REUR, REOR, REAR, REIG, target
// comparison and then adjustment. Nothing here blocks an out-of-order
// measurement; the sequence only drives the "what next" hint in the UI.

use serde::Serialize;

use crate::model::MeasurementType;

/// One step of the practice workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    ProbePlacement,
    Reur,
    Reor,
    Rear,
    Reig,
    TargetComparison,
    Adjustment,
}

impl WorkflowStep {
    pub const FIRST: WorkflowStep = WorkflowStep::ProbePlacement;

    /// Get the next step in the sequence
    ///
    /// # Returns
    /// * `Some(WorkflowStep)` - Next step
    /// * `None` - Workflow complete
    pub fn next(&self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::ProbePlacement => Some(WorkflowStep::Reur),
            WorkflowStep::Reur => Some(WorkflowStep::Reor),
            WorkflowStep::Reor => Some(WorkflowStep::Rear),
            WorkflowStep::Rear => Some(WorkflowStep::Reig),
            WorkflowStep::Reig => Some(WorkflowStep::TargetComparison),
            WorkflowStep::TargetComparison => Some(WorkflowStep::Adjustment),
            WorkflowStep::Adjustment => None,
        }
    }

    /// Measurement taken during this step, if any
    pub fn measurement_type(&self) -> Option<MeasurementType> {
        match self {
            WorkflowStep::Reur => Some(MeasurementType::Reur),
            WorkflowStep::Reor => Some(MeasurementType::Reor),
            WorkflowStep::Rear => Some(MeasurementType::Rear),
            WorkflowStep::Reig => Some(MeasurementType::Reig),
            _ => None,
        }
    }

    /// Iterate the whole sequence from probe placement
    pub fn sequence() -> impl Iterator<Item = WorkflowStep> {
        std::iter::successors(Some(Self::FIRST), |step| step.next())
    }
}

/// Progress snapshot of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProgress {
    pub probe_ready: bool,
    /// Distinct measurement types recorded so far, in first-recorded order
    pub measured: Vec<MeasurementType>,
    pub has_targets: bool,
    pub completed: bool,
    /// First step not yet done; `None` once the session is completed
    pub next_step: Option<WorkflowStep>,
}

impl SessionProgress {
    pub fn is_complete(&self) -> bool {
        self.next_step.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order() {
        let steps: Vec<WorkflowStep> = WorkflowStep::sequence().collect();
        assert_eq!(
            steps,
            vec![
                WorkflowStep::ProbePlacement,
                WorkflowStep::Reur,
                WorkflowStep::Reor,
                WorkflowStep::Rear,
                WorkflowStep::Reig,
                WorkflowStep::TargetComparison,
                WorkflowStep::Adjustment,
            ]
        );
    }

    #[test]
    fn test_measurement_steps() {
        let measured: Vec<MeasurementType> = WorkflowStep::sequence()
            .filter_map(|s| s.measurement_type())
            .collect();
        assert_eq!(
            measured,
            vec![
                MeasurementType::Reur,
                MeasurementType::Reor,
                MeasurementType::Rear,
                MeasurementType::Reig,
            ]
        );
        assert_eq!(WorkflowStep::Adjustment.next(), None);
    }
}
