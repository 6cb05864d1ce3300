// Target generator - prescriptive REAR/REIG targets
//
// Targets come from a fixed gain table per prescription method. The patient
// id is carried into the target but does not change the gains: the trainer
// has no audiogram to prescribe from. REIG removes a flat 5 dB REUR
// contribution from the REAR table.

use crate::model::{Ear, MeasurementPoint, MeasurementType, PrescriptionMethod, RemTarget, FREQUENCIES};

/// dB subtracted from the REAR table to form the REIG target
pub const REIG_OFFSET_DB: f64 = 5.0;

/// REAR target gains (dB) at each of `FREQUENCIES`
pub fn prescription_table(method: PrescriptionMethod) -> [f64; 11] {
    match method {
        PrescriptionMethod::NalNl2 => [5.0, 8.0, 12.0, 16.0, 20.0, 22.0, 25.0, 28.0, 30.0, 28.0, 25.0],
        PrescriptionMethod::Dsl => [10.0, 14.0, 18.0, 22.0, 25.0, 27.0, 30.0, 32.0, 33.0, 31.0, 28.0],
        PrescriptionMethod::NalNl1 => [4.0, 7.0, 11.0, 15.0, 19.0, 21.0, 24.0, 27.0, 29.0, 27.0, 24.0],
        PrescriptionMethod::Custom => [10.0, 12.0, 15.0, 18.0, 20.0, 22.0, 24.0, 25.0, 25.0, 24.0, 22.0],
    }
}

/// Builds target curves from the prescription tables
#[derive(Debug, Default, Clone, Copy)]
pub struct TargetGenerator;

impl TargetGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Exactly two targets, REAR then REIG, for `ear`
    pub fn generate(
        &self,
        patient_id: &str,
        method: PrescriptionMethod,
        ear: Ear,
    ) -> Vec<RemTarget> {
        let table = prescription_table(method);

        let target = |measurement_type: MeasurementType, offset: f64| RemTarget {
            measurement_type,
            ear,
            patient_id: patient_id.to_string(),
            points: FREQUENCIES
                .iter()
                .zip(table.iter())
                .map(|(&frequency, &gain)| MeasurementPoint::new(frequency, gain - offset))
                .collect(),
            prescription_method: method,
        };

        vec![
            target(MeasurementType::Rear, 0.0),
            target(MeasurementType::Reig, REIG_OFFSET_DB),
        ]
    }
}
