// Prescriptive target curves

use serde::{Deserialize, Serialize};

use super::curve::MeasurementPoint;
use super::types::{Ear, MeasurementType, PrescriptionMethod};

/// Target response a fitting should reach for one measurement type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemTarget {
    pub measurement_type: MeasurementType,
    pub ear: Ear,
    pub patient_id: String,
    pub points: Vec<MeasurementPoint>,
    pub prescription_method: PrescriptionMethod,
}

impl RemTarget {
    pub fn gain_at(&self, frequency: u32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.frequency == frequency)
            .map(|p| p.gain)
    }
}
