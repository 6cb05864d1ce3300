//! Interactive gain adjustment against a target
//!
//! The practice chart lets the student drag individual frequency points of a
//! measured curve toward the prescriptive target and watch the score move.
//! [`CurveAdjuster`] is the state behind that chart: the original measurement
//! is kept untouched, edits go to a working copy, and only edited points
//! clamp to the 0-80 dB range of the chart.

use crate::model::{clamp_adjusted_gain, RemCurve, RemTarget};

use super::accuracy::AccuracyScorer;

/// Working copy of a measured curve being fitted to a target
#[derive(Debug, Clone, PartialEq)]
pub struct CurveAdjuster {
    original: RemCurve,
    adjusted: RemCurve,
}

impl CurveAdjuster {
    /// Start adjusting `measured`. The working copy starts equal to it.
    pub fn new(measured: RemCurve) -> Self {
        Self {
            adjusted: measured.clone(),
            original: measured,
        }
    }

    pub fn original(&self) -> &RemCurve {
        &self.original
    }

    pub fn adjusted(&self) -> &RemCurve {
        &self.adjusted
    }

    /// Set the gain at `frequency`. Returns the clamped value, or `None` if
    /// the curve has no point at that frequency.
    pub fn set_gain(&mut self, frequency: u32, gain: f64) -> Option<f64> {
        self.adjusted.set_clamped_gain(frequency, gain)
    }

    /// Nudge the gain at `frequency` by `delta_db`
    pub fn step_gain(&mut self, frequency: u32, delta_db: f64) -> Option<f64> {
        let current = self.adjusted.gain_at(frequency)?;
        self.set_gain(frequency, current + delta_db)
    }

    /// Shift every point by `delta_db` (overall gain control)
    pub fn shift_all(&mut self, delta_db: f64) {
        for point in self.adjusted.points.iter_mut() {
            point.gain = clamp_adjusted_gain(point.gain + delta_db);
        }
    }

    /// Discard all edits
    pub fn reset(&mut self) {
        *self = Self::new(self.original.clone());
    }

    /// Score of the working copy against `target`
    pub fn accuracy_against(&self, target: &RemTarget, scorer: &AccuracyScorer) -> f64 {
        scorer.score(&self.adjusted, target)
    }

    pub fn into_adjusted(self) -> RemCurve {
        self.adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Ear, MeasurementPoint, MeasurementType, PrescriptionMethod, SignalType, FREQUENCIES,
    };

    fn measured(gain: f64) -> RemCurve {
        RemCurve {
            measurement_type: MeasurementType::Rear,
            ear: Ear::Right,
            signal_type: SignalType::PureToneSweep,
            input_level: 65.0,
            points: FREQUENCIES
                .iter()
                .map(|&f| MeasurementPoint::new(f, gain))
                .collect(),
            timestamp: 0,
        }
    }

    fn flat_target(gain: f64) -> RemTarget {
        RemTarget {
            measurement_type: MeasurementType::Rear,
            ear: Ear::Right,
            patient_id: "p1".to_string(),
            points: FREQUENCIES
                .iter()
                .map(|&f| MeasurementPoint::new(f, gain))
                .collect(),
            prescription_method: PrescriptionMethod::Custom,
        }
    }

    #[test]
    fn test_adjusting_toward_target_raises_score() {
        let scorer = AccuracyScorer::default();
        let target = flat_target(25.0);
        let mut adjuster = CurveAdjuster::new(measured(20.0));

        let before = adjuster.accuracy_against(&target, &scorer);
        assert!((before - 50.0).abs() < 1e-9);

        adjuster.shift_all(5.0);
        assert_eq!(adjuster.accuracy_against(&target, &scorer), 100.0);
        assert_eq!(adjuster.original().gain_at(1000), Some(20.0));
    }

    #[test]
    fn test_edits_clamp_to_chart_range() {
        let mut adjuster = CurveAdjuster::new(measured(78.0));
        assert_eq!(adjuster.step_gain(1000, 5.0), Some(80.0));
        assert_eq!(adjuster.set_gain(2000, -10.0), Some(0.0));
        adjuster.shift_all(-100.0);
        assert!(adjuster.adjusted().points.iter().all(|p| p.gain == 0.0));
    }

    #[test]
    fn test_unedited_points_keep_measured_gain() {
        let scorer = AccuracyScorer::default();
        let mut adjuster = CurveAdjuster::new(measured(-3.0));
        assert_eq!(adjuster.adjusted(), adjuster.original());
        assert!((adjuster.accuracy_against(&flat_target(-3.0), &scorer) - 100.0).abs() < 1e-9);

        // only the edited point is pulled into range
        assert_eq!(adjuster.step_gain(125, 1.0), Some(0.0));
        assert_eq!(adjuster.adjusted().gain_at(125), Some(0.0));
        assert_eq!(adjuster.adjusted().gain_at(250), Some(-3.0));
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        let mut adjuster = CurveAdjuster::new(measured(20.0));
        assert_eq!(adjuster.set_gain(1234, 30.0), None);
        assert_eq!(adjuster.step_gain(1234, 1.0), None);
    }

    #[test]
    fn test_reset_restores_measurement() {
        let mut adjuster = CurveAdjuster::new(measured(20.0));
        adjuster.step_gain(500, 7.5);
        adjuster.reset();
        assert_eq!(adjuster.adjusted(), &measured(20.0));
    }
}
