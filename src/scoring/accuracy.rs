// Accuracy scoring - how close a curve is to its target
//
// Linear penalty on the mean absolute deviation over the frequencies both
// curves share: 0 dB scores 100, every dB of average deviation costs
// `penalty_per_db` points, floored at 0. A curve scored against a target of
// another type or ear scores 0; that is a defined result, not an error.

use crate::config::ScoringConfig;
use crate::model::{RemCurve, RemTarget};

/// Scores measured or adjusted curves against targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyScorer {
    penalty_per_db: f64,
}

impl AccuracyScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            penalty_per_db: config.penalty_per_db,
        }
    }

    /// Mean absolute deviation (dB) over shared frequencies, or `None` when
    /// the curves share no frequency
    pub fn mean_deviation(measurement: &RemCurve, target: &RemTarget) -> Option<f64> {
        let (total, matched) = measurement
            .points
            .iter()
            .filter_map(|point| {
                target
                    .gain_at(point.frequency)
                    .map(|target_gain| (point.gain - target_gain).abs())
            })
            .fold((0.0, 0usize), |(sum, count), diff| (sum + diff, count + 1));

        if matched == 0 {
            None
        } else {
            Some(total / matched as f64)
        }
    }

    /// Score in [0, 100]
    ///
    /// A curve holding NaN or infinite gains scores 0.
    pub fn score(&self, measurement: &RemCurve, target: &RemTarget) -> f64 {
        if measurement.measurement_type != target.measurement_type || measurement.ear != target.ear
        {
            return 0.0;
        }

        match Self::mean_deviation(measurement, target) {
            Some(avg) if avg.is_finite() => {
                (100.0 - avg * self.penalty_per_db).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }
}

impl Default for AccuracyScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// Score with the default penalty of 10 points per dB
pub fn calculate_accuracy(measurement: &RemCurve, target: &RemTarget) -> f64 {
    AccuracyScorer::default().score(measurement, target)
}
