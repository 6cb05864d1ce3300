// Probe tube placement classification

use crate::config::ProbeConfig;
use crate::model::ProbePosition;

impl ProbePosition {
    /// Classify an insertion depth in millimetres
    ///
    /// Depths inside `[min_depth_mm, max_depth_mm]` (inclusive) are correct.
    /// A NaN depth means no reading, so the tube counts as not inserted.
    pub fn classify(depth_mm: f64, limits: &ProbeConfig) -> ProbePosition {
        if depth_mm.is_nan() {
            ProbePosition::NotInserted
        } else if depth_mm < limits.min_depth_mm {
            ProbePosition::TooShallow
        } else if depth_mm > limits.max_depth_mm {
            ProbePosition::TooDeep
        } else {
            ProbePosition::Correct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(depth: f64) -> ProbePosition {
        ProbePosition::classify(depth, &ProbeConfig::default())
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(classify(20.0), ProbePosition::Correct);
        assert_eq!(classify(25.0), ProbePosition::Correct);
        assert_eq!(classify(30.0), ProbePosition::Correct);
    }

    #[test]
    fn test_outside_range() {
        assert_eq!(classify(19.9), ProbePosition::TooShallow);
        assert_eq!(classify(0.0), ProbePosition::TooShallow);
        assert_eq!(classify(-4.0), ProbePosition::TooShallow);
        assert_eq!(classify(30.1), ProbePosition::TooDeep);
        assert_eq!(classify(f64::INFINITY), ProbePosition::TooDeep);
        assert_eq!(classify(f64::NEG_INFINITY), ProbePosition::TooShallow);
    }

    #[test]
    fn test_nan_is_not_inserted() {
        assert_eq!(classify(f64::NAN), ProbePosition::NotInserted);
    }

    #[test]
    fn test_custom_limits() {
        let limits = ProbeConfig {
            min_depth_mm: 15.0,
            max_depth_mm: 18.0,
        };
        assert_eq!(ProbePosition::classify(16.0, &limits), ProbePosition::Correct);
        assert_eq!(ProbePosition::classify(20.0, &limits), ProbePosition::TooDeep);
    }
}
