// Scoring module - accuracy of measured and adjusted curves

pub mod accuracy;
pub mod adjustment;

pub use accuracy::{calculate_accuracy, AccuracyScorer};
pub use adjustment::CurveAdjuster;
