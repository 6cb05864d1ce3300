// REM Trainer Core - real-ear measurement practice engine
// Simulated probe-microphone measurements, prescriptive targets, accuracy
// scoring and test-signal preview for audiology training

// Module declarations
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod playback;
pub mod practice;
pub mod scoring;
pub mod service;
pub mod session;
pub mod simulation;
pub mod targets;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{AudioError, ErrorCode, SessionError};
pub use events::{EventHub, SessionEvent};
pub use model::{
    Ear, HearingAidCatalog, MeasurementPoint, MeasurementType, PrescriptionMethod, ProbePosition,
    RemCurve, RemErrorType, RemSession, RemTarget, SignalType, VentType, VirtualHearingAid,
    FREQUENCIES,
};
pub use practice::{run_practice, PracticePlan, PracticeReport};
pub use scoring::{calculate_accuracy, AccuracyScorer, CurveAdjuster};
pub use service::RemService;
pub use session::{SessionProgress, WorkflowStep};

use tracing_subscriber::filter::LevelFilter;

/// Install the global fmt subscriber
///
/// Safe to call more than once; only the first call installs anything.
/// Records from the `log` crate (error helpers, config loading) are bridged
/// into the same output.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
