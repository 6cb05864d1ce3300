// RemService: boundary facade for the practice UI
//
// Owns the reference catalog, the measurement and output backends and one
// session slot. A new session replaces the old one. Every refused operation
// is logged with its error code and published as an event; refusals on an
// existing session are also appended to the session's error list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::error::{log_session_error, AudioError, ErrorCode, SessionError};
use crate::events::{EventHub, SessionEvent};
use crate::model::{
    Ear, HearingAidCatalog, MeasurementType, PrescriptionMethod, ProbePosition, RemCurve,
    RemSession, RemTarget, SignalType, VentType, VirtualHearingAid,
};
use crate::playback::{default_backend, OutputBackend, PlaybackEngine, VoiceInfo};
use crate::scoring::AccuracyScorer;
use crate::session::SessionProgress;
use crate::simulation::{MeasurementBackend, MeasurementRequest, SimulatedBackend};
use crate::targets::TargetGenerator;

/// Real-ear measurement practice service
///
/// This facade handles:
/// - Session lifecycle (create, complete, replace)
/// - Probe tube placement and vent selection
/// - Measurements through the injected [`MeasurementBackend`]
/// - Prescriptive targets and accuracy scoring
/// - Test-signal preview through the injected [`OutputBackend`]
///
/// # Example
/// ```ignore
/// let service = RemService::new(AppConfig::default());
/// service.create_session("p1", "ha2")?;
/// service.position_probe_tube(25.0)?;
/// let rear = service
///     .perform_measurement(MeasurementType::Rear, Ear::Right, SignalType::PureToneSweep, 65.0)
///     .await?;
/// ```
pub struct RemService {
    config: AppConfig,
    catalog: Arc<HearingAidCatalog>,
    measurement: Arc<dyn MeasurementBackend>,
    playback: PlaybackEngine,
    targets: TargetGenerator,
    scorer: AccuracyScorer,
    events: Arc<EventHub>,
    session: Mutex<Option<RemSession>>,
    disposed: AtomicBool,
}

impl RemService {
    /// Service with the simulated measurement backend and the default output
    pub fn new(config: AppConfig) -> Self {
        let measurement = Arc::new(SimulatedBackend::from_config(config.simulation.clone()));
        Self::with_backends(config, measurement, default_backend())
    }

    /// Service with explicit backends (deterministic jitter, offline output)
    pub fn with_backends(
        config: AppConfig,
        measurement: Arc<dyn MeasurementBackend>,
        output: Arc<dyn OutputBackend>,
    ) -> Self {
        tracing::info!(
            "[RemService] Starting with {} measurements and {} output",
            measurement.name(),
            output.name()
        );
        Self {
            catalog: HearingAidCatalog::builtin(),
            playback: PlaybackEngine::new(config.playback.clone(), output),
            targets: TargetGenerator::new(),
            scorer: AccuracyScorer::new(&config.scoring),
            events: Arc::new(EventHub::new(&config.events)),
            session: Mutex::new(None),
            disposed: AtomicBool::new(false),
            measurement,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Event hub for UI subscribers
    pub fn events(&self) -> Arc<EventHub> {
        Arc::clone(&self.events)
    }

    // ========================================================================
    // Lock helpers
    // ========================================================================

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<RemSession>>, SessionError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(SessionError::Disposed);
        }
        self.session.lock().map_err(|_| SessionError::StatePoisoned)
    }

    /// Log and publish a refused operation
    fn reject(&self, err: SessionError, operation: &str) -> SessionError {
        log_session_error(&err, operation);
        self.events.publish(SessionEvent::OperationRejected {
            operation: operation.to_string(),
            code: err.code(),
            message: err.message(),
        });
        err
    }

    /// Run `f` on the active session, or fail with "No active session"
    fn with_session<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut RemSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut guard = self.lock_session().map_err(|err| self.reject(err, operation))?;
        match guard.as_mut() {
            Some(session) => f(session).map_err(|err| self.reject(err, operation)),
            None => Err(self.reject(SessionError::NoActiveSession, operation)),
        }
    }

    // ========================================================================
    // Session workflow
    // ========================================================================

    /// Start a session for a patient and hearing aid
    ///
    /// Any previous session is discarded. The hearing aid id is not checked
    /// here; an unknown id fails at the first measurement.
    ///
    /// # Returns
    /// Snapshot of the new session
    ///
    /// # Errors
    /// - Service disposed
    /// - Lock poisoning on session state
    pub fn create_session(
        &self,
        patient_id: &str,
        hearing_aid_id: &str,
    ) -> Result<RemSession, SessionError> {
        let mut guard = self
            .lock_session()
            .map_err(|err| self.reject(err, "create_session"))?;

        if let Some(previous) = guard.take() {
            tracing::info!("[RemService] Discarding session {}", previous.id);
            self.events.publish(SessionEvent::SessionDiscarded {
                session_id: previous.id,
                measurement_count: previous.measurements.len(),
            });
        }

        let session = RemSession::new(patient_id, hearing_aid_id);
        tracing::info!(
            "[RemService] Created session {} (patient={}, hearing_aid={})",
            session.id,
            patient_id,
            hearing_aid_id
        );
        self.events.publish(SessionEvent::SessionCreated {
            session_id: session.id.clone(),
            patient_id: session.patient_id.clone(),
            hearing_aid_id: session.hearing_aid_id.clone(),
        });

        *guard = Some(session.clone());
        Ok(session)
    }

    /// Snapshot of the active session, if any
    pub fn current_session(&self) -> Option<RemSession> {
        self.lock_session().ok().and_then(|guard| guard.clone())
    }

    /// Place the probe tube at `depth_mm` and classify the placement
    ///
    /// Every call recomputes the position from the raw depth.
    ///
    /// # Errors
    /// - No active session
    pub fn position_probe_tube(&self, depth_mm: f64) -> Result<ProbePosition, SessionError> {
        let limits = &self.config.probe;
        let position =
            self.with_session("position_probe_tube", |s| Ok(s.position_probe(depth_mm, limits)))?;

        tracing::debug!(
            "[RemService] Probe at {:.1} mm classified as {}",
            depth_mm,
            position
        );
        self.events
            .publish(SessionEvent::ProbePositioned { depth_mm, position });
        Ok(position)
    }

    /// Select the earmold vent for subsequent measurements
    pub fn set_vent_type(&self, vent_type: VentType) -> Result<(), SessionError> {
        self.with_session("set_vent_type", |s| {
            s.set_vent_type(vent_type);
            Ok(())
        })?;
        self.events.publish(SessionEvent::VentChanged { vent_type });
        Ok(())
    }

    /// Take a measurement on the active session
    ///
    /// The session lock is released while the backend runs. If the session
    /// is replaced before the curve arrives, the curve is not recorded and
    /// the call fails with "No active session".
    ///
    /// # Errors
    /// - No active session
    /// - Probe tube not correctly positioned
    /// - Hearing aid not found
    /// - Input level is NaN or infinite
    pub async fn perform_measurement(
        &self,
        measurement_type: MeasurementType,
        ear: Ear,
        signal_type: SignalType,
        input_level: f64,
    ) -> Result<RemCurve, SessionError> {
        const OPERATION: &str = "perform_measurement";

        let (session_id, request, aid) = self.with_session(OPERATION, |session| {
            if !input_level.is_finite() {
                let err = SessionError::InvalidInputLevel { level: input_level };
                session.record_error(&err);
                return Err(err);
            }
            session.ensure_ready_for_measurement()?;
            let aid = match self.hearing_aid(&session.hearing_aid_id) {
                Some(aid) => aid,
                None => {
                    let err = SessionError::HearingAidNotFound {
                        id: session.hearing_aid_id.clone(),
                    };
                    session.record_error(&err);
                    return Err(err);
                }
            };
            let request = MeasurementRequest {
                measurement_type,
                ear,
                signal_type,
                input_level,
                vent_type: session.vent_type,
            };
            Ok((session.id.clone(), request, aid))
        })?;

        let curve = self
            .measurement
            .measure(request, aid)
            .await
            .map_err(|err| self.reject(err, OPERATION))?;

        self.with_session(OPERATION, |session| {
            if session.id != session_id {
                return Err(SessionError::NoActiveSession);
            }
            session.record_measurement(curve.clone());
            Ok(())
        })?;

        tracing::info!(
            "[RemService] Recorded {} ({} ear, {} at {:.0} dB SPL)",
            measurement_type,
            ear,
            signal_type,
            input_level
        );
        self.events.publish(SessionEvent::MeasurementRecorded {
            measurement_type,
            ear,
            point_count: curve.points.len(),
        });
        Ok(curve)
    }

    /// Generate REAR and REIG targets and replace the session's targets
    ///
    /// Targets are built for the ear of the latest measurement, or the right
    /// ear when nothing has been measured yet.
    pub fn generate_targets(
        &self,
        patient_id: &str,
        method: PrescriptionMethod,
    ) -> Result<Vec<RemTarget>, SessionError> {
        self.replace_targets(patient_id, method, None)
    }

    /// Generate targets for an explicit ear
    pub fn generate_targets_for(
        &self,
        patient_id: &str,
        method: PrescriptionMethod,
        ear: Ear,
    ) -> Result<Vec<RemTarget>, SessionError> {
        self.replace_targets(patient_id, method, Some(ear))
    }

    /// Resolve the ear and swap the targets under one session lock
    fn replace_targets(
        &self,
        patient_id: &str,
        method: PrescriptionMethod,
        ear: Option<Ear>,
    ) -> Result<Vec<RemTarget>, SessionError> {
        let (ear, targets) = self.with_session("generate_targets", |s| {
            let ear = ear.or_else(|| s.last_ear()).unwrap_or(Ear::Right);
            let targets = self.targets.generate(patient_id, method, ear);
            s.replace_targets(targets.clone());
            Ok((ear, targets))
        })?;

        tracing::debug!(
            "[RemService] Generated {} targets ({}, {} ear)",
            targets.len(),
            method,
            ear
        );
        self.events.publish(SessionEvent::TargetsGenerated {
            count: targets.len(),
        });
        Ok(targets)
    }

    /// Score `measurement` against `target`
    ///
    /// Never fails. The score is cached on the active session when there is
    /// one; a type or ear mismatch scores 0.
    pub fn calculate_accuracy(&self, measurement: &RemCurve, target: &RemTarget) -> f64 {
        let score = self.scorer.score(measurement, target);

        if let Ok(mut guard) = self.lock_session() {
            if let Some(session) = guard.as_mut() {
                session.record_accuracy(score);
            }
        }

        self.events.publish(SessionEvent::AccuracyScored {
            measurement_type: measurement.measurement_type,
            ear: measurement.ear,
            score,
        });
        score
    }

    /// Mark the active session completed
    ///
    /// # Returns
    /// Final snapshot of the session. It stays active and can still be used.
    pub fn complete_session(&self) -> Result<RemSession, SessionError> {
        let session = self.with_session("complete_session", |s| {
            s.complete();
            Ok(s.clone())
        })?;

        tracing::info!(
            "[RemService] Completed session {} with {} measurements (accuracy {:.1})",
            session.id,
            session.measurements.len(),
            session.accuracy
        );
        self.events.publish(SessionEvent::SessionCompleted {
            session_id: session.id.clone(),
            accuracy: session.accuracy,
        });
        Ok(session)
    }

    /// Advisory workflow progress of the active session
    pub fn progress(&self) -> Result<SessionProgress, SessionError> {
        self.with_session("progress", |s| Ok(s.progress()))
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// The hearing-aid catalog, in catalog order
    pub fn get_hearing_aids(&self) -> Vec<VirtualHearingAid> {
        self.catalog.all().to_vec()
    }

    /// Look up one catalog entry
    pub fn hearing_aid(&self, id: &str) -> Option<VirtualHearingAid> {
        self.catalog.get(id).cloned()
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Preview a test signal, stopping any signal already playing
    ///
    /// # Errors
    /// - Level is not a finite number
    /// - Output device could not be opened
    /// - Service disposed
    pub fn play_test_signal(
        &self,
        signal_type: SignalType,
        level_db: f64,
        ear: Ear,
    ) -> Result<VoiceInfo, AudioError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(AudioError::StreamOpenFailed {
                reason: SessionError::Disposed.message(),
            });
        }

        let info = self.playback.play(signal_type, level_db, ear)?;
        self.events.publish(SessionEvent::PlaybackStarted {
            signal_type,
            level_db,
            ear,
        });
        Ok(info)
    }

    /// Stop the preview. Safe to call with nothing playing.
    pub fn stop_test_signal(&self) {
        if self.playback.stop() {
            self.events.publish(SessionEvent::PlaybackStopped);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stop playback, release the output and drop the session
    ///
    /// Later session operations fail with "Service has been disposed".
    /// Calling this twice is harmless.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.playback.shutdown() {
            self.events.publish(SessionEvent::PlaybackStopped);
        }

        let dropped = match self.session.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(session) = dropped {
            tracing::info!("[RemService] Disposed with session {}", session.id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Default for RemService {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
