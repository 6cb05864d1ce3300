// Integration tests for the practice workflow through RemService
//
// Covers session gating, probe classification, measurement shapes, target
// generation and accuracy scoring as a UI would drive them.

use std::sync::Arc;

use futures::StreamExt;
use rem_trainer::playback::OfflineBackend;
use rem_trainer::simulation::{
    FixedJitter, MeasurementSimulator, SimulatedBackend, UniformJitter, ZeroJitter,
};
use rem_trainer::{
    AppConfig, Ear, ErrorCode, MeasurementType, PrescriptionMethod, ProbePosition, RemErrorType,
    RemService, SessionError, SessionEvent, SignalType, FREQUENCIES,
};

fn service_with_jitter(jitter: Box<dyn rem_trainer::simulation::JitterSource>) -> RemService {
    let config = AppConfig::default();
    let measurement = Arc::new(SimulatedBackend::new(
        MeasurementSimulator::new(config.simulation.clone()),
        jitter,
    ));
    RemService::with_backends(config, measurement, Arc::new(OfflineBackend::new()))
}

fn ready_service(hearing_aid_id: &str) -> RemService {
    let service = RemService::new(AppConfig::default());
    service.create_session("p1", hearing_aid_id).unwrap();
    assert_eq!(
        service.position_probe_tube(25.0).unwrap(),
        ProbePosition::Correct
    );
    service
}

#[test]
fn test_probe_classification_boundaries() {
    let service = RemService::new(AppConfig::default());
    service.create_session("p1", "ha1").unwrap();

    let cases = [
        (0.0, ProbePosition::TooShallow),
        (19.99, ProbePosition::TooShallow),
        (20.0, ProbePosition::Correct),
        (27.5, ProbePosition::Correct),
        (30.0, ProbePosition::Correct),
        (30.01, ProbePosition::TooDeep),
        (45.0, ProbePosition::TooDeep),
    ];
    for (depth, expected) in cases {
        assert_eq!(
            service.position_probe_tube(depth).unwrap(),
            expected,
            "depth {}",
            depth
        );
        assert_eq!(
            service.current_session().unwrap().probe_tube_position,
            expected
        );
    }
}

#[tokio::test]
async fn test_no_session_errors_carry_fixed_message() {
    let service = RemService::new(AppConfig::default());

    let err = service.position_probe_tube(25.0).unwrap_err();
    assert_eq!(err.message(), "No active session");
    assert_eq!(err.kind(), RemErrorType::NoSession);

    let err = service
        .perform_measurement(
            MeasurementType::Reur,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
        .await
        .unwrap_err();
    assert_eq!(err, SessionError::NoActiveSession);

    let err = service
        .generate_targets("p1", PrescriptionMethod::NalNl2)
        .unwrap_err();
    assert_eq!(err.message(), "No active session");
}

#[tokio::test]
async fn test_measurement_needs_latest_positioning_correct() {
    let service = RemService::new(AppConfig::default());
    service.create_session("p1", "ha2").unwrap();

    let measure = || {
        service.perform_measurement(
            MeasurementType::Rear,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
    };

    // never positioned
    let err = measure().await.unwrap_err();
    assert_eq!(err.kind(), RemErrorType::ProbePosition);

    service.position_probe_tube(25.0).unwrap();
    assert!(measure().await.is_ok());

    // repositioned too deep after a good placement
    service.position_probe_tube(31.0).unwrap();
    let err = measure().await.unwrap_err();
    assert_eq!(
        err,
        SessionError::ProbeNotPositioned {
            position: ProbePosition::TooDeep
        }
    );
    assert_eq!(err.message(), "Probe tube not correctly positioned");
}

#[tokio::test]
async fn test_every_curve_has_standard_frequencies() {
    let service = ready_service("ha1");
    for measurement_type in MeasurementType::ALL {
        for signal_type in SignalType::ALL {
            let curve = service
                .perform_measurement(measurement_type, Ear::Left, signal_type, 65.0)
                .await
                .unwrap();
            let frequencies: Vec<u32> = curve.points.iter().map(|p| p.frequency).collect();
            assert_eq!(frequencies, FREQUENCIES.to_vec());
            assert_eq!(curve.measurement_type, measurement_type);
            assert_eq!(curve.signal_type, signal_type);
        }
    }
}

#[tokio::test]
async fn test_p1_ha2_rear_scenario() {
    let service = ready_service("ha2");
    let curve = service
        .perform_measurement(
            MeasurementType::Rear,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
        .await
        .unwrap();

    let gain = curve.gain_at(1000).unwrap();
    assert!((22.5..=27.5).contains(&gain), "gain {}", gain);

    let session = service.current_session().unwrap();
    assert_eq!(session.measurements.len(), 1);
    assert_eq!(session.current_step, MeasurementType::Rear);
}

#[tokio::test]
async fn test_jitter_stays_within_amplitude() {
    let service = service_with_jitter(Box::new(UniformJitter::seeded(11)));
    service.create_session("p1", "ha2").unwrap();
    service.position_probe_tube(25.0).unwrap();

    for _ in 0..20 {
        let curve = service
            .perform_measurement(
                MeasurementType::Reur,
                Ear::Right,
                SignalType::WhiteNoise,
                65.0,
            )
            .await
            .unwrap();
        let at_500 = curve.gain_at(500).unwrap();
        let at_2000 = curve.gain_at(2000).unwrap();
        assert!((-2.5..=2.5).contains(&at_500));
        assert!((7.5..=12.5).contains(&at_2000));
    }
}

#[tokio::test]
async fn test_fixed_jitter_shifts_every_point() {
    let service = service_with_jitter(Box::new(FixedJitter(1.0)));
    service.create_session("p1", "ha1").unwrap();
    service.position_probe_tube(20.0).unwrap();

    let curve = service
        .perform_measurement(
            MeasurementType::Recd,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
        .await
        .unwrap();
    let gains: Vec<f64> = curve.points.iter().map(|p| p.gain).collect();
    assert_eq!(
        gains,
        vec![4.0, 4.0, 6.0, 6.0, 6.0, 6.0, 9.0, 9.0, 13.0, 13.0, 13.0]
    );
}

#[tokio::test]
async fn test_resr_limited_by_max_gain_and_output() {
    let service = service_with_jitter(Box::new(ZeroJitter));
    service.create_session("p1", "ha2").unwrap();
    service.position_probe_tube(25.0).unwrap();

    // ha2: max output 132, max gain 70
    let loud = service
        .perform_measurement(
            MeasurementType::Resr,
            Ear::Right,
            SignalType::PureToneSweep,
            90.0,
        )
        .await
        .unwrap();
    assert!(loud.points.iter().all(|p| p.gain == 42.0));

    let soft = service
        .perform_measurement(
            MeasurementType::Resr,
            Ear::Right,
            SignalType::PureToneSweep,
            50.0,
        )
        .await
        .unwrap();
    assert!(soft.points.iter().all(|p| p.gain == 70.0));
}

#[tokio::test]
async fn test_targets_replace_and_differ_by_five() {
    let service = ready_service("ha3");
    for method in PrescriptionMethod::ALL {
        let targets = service.generate_targets("p1", method).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].measurement_type, MeasurementType::Rear);
        assert_eq!(targets[1].measurement_type, MeasurementType::Reig);
        for (rear, reig) in targets[0].points.iter().zip(&targets[1].points) {
            assert_eq!(reig.gain, rear.gain - 5.0);
        }
        assert_eq!(service.current_session().unwrap().targets, targets);
    }
}

#[tokio::test]
async fn test_accuracy_scenarios() {
    let service = service_with_jitter(Box::new(ZeroJitter));
    service.create_session("p1", "ha2").unwrap();
    service.position_probe_tube(25.0).unwrap();

    let rear = service
        .perform_measurement(
            MeasurementType::Rear,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
        .await
        .unwrap();
    let targets = service
        .generate_targets("p1", PrescriptionMethod::NalNl2)
        .unwrap();

    // type mismatch: REAR curve vs REIG target
    assert_eq!(service.calculate_accuracy(&rear, &targets[1]), 0.0);

    // exact copy of the target scores 100
    let mut perfect = rear.clone();
    perfect.points = targets[0].points.clone();
    assert_eq!(service.calculate_accuracy(&perfect, &targets[0]), 100.0);

    // one point 10 dB off among 11
    let mut one_off = perfect.clone();
    one_off.points[6].gain += 10.0;
    let score = service.calculate_accuracy(&one_off, &targets[0]);
    assert!((score - 90.909).abs() < 0.01, "score {}", score);
    assert_eq!(service.current_session().unwrap().accuracy, score);
}

#[test]
fn test_hearing_aid_catalog_is_fixed() {
    let service = RemService::new(AppConfig::default());
    let first = service.get_hearing_aids();
    let ids: Vec<&str> = first.iter().map(|aid| aid.id.as_str()).collect();
    assert_eq!(ids, vec!["ha1", "ha2", "ha3"]);
    assert_eq!(first, service.get_hearing_aids());
}

#[tokio::test]
async fn test_event_stream_follows_workflow() {
    let service = ready_service("ha2");
    let mut events = Box::pin(service.events().stream());

    service
        .perform_measurement(
            MeasurementType::Reur,
            Ear::Right,
            SignalType::PureToneSweep,
            65.0,
        )
        .await
        .unwrap();
    service.complete_session().unwrap();

    assert!(matches!(
        events.next().await,
        Some(SessionEvent::MeasurementRecorded {
            measurement_type: MeasurementType::Reur,
            point_count: 11,
            ..
        })
    ));
    assert!(matches!(
        events.next().await,
        Some(SessionEvent::SessionCompleted { .. })
    ));
}

#[tokio::test]
async fn test_completed_session_stays_usable() {
    let service = ready_service("ha1");
    let done = service.complete_session().unwrap();
    assert!(done.completed);

    service
        .perform_measurement(
            MeasurementType::Reig,
            Ear::Left,
            SignalType::SpeechNoise,
            65.0,
        )
        .await
        .unwrap();
    assert_eq!(service.current_session().unwrap().measurements.len(), 1);
}
