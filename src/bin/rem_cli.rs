use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rem_trainer::playback::{default_backend, render_to_wav, Voice};
use rem_trainer::simulation::{MeasurementSimulator, SimulatedBackend, UniformJitter};
use rem_trainer::{
    init_logging, run_practice, AppConfig, Ear, PracticePlan, PrescriptionMethod, RemService,
    SignalType, VentType,
};
use serde::Serialize;

const MAX_PREVIEW_SECS: f32 = 600.0;

#[derive(Parser, Debug)]
#[command(
    name = "rem_cli",
    about = "Real-ear measurement practice harness for the REM trainer"
)]
struct Cli {
    /// JSON configuration file (defaults to assets/rem_config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Debug-level logging on stderr
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the hearing-aid catalog
    Catalog,
    /// Run a scripted practice session and print the report
    Practice {
        /// JSON practice plan; flags below override its fields
        #[arg(long)]
        plan: Option<PathBuf>,
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        hearing_aid: Option<String>,
        #[arg(long, value_enum, ignore_case = true)]
        ear: Option<Ear>,
        /// Probe insertion depth in millimetres
        #[arg(long)]
        depth: Option<f64>,
        #[arg(long, value_enum)]
        vent: Option<VentType>,
        #[arg(long, value_enum)]
        signal: Option<SignalType>,
        /// Input level in dB SPL
        #[arg(long)]
        level: Option<f64>,
        /// Prescription formula (NAL-NL2, DSL, NAL-NL1, custom)
        #[arg(long, value_enum, ignore_case = true)]
        method: Option<PrescriptionMethod>,
        /// Seed the measurement jitter for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play or render a test signal
    Preview {
        #[arg(long, value_enum, default_value_t = SignalType::PureToneSweep)]
        signal: SignalType,
        #[arg(long, default_value_t = 70.0)]
        level: f64,
        #[arg(long, value_enum, ignore_case = true, default_value_t = Ear::Right)]
        ear: Ear,
        #[arg(long, default_value_t = 5.0)]
        seconds: f32,
        /// Render to a WAV file instead of the output device
        #[arg(long)]
        wav: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Catalog => run_catalog(config),
        Commands::Practice {
            plan,
            patient,
            hearing_aid,
            ear,
            depth,
            vent,
            signal,
            level,
            method,
            seed,
            output,
        } => {
            let mut plan = load_plan(plan)?;
            if let Some(patient) = patient {
                plan.patient_id = patient;
            }
            if let Some(hearing_aid) = hearing_aid {
                plan.hearing_aid_id = hearing_aid;
            }
            plan.ear = ear.unwrap_or(plan.ear);
            plan.probe_depth_mm = depth.unwrap_or(plan.probe_depth_mm);
            plan.vent_type = vent.unwrap_or(plan.vent_type);
            plan.signal_type = signal.unwrap_or(plan.signal_type);
            plan.input_level = level.unwrap_or(plan.input_level);
            plan.prescription_method = method.unwrap_or(plan.prescription_method);
            run_practice_command(config, &plan, seed, output).await
        }
        Commands::Preview {
            signal,
            level,
            ear,
            seconds,
            wav,
        } => run_preview(config, signal, level, ear, seconds, wav).await,
    }
}

fn run_catalog(config: AppConfig) -> Result<ExitCode> {
    let service = RemService::new(config);
    let aids = service.get_hearing_aids();
    println!("{}", serde_json::to_string_pretty(&aids)?);
    Ok(ExitCode::from(0))
}

fn load_plan(path: Option<PathBuf>) -> Result<PracticePlan> {
    match path {
        Some(path) => {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing practice plan {}", path.display()))
        }
        None => Ok(PracticePlan::default()),
    }
}

async fn run_practice_command(
    config: AppConfig,
    plan: &PracticePlan,
    seed: Option<u64>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let service = match seed {
        Some(seed) => {
            let measurement = Arc::new(SimulatedBackend::new(
                MeasurementSimulator::new(config.simulation.clone()),
                Box::new(UniformJitter::seeded(seed)),
            ));
            RemService::with_backends(config, measurement, default_backend())
        }
        None => RemService::new(config),
    };

    let result = run_practice(&service, plan).await;
    service.dispose();

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            let rejection = RejectionPayload {
                kind: format!("{:?}", err.kind()),
                message: err.to_string(),
            };
            eprintln!("{}", serde_json::to_string_pretty(&rejection)?);
            return Ok(ExitCode::from(2));
        }
    };

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }
    Ok(ExitCode::from(0))
}

async fn run_preview(
    config: AppConfig,
    signal: SignalType,
    level: f64,
    ear: Ear,
    seconds: f32,
    wav: Option<PathBuf>,
) -> Result<ExitCode> {
    if let Some(path) = wav {
        let mut voice = Voice::new(signal, level, ear, &config.playback)
            .context("building test signal")?;
        let frames = render_to_wav(&mut voice, seconds, &path)
            .with_context(|| format!("rendering {}", path.display()))?;
        println!(
            "{}",
            serde_json::to_string_pretty(&PreviewPayload {
                signal,
                level,
                ear,
                frames,
                path: Some(path.display().to_string()),
            })?
        );
        return Ok(ExitCode::from(0));
    }

    let seconds = seconds.max(0.0).min(MAX_PREVIEW_SECS);
    let service = RemService::new(config);
    let info = service
        .play_test_signal(signal, level, ear)
        .context("starting preview")?;
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs_f32(seconds)) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("[Preview] Interrupted");
        }
    }
    service.stop_test_signal();
    service.dispose();

    println!(
        "{}",
        serde_json::to_string_pretty(&PreviewPayload {
            signal,
            level,
            ear,
            frames: (info.sample_rate as f32 * seconds) as usize,
            path: None,
        })?
    );
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct RejectionPayload {
    kind: String,
    message: String,
}

#[derive(Serialize)]
struct PreviewPayload {
    signal: SignalType,
    level: f64,
    ear: Ear,
    frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}
