//! Configuration management for simulation and playback tuning
//!
//! This module provides runtime configuration loading from JSON files so
//! instructors can adjust jitter, probe limits or preview levels without
//! recompiling. Every field defaults to the standard training values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub events: EventConfig,
}

/// Measurement simulator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Half-width of the uniform jitter added to every point (dB)
    pub jitter_amplitude_db: f64,
    /// Input level at which REAR equals the aid's default gain (dB SPL)
    pub reference_input_level: f64,
    /// REAR gain change per dB of input level deviation
    pub rear_level_slope: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude_db: 2.5,
            reference_input_level: 65.0,
            rear_level_slope: 0.5,
        }
    }
}

/// Probe tube insertion depth limits (mm, inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub min_depth_mm: f64,
    pub max_depth_mm: f64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            min_depth_mm: 20.0,
            max_depth_mm: 30.0,
        }
    }
}

/// Accuracy scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points deducted per dB of average absolute deviation
    pub penalty_per_db: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalty_per_db: 10.0,
        }
    }
}

/// Test-signal playback parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub sample_rate: u32,
    pub sweep_start_hz: f32,
    pub sweep_end_hz: f32,
    pub sweep_duration_secs: f32,
    /// Length of the looped noise buffer
    pub noise_loop_secs: f32,
    /// Level (dB) that maps to unity gain
    pub reference_level_db: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            sweep_start_hz: 125.0,
            sweep_end_hz: 8000.0,
            sweep_duration_secs: 5.0,
            noise_loop_secs: 2.0,
            reference_level_db: 70.0,
        }
    }
}

/// Session event hub sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
    /// Number of recent events kept for snapshots
    pub history_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration. If the file doesn't exist or the JSON is
    /// invalid, the defaults are returned and a warning is logged.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default asset location
    pub fn load() -> Self {
        Self::load_from_file("assets/rem_config.json")
    }
}
