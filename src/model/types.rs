// Categorical types shared across the measurement workflow
//
// Every enum here serializes with the wire names the practice UI uses
// ("REAR", "right", "pure_tone_sweep", "NAL-NL2", "CORRECT", ...). The
// enums the CLI accepts derive `ValueEnum` under the same names.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Real-ear measurement curve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MeasurementType {
    /// Real-ear unaided response
    Reur,
    /// Real-ear occluded response
    Reor,
    /// Real-ear-to-coupler difference
    Recd,
    /// Real-ear aided response
    Rear,
    /// Real-ear insertion gain
    Reig,
    /// Real-ear saturation response
    Resr,
}

impl MeasurementType {
    pub const ALL: [MeasurementType; 6] = [
        MeasurementType::Reur,
        MeasurementType::Reor,
        MeasurementType::Recd,
        MeasurementType::Rear,
        MeasurementType::Reig,
        MeasurementType::Resr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Reur => "REUR",
            MeasurementType::Reor => "REOR",
            MeasurementType::Recd => "RECD",
            MeasurementType::Rear => "REAR",
            MeasurementType::Reig => "REIG",
            MeasurementType::Resr => "RESR",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ear under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    #[value(alias = "l")]
    Left,
    #[value(alias = "r")]
    Right,
}

impl Ear {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ear::Left => "left",
            Ear::Right => "right",
        }
    }
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stimulus presented during a measurement or preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SignalType {
    PureToneSweep,
    SpeechNoise,
    PinkNoise,
    WhiteNoise,
    IcraNoise,
}

impl SignalType {
    pub const ALL: [SignalType; 5] = [
        SignalType::PureToneSweep,
        SignalType::SpeechNoise,
        SignalType::PinkNoise,
        SignalType::WhiteNoise,
        SignalType::IcraNoise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::PureToneSweep => "pure_tone_sweep",
            SignalType::SpeechNoise => "speech_noise",
            SignalType::PinkNoise => "pink_noise",
            SignalType::WhiteNoise => "white_noise",
            SignalType::IcraNoise => "icra_noise",
        }
    }

    pub fn is_noise(&self) -> bool {
        !matches!(self, SignalType::PureToneSweep)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prescriptive fitting formula used to build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum PrescriptionMethod {
    #[serde(rename = "NAL-NL2")]
    #[value(name = "NAL-NL2")]
    NalNl2,
    #[serde(rename = "DSL")]
    #[value(name = "DSL")]
    Dsl,
    #[serde(rename = "NAL-NL1")]
    #[value(name = "NAL-NL1")]
    NalNl1,
    #[serde(rename = "custom")]
    #[value(name = "custom")]
    Custom,
}

impl PrescriptionMethod {
    pub const ALL: [PrescriptionMethod; 4] = [
        PrescriptionMethod::NalNl2,
        PrescriptionMethod::Dsl,
        PrescriptionMethod::NalNl1,
        PrescriptionMethod::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionMethod::NalNl2 => "NAL-NL2",
            PrescriptionMethod::Dsl => "DSL",
            PrescriptionMethod::NalNl1 => "NAL-NL1",
            PrescriptionMethod::Custom => "custom",
        }
    }
}

impl fmt::Display for PrescriptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe tube placement relative to the tympanic membrane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbePosition {
    NotInserted,
    TooShallow,
    TooDeep,
    Correct,
}

impl ProbePosition {
    pub fn is_correct(&self) -> bool {
        matches!(self, ProbePosition::Correct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbePosition::NotInserted => "NOT_INSERTED",
            ProbePosition::TooShallow => "TOO_SHALLOW",
            ProbePosition::TooDeep => "TOO_DEEP",
            ProbePosition::Correct => "CORRECT",
        }
    }
}

impl fmt::Display for ProbePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Earmold or dome venting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum VentType {
    #[default]
    Closed,
    Small,
    Medium,
    Large,
    Open,
}

/// Category of a workflow failure, reported alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemErrorType {
    NoSession,
    ProbePosition,
    HearingAidLookup,
    InvalidInput,
    Internal,
}

/// Physical style of a hearing instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HearingAidStyle {
    Bte,
    Ric,
    Ite,
    Itc,
    Cic,
}
