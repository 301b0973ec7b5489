//! Sound-state snapshots sent by the UI layer.
//!
//! The UI re-sends the complete list of sounding sources on every model
//! change; nothing here is incremental.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, DecodeError};

/// Supported oscillator waveform shapes.
///
/// Wire names match the platform's `OscillatorType` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveType {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl WaveType {
    pub const ALL: [WaveType; 4] = [
        WaveType::Sine,
        WaveType::Square,
        WaveType::Sawtooth,
        WaveType::Triangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WaveType::Sine => "sine",
            WaveType::Square => "square",
            WaveType::Sawtooth => "sawtooth",
            WaveType::Triangle => "triangle",
        }
    }
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaveType {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveType::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| {
                BridgeError::Decode(DecodeError {
                    what: "wave type",
                    message: format!("unknown wave type '{s}'"),
                    line: None,
                    column: None,
                })
            })
    }
}

/// One desired sound source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundSpec {
    /// Opaque identifier, unique within a snapshot.
    pub id: String,
    /// Amplitude, roughly [0, 1]. Not clamped.
    pub level: f64,
    /// Frequency in Hz. Not clamped.
    pub freq: f64,
    pub wave_type: WaveType,
}

impl SoundSpec {
    pub fn new(id: impl Into<String>, level: f64, freq: f64, wave_type: WaveType) -> Self {
        SoundSpec {
            id: id.into(),
            level,
            freq,
            wave_type,
        }
    }
}

/// Decode a snapshot from its JSON form (`[{id, level, freq, waveType}, ...]`).
pub fn snapshot_from_json(json: &str) -> Result<Vec<SoundSpec>, BridgeError> {
    serde_json::from_str(json).map_err(|e| BridgeError::decode_json("snapshot", e))
}
