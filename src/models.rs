use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::measure::LoudnessMeasurement;

/// Probed structure of an input file, as reported by `ffprobe`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDescriptor {
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
    #[serde(default)]
    pub format: FormatInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub index: u32,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub channels: Option<u32>,
    pub sample_rate: Option<String>,
    pub bit_rate: Option<String>,
}

impl StreamDescriptor {
    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
}

/// Parameters of one normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Target integrated loudness in LUFS.
    pub target_i: f64,
    /// Encoder bitrate string, e.g. `192k`.
    pub audio_bitrate: String,
}

impl NormalizeOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            target_i: -16.0,
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// What a finished (or measure-only) run did.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub target_i: f64,
    pub audio_bitrate: Option<String>,
    pub audio_stream: StreamDescriptor,
    pub measurement: LoudnessMeasurement,
    pub filter_chain: String,
}
