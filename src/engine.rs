use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};
use crate::filters::FilterChain;
use crate::measure::{self, LoudnessMeasurement};
use crate::models::MediaDescriptor;
use crate::probe;
use crate::process;

/// The external media toolkit the pipeline drives.
///
/// Implementations own process spawning; the orchestrator only sees typed
/// results, so it can be exercised with an in-memory engine.
pub trait MediaEngine {
    /// Structural metadata for `input`.
    fn probe(&self, input: &Path) -> Result<MediaDescriptor>;

    /// Analysis pass over `base` plus a measurement-mode loudness stage.
    fn measure(&self, input: &Path, base: &FilterChain, target_i: f64) -> Result<LoudnessMeasurement>;

    /// Final encode: video copied, first audio stream through `filters`.
    fn apply(&self, input: &Path, output: &Path, filters: &FilterChain, audio_bitrate: &str) -> Result<()>;
}

/// `ffmpeg`/`ffprobe` executables found on `PATH` or at explicit paths.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    pub ffmpeg: OsString,
    pub ffprobe: OsString,
    /// Upper bound for each invocation; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
            timeout: None,
        }
    }
}

impl MediaEngine for Ffmpeg {
    fn probe(&self, input: &Path) -> Result<MediaDescriptor> {
        probe::probe_media(&self.ffprobe, input, self.timeout)
    }

    fn measure(&self, input: &Path, base: &FilterChain, target_i: f64) -> Result<LoudnessMeasurement> {
        measure::measure_loudness(&self.ffmpeg, input, base, target_i, self.timeout)
    }

    fn apply(&self, input: &Path, output: &Path, filters: &FilterChain, audio_bitrate: &str) -> Result<()> {
        let inv = process::run(
            &self.ffmpeg,
            &apply_args(input, output, filters, audio_bitrate),
            self.timeout,
        )?;
        if !inv.success() {
            return Err(Error::Encode { stderr: inv.stderr });
        }
        debug!("Encoded {}", output.display());
        Ok(())
    }
}

/// Copy the first video stream, re-encode the first audio stream to AAC
/// through `filters`, and move the index to the front of the file.
pub fn apply_args(input: &Path, output: &Path, filters: &FilterChain, audio_bitrate: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        // video: untouched
        "-map".into(),
        "0:v:0".into(),
        "-c:v".into(),
        "copy".into(),
        // audio: cleaned and normalized
        "-map".into(),
        "0:a:0".into(),
        "-af".into(),
        filters.to_string().into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        audio_bitrate.into(),
        "-movflags".into(),
        "+faststart".into(),
    ];
    args.push(output.as_os_str().to_owned());
    args
}
