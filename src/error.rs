use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for a normalization run. Every variant is terminal.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("Input has no audio stream: '{path}'")]
    NoAudioStream { path: PathBuf },

    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error("ffmpeg encode failed:\n{stderr}")]
    Encode { stderr: String },

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' did not finish within {secs}s and was killed")]
    Timeout { program: String, secs: u64 },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// The probing utility failed or produced metadata we could not read.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("ffprobe failed:\n{stderr}")]
    Failed { stderr: String },

    #[error("Could not parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The analysis pass failed or its report could not be recovered.
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("ffmpeg loudnorm measure failed:\n{stderr}")]
    Failed { stderr: String },

    #[error("Could not find loudnorm JSON in ffmpeg output:\n{stderr}")]
    NoReport { stderr: String },

    #[error("loudnorm report is missing '{field}':\n{stderr}")]
    MissingField { field: &'static str, stderr: String },
}

impl Error {
    /// Diagnostic text captured from the failing invocation, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::Probe(ProbeError::Failed { stderr })
            | Error::Measurement(MeasurementError::Failed { stderr })
            | Error::Measurement(MeasurementError::NoReport { stderr })
            | Error::Measurement(MeasurementError::MissingField { stderr, .. })
            | Error::Encode { stderr } => Some(stderr.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_is_kept_verbatim() {
        let raw = "  line one\n[aac @ 0x1] bad things {}\n";
        let err = Error::Encode {
            stderr: raw.to_string(),
        };
        assert_eq!(err.stderr(), Some(raw));
        assert!(err.to_string().ends_with(raw));
    }

    #[test]
    fn test_nested_errors_convert() {
        let err: Error = MeasurementError::MissingField {
            field: "input_tp",
            stderr: "log".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            Error::Measurement(MeasurementError::MissingField { field: "input_tp", .. })
        ));
        assert!(err.to_string().contains("input_tp"));
    }

    #[test]
    fn test_no_audio_has_no_stderr() {
        let err = Error::NoAudioStream {
            path: PathBuf::from("clip.mp4"),
        };
        assert_eq!(err.stderr(), None);
        assert!(err.to_string().contains("clip.mp4"));
    }
}
