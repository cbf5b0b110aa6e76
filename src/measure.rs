use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MeasurementError, Result};
use crate::filters::FilterChain;
use crate::process;

/// True-peak ceiling in dBTP, used in both passes.
pub const TRUE_PEAK: &str = "-1.5";
/// Loudness-range target in LU, used in both passes.
pub const LOUDNESS_RANGE: &str = "11";

/// Statistics reported by the analysis pass of `loudnorm`.
///
/// Values are kept as the text ffmpeg printed so they can be fed back
/// into the apply pass without any float reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoudnessMeasurement {
    input_i: String,
    input_tp: String,
    input_lra: String,
    input_thresh: String,
    target_offset: String,
}

impl LoudnessMeasurement {
    /// Integrated loudness, LUFS.
    pub fn input_i(&self) -> &str {
        &self.input_i
    }

    /// True peak, dBTP.
    pub fn input_tp(&self) -> &str {
        &self.input_tp
    }

    /// Loudness range, LU.
    pub fn input_lra(&self) -> &str {
        &self.input_lra
    }

    pub fn input_thresh(&self) -> &str {
        &self.input_thresh
    }

    pub fn target_offset(&self) -> &str {
        &self.target_offset
    }

    /// Build a measurement from a decoded report object.
    pub fn from_report(
        report: &Map<String, Value>,
    ) -> std::result::Result<Self, &'static str> {
        let field = |name: &'static str| match report.get(name) {
            None | Some(Value::Null) => Err(name),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
        };
        Ok(Self {
            input_i: field("input_i")?,
            input_tp: field("input_tp")?,
            input_lra: field("input_lra")?,
            input_thresh: field("input_thresh")?,
            target_offset: field("target_offset")?,
        })
    }

    /// Recover the report embedded in ffmpeg's diagnostic output.
    pub fn from_diagnostics(stderr: &str) -> std::result::Result<Self, MeasurementError> {
        let report = find_json_object(stderr).ok_or_else(|| MeasurementError::NoReport {
            stderr: stderr.to_string(),
        })?;
        Self::from_report(&report).map_err(|field| MeasurementError::MissingField {
            field,
            stderr: stderr.to_string(),
        })
    }
}

/// First balanced JSON object embedded in free-form log text.
///
/// Each `{` is tried in order; decoding stops at the object's own closing
/// brace, so braces in later log lines are never swallowed.
pub fn find_json_object(text: &str) -> Option<Map<String, Value>> {
    text.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Map<String, Value>>()
            .next()
            .and_then(|r| r.ok())
    })
}

/// Render a LUFS target the way ffmpeg option strings expect it (`-16.0`).
pub fn format_target(target_i: f64) -> String {
    format!("{:?}", target_i)
}

/// `loudnorm` configured to analyze and print a JSON report.
pub fn measurement_filter(target_i: f64) -> String {
    format!(
        "loudnorm=I={}:TP={}:LRA={}:print_format=json",
        format_target(target_i),
        TRUE_PEAK,
        LOUDNESS_RANGE
    )
}

/// Analysis-only run: first audio stream through `filters`, null muxer.
pub fn analysis_args(input: &Path, filters: &FilterChain) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
    ];
    args.extend(
        ["-map", "0:a:0", "-vn", "-af"]
            .iter()
            .map(OsString::from),
    );
    args.push(filters.to_string().into());
    args.extend(["-f", "null", "-"].iter().map(OsString::from));
    args
}

/// Run the measurement pass over `base` plus a reporting `loudnorm` stage.
pub fn measure_loudness(
    ffmpeg: &OsStr,
    input: &Path,
    base: &FilterChain,
    target_i: f64,
    timeout: Option<Duration>,
) -> Result<LoudnessMeasurement> {
    let chain = base.with(measurement_filter(target_i));
    let inv = process::run(ffmpeg, &analysis_args(input, &chain), timeout)?;
    if !inv.success() {
        return Err(MeasurementError::Failed { stderr: inv.stderr }.into());
    }
    let measurement = LoudnessMeasurement::from_diagnostics(&inv.stderr)?;
    debug!("Measured: {:?}", measurement);
    Ok(measurement)
}
