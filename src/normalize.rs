use log::info;

use crate::engine::MediaEngine;
use crate::error::{Error, Result};
use crate::filters::{self, FilterChain};
use crate::measure::{format_target, LoudnessMeasurement, LOUDNESS_RANGE, TRUE_PEAK};
use crate::models::{NormalizeOptions, NormalizeReport, StreamDescriptor};
use crate::probe::pick_audio_stream;

/// Range `loudnorm` accepts for its integrated-loudness target.
pub const TARGET_I_RANGE: (f64, f64) = (-70.0, -5.0);

impl NormalizeOptions {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = TARGET_I_RANGE;
        if !self.target_i.is_finite() || self.target_i < lo || self.target_i > hi {
            return Err(Error::InvalidOptions(format!(
                "target loudness {} LUFS is outside {}..{}",
                self.target_i, lo, hi
            )));
        }
        if self.audio_bitrate.trim().is_empty() {
            return Err(Error::InvalidOptions("audio bitrate is empty".to_string()));
        }
        if self.input == self.output {
            return Err(Error::InvalidOptions(
                "input and output must be different files".to_string(),
            ));
        }
        Ok(())
    }
}

/// `loudnorm` in apply mode: measured statistics fed back with linear
/// correction so a single gain offset is applied to the whole program.
pub fn apply_filter(target_i: f64, m: &LoudnessMeasurement) -> String {
    format!(
        "loudnorm=I={}:TP={}:LRA={}:\
         measured_I={}:measured_TP={}:\
         measured_LRA={}:measured_thresh={}:\
         offset={}:linear=true:print_format=summary",
        format_target(target_i),
        TRUE_PEAK,
        LOUDNESS_RANGE,
        m.input_i(),
        m.input_tp(),
        m.input_lra(),
        m.input_thresh(),
        m.target_offset(),
    )
}

/// Probe `input` and return its first audio stream.
fn require_audio(engine: &dyn MediaEngine, options: &NormalizeOptions) -> Result<StreamDescriptor> {
    info!("Probing {}", options.input.display());
    let descriptor = engine.probe(&options.input)?;
    pick_audio_stream(&descriptor)
        .cloned()
        .ok_or_else(|| Error::NoAudioStream {
            path: options.input.clone(),
        })
}

fn measure(
    engine: &dyn MediaEngine,
    options: &NormalizeOptions,
    base: &FilterChain,
) -> Result<LoudnessMeasurement> {
    info!(
        "Measuring loudness (target {} LUFS)",
        format_target(options.target_i)
    );
    let m = engine.measure(&options.input, base, options.target_i)?;
    info!(
        "Measured I={} LUFS, TP={} dBTP, LRA={} LU, offset={}",
        m.input_i(),
        m.input_tp(),
        m.input_lra(),
        m.target_offset()
    );
    Ok(m)
}

/// Probe, measure and re-encode `options.input` into `options.output`.
///
/// Each stage consumes the previous one's result; the first failure ends
/// the run and no cleanup of a partial output is attempted.
pub fn normalize(engine: &dyn MediaEngine, options: &NormalizeOptions) -> Result<NormalizeReport> {
    options.validate()?;

    let audio_stream = require_audio(engine, options)?;
    let base = filters::base_chain();
    let measurement = measure(engine, options, &base)?;

    let chain = base.with(apply_filter(options.target_i, &measurement));
    info!(
        "Encoding {} -> {} (aac {})",
        options.input.display(),
        options.output.display(),
        options.audio_bitrate
    );
    engine.apply(&options.input, &options.output, &chain, &options.audio_bitrate)?;

    Ok(NormalizeReport {
        input: options.input.clone(),
        output: Some(options.output.clone()),
        target_i: options.target_i,
        audio_bitrate: Some(options.audio_bitrate.clone()),
        audio_stream,
        measurement,
        filter_chain: chain.to_string(),
    })
}

/// Probe and measure only; nothing is encoded or written.
pub fn measure_only(engine: &dyn MediaEngine, options: &NormalizeOptions) -> Result<NormalizeReport> {
    options.validate()?;

    let audio_stream = require_audio(engine, options)?;
    let base = filters::base_chain();
    let measurement = measure(engine, options, &base)?;
    let chain = base.with(apply_filter(options.target_i, &measurement));

    Ok(NormalizeReport {
        input: options.input.clone(),
        output: None,
        target_i: options.target_i,
        audio_bitrate: None,
        audio_stream,
        measurement,
        filter_chain: chain.to_string(),
    })
}
