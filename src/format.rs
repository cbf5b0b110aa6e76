use crate::measure::{format_target, LoudnessMeasurement};
use crate::models::NormalizeReport;

/// Format the five measured statistics as an aligned block.
pub fn format_measurement(m: &LoudnessMeasurement) -> String {
    format!(
        "{:<18} {:>8} LUFS\n\
         {:<18} {:>8} dBTP\n\
         {:<18} {:>8} LU\n\
         {:<18} {:>8} LUFS\n\
         {:<18} {:>8} LU",
        "Integrated", m.input_i(),
        "True peak", m.input_tp(),
        "Loudness range", m.input_lra(),
        "Threshold", m.input_thresh(),
        "Target offset", m.target_offset(),
    )
}

/// Format a run report as a human-readable summary.
pub fn format_summary(report: &NormalizeReport) -> String {
    let separator = "\u{2500}".repeat(40);
    let mut output = String::new();

    output.push_str(&format!("Input:  {}\n", report.input.display()));
    if let Some(out) = &report.output {
        output.push_str(&format!("Output: {}\n", out.display()));
    }
    output.push_str(&format!(
        "Audio:  stream #{} ({})\n",
        report.audio_stream.index,
        report.audio_stream.codec_name.as_deref().unwrap_or("unknown"),
    ));
    output.push_str(&separator);
    output.push('\n');

    output.push_str(&format_measurement(&report.measurement));
    output.push('\n');
    output.push_str(&separator);
    output.push('\n');

    output.push_str(&format!(
        "Target: {} LUFS",
        format_target(report.target_i)
    ));
    if let Some(bitrate) = &report.audio_bitrate {
        output.push_str(&format!(", AAC {}", bitrate));
    }

    output
}

/// Format a run report as pretty-printed JSON.
pub fn format_json(report: &NormalizeReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
