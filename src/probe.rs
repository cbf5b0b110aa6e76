use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::error::{ProbeError, Result};
use crate::models::{MediaDescriptor, StreamDescriptor};
use crate::process;

/// Arguments asking for JSON stream and container metadata, errors only.
pub fn probe_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-print_format",
        "json",
        "-show_streams",
        "-show_format",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(input.as_os_str().to_owned());
    args
}

/// Decode `ffprobe` JSON output.
pub fn parse_descriptor(stdout: &str) -> std::result::Result<MediaDescriptor, ProbeError> {
    Ok(serde_json::from_str(stdout)?)
}

/// Run `ffprobe` against `input` and decode its metadata.
pub fn probe_media(ffprobe: &OsStr, input: &Path, timeout: Option<Duration>) -> Result<MediaDescriptor> {
    let inv = process::run(ffprobe, &probe_args(input), timeout)?;
    if !inv.success() {
        return Err(ProbeError::Failed { stderr: inv.stderr }.into());
    }
    let descriptor = parse_descriptor(&inv.stdout)?;
    debug!(
        "Probed {}: {} stream(s), format {:?}",
        input.display(),
        descriptor.streams.len(),
        descriptor.format.format_name
    );
    Ok(descriptor)
}

/// First stream whose codec type is audio, in stream order.
pub fn pick_audio_stream(descriptor: &MediaDescriptor) -> Option<&StreamDescriptor> {
    descriptor.streams.iter().find(|s| s.is_audio())
}
