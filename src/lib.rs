//! Two-pass loudness normalization and noise cleanup for the audio track
//! of a video file, driving `ffprobe` and `ffmpeg`.

pub mod engine;
pub mod error;
pub mod filters;
pub mod format;
pub mod measure;
pub mod models;
pub mod normalize;
pub mod probe;
pub mod process;
