use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use loudclean::engine::Ffmpeg;
use loudclean::format;
use loudclean::models::NormalizeOptions;
use loudclean::normalize;

#[derive(Parser)]
#[command(
    name = "loudclean",
    version,
    about = "Clean up and loudness-normalize the audio track of a video"
)]
struct Cli {
    /// Input video file
    input: PathBuf,

    /// Output video file (parent directories are created)
    output: PathBuf,

    /// Target integrated loudness in LUFS
    #[arg(long, default_value_t = -16.0, allow_hyphen_values = true)]
    target_i: f64,

    /// AAC bitrate for the re-encoded audio
    #[arg(long, default_value = "192k")]
    audio_bitrate: String,

    /// ffmpeg executable
    #[arg(long, env = "LOUDCLEAN_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// ffprobe executable
    #[arg(long, env = "LOUDCLEAN_FFPROBE", default_value = "ffprobe")]
    ffprobe: PathBuf,

    /// Kill any external tool that runs longer than this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Only probe and measure; do not encode
    #[arg(long)]
    measure_only: bool,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.input.is_file() {
        anyhow::bail!("Input '{}' is not a file", cli.input.display());
    }

    let engine = Ffmpeg {
        ffmpeg: cli.ffmpeg.into_os_string(),
        ffprobe: cli.ffprobe.into_os_string(),
        timeout: cli.timeout.map(Duration::from_secs),
    };
    let options = NormalizeOptions {
        input: cli.input,
        output: cli.output,
        target_i: cli.target_i,
        audio_bitrate: cli.audio_bitrate,
    };

    let start = Instant::now();
    let result = if cli.measure_only {
        normalize::measure_only(&engine, &options)
    } else {
        if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        normalize::normalize(&engine, &options)
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Normalization failed");
            return Err(e).with_context(|| format!("Failed to process {}", options.input.display()));
        }
    };

    if cli.json {
        println!("{}", format::format_json(&report));
    } else {
        println!("{}", format::format_summary(&report));
    }
    info!("Done in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
