//! Engine and WAV file information.

use crate::wav::read_wav_info;
use atmos_engine::{EngineConfig, Status, SUPPORTED_SAMPLE_RATE, VERSION, version_string};
use clap::Args;
use std::path::{Path, PathBuf};

/// Display engine information, or WAV metadata when a file is given.
#[derive(Args)]
pub struct InfoArgs {
    /// Optional WAV file to inspect
    pub file: Option<PathBuf>,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    match args.file {
        Some(path) => file_info(&path),
        None => engine_info(),
    }
}

fn engine_info() -> anyhow::Result<()> {
    let config = EngineConfig::default();
    println!("atmos engine {}", version_string());
    println!("Version:        0x{:06x}", VERSION);
    println!("Sample Rate:    {} Hz", SUPPORTED_SAMPLE_RATE);
    println!("Max Block:      {} frames (default)", config.max_buffer_size);
    println!("Max Reverb:     {:.1} s (default)", config.max_reverb_time_sec);
    println!("\nStatus codes:");
    for status in Status::ALL {
        println!("  {:>3}  {}", status.code(), status.description());
    }
    Ok(())
}

fn file_info(path: &Path) -> anyhow::Result<()> {
    let info = read_wav_info(path)?;
    let format_str = if info.is_float { "IEEE Float" } else { "PCM" };

    println!("File:        {}", path.display());
    println!("Format:      {} {}-bit", format_str, info.spec.bits_per_sample);
    println!("Channels:    {}", info.spec.channels);
    println!("Sample Rate: {} Hz", info.spec.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    if info.spec.sample_rate != SUPPORTED_SAMPLE_RATE {
        println!("Note:        the engine processes {} Hz input only", SUPPORTED_SAMPLE_RATE);
    }
    Ok(())
}
