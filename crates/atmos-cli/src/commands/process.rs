//! Offline processing of a WAV file through one engine.

use crate::wav::{WavSpec, read_wav_stereo, write_wav};
use anyhow::Context;
use atmos_config::{Scenario, ScenarioBlend};
use atmos_engine::{
    AdsrSettings, AudioBuffer, AudioBufferMut, DopplerSettings, Engine, EngineConfig, ParamId,
    SUPPORTED_SAMPLE_RATE,
};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (48 kHz)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory scenario to apply (see `atmos scenarios list`)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Intensity used with --scenario
    #[arg(long, default_value = "1.0")]
    intensity: f32,

    /// Scenario file (TOML)
    #[arg(long, value_name = "FILE")]
    scenario_file: Option<PathBuf>,

    /// Blend factory scenarios (e.g., "cave:0.7"), repeatable
    #[arg(long, value_parser = parse_blend, number_of_values = 1)]
    blend: Vec<(String, f32)>,

    /// Control expression (e.g., "distance:0.2, warmth=0.5")
    #[arg(short, long)]
    expression: Option<String>,

    /// Individual controls by name (e.g., "room_size=0.8"), applied last
    #[arg(long, value_parser = parse_param, number_of_values = 1)]
    param: Vec<(ParamId, f32)>,

    /// Source azimuth in degrees (positive to the right)
    #[arg(long, allow_hyphen_values = true)]
    azimuth: Option<f32>,

    /// Envelope as attack_ms,decay_ms,sustain,release_ms
    #[arg(long, value_parser = parse_envelope)]
    envelope: Option<AdsrSettings>,

    /// Source velocity towards the listener in m/s (enables Doppler)
    #[arg(long, allow_hyphen_values = true)]
    doppler: Option<f32>,

    /// Seconds of silence rendered after the input to let the tail ring out
    #[arg(long, default_value = "2.0")]
    tail: f32,

    /// Normalize the output to this loudness (LUFS)
    #[arg(long, allow_hyphen_values = true)]
    normalize: Option<f32>,

    /// Write a mono file instead of stereo
    #[arg(long)]
    mono: bool,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

fn parse_blend(s: &str) -> Result<(String, f32), String> {
    let (name, weight) = s
        .split_once(':')
        .ok_or_else(|| format!("Invalid blend format: '{}' (expected name:weight)", s))?;
    let weight = weight
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid blend weight in '{}': {}", s, e))?;
    Ok((name.trim().to_string(), weight))
}

fn parse_param(s: &str) -> Result<(ParamId, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let id = ParamId::from_name(key.trim()).ok_or_else(|| {
        let names: Vec<_> = ParamId::ALL.iter().map(|id| id.name()).collect();
        format!("Unknown parameter '{}' (expected one of: {})", key, names.join(", "))
    })?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid value in '{}': {}", s, e))?;
    Ok((id, value))
}

fn parse_envelope(s: &str) -> Result<AdsrSettings, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Invalid envelope '{}': {}", s, e))?;
    let [attack_ms, decay_ms, sustain_level, release_ms] = values[..] else {
        return Err(format!(
            "Invalid envelope '{}' (expected attack_ms,decay_ms,sustain,release_ms)",
            s
        ));
    };
    Ok(AdsrSettings {
        attack_ms,
        decay_ms,
        sustain_level,
        release_ms,
    })
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("Block size must be positive");
    }

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    if spec.sample_rate != SUPPORTED_SAMPLE_RATE {
        anyhow::bail!(
            "Input is {} Hz; the engine runs at {} Hz only",
            spec.sample_rate,
            SUPPORTED_SAMPLE_RATE
        );
    }
    let input_frames = samples.len() / 2;
    println!(
        "  {} frames, {} Hz, {:.2}s",
        input_frames,
        spec.sample_rate,
        input_frames as f32 / spec.sample_rate as f32
    );

    let tail_frames = (args.tail.max(0.0) * spec.sample_rate as f32) as usize;
    samples.resize(samples.len() + tail_frames * 2, 0.0);

    let mut engine = Engine::new(EngineConfig {
        max_buffer_size: args.block_size,
        ..EngineConfig::default()
    })?;
    configure(&mut engine, &args)?;

    let mut output = vec![0.0f32; samples.len()];
    render(&mut engine, &samples, &mut output, args.block_size)?;

    if let Some(target) = args.normalize {
        let measured = engine.measure_loudness(&AudioBuffer::interleaved(&output, 2))?;
        engine.normalize_loudness(target)?;
        println!(
            "Normalizing {:.1} LUFS -> {:.1} LUFS (gain {:.3})",
            measured,
            target,
            engine.output_gain()
        );
        engine.reset();
        if let Some(envelope) = args.envelope {
            engine.set_envelope(envelope);
        }
        render(&mut engine, &samples, &mut output, args.block_size)?;
    }

    let (written, channels) = if args.mono {
        let mono = output.chunks_exact(2).map(|f| 0.5 * (f[0] + f[1])).collect();
        (mono, 1)
    } else {
        (output, 2)
    };

    println!("\nStats:");
    println!("  Output: RMS {:.1} dB, Peak {:.1} dB", linear_to_db(rms(&written)), linear_to_db(peak(&written)));

    let out_spec = WavSpec {
        channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &written, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Apply every control option to a fresh engine, broadest first.
fn configure(engine: &mut Engine, args: &ProcessArgs) -> anyhow::Result<()> {
    let plane = engine.params();

    if let Some(name) = &args.scenario {
        plane.apply_scenario(name, args.intensity)?;
        println!("Scenario: {} (intensity {:.2})", name, args.intensity);
    }
    if let Some(path) = &args.scenario_file {
        let scenario = Scenario::load(path)?;
        plane.apply_scenario_def(&scenario)?;
        println!("Scenario file: {}", scenario.name);
    }
    if !args.blend.is_empty() {
        let blends: Vec<_> = args
            .blend
            .iter()
            .map(|(name, weight)| ScenarioBlend::new(name, *weight))
            .collect();
        plane.blend_scenarios(&blends)?;
        println!("Blended {} scenario(s)", blends.len());
    }
    if let Some(expression) = &args.expression {
        let applied = plane.apply_expression(expression);
        println!("Expression: {} key(s) applied", applied);
    }
    for (id, value) in &args.param {
        plane.set(*id, *value);
    }

    if let Some(azimuth) = args.azimuth {
        engine.set_source_position(azimuth, 0.0)?;
    }
    if let Some(envelope) = args.envelope {
        engine.set_envelope(envelope);
    }
    if let Some(velocity) = args.doppler {
        engine.set_doppler(DopplerSettings {
            source_velocity: velocity,
            listener_velocity: 0.0,
            enabled: true,
        });
    }

    let main = plane.main_params();
    let ext = plane.extended_params();
    tracing::info!(?main, ?ext, "engine configured");
    Ok(())
}

/// Run interleaved stereo `input` through the engine block by block.
fn render(
    engine: &mut Engine,
    input: &[f32],
    output: &mut [f32],
    block_size: usize,
) -> anyhow::Result<()> {
    let total_frames = input.len() / 2;
    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let chunk = block_size * 2;
    for (i, (in_chunk, out_chunk)) in input.chunks(chunk).zip(output.chunks_mut(chunk)).enumerate() {
        engine.process(
            Some(AudioBuffer::interleaved(in_chunk, 2)),
            &mut AudioBufferMut::interleaved(out_chunk, 2),
        )?;
        pb.set_position(((i + 1) * block_size).min(total_frames) as u64);
    }

    pb.finish_with_message("done");
    Ok(())
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
