//! The engine object and its block pipeline.
//!
//! ```text
//! input → upmix → [doppler] → distance gain → brightness ─┬→ spatial ─────────────┐
//!                                                         └→ mono → reverb → lofi ┴→ mix × envelope × gain
//!                                                                   → precedence → width → output
//! ```
//!
//! Every buffer the pipeline touches is allocated in [`Engine::new`];
//! [`Engine::process`] never allocates, locks or logs.

use std::sync::Arc;

use atmos_config::{ExtendedParams, MainParams, factory_scenarios};
use atmos_core::{Adsr, AdsrSettings, EnvelopeState, db_to_linear};
use atmos_effects::{
    BinauralPanner, BinauralParams, BrightnessFilter, DopplerSettings, DopplerShifter, FdnReverb,
    Lofi, Precedence, PrecedenceSettings, ReverbParams, Spatializer, apply_width,
    azimuth_to_binaural,
};

use crate::{AudioBuffer, AudioBufferMut, ChannelLayout, EngineConfig, Error, ParameterPlane, Result};

/// Loudness reported before anything has been measured, in LUFS.
pub const UNMEASURED_LUFS: f32 = -120.0;
/// Measurements at or below this level cannot drive normalization.
const MIN_NORMALIZE_LUFS: f32 = -100.0;
/// Mean-square floor of the loudness estimate.
const LOUDNESS_EPSILON: f32 = 1e-10;
/// Reference frequency for cues derived from a source position.
const POSITION_REFERENCE_HZ: f32 = 1000.0;

/// Pre-allocated working channels, `max_buffer_size` samples each.
struct Scratch {
    dry_l: Vec<f32>,
    dry_r: Vec<f32>,
    mono: Vec<f32>,
    wet_l: Vec<f32>,
    wet_r: Vec<f32>,
}

impl Scratch {
    fn new(len: usize) -> Result<Self> {
        Ok(Self {
            dry_l: zeroed(len)?,
            dry_r: zeroed(len)?,
            mono: zeroed(len)?,
            wet_l: zeroed(len)?,
            wet_r: zeroed(len)?,
        })
    }
}

fn zeroed(len: usize) -> Result<Vec<f32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
    buf.resize(len, 0.0);
    Ok(buf)
}

/// One environmental effect graph.
///
/// The engine is `Send` but not `Sync`: exactly one thread calls
/// [`process`](Self::process), while any number of threads adjust the
/// shared [`ParameterPlane`] returned by [`params`](Self::params).
///
/// # Example
///
/// ```rust
/// use atmos_engine::{AudioBuffer, AudioBufferMut, Engine, EngineConfig};
///
/// let mut engine = Engine::new(EngineConfig::default()).unwrap();
/// engine.params().load_scenario("cave").unwrap();
///
/// let input = vec![0.1f32; 256];
/// let mut output = vec![0.0f32; 512];
/// engine
///     .process(
///         Some(AudioBuffer::mono(&input)),
///         &mut AudioBufferMut::interleaved(&mut output, 2),
///     )
///     .unwrap();
/// assert!(output.iter().all(|s| s.is_finite()));
/// ```
pub struct Engine {
    config: EngineConfig,
    sample_rate: f32,
    params: Arc<ParameterPlane>,
    reverb: FdnReverb,
    brightness: BrightnessFilter,
    lofi: Lofi,
    precedence: Precedence,
    doppler: DopplerShifter,
    envelope: Adsr,
    spatial: Option<Box<dyn Spatializer>>,
    output_gain: f32,
    last_loudness: f32,
    scratch: Scratch,
}

impl Engine {
    /// Create an engine.
    ///
    /// Fails with [`Error::UnsupportedSampleRate`] unless the rate is
    /// [`SUPPORTED_SAMPLE_RATE`](crate::SUPPORTED_SAMPLE_RATE), and with
    /// [`Error::OutOfMemory`] if the working buffers cannot be allocated.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let sample_rate = config.sample_rate as f32;
        let scratch = Scratch::new(config.max_buffer_size)?;

        if config.preload_all_scenarios {
            let scenarios = factory_scenarios();
            for scenario in &scenarios {
                scenario.validate()?;
                tracing::debug!(scenario = %scenario.name, "factory scenario ready");
            }
            tracing::debug!(count = scenarios.len(), "factory scenarios preloaded");
        }

        let spatial: Option<Box<dyn Spatializer>> = if config.preload_spatial {
            Some(Box::new(BinauralPanner::new(sample_rate)))
        } else {
            None
        };

        tracing::info!(
            sample_rate = config.sample_rate,
            max_buffer_size = config.max_buffer_size,
            max_reverb_time_sec = config.max_reverb_time_sec,
            "engine created"
        );

        Ok(Self {
            config,
            sample_rate,
            params: Arc::new(ParameterPlane::new()),
            reverb: FdnReverb::new(sample_rate),
            brightness: BrightnessFilter::new(sample_rate),
            lofi: Lofi::new(),
            precedence: Precedence::new(sample_rate),
            doppler: DopplerShifter::new(),
            envelope: Adsr::new(sample_rate),
            spatial,
            output_gain: 1.0,
            last_loudness: UNMEASURED_LUFS,
            scratch,
        })
    }

    /// Configuration the engine was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Shared parameter plane. Clone the `Arc` into any control thread.
    pub fn params(&self) -> Arc<ParameterPlane> {
        Arc::clone(&self.params)
    }

    /// Default parameters of a factory scenario, without applying them.
    pub fn scenario_defaults(name: &str) -> Result<(MainParams, ExtendedParams)> {
        Ok(atmos_config::scenario_defaults(name)?)
    }

    /// Process one block.
    ///
    /// `input` may be `None` (or have zero channels) for silence; otherwise it
    /// must have the same frame count as `output`. Both blocks are mono or
    /// stereo, interleaved or planar. On error `output` is left untouched.
    pub fn process(
        &mut self,
        input: Option<AudioBuffer<'_>>,
        output: &mut AudioBufferMut<'_>,
    ) -> Result<()> {
        let frames = output.frames;
        if frames == 0 || frames > self.config.max_buffer_size {
            return Err(Error::BufferTooSmall);
        }
        let input = input.filter(|buf| buf.channels > 0);
        if let Some(buf) = &input {
            if buf.frames != frames {
                return Err(Error::InvalidParameter("input and output frame counts differ"));
            }
            if buf.channels > 2 {
                return Err(Error::InvalidParameter("input must be mono or stereo"));
            }
        }
        if output.channels == 0 || output.channels > 2 {
            return Err(Error::InvalidParameter("output must be mono or stereo"));
        }
        if !output.is_complete() || input.as_ref().is_some_and(|buf| !buf.is_complete()) {
            return Err(Error::BufferTooSmall);
        }

        let Scratch {
            dry_l,
            dry_r,
            mono,
            wet_l,
            wet_r,
        } = &mut self.scratch;
        let dry_l = &mut dry_l[..frames];
        let dry_r = &mut dry_r[..frames];
        let mono = &mut mono[..frames];
        let wet_l = &mut wet_l[..frames];
        let wet_r = &mut wet_r[..frames];

        read_input(input.as_ref(), dry_l, dry_r);

        if self.doppler.is_enabled() {
            self.doppler.process(dry_l, dry_r, wet_l, wet_r);
            dry_l.copy_from_slice(wet_l);
            dry_r.copy_from_slice(wet_r);
        }

        let snapshot = self.params.snapshot();
        let main = snapshot.main;
        let extended = snapshot.extended;

        let distance_gain = 1.0 / (1.0 + 0.1 * main.distance);
        for (l, r) in dry_l.iter_mut().zip(dry_r.iter_mut()) {
            *l *= distance_gain;
            *r *= distance_gain;
        }

        self.brightness.process(main.brightness, dry_l, dry_r);

        for ((m, l), r) in mono.iter_mut().zip(dry_l.iter()).zip(dry_r.iter()) {
            *m = 0.5 * (*l + *r);
        }

        let rt60 = if extended.decay_time > 0.0 {
            extended.decay_time
        } else {
            0.3 + main.room_size * 9.7
        }
        .min(self.config.max_reverb_time_sec);
        let damping = (0.6 - main.brightness * 0.3).clamp(0.1, 0.9);
        self.reverb.update_params(&ReverbParams {
            room_size: main.room_size,
            rt60,
            diffusion: extended.diffusion,
            damping,
            modulation: extended.modulation,
        });
        self.reverb.process_block(mono, wet_l, wet_r);

        self.lofi.process(extended.lofi_amount, wet_l, wet_r);

        if let Some(spatial) = self.spatial.as_mut() {
            spatial.process(dry_l, dry_r);
        }

        let dry_gain = 1.0 - main.dry_wet;
        let wet_gain = main.dry_wet * main.intensity;
        for i in 0..frames {
            let gain = self.envelope.advance() * self.output_gain;
            dry_l[i] = (dry_gain * dry_l[i] + wet_gain * wet_l[i]) * gain;
            dry_r[i] = (dry_gain * dry_r[i] + wet_gain * wet_r[i]) * gain;
        }

        self.precedence.process(dry_l, dry_r);
        apply_width(main.width, dry_l, dry_r);

        write_output(output, dry_l, dry_r);
        Ok(())
    }

    /// Arm the envelope with new settings and restart it from Attack.
    pub fn set_envelope(&mut self, settings: AdsrSettings) {
        self.envelope.trigger(settings);
    }

    /// Move the envelope into Release.
    pub fn release_envelope(&mut self) {
        self.envelope.release();
    }

    /// Current envelope state.
    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Current envelope level.
    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    /// Configure the precedence echo.
    pub fn set_precedence(&mut self, settings: PrecedenceSettings) {
        self.precedence.set_settings(settings);
        tracing::debug!(?settings, "precedence updated");
    }

    /// Configure the Doppler stage.
    pub fn set_doppler(&mut self, settings: DopplerSettings) {
        self.doppler.set_settings(settings);
        tracing::debug!(?settings, ratio = settings.ratio(), "doppler updated");
    }

    /// Apply binaural cues to the spatial stage.
    ///
    /// Without a spatial collaborator (see
    /// [`EngineConfig::preload_spatial`]) the built-in
    /// [`BinauralPanner`] is created first.
    pub fn set_binaural_params(&mut self, params: &BinauralParams) {
        if self.spatial.is_none() {
            self.spatial = Some(Box::new(BinauralPanner::new(self.sample_rate)));
        }
        if let Some(spatial) = self.spatial.as_mut() {
            spatial.set_params(params);
        }
        tracing::debug!(?params, "binaural cues updated");
    }

    /// Place the source at an azimuth and elevation in degrees.
    pub fn set_source_position(&mut self, azimuth_deg: f32, elevation_deg: f32) -> Result<()> {
        if !azimuth_deg.is_finite() || !elevation_deg.is_finite() {
            return Err(Error::InvalidParameter("source position must be finite"));
        }
        let params = azimuth_to_binaural(azimuth_deg, elevation_deg, POSITION_REFERENCE_HZ);
        self.set_binaural_params(&params);
        Ok(())
    }

    /// Replace the spatial collaborator.
    pub fn set_spatializer(&mut self, spatializer: Box<dyn Spatializer>) {
        self.spatial = Some(spatializer);
    }

    /// Whether a spatial collaborator is installed.
    pub fn has_spatializer(&self) -> bool {
        self.spatial.is_some()
    }

    /// Set the linear output gain directly.
    pub fn set_output_gain(&mut self, gain: f32) -> Result<()> {
        if !gain.is_finite() || gain < 0.0 {
            return Err(Error::InvalidParameter("output gain must be finite and non-negative"));
        }
        self.output_gain = gain;
        Ok(())
    }

    /// Linear output gain.
    pub fn output_gain(&self) -> f32 {
        self.output_gain
    }

    /// Measure the loudness of a block and remember it for
    /// [`normalize_loudness`](Self::normalize_loudness).
    ///
    /// Uses the mean square of the mono downmix:
    /// `−0.691 + 10·log10(ms)` LUFS.
    pub fn measure_loudness(&mut self, buffer: &AudioBuffer<'_>) -> Result<f32> {
        if buffer.frames == 0 || !buffer.is_complete() {
            return Err(Error::BufferTooSmall);
        }
        if buffer.channels == 0 || buffer.channels > 2 {
            return Err(Error::InvalidParameter("loudness input must be mono or stereo"));
        }
        let sum: f32 = (0..buffer.frames)
            .map(|i| {
                let s = buffer.mono_frame(i);
                s * s
            })
            .sum();
        let mean_square = sum / buffer.frames as f32;
        let lufs = -0.691 + 10.0 * mean_square.max(LOUDNESS_EPSILON).log10();
        self.last_loudness = lufs;
        tracing::debug!(lufs, "loudness measured");
        Ok(lufs)
    }

    /// Last measured loudness in LUFS ([`UNMEASURED_LUFS`] before any measurement).
    pub fn last_loudness(&self) -> f32 {
        self.last_loudness
    }

    /// Set the output gain that moves the last measurement to `target_lufs`.
    pub fn normalize_loudness(&mut self, target_lufs: f32) -> Result<()> {
        if target_lufs.is_nan() {
            return Err(Error::InvalidParameter("target loudness must be a number"));
        }
        if self.last_loudness <= MIN_NORMALIZE_LUFS {
            return Err(Error::NotInitialized);
        }
        self.output_gain = db_to_linear(target_lufs - self.last_loudness);
        tracing::info!(
            measured = self.last_loudness,
            target = target_lufs,
            gain = self.output_gain,
            "loudness normalized"
        );
        Ok(())
    }

    /// Clear every stage's audio state and rewind the envelope.
    ///
    /// Parameters and stage settings are kept.
    pub fn reset(&mut self) {
        self.reverb.reset();
        self.brightness.reset();
        self.lofi.reset();
        self.precedence.reset();
        self.doppler.reset();
        self.envelope.reset();
        if let Some(spatial) = self.spatial.as_mut() {
            spatial.reset();
        }
    }
}

/// Upmix `input` into the two working channels (silence when absent).
fn read_input(input: Option<&AudioBuffer<'_>>, left: &mut [f32], right: &mut [f32]) {
    let Some(input) = input else {
        left.fill(0.0);
        right.fill(0.0);
        return;
    };
    let frames = left.len();
    let samples = input.samples;
    match (input.channels, input.layout) {
        (1, _) => {
            left.copy_from_slice(&samples[..frames]);
            right.copy_from_slice(left);
        }
        (_, ChannelLayout::Interleaved) => {
            for (i, (l, r)) in left.iter_mut().zip(right.iter_mut()).enumerate() {
                *l = samples[i * 2];
                *r = samples[i * 2 + 1];
            }
        }
        (_, ChannelLayout::Planar) => {
            left.copy_from_slice(&samples[..frames]);
            right.copy_from_slice(&samples[frames..frames * 2]);
        }
    }
}

/// Write the stereo pair into the caller's layout, downmixing for mono.
fn write_output(output: &mut AudioBufferMut<'_>, left: &[f32], right: &[f32]) {
    let frames = left.len();
    let samples = &mut *output.samples;
    match (output.channels, output.layout) {
        (1, _) => {
            for ((out, l), r) in samples[..frames].iter_mut().zip(left).zip(right) {
                *out = 0.5 * (l + r);
            }
        }
        (_, ChannelLayout::Interleaved) => {
            for (frame, (l, r)) in samples.chunks_exact_mut(2).zip(left.iter().zip(right)) {
                frame[0] = *l;
                frame[1] = *r;
            }
        }
        (_, ChannelLayout::Planar) => {
            let (out_l, out_r) = samples.split_at_mut(frames);
            out_l.copy_from_slice(left);
            out_r[..frames].copy_from_slice(right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParamId, Status};

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    fn sine(frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_unsupported_sample_rate() {
        let result = Engine::new(EngineConfig {
            sample_rate: 44_100,
            ..EngineConfig::default()
        });
        let err = result.err().unwrap();
        assert!(matches!(err, Error::UnsupportedSampleRate(44_100)));
        assert_eq!(err.status(), Status::InvalidParam);
    }

    #[test]
    fn test_preload_all_scenarios() {
        let engine = Engine::new(EngineConfig {
            preload_all_scenarios: true,
            ..EngineConfig::default()
        });
        assert!(engine.is_ok());
    }

    #[test]
    fn test_invalid_block_sizes_leave_output_untouched() {
        let mut engine = engine();
        let mut empty: [f32; 0] = [];
        let err = engine
            .process(None, &mut AudioBufferMut::mono(&mut empty))
            .unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall));

        let mut big = vec![7.0f32; 4097];
        let err = engine
            .process(None, &mut AudioBufferMut::mono(&mut big))
            .unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall));
        assert!(big.iter().all(|&s| s == 7.0));
    }

    #[test]
    fn test_shape_errors() {
        let mut engine = engine();
        let input = vec![0.5f32; 64];
        let mut out = vec![7.0f32; 128];

        let err = engine
            .process(
                Some(AudioBuffer::mono(&input[..32])),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = engine
            .process(
                Some(AudioBuffer::interleaved(&input, 4)),
                &mut AudioBufferMut::interleaved(&mut out[..64], 4),
            )
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidParam);

        let err = engine
            .process(
                Some(AudioBuffer::interleaved(&input[..48], 3)),
                &mut AudioBufferMut::mono(&mut out[..16]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let err = engine
            .process(
                None,
                &mut AudioBufferMut::planar(&mut out[..100], 64, 2),
            )
            .unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall));

        assert!(out.iter().all(|&s| s == 7.0));
    }

    #[test]
    fn test_silence_in_silence_out() {
        let mut engine = engine();
        let mut out = vec![1.0f32; 512];
        engine
            .process(None, &mut AudioBufferMut::interleaved(&mut out, 2))
            .unwrap();
        assert!(out.iter().all(|&s| s == 0.0));

        let empty: [f32; 0] = [];
        let zero_channels = AudioBuffer::interleaved(&empty, 0);
        engine
            .process(Some(zero_channels), &mut AudioBufferMut::interleaved(&mut out, 2))
            .unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_dry_only_equals_distance_gain() {
        let mut engine = engine();
        let plane = engine.params();
        plane.set_dry_wet(0.0);
        plane.set_distance(10.0);
        plane.set_room_size(1.0);
        plane.set_decay_time(30.0);

        let input = sine(256);
        let mut out = vec![0.0f32; 512];
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        for (i, x) in input.iter().enumerate() {
            let expected = x * 0.5;
            assert!((out[i * 2] - expected).abs() < 1e-6);
            assert!((out[i * 2 + 1] - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fully_wet_is_dominated_by_reverb() {
        let mut engine = engine();
        let plane = engine.params();
        plane.set_dry_wet(1.0);
        plane.set_intensity(1.0);

        let mut impulse = vec![0.0f32; 1024];
        impulse[0] = 1.0;
        let mut out = vec![0.0f32; 2048];
        engine
            .process(
                Some(AudioBuffer::mono(&impulse)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        // The direct impulse is gone; the wet signal arrives after the pre-delay.
        assert!(out[0].abs() < 1e-6 && out[1].abs() < 1e-6);

        let mut peak = 0.0f32;
        for _ in 0..4 {
            engine
                .process(None, &mut AudioBufferMut::interleaved(&mut out, 2))
                .unwrap();
            peak = out.iter().fold(peak, |p, s| p.max(s.abs()));
        }
        assert!(peak > 1e-4);
    }

    #[test]
    fn test_envelope_attack_zero_starts_at_full_level() {
        let mut engine = engine();
        engine.params().set_dry_wet(0.0);
        engine.set_envelope(AdsrSettings {
            attack_ms: 0.0,
            decay_ms: 10.0,
            sustain_level: 0.5,
            release_ms: 50.0,
        });
        let input = vec![1.0f32; 1];
        let mut out = vec![0.0f32; 1];
        engine
            .process(Some(AudioBuffer::mono(&input)), &mut AudioBufferMut::mono(&mut out))
            .unwrap();
        assert_eq!(engine.envelope_level(), 1.0);
        assert!((out[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_envelope_holds_sustain() {
        let mut engine = engine();
        engine.set_envelope(AdsrSettings {
            attack_ms: 1.0,
            decay_ms: 10.0,
            sustain_level: 0.5,
            release_ms: 50.0,
        });
        let mut out = vec![0.0f32; 1024];
        for _ in 0..4 {
            engine
                .process(None, &mut AudioBufferMut::interleaved(&mut out, 2))
                .unwrap();
        }
        assert_eq!(engine.envelope_state(), EnvelopeState::Sustain);
        assert_eq!(engine.envelope_level(), 0.5);

        engine.release_envelope();
        assert_eq!(engine.envelope_state(), EnvelopeState::Release);
        for _ in 0..8 {
            engine
                .process(None, &mut AudioBufferMut::interleaved(&mut out, 2))
                .unwrap();
        }
        assert_eq!(engine.envelope_state(), EnvelopeState::Idle);
        assert_eq!(engine.envelope_level(), 0.0);
    }

    #[test]
    fn test_output_layouts_agree() {
        let input = sine(128);
        let mut interleaved = vec![0.0f32; 256];
        let mut planar = vec![0.0f32; 256];
        let mut mono = vec![0.0f32; 128];

        let mut a = engine();
        a.process(
            Some(AudioBuffer::mono(&input)),
            &mut AudioBufferMut::interleaved(&mut interleaved, 2),
        )
        .unwrap();
        let mut b = engine();
        b.process(
            Some(AudioBuffer::mono(&input)),
            &mut AudioBufferMut::planar(&mut planar, 128, 2),
        )
        .unwrap();
        let mut c = engine();
        c.process(Some(AudioBuffer::mono(&input)), &mut AudioBufferMut::mono(&mut mono))
            .unwrap();

        for i in 0..128 {
            let l = interleaved[i * 2];
            let r = interleaved[i * 2 + 1];
            assert_eq!(planar[i], l);
            assert_eq!(planar[128 + i], r);
            assert!((mono[i] - 0.5 * (l + r)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_planar_stereo_input() {
        let mut engine = engine();
        engine.params().set_dry_wet(0.0);
        engine.params().set_distance(0.1);
        let mut input = vec![0.0f32; 64];
        input[..32].fill(0.5);
        input[32..].fill(-0.25);
        let mut out = vec![0.0f32; 64];
        engine
            .process(
                Some(AudioBuffer::planar(&input, 32, 2)),
                &mut AudioBufferMut::planar(&mut out, 32, 2),
            )
            .unwrap();
        let gain = 1.0 / 1.01;
        assert!((out[0] - 0.5 * gain).abs() < 1e-6);
        assert!((out[32] + 0.25 * gain).abs() < 1e-6);
    }

    #[test]
    fn test_cave_scenario_processes_finite() {
        let mut engine = engine();
        engine.params().load_scenario("cave").unwrap();
        assert_eq!(engine.params().main_params().room_size, 0.7);

        let input = sine(512);
        let mut out = vec![0.0f32; 1024];
        for _ in 0..20 {
            engine
                .process(
                    Some(AudioBuffer::mono(&input)),
                    &mut AudioBufferMut::interleaved(&mut out, 2),
                )
                .unwrap();
            assert!(out.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_doppler_unity_matches_bypass() {
        let input = sine(256);
        let mut plain = vec![0.0f32; 512];
        let mut shifted = vec![0.0f32; 512];

        let mut a = engine();
        a.process(
            Some(AudioBuffer::mono(&input)),
            &mut AudioBufferMut::interleaved(&mut plain, 2),
        )
        .unwrap();

        let mut b = engine();
        b.set_doppler(DopplerSettings {
            enabled: true,
            ..DopplerSettings::default()
        });
        b.process(
            Some(AudioBuffer::mono(&input)),
            &mut AudioBufferMut::interleaved(&mut shifted, 2),
        )
        .unwrap();
        assert_eq!(plain, shifted);
    }

    #[test]
    fn test_source_position_creates_panner_lazily() {
        let mut engine = Engine::new(EngineConfig {
            preload_spatial: false,
            ..EngineConfig::default()
        })
        .unwrap();
        assert!(!engine.has_spatializer());
        engine.set_source_position(90.0, 0.0).unwrap();
        assert!(engine.has_spatializer());
        assert!(engine.set_source_position(f32::NAN, 0.0).is_err());

        engine.params().set_dry_wet(0.0);
        let input = sine(256);
        let mut out = vec![0.0f32; 512];
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        let energy_l: f32 = out.iter().step_by(2).map(|s| s * s).sum();
        let energy_r: f32 = out.iter().skip(1).step_by(2).map(|s| s * s).sum();
        assert!(energy_r > energy_l);
    }

    #[test]
    fn test_custom_spatializer() {
        struct Mute;
        impl Spatializer for Mute {
            fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
                left.fill(0.0);
                right.fill(0.0);
            }
        }

        let mut engine = engine();
        engine.set_spatializer(Box::new(Mute));
        engine.params().set_dry_wet(0.0);
        let input = vec![0.5f32; 64];
        let mut out = vec![1.0f32; 64];
        engine
            .process(Some(AudioBuffer::mono(&input)), &mut AudioBufferMut::mono(&mut out))
            .unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_loudness_normalization() {
        let mut engine = engine();
        assert_eq!(engine.last_loudness(), UNMEASURED_LUFS);
        assert!(matches!(engine.normalize_loudness(-23.0), Err(Error::NotInitialized)));

        let block = vec![0.1f32; 480];
        let lufs = engine.measure_loudness(&AudioBuffer::mono(&block)).unwrap();
        // ms = 0.01 → −20.691
        assert!((lufs + 20.691).abs() < 1e-3);

        engine.normalize_loudness(-26.691).unwrap();
        assert!((engine.output_gain() - db_to_linear(-6.0)).abs() < 1e-4);

        let silence = vec![0.0f32; 480];
        let lufs = engine.measure_loudness(&AudioBuffer::mono(&silence)).unwrap();
        assert!((lufs + 100.691).abs() < 1e-3);
        assert!(matches!(engine.normalize_loudness(-23.0), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_output_gain() {
        let mut engine = engine();
        assert_eq!(engine.output_gain(), 1.0);
        assert!(engine.set_output_gain(-1.0).is_err());
        assert!(engine.set_output_gain(f32::NAN).is_err());
        engine.set_output_gain(0.0).unwrap();

        let input = vec![0.5f32; 64];
        let mut out = vec![1.0f32; 128];
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_reset_clears_tail() {
        let mut engine = engine();
        engine.params().set_dry_wet(1.0);
        let input = sine(1024);
        let mut out = vec![0.0f32; 2048];
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        engine.reset();
        engine
            .process(None, &mut AudioBufferMut::interleaved(&mut out, 2))
            .unwrap();
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(engine.params().get(ParamId::DryWet), 1.0);
    }

    #[test]
    fn test_nan_precedence_level_keeps_output_finite() {
        let mut engine = engine();
        engine.set_precedence(PrecedenceSettings {
            delay_ms: 10.0,
            level_db: f32::NAN,
            pan: 0.0,
        });
        let input = sine(256);
        let mut out = vec![0.0f32; 512];
        engine
            .process(
                Some(AudioBuffer::mono(&input)),
                &mut AudioBufferMut::interleaved(&mut out, 2),
            )
            .unwrap();
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_reset_disarms_envelope() {
        let mut engine = engine();
        engine.set_envelope(AdsrSettings {
            attack_ms: 1000.0,
            decay_ms: 0.0,
            sustain_level: 1.0,
            release_ms: 0.0,
        });
        assert_eq!(engine.envelope_state(), EnvelopeState::Attack);
        engine.reset();
        assert_eq!(engine.envelope_state(), EnvelopeState::Idle);
    }

    #[test]
    fn test_engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Engine>();
    }
}
