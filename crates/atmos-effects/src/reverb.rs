//! Feedback-delay-network reverb.
//!
//! ```text
//! input → pre-delay → ×mod → allpass → allpass ─┬→ early reflections ─→ (L, R)
//!                                              └→ 8-line FDN ────────→ (L, R)
//! ```
//!
//! The FDN lines recirculate through a normalized Hadamard matrix. Every
//! line carries its own one-pole damping filter and a feedback gain derived
//! from the target RT60, so the tail decays by 60 dB in RT60 seconds
//! regardless of line length. Lines 0-3 feed the left output and lines 4-7
//! the right, which decorrelates the two sides.
//!
//! All buffers are allocated in [`FdnReverb::new`] with 100 ms of capacity
//! (200 ms for early reflections). [`FdnReverb::update_params`] only retunes
//! lengths and coefficients inside that capacity, so it is safe to call once
//! per block from the audio thread.

use crate::EarlyReflections;
use atmos_core::{
    AllpassFilter, DampedDelayLine, TapDelay, hadamard_8, rt60_feedback, sanitize,
};
use libm::sinf;

/// Number of FDN lines.
pub const FDN_LINES: usize = 8;

/// FDN line lengths at the 44.1 kHz reference rate.
/// Mutually prime-like to avoid coinciding resonances.
const LINE_TUNINGS_44K: [usize; FDN_LINES] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Diffuser lengths at the 44.1 kHz reference rate.
const DIFFUSER_TUNINGS_44K: [usize; 2] = [142, 107];

/// Reference sample rate for tuning constants.
const REFERENCE_RATE: f32 = 44100.0;

/// Delay capacity of lines, diffusers and pre-delay, in seconds.
const MAX_LINE_SECONDS: f32 = 0.1;

/// Pre-delay at room size 1.0, in seconds.
const MAX_PREDELAY_SECONDS: f32 = 0.08;

/// Modulation LFO rate in Hz.
const LFO_RATE_HZ: f32 = 0.25;

/// Modulation depth at `modulation = 1.0` (relative gain swing).
const LFO_DEPTH: f32 = 0.01;

/// Late-tail output scaling per side (four lines summed).
const LINE_OUTPUT_GAIN: f32 = 0.25;

/// Tuning pushed into the reverb once per block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Room size in [0, 1]: scales line, diffuser, pre-delay and tap lengths.
    pub room_size: f32,
    /// Decay time in seconds (floored at a small positive value).
    pub rt60: f32,
    /// Diffuser density in [0, 1].
    pub diffusion: f32,
    /// Damping filter coefficient in [0, 1].
    pub damping: f32,
    /// Input modulation depth in [0, 1].
    pub modulation: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            rt60: 3.0,
            diffusion: 0.5,
            damping: 0.5,
            modulation: 0.0,
        }
    }
}

/// 8-line FDN reverb with pre-delay, diffusion and early reflections.
#[derive(Debug, Clone)]
pub struct FdnReverb {
    sample_rate: f32,
    lines: [DampedDelayLine; FDN_LINES],
    diffusers: [AllpassFilter; 2],
    pre_delay: TapDelay,
    pre_delay_samples: usize,
    early: EarlyReflections,
    params: ReverbParams,
    lfo_phase: f32,
    lfo_increment: f32,
}

impl FdnReverb {
    /// Create a reverb at the given sample rate, tuned to [`ReverbParams::default`].
    pub fn new(sample_rate: f32) -> Self {
        let capacity = (sample_rate * MAX_LINE_SECONDS) as usize + 1;
        let mut reverb = Self {
            sample_rate,
            lines: core::array::from_fn(|_| DampedDelayLine::new(capacity)),
            diffusers: core::array::from_fn(|_| AllpassFilter::new(capacity)),
            pre_delay: TapDelay::new(capacity),
            pre_delay_samples: 1,
            early: EarlyReflections::new(sample_rate),
            params: ReverbParams::default(),
            lfo_phase: 0.0,
            lfo_increment: LFO_RATE_HZ / sample_rate,
        };
        reverb.update_params(&ReverbParams::default());
        reverb.reset();
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, capacity, "fdn reverb allocated");
        reverb
    }

    /// Retune every length and coefficient.
    ///
    /// Lengths scale by `0.7 + 0.8·room_size` and by the sample-rate ratio to
    /// 44.1 kHz; they are clamped to the allocated capacity and running
    /// indices are re-wrapped, so content already in flight stays readable.
    pub fn update_params(&mut self, params: &ReverbParams) {
        let defaults = ReverbParams::default();
        let room_size = sanitize(params.room_size, 0.0, 1.0, defaults.room_size);
        let diffusion = sanitize(params.diffusion, 0.0, 1.0, defaults.diffusion);
        let damping = sanitize(params.damping, 0.0, 1.0, defaults.damping);
        self.params = ReverbParams {
            room_size,
            rt60: params.rt60,
            diffusion,
            damping,
            modulation: sanitize(params.modulation, 0.0, 1.0, defaults.modulation),
        };

        let scale = 0.7 + 0.8 * room_size;
        let rate_scale = self.sample_rate / REFERENCE_RATE;

        self.pre_delay_samples = ((room_size * MAX_PREDELAY_SECONDS * self.sample_rate) as usize)
            .clamp(1, self.pre_delay.max_delay());

        for (line, &base) in self.lines.iter_mut().zip(LINE_TUNINGS_44K.iter()) {
            line.set_delay((base as f32 * rate_scale * scale) as usize);
            line.set_damping(damping);
            line.set_feedback(rt60_feedback(
                line.delay() as f32,
                params.rt60,
                self.sample_rate,
            ));
        }

        for (ap, &base) in self.diffusers.iter_mut().zip(DIFFUSER_TUNINGS_44K.iter()) {
            ap.set_delay((base as f32 * rate_scale * scale) as usize);
            ap.set_feedback(0.5 + 0.4 * diffusion);
        }

        self.early.set_room_size(room_size);
    }

    /// Parameters currently in effect (after clamping).
    pub fn params(&self) -> ReverbParams {
        self.params
    }

    /// Process one mono sample into a `(left, right)` wet pair.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> (f32, f32) {
        let pre = self.pre_delay.read(self.pre_delay_samples);
        self.pre_delay.write(input);

        let modulation = 1.0
            + self.params.modulation
                * LFO_DEPTH
                * sinf(core::f32::consts::TAU * self.lfo_phase);
        self.lfo_phase += self.lfo_increment;
        if self.lfo_phase >= 1.0 {
            self.lfo_phase -= 1.0;
        }

        let mut diffused = pre * modulation;
        for ap in &mut self.diffusers {
            diffused = ap.process(diffused);
        }

        let (early_l, early_r) = self.early.process(diffused);

        let mut outputs = [0.0f32; FDN_LINES];
        for (out, line) in outputs.iter_mut().zip(self.lines.iter_mut()) {
            *out = line.read();
        }

        let mut mixed = outputs;
        hadamard_8(&mut mixed);

        for (line, feedback) in self.lines.iter_mut().zip(mixed) {
            let gain = line.feedback();
            line.write(diffused + feedback * gain);
        }

        let late_l = LINE_OUTPUT_GAIN * (outputs[0] + outputs[1] + outputs[2] + outputs[3]);
        let late_r = LINE_OUTPUT_GAIN * (outputs[4] + outputs[5] + outputs[6] + outputs[7]);

        (early_l + late_l, early_r + late_r)
    }

    /// Process a mono block into separate left and right wet buffers.
    ///
    /// Processes `min(input.len(), left.len(), right.len())` samples.
    pub fn process_block(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32]) {
        for ((&x, l), r) in input.iter().zip(left.iter_mut()).zip(right.iter_mut()) {
            let (wet_l, wet_r) = self.process_sample(x);
            *l = wet_l;
            *r = wet_r;
        }
    }

    /// Silence every buffer and rewind all indices and the LFO.
    ///
    /// Never called during normal block processing; the tail persists
    /// across blocks.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        for ap in &mut self.diffusers {
            ap.clear();
        }
        self.pre_delay.clear();
        self.early.clear();
        self.lfo_phase = 0.0;
    }

    /// Active FDN line lengths in samples.
    pub fn line_delays(&self) -> [usize; FDN_LINES] {
        core::array::from_fn(|i| self.lines[i].delay())
    }

    /// Active FDN feedback gains.
    pub fn line_feedbacks(&self) -> [f32; FDN_LINES] {
        core::array::from_fn(|i| self.lines[i].feedback())
    }

    /// Active diffuser lengths in samples.
    pub fn diffuser_delays(&self) -> [usize; 2] {
        [self.diffusers[0].delay(), self.diffusers[1].delay()]
    }

    /// Active diffuser feedback.
    pub fn diffuser_feedback(&self) -> f32 {
        self.diffusers[0].feedback()
    }

    /// Active pre-delay in samples.
    pub fn pre_delay_samples(&self) -> usize {
        self.pre_delay_samples
    }

    /// Allocated capacity of each line in samples.
    pub fn line_capacity(&self) -> usize {
        self.lines[0].capacity()
    }
}
