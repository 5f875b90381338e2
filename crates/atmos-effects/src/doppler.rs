//! Doppler pitch shift by variable-rate resampling.
//!
//! The current input block is read at a fractional index that advances by
//! the pitch ratio `(c + v_listener) / (c − v_source)` per output sample,
//! with linear interpolation between neighbours. The phase persists across
//! blocks but wraps modulo the block length, so a ratio other than 1.0
//! produces a discontinuity once per block. That approximation is kept:
//! there is no longer history to read from.

use atmos_core::sanitize;
use libm::floorf;

/// Speed of sound in m/s.
pub const SPEED_OF_SOUND: f32 = 343.0;

/// Source and listener motion along the line between them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DopplerSettings {
    /// Source velocity towards the listener in m/s.
    pub source_velocity: f32,
    /// Listener velocity towards the source in m/s.
    pub listener_velocity: f32,
    /// Whether the stage runs at all.
    pub enabled: bool,
}

impl DopplerSettings {
    /// Pitch ratio clamped to [0.5, 2.0] (NaN maps to 1.0).
    pub fn ratio(&self) -> f32 {
        let ratio = (SPEED_OF_SOUND + self.listener_velocity)
            / (SPEED_OF_SOUND - self.source_velocity);
        sanitize(ratio, 0.5, 2.0, 1.0)
    }
}

/// Block-local Doppler resampler.
#[derive(Debug, Clone, Default)]
pub struct DopplerShifter {
    settings: DopplerSettings,
    phase: f32,
}

impl DopplerShifter {
    /// Create a disabled shifter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the settings. Enabling a disabled shifter restarts the phase at 0.
    pub fn set_settings(&mut self, settings: DopplerSettings) {
        if !self.settings.enabled && settings.enabled {
            self.phase = 0.0;
        }
        self.settings = settings;
    }

    /// Current settings.
    pub fn settings(&self) -> DopplerSettings {
        self.settings
    }

    /// Whether the stage runs.
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Current read phase in samples.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Resample `input` into `output` (one channel pair at a time).
    ///
    /// Both channels share the phase: call once per block with both pairs.
    /// Frames processed is the shortest of the four slices.
    pub fn process(
        &mut self,
        input_l: &[f32],
        input_r: &[f32],
        output_l: &mut [f32],
        output_r: &mut [f32],
    ) {
        let frames = input_l
            .len()
            .min(input_r.len())
            .min(output_l.len())
            .min(output_r.len());
        if frames == 0 {
            return;
        }
        if !self.settings.enabled {
            output_l[..frames].copy_from_slice(&input_l[..frames]);
            output_r[..frames].copy_from_slice(&input_r[..frames]);
            return;
        }

        let len = frames as f32;
        let ratio = self.settings.ratio();
        let mut phase = self.phase;
        while phase >= len {
            phase -= len;
        }
        if phase < 0.0 || phase.is_nan() {
            phase = 0.0;
        }

        let last = frames - 1;
        for i in 0..frames {
            let idx = (floorf(phase) as usize).min(last);
            let frac = phase - idx as f32;
            let next = (idx + 1).min(last);
            output_l[i] = input_l[idx] + (input_l[next] - input_l[idx]) * frac;
            output_r[i] = input_r[idx] + (input_r[next] - input_r[idx]) * frac;
            phase += ratio;
            while phase >= len {
                phase -= len;
            }
        }
        self.phase = phase;
    }

    /// Rewind the phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
