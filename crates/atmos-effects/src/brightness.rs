//! Brightness tilt on the dry path.
//!
//! Negative brightness runs a one-pole lowpass whose cutoff sweeps from
//! 2 kHz (at -1) to 8 kHz (towards 0). Positive brightness runs a one-pole
//! highpass whose cutoff sweeps from 1 kHz (towards 0) to 7 kHz (at +1).
//! Zero leaves the signal untouched. Lowpass and highpass keep separate
//! per-channel states that persist across blocks.

use atmos_core::OnePole;

/// Stereo brightness filter.
#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    lowpass: [OnePole; 2],
    highpass: [OnePole; 2],
}

impl BrightnessFilter {
    /// Create a filter at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lowpass: [OnePole::new(sample_rate, 8000.0), OnePole::new(sample_rate, 8000.0)],
            highpass: [OnePole::new(sample_rate, 1000.0), OnePole::new(sample_rate, 1000.0)],
        }
    }

    /// Lowpass cutoff for a brightness in [-1, 0).
    pub fn lowpass_cutoff(brightness: f32) -> f32 {
        2000.0 + (brightness + 1.0) * 6000.0
    }

    /// Highpass cutoff for a brightness in (0, 1].
    pub fn highpass_cutoff(brightness: f32) -> f32 {
        1000.0 + brightness * 6000.0
    }

    /// Filter both channels in place.
    pub fn process(&mut self, brightness: f32, left: &mut [f32], right: &mut [f32]) {
        let brightness = atmos_core::sanitize(brightness, -1.0, 1.0, 0.0);
        if brightness < 0.0 {
            let cutoff = Self::lowpass_cutoff(brightness);
            for (filter, channel) in self.lowpass.iter_mut().zip([left, right]) {
                filter.set_cutoff(cutoff);
                for x in channel.iter_mut() {
                    *x = filter.lowpass(*x);
                }
            }
        } else if brightness > 0.0 {
            let cutoff = Self::highpass_cutoff(brightness);
            for (filter, channel) in self.highpass.iter_mut().zip([left, right]) {
                filter.set_cutoff(cutoff);
                for x in channel.iter_mut() {
                    *x = filter.highpass(*x);
                }
            }
        }
    }

    /// Clear all filter states.
    pub fn reset(&mut self) {
        for f in self.lowpass.iter_mut().chain(self.highpass.iter_mut()) {
            f.reset();
        }
    }
}
