//! One-pole RC filter for brightness shaping and head shadowing.
//!
//! The coefficient is the discretized RC smoother:
//!
//! ```text
//! rc    = 1 / (2π · fc)
//! dt    = 1 / sample_rate
//! alpha = dt / (rc + dt)
//! y[n]  = y[n-1] + alpha · (x[n] − y[n-1])
//! ```
//!
//! The highpass output is the complement `x[n] − y[n]` of the same state.
//! 6 dB/octave, zero latency, one multiply per sample.

use crate::flush_denormal;

/// One-pole (6 dB/oct) RC filter.
///
/// # Invariants
///
/// - `alpha` is always in (0, 1]
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
///
/// # Example
///
/// ```rust
/// use atmos_core::OnePole;
///
/// let mut lp = OnePole::new(48000.0, 2000.0);
/// let filtered = lp.lowpass(1.0);
/// assert!(filtered < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    alpha: f32,
    sample_rate: f32,
    cutoff: f32,
}

impl OnePole {
    /// Create a filter with the given cutoff.
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            alpha: 1.0,
            sample_rate,
            cutoff: cutoff_hz,
        };
        filter.recalculate_alpha();
        filter
    }

    /// Set the cutoff frequency in Hz.
    ///
    /// Skips the coefficient update when the cutoff is unchanged, so it is
    /// cheap to call once per block.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if cutoff_hz != self.cutoff {
            self.cutoff = cutoff_hz;
            self.recalculate_alpha();
        }
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current smoothing coefficient.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Lowpass one sample.
    #[inline]
    pub fn lowpass(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state + self.alpha * (input - self.state));
        self.state
    }

    /// Highpass one sample (input minus the lowpassed state).
    #[inline]
    pub fn highpass(&mut self, input: f32) -> f32 {
        input - self.lowpass(input)
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_alpha(&mut self) {
        let fc = self.cutoff.max(1.0);
        let rc = 1.0 / (core::f32::consts::TAU * fc);
        let dt = 1.0 / self.sample_rate;
        self.alpha = dt / (rc + dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowpass_passes_dc() {
        let mut lp = OnePole::new(48000.0, 1000.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.lowpass(1.0);
        }
        assert!((out - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut hp = OnePole::new(48000.0, 1000.0);
        let mut out = 1.0;
        for _ in 0..48000 {
            out = hp.highpass(1.0);
        }
        assert!(out.abs() < 1e-4);
    }

    #[test]
    fn test_alpha_formula() {
        let lp = OnePole::new(48000.0, 2000.0);
        let rc = 1.0 / (core::f32::consts::TAU * 2000.0);
        let dt = 1.0 / 48000.0;
        assert!((lp.alpha() - dt / (rc + dt)).abs() < 1e-7);
    }

    #[test]
    fn test_higher_cutoff_means_larger_alpha() {
        let low = OnePole::new(48000.0, 2000.0);
        let high = OnePole::new(48000.0, 8000.0);
        assert!(high.alpha() > low.alpha());
    }

    #[test]
    fn test_lowpass_attenuates_nyquist() {
        let mut lp = OnePole::new(48000.0, 2000.0);
        let mut peak = 0.0f32;
        for i in 0..4800 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = lp.lowpass(x);
            if i > 100 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.3, "Nyquist should be attenuated, got {peak}");
    }
}
