//! Precedence-effect echo.
//!
//! A single delayed copy of the stereo signal mixed back in with its own
//! level and pan. Short delays (1-30 ms) fuse with the direct sound and
//! shift its perceived position towards the leading channel.

use atmos_core::{TapDelay, db_to_linear, sanitize};

const MIN_LEVEL_DB: f32 = -120.0;
const MAX_LEVEL_DB: f32 = 24.0;

/// Echo configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecedenceSettings {
    /// Echo delay in milliseconds; zero or negative disables the echo.
    pub delay_ms: f32,
    /// Echo level in dB, clamped to [-120, 24]; NaN falls back to -6.
    pub level_db: f32,
    /// Echo pan in [-1, 1].
    pub pan: f32,
}

impl Default for PrecedenceSettings {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            level_db: -6.0,
            pan: 0.0,
        }
    }
}

/// Stereo precedence echo with 100 ms of ring-buffer capacity.
#[derive(Debug, Clone)]
pub struct Precedence {
    settings: PrecedenceSettings,
    left: TapDelay,
    right: TapDelay,
    sample_rate: f32,
}

impl Precedence {
    /// Create a disabled echo at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            settings: PrecedenceSettings::default(),
            left: TapDelay::from_time(sample_rate, 0.1),
            right: TapDelay::from_time(sample_rate, 0.1),
            sample_rate,
        }
    }

    /// Replace the echo configuration.
    pub fn set_settings(&mut self, settings: PrecedenceSettings) {
        let default = PrecedenceSettings::default();
        self.settings = PrecedenceSettings {
            delay_ms: settings.delay_ms,
            level_db: sanitize(settings.level_db, MIN_LEVEL_DB, MAX_LEVEL_DB, default.level_db),
            pan: sanitize(settings.pan, -1.0, 1.0, default.pan),
        };
    }

    /// Current configuration.
    pub fn settings(&self) -> PrecedenceSettings {
        self.settings
    }

    /// Echo delay in samples, clamped to the ring capacity.
    pub fn delay_samples(&self) -> usize {
        let samples = self.settings.delay_ms * 0.001 * self.sample_rate;
        (samples.max(0.0) as usize).min(self.left.max_delay())
    }

    /// Whether the echo is active.
    pub fn is_enabled(&self) -> bool {
        self.settings.delay_ms > 0.0
    }

    /// Mix the echo into both channels in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.is_enabled() {
            return;
        }
        let gain = db_to_linear(self.settings.level_db);
        let pan = self.settings.pan;
        let gain_l = gain * 0.5 * (1.0 - pan);
        let gain_r = gain * 0.5 * (1.0 + pan);
        let delay = self.delay_samples();

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let delayed_l = self.left.read(delay);
            let delayed_r = self.right.read(delay);
            self.left.write(*l);
            self.right.write(*r);
            *l += gain_l * delayed_l;
            *r += gain_r * delayed_r;
        }
    }

    /// Silence the ring buffers.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let mut p = Precedence::new(48000.0);
        let mut l = [1.0, 0.5];
        let mut r = [0.2, 0.1];
        p.process(&mut l, &mut r);
        assert_eq!(l, [1.0, 0.5]);
        assert_eq!(r, [0.2, 0.1]);
    }

    #[test]
    fn test_echo_position_and_level() {
        let mut p = Precedence::new(48000.0);
        p.set_settings(PrecedenceSettings {
            delay_ms: 1.0,
            level_db: 0.0,
            pan: 1.0,
        });
        assert_eq!(p.delay_samples(), 48);

        let mut l = vec![0.0; 100];
        let mut r = vec![0.0; 100];
        l[0] = 1.0;
        r[0] = 1.0;
        p.process(&mut l, &mut r);

        // Hard right pan: nothing on the left, full echo on the right.
        assert_eq!(l[48], 0.0);
        assert!((r[48] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_level_is_sanitized() {
        let mut p = Precedence::new(48000.0);
        p.set_settings(PrecedenceSettings {
            delay_ms: 10.0,
            level_db: f32::NAN,
            pan: 0.0,
        });
        assert_eq!(p.settings().level_db, -6.0);

        p.set_settings(PrecedenceSettings {
            delay_ms: 10.0,
            level_db: f32::INFINITY,
            pan: f32::NAN,
        });
        assert_eq!(p.settings().level_db, MAX_LEVEL_DB);
        assert_eq!(p.settings().pan, 0.0);

        let mut l = vec![0.5; 2048];
        let mut r = vec![-0.5; 2048];
        p.process(&mut l, &mut r);
        assert!(l.iter().chain(r.iter()).all(|x| x.is_finite()));
    }

    #[test]
    fn test_delay_beyond_capacity_is_clamped() {
        let mut p = Precedence::new(48000.0);
        p.set_settings(PrecedenceSettings {
            delay_ms: 10_000.0,
            level_db: -6.0,
            pan: 0.0,
        });
        assert_eq!(p.delay_samples(), 4800);

        let mut l = vec![0.5; 9600];
        let mut r = vec![-0.5; 9600];
        p.process(&mut l, &mut r);
        assert!(l.iter().chain(r.iter()).all(|x| x.is_finite()));
    }
}
