//! Lofi degradation on the wet path.
//!
//! Quantizes to `max(4, 16 − 12·amount)` bits after adding a small uniform
//! noise (amplitude `0.002·amount`, shared by both channels). Amount 0 is a
//! strict no-op. Noise comes from an internal LCG, so the stage never
//! allocates or calls into the platform RNG.

use atmos_core::Lcg;
use libm::{floorf, powf};

/// Fewest bits the quantizer goes down to.
const MIN_BITS: i32 = 4;
/// Noise amplitude at amount 1.0.
const NOISE_AMPLITUDE: f32 = 0.002;

/// Bit reduction with noise.
#[derive(Debug, Clone, Default)]
pub struct Lofi {
    rng: Lcg,
}

impl Lofi {
    /// Create a lofi stage with the default noise seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bit depth used for `amount`.
    pub fn bits(amount: f32) -> i32 {
        ((16.0 - amount.clamp(0.0, 1.0) * 12.0) as i32).max(MIN_BITS)
    }

    /// Degrade both channels in place.
    pub fn process(&mut self, amount: f32, left: &mut [f32], right: &mut [f32]) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        let amount = amount.min(1.0);
        let step = 1.0 / powf(2.0, Self::bits(amount) as f32);
        let noise_amp = amount * NOISE_AMPLITUDE;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let noise = noise_amp * self.rng.next_bipolar();
            *l = floorf((*l + noise) / step + 0.5) * step;
            *r = floorf((*r + noise) / step + 0.5) * step;
        }
    }

    /// Rewind the noise generator.
    pub fn reset(&mut self) {
        self.rng.reset();
    }
}
