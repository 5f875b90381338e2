//! Allocation-free pseudo-random source for noise and dither.

/// 32-bit linear congruential generator.
///
/// Uses the Numerical Recipes constants (`a = 1664525`, `c = 1013904223`);
/// only the upper 16 bits are used to build samples, which hides the weak
/// low-order bits of a power-of-two modulus LCG.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
    seed: u32,
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(0x1234_5678)
    }
}

impl Lcg {
    /// Create a generator with the given seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed, seed }
    }

    /// Next value in `[0.0, 1.0)`.
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        let upper = (self.state >> 16) as u16;
        f32::from(upper) / 65_536.0
    }

    /// Next value in `[-1.0, 1.0)`.
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        self.next_unit() * 2.0 - 1.0
    }

    /// Rewind to the original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let mut rng = Lcg::default();
        for _ in 0..10_000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
            let b = rng.next_bipolar();
            assert!((-1.0..1.0).contains(&b));
        }
    }

    #[test]
    fn test_reset_is_deterministic() {
        let mut rng = Lcg::new(7);
        let first: [f32; 4] = core::array::from_fn(|_| rng.next_unit());
        rng.reset();
        let second: [f32; 4] = core::array::from_fn(|_| rng.next_unit());
        assert_eq!(first, second);
    }

    #[test]
    fn test_mean_is_centered() {
        let mut rng = Lcg::default();
        let n = 50_000;
        let mean: f32 = (0..n).map(|_| rng.next_bipolar()).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.02, "mean {mean}");
    }
}
