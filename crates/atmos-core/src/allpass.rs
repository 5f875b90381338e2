//! Allpass filter for reverb diffusion.
//!
//! A Schroeder allpass that smears transients into a diffuse wash without
//! colouring the magnitude response. Unlike a fixed-length allpass, the
//! active length can be retuned at block boundaries within the capacity
//! allocated at construction.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use crate::flush_denormal;
use alloc::vec;
use alloc::vec::Vec;

/// Schroeder allpass filter with a retunable delay length.
///
/// # Invariants
///
/// - `1 <= delay < capacity`
/// - `index < delay`
///
/// # Example
///
/// ```rust
/// use atmos_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(4801);
/// allpass.set_delay(142);
/// allpass.set_feedback(0.7);
///
/// let output = allpass.process(1.0);
/// assert_eq!(output, -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    delay: usize,
    index: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with room for `capacity` samples.
    ///
    /// The active length starts at `capacity - 1`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            buffer: vec![0.0; capacity],
            delay: capacity - 1,
            index: 0,
            feedback: 0.5,
        }
    }

    /// Set the active delay length, clamped to `[1, capacity - 1]`.
    ///
    /// The running index is re-wrapped so it never points past the new length.
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay.clamp(1, self.buffer.len() - 1);
        if self.index >= self.delay {
            self.index %= self.delay;
        }
    }

    /// Active delay length in samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Set the feedback coefficient.
    ///
    /// The allpass is stable for |feedback| < 1.0.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Get the current feedback value.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Process a single sample.
    ///
    /// output = -input + delayed
    /// delay_input = input + delayed * feedback
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];
        let output = -input + delayed;
        self.buffer[self.index] = flush_denormal(input + delayed * self.feedback);
        self.index += 1;
        if self.index >= self.delay {
            self.index = 0;
        }
        output
    }

    /// Clear the filter state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allpass_impulse_response() {
        let mut allpass = AllpassFilter::new(64);
        allpass.set_delay(10);
        allpass.set_feedback(0.5);

        let first = allpass.process(1.0);
        assert!((first + 1.0).abs() < 1e-6, "First output should be -input");

        for _ in 0..9 {
            assert_eq!(allpass.process(0.0), 0.0);
        }

        let delayed = allpass.process(0.0);
        assert!((delayed - 1.0).abs() < 1e-6, "got {delayed}");
    }

    #[test]
    fn test_impulse_energy_is_bounded() {
        let mut allpass = AllpassFilter::new(64);
        allpass.set_delay(50);
        allpass.set_feedback(0.5);

        let mut output_energy = allpass.process(1.0).powi(2);
        for _ in 0..5000 {
            output_energy += allpass.process(0.0).powi(2);
        }

        // -1 direct, then a geometric echo train 1, g, g^2, ...
        let expected = 1.0 + 1.0 / (1.0 - 0.25);
        assert!(
            (output_energy - expected).abs() < 0.01,
            "Impulse energy {} should be {}",
            output_energy,
            expected
        );
    }

    #[test]
    fn test_set_delay_rewraps_index() {
        let mut allpass = AllpassFilter::new(100);
        allpass.set_delay(90);
        for _ in 0..80 {
            allpass.process(0.1);
        }
        allpass.set_delay(7);
        assert!(allpass.index < 7);
        for _ in 0..100 {
            assert!(allpass.process(0.1).is_finite());
        }
    }

    #[test]
    fn test_delay_clamped() {
        let mut allpass = AllpassFilter::new(10);
        allpass.set_delay(0);
        assert_eq!(allpass.delay(), 1);
        allpass.set_delay(1000);
        assert_eq!(allpass.delay(), 9);
    }

    #[test]
    fn test_allpass_clear() {
        let mut allpass = AllpassFilter::new(16);
        for _ in 0..40 {
            allpass.process(1.0);
        }
        allpass.clear();
        assert!(allpass.process(0.0).abs() < 1e-10, "Should be silent after clear");
    }

    #[test]
    fn test_no_denormals_after_silence() {
        let mut allpass = AllpassFilter::new(128);
        allpass.set_delay(100);
        allpass.set_feedback(0.7);

        for _ in 0..1000 {
            allpass.process(0.5);
        }

        for i in 0..100_000 {
            let out = allpass.process(0.0);
            assert!(
                out == 0.0 || out.abs() > f32::MIN_POSITIVE,
                "Denormal detected at sample {}: {:.2e}",
                i,
                out
            );
        }
    }
}
