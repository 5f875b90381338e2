//! Recirculating delay line for feedback delay networks.
//!
//! Each FDN line is a circular buffer with a one-pole damping lowpass on its
//! output and a feedback gain derived from the target RT60. The mixing of
//! line outputs back into line inputs happens outside (see
//! [`hadamard_8`](crate::hadamard_8)); the line only stores, damps and
//! reports its coefficient.
//!
//! ```text
//! write(x) ─→ [buffer, length = delay] ─→ read() ─→ damping LP ─→ output
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use crate::flush_denormal;
use alloc::vec;
use alloc::vec::Vec;
use libm::powf;

/// Shortest RT60 accepted by [`rt60_feedback`], in seconds.
pub const MIN_RT60: f32 = 1e-3;

/// Feedback gain that makes a line of `delay_samples` decay 60 dB in `rt60` seconds.
///
/// `g = 10^(-3 · delay / (rt60 · sample_rate))`. The result is always in
/// `(0, 1)` for a positive delay: `rt60` is floored at [`MIN_RT60`] and NaN
/// is treated as that floor.
///
/// ```rust
/// use atmos_core::rt60_feedback;
///
/// let g = rt60_feedback(1116.0, 2.0, 48000.0);
/// assert!(g > 0.0 && g < 1.0);
/// ```
#[inline]
pub fn rt60_feedback(delay_samples: f32, rt60: f32, sample_rate: f32) -> f32 {
    let rt60 = if rt60.is_nan() { MIN_RT60 } else { rt60.max(MIN_RT60) };
    let delay = delay_samples.max(1.0);
    let g = powf(10.0, -3.0 * delay / (rt60 * sample_rate));
    g.clamp(f32::MIN_POSITIVE, 0.999_999)
}

/// Damped FDN delay line with a retunable length.
///
/// # Invariants
///
/// - `1 <= delay < capacity`
/// - `index < delay`
/// - `0 < feedback < 1`
#[derive(Debug, Clone)]
pub struct DampedDelayLine {
    buffer: Vec<f32>,
    delay: usize,
    index: usize,
    feedback: f32,
    damping: f32,
    filter_state: f32,
}

impl DampedDelayLine {
    /// Create a line with room for `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            buffer: vec![0.0; capacity],
            delay: capacity - 1,
            index: 0,
            feedback: 0.5,
            damping: 0.5,
            filter_state: 0.0,
        }
    }

    /// Retune the active length, clamped to `[1, capacity - 1]`.
    ///
    /// An index beyond the new length is wrapped modulo the length so
    /// in-flight content is never read out of bounds.
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay.clamp(1, self.buffer.len() - 1);
        if self.index >= self.delay {
            self.index %= self.delay;
        }
    }

    /// Active length in samples.
    #[inline]
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Set the feedback gain directly (clamped into the open interval (0, 1)).
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.999_999);
    }

    /// Derive the feedback gain from a decay time for the current length.
    pub fn set_rt60(&mut self, rt60: f32, sample_rate: f32) {
        self.feedback = rt60_feedback(self.delay as f32, rt60, sample_rate);
    }

    /// Current feedback gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Set the damping smoothing coefficient (0.0 to 1.0).
    ///
    /// The damping filter is `state += damping · (input − state)`.
    #[inline]
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Current damping coefficient.
    #[inline]
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Read the sample leaving the line through the damping filter.
    ///
    /// Must be paired with exactly one [`write`](Self::write) per sample.
    #[inline]
    pub fn read(&mut self) -> f32 {
        let sample = self.buffer[self.index];
        self.filter_state =
            flush_denormal(self.filter_state + self.damping * (sample - self.filter_state));
        self.filter_state
    }

    /// Write the next input sample and advance.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.index] = flush_denormal(sample);
        self.index += 1;
        if self.index >= self.delay {
            self.index = 0;
        }
    }

    /// Zero the buffer, filter state and index.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
        self.filter_state = 0.0;
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
    fn test_rt60_feedback_decays_60db() {
        let sr = 48000.0;
        let delay = 1000.0;
        let rt60 = 2.0;
        let g = rt60_feedback(delay, rt60, sr);
        // Number of recirculations in rt60 seconds
        let passes = rt60 * sr / delay;
        let total_db = 20.0 * passes * libm::log10f(g);
        assert!((total_db + 60.0).abs() < 0.1, "got {total_db} dB");
    }

    #[test]
    fn test_rt60_feedback_bounds() {
        for rt60 in [0.0, 1e-9, 0.3, 10.0, 1e6, f32::NAN, -5.0] {
            let g = rt60_feedback(1617.0, rt60, 48000.0);
            assert!(g > 0.0 && g < 1.0, "rt60={rt60} gave {g}");
        }
    }

    #[test]
    fn test_line_delays_by_length() {
        let mut line = DampedDelayLine::new(64);
        line.set_delay(8);
        line.set_damping(1.0);

        let mut outputs = [0.0f32; 20];
        for (i, out) in outputs.iter_mut().enumerate() {
            *out = line.read();
            line.write(if i == 0 { 1.0 } else { 0.0 });
        }
        assert_eq!(outputs[8], 1.0);
        assert!(outputs[..8].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_damping_smooths_output() {
        let mut line = DampedDelayLine::new(16);
        line.set_delay(4);
        line.set_damping(0.25);

        for i in 0..4 {
            line.read();
            line.write(if i == 0 { 1.0 } else { 0.0 });
        }
        let out = line.read();
        assert!((out - 0.25).abs() < 1e-6, "got {out}");
    }

    #[test]
    fn test_set_delay_rewraps_index() {
        let mut line = DampedDelayLine::new(200);
        line.set_delay(150);
        for _ in 0..120 {
            line.read();
            line.write(0.3);
        }
        line.set_delay(10);
        assert!(line.index < 10);
        line.set_delay(5000);
        assert_eq!(line.delay(), 199);
    }

    #[test]
    fn test_clear() {
        let mut line = DampedDelayLine::new(32);
        line.set_delay(5);
        for _ in 0..20 {
            line.read();
            line.write(1.0);
        }
        line.clear();
        for _ in 0..10 {
            assert_eq!(line.read(), 0.0);
            line.write(0.0);
        }
    }
}
