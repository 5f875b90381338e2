//! Integer-tap circular delay buffer.
//!
//! [`TapDelay`] is the storage behind every fixed-capacity delay in the
//! engine: the reverb pre-delay, the early-reflection network, the precedence
//! echo and the ITD delay of the spatial stage. Taps are whole samples; none
//! of those consumers modulate their read position within a block.
//!
//! The usage pattern is read-then-write: taps are read relative to the next
//! write position, so `read(1)` returns the most recently written sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular delay buffer with a fixed capacity (heap-allocated once).
///
/// # Example
///
/// ```rust
/// use atmos_core::TapDelay;
///
/// let mut delay = TapDelay::new(100);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(2), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TapDelay {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl TapDelay {
    /// Create a delay buffer holding `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Create a buffer sized for `max_seconds` at `sample_rate`, plus one sample.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new((sample_rate * max_seconds) as usize + 1)
    }

    /// Read the sample written `delay` writes ago.
    ///
    /// `delay` is clamped to `capacity - 1`; a delay of zero reads the slot
    /// about to be overwritten (the oldest sample).
    #[inline]
    pub fn read(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(len - 1);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Write one sample and advance the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the buffer and rewind the write position.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest usable tap (`capacity - 1`).
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }
}
