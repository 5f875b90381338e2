//! Lock-free scalar parameter cell.
//!
//! An [`AtomicParam`] stores an `f32` as its bit pattern in an `AtomicU32`.
//! Any number of control threads may write while the audio thread reads; a
//! single value can never tear. Loads and stores are `Relaxed`: no ordering
//! is established between cells, so a group of writes may be observed across
//! different blocks.

use core::sync::atomic::{AtomicU32, Ordering};

/// Valid range and default of a scalar control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Value on creation and after reset.
    pub default: f32,
}

impl ParamRange {
    /// Create a range. `default` must lie within `[min, max]`.
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp `value` into range; NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        crate::sanitize(value, self.min, self.max, self.default)
    }

    /// Whether `value` is a finite number inside the range.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        !value.is_nan() && value >= self.min && value <= self.max
    }
}

/// A thread-safe atomic parameter using bit-cast `f32`.
///
/// Control threads write, the audio thread reads. No locks, no allocations.
///
/// # Example
///
/// ```rust
/// use atmos_core::{AtomicParam, ParamRange};
///
/// let room = AtomicParam::new(ParamRange::new(0.0, 1.0, 0.5));
/// room.set(1.5);
/// assert_eq!(room.get(), 1.0);
///
/// // NaN writes are dropped
/// room.set(f32::NAN);
/// assert_eq!(room.get(), 1.0);
/// ```
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    range: ParamRange,
}

impl AtomicParam {
    /// Create a cell holding the range default.
    pub fn new(range: ParamRange) -> Self {
        Self {
            value: AtomicU32::new(range.default.to_bits()),
            range,
        }
    }

    /// Store `value` clamped into range. NaN is ignored.
    #[inline]
    pub fn set(&self, value: f32) {
        if value.is_nan() {
            return;
        }
        self.store_raw(value.clamp(self.range.min, self.range.max));
    }

    /// Store `value` without clamping.
    ///
    /// Used for verbatim scenario loads; the audio thread re-clamps every
    /// snapshot, so an out-of-range raw value never reaches the DSP.
    #[inline]
    pub fn store_raw(&self, value: f32) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Load the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// The cell's range.
    pub fn range(&self) -> ParamRange {
        self.range
    }

    /// Reset to the default value.
    pub fn reset(&self) {
        self.store_raw(self.range.default);
    }
}

impl Clone for AtomicParam {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU32::new(self.value.load(Ordering::Relaxed)),
            range: self.range,
        }
    }
}
