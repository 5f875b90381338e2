//! Early-reflection tapped delay.
//!
//! Twelve taps into one shared buffer model the first discrete reflections
//! of a room. Tap times grow with room size, gains fall geometrically with
//! tap index and pans sweep evenly from left to right, so later (weaker)
//! reflections arrive from the other side of the field.

use atmos_core::TapDelay;
use libm::powf;

/// Number of reflection taps.
pub const TAP_COUNT: usize = 12;

/// Tap times in milliseconds at room size 0.5 / scale 1.0.
const BASE_TAPS_MS: [f32; TAP_COUNT] = [
    7.0, 11.0, 17.0, 23.0, 29.0, 37.0, 45.0, 53.0, 61.0, 73.0, 89.0, 101.0,
];

/// Gain ratio between consecutive taps.
const TAP_DECAY: f32 = 0.75;
/// Gain of the first tap.
const FIRST_TAP_GAIN: f32 = 0.6;
/// Outermost pan position.
const PAN_SPREAD: f32 = 0.8;

#[derive(Debug, Clone, Copy, Default)]
struct Tap {
    delay: usize,
    gain_l: f32,
    gain_r: f32,
}

/// Stereo early-reflection network.
#[derive(Debug, Clone)]
pub struct EarlyReflections {
    buffer: TapDelay,
    taps: [Tap; TAP_COUNT],
    sample_rate: f32,
}

impl EarlyReflections {
    /// Create a network with 200 ms of buffer, tuned for room size 0.5.
    pub fn new(sample_rate: f32) -> Self {
        let mut early = Self {
            buffer: TapDelay::from_time(sample_rate, 0.2),
            taps: [Tap::default(); TAP_COUNT],
            sample_rate,
        };
        early.set_room_size(0.5);
        early
    }

    /// Rescale tap times for a room size in [0, 1] (factor `0.6 + 0.8·room`).
    pub fn set_room_size(&mut self, room_size: f32) {
        let scale = 0.6 + 0.8 * room_size;
        let max_delay = self.buffer.max_delay();
        for (i, tap) in self.taps.iter_mut().enumerate() {
            let ms = BASE_TAPS_MS[i] * scale;
            let delay = (ms * 0.001 * self.sample_rate) as usize;
            let gain = FIRST_TAP_GAIN * powf(TAP_DECAY, i as f32);
            let pan = -PAN_SPREAD + 2.0 * PAN_SPREAD * i as f32 / (TAP_COUNT - 1) as f32;
            *tap = Tap {
                delay: delay.min(max_delay),
                gain_l: gain * 0.5 * (1.0 - pan),
                gain_r: gain * 0.5 * (1.0 + pan),
            };
        }
    }

    /// Push one sample and return the summed `(left, right)` reflections.
    #[inline]
    pub fn process(&mut self, input: f32) -> (f32, f32) {
        let mut left = 0.0;
        let mut right = 0.0;
        for tap in &self.taps {
            let x = self.buffer.read(tap.delay);
            left += x * tap.gain_l;
            right += x * tap.gain_r;
        }
        self.buffer.write(input);
        (left, right)
    }

    /// Tap delays in samples.
    pub fn tap_delays(&self) -> [usize; TAP_COUNT] {
        core::array::from_fn(|i| self.taps[i].delay)
    }

    /// Silence the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
