//! Borrowed audio block views.
//!
//! The engine never owns host audio: a block is a sample slice plus its
//! shape. Stereo blocks are either interleaved (`L R L R ...`) or planar
//! (all left samples, then all right samples).

/// Sample arrangement of a multi-channel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    /// Frames stored one after another, channels alternating.
    #[default]
    Interleaved,
    /// Each channel stored contiguously.
    Planar,
}

/// Read-only audio block.
#[derive(Debug, Clone, Copy)]
pub struct AudioBuffer<'a> {
    /// Sample storage; at least `frames · channels` long.
    pub samples: &'a [f32],
    /// Frames in the block.
    pub frames: usize,
    /// Channel count.
    pub channels: usize,
    /// Sample arrangement.
    pub layout: ChannelLayout,
}

impl<'a> AudioBuffer<'a> {
    /// Mono block covering the whole slice.
    pub fn mono(samples: &'a [f32]) -> Self {
        Self {
            samples,
            frames: samples.len(),
            channels: 1,
            layout: ChannelLayout::Interleaved,
        }
    }

    /// Interleaved block; trailing samples that do not fill a frame are ignored.
    pub fn interleaved(samples: &'a [f32], channels: usize) -> Self {
        Self {
            samples,
            frames: samples.len().checked_div(channels).unwrap_or(0),
            channels,
            layout: ChannelLayout::Interleaved,
        }
    }

    /// Planar block of `frames` frames per channel.
    pub fn planar(samples: &'a [f32], frames: usize, channels: usize) -> Self {
        Self {
            samples,
            frames,
            channels,
            layout: ChannelLayout::Planar,
        }
    }

    /// Whether the slice holds every sample the shape describes.
    pub fn is_complete(&self) -> bool {
        self.frames
            .checked_mul(self.channels)
            .is_some_and(|n| self.samples.len() >= n)
    }

    /// Mono view of frame `i` (`0.5·(L + R)` for stereo). `i` must be in range.
    #[inline]
    pub(crate) fn mono_frame(&self, i: usize) -> f32 {
        match (self.channels, self.layout) {
            (1, _) => self.samples[i],
            (_, ChannelLayout::Interleaved) => {
                0.5 * (self.samples[i * self.channels] + self.samples[i * self.channels + 1])
            }
            (_, ChannelLayout::Planar) => {
                0.5 * (self.samples[i] + self.samples[i + self.frames])
            }
        }
    }
}

/// Writable audio block.
#[derive(Debug)]
pub struct AudioBufferMut<'a> {
    /// Sample storage; at least `frames · channels` long.
    pub samples: &'a mut [f32],
    /// Frames in the block.
    pub frames: usize,
    /// Channel count.
    pub channels: usize,
    /// Sample arrangement.
    pub layout: ChannelLayout,
}

impl<'a> AudioBufferMut<'a> {
    /// Mono block covering the whole slice.
    pub fn mono(samples: &'a mut [f32]) -> Self {
        let frames = samples.len();
        Self {
            samples,
            frames,
            channels: 1,
            layout: ChannelLayout::Interleaved,
        }
    }

    /// Interleaved block; trailing samples that do not fill a frame are ignored.
    pub fn interleaved(samples: &'a mut [f32], channels: usize) -> Self {
        let frames = samples.len().checked_div(channels).unwrap_or(0);
        Self {
            samples,
            frames,
            channels,
            layout: ChannelLayout::Interleaved,
        }
    }

    /// Planar block of `frames` frames per channel.
    pub fn planar(samples: &'a mut [f32], frames: usize, channels: usize) -> Self {
        Self {
            samples,
            frames,
            channels,
            layout: ChannelLayout::Planar,
        }
    }

    /// Whether the slice holds every sample the shape describes.
    pub fn is_complete(&self) -> bool {
        self.frames
            .checked_mul(self.channels)
            .is_some_and(|n| self.samples.len() >= n)
    }

    /// Read-only view of the same block.
    pub fn as_buffer(&self) -> AudioBuffer<'_> {
        AudioBuffer {
            samples: self.samples,
            frames: self.frames,
            channels: self.channels,
            layout: self.layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let data = [0.0f32; 9];
        let b = AudioBuffer::interleaved(&data, 2);
        assert_eq!(b.frames, 4);
        assert!(b.is_complete());

        let b = AudioBuffer::interleaved(&data, 0);
        assert_eq!(b.frames, 0);

        let b = AudioBuffer::planar(&data, 5, 2);
        assert!(!b.is_complete());

        assert_eq!(AudioBuffer::mono(&data).frames, 9);
    }

    #[test]
    fn test_mono_frame_layouts() {
        let interleaved = [1.0, 0.0, 0.5, 0.5];
        let b = AudioBuffer::interleaved(&interleaved, 2);
        assert_eq!(b.mono_frame(0), 0.5);
        assert_eq!(b.mono_frame(1), 0.5);

        let planar = [1.0, 0.5, 0.0, 0.5];
        let b = AudioBuffer::planar(&planar, 2, 2);
        assert_eq!(b.mono_frame(0), 0.5);
        assert_eq!(b.mono_frame(1), 0.5);
    }

    #[test]
    fn test_overflowing_shape_is_incomplete() {
        let data = [0.0f32; 4];
        let b = AudioBuffer::planar(&data, usize::MAX, 2);
        assert!(!b.is_complete());
    }
}
