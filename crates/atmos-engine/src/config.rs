//! Engine creation parameters.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The only sample rate the engine runs at.
pub const SUPPORTED_SAMPLE_RATE: u32 = 48_000;

/// Creation-time configuration of an [`Engine`](crate::Engine).
///
/// Derives `serde` so hosts can embed it in their own configuration files:
///
/// ```toml
/// sample_rate = 48000
/// max_buffer_size = 1024
/// max_reverb_time_sec = 6.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate in Hz; must equal [`SUPPORTED_SAMPLE_RATE`].
    pub sample_rate: u32,
    /// Largest block `process` accepts, in frames.
    pub max_buffer_size: usize,
    /// Ceiling on the effective reverb decay time, in seconds.
    pub max_reverb_time_sec: f32,
    /// Allocate the built-in binaural panner at creation. When false the
    /// spatial stage is bypassed until binaural cues are first applied.
    pub preload_spatial: bool,
    /// Validate and log the whole factory scenario table at creation.
    pub preload_all_scenarios: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SUPPORTED_SAMPLE_RATE,
            max_buffer_size: 4096,
            max_reverb_time_sec: 10.0,
            preload_spatial: true,
            preload_all_scenarios: false,
        }
    }
}

impl EngineConfig {
    /// Check the configuration without creating an engine.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate != SUPPORTED_SAMPLE_RATE {
            return Err(Error::UnsupportedSampleRate(self.sample_rate));
        }
        if self.max_buffer_size == 0 {
            return Err(Error::InvalidParameter("max_buffer_size must be positive"));
        }
        if !(self.max_reverb_time_sec.is_finite() && self.max_reverb_time_sec > 0.0) {
            return Err(Error::InvalidParameter(
                "max_reverb_time_sec must be positive and finite",
            ));
        }
        Ok(())
    }
}
