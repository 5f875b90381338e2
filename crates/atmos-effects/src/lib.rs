//! Atmos Effects - the stages of the environmental signal graph
//!
//! Each stage owns its state and works in place on planar stereo slices so
//! the engine can run them back to back over its scratch buffers without
//! copying or allocating.
//!
//! # Stages
//!
//! | Stage | Path | Purpose |
//! |-------|------|---------|
//! | [`DopplerShifter`] | dry | Pitch shift from relative source/listener motion |
//! | [`BrightnessFilter`] | dry | One-pole spectral tilt |
//! | [`FdnReverb`] | send | Pre-delay, diffusion, early reflections and an 8-line FDN |
//! | [`Lofi`] | wet | Bit reduction with noise |
//! | [`Spatializer`] | dry | External binaural stage ([`BinauralPanner`] by default) |
//! | [`Precedence`] | out | Delayed, panned echo |
//! | [`apply_width`] | out | Mid/side width |
//!
//! # Example
//!
//! ```rust
//! use atmos_effects::{FdnReverb, ReverbParams};
//!
//! let mut reverb = FdnReverb::new(48000.0);
//! reverb.update_params(&ReverbParams {
//!     room_size: 0.7,
//!     rt60: 2.5,
//!     ..ReverbParams::default()
//! });
//!
//! let input = [1.0, 0.0, 0.0, 0.0];
//! let mut left = [0.0; 4];
//! let mut right = [0.0; 4];
//! reverb.process_block(&input, &mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod brightness;
pub mod doppler;
pub mod early;
pub mod lofi;
pub mod precedence;
pub mod reverb;
pub mod spatial;
pub mod width;

pub use brightness::BrightnessFilter;
pub use doppler::{DopplerSettings, DopplerShifter, SPEED_OF_SOUND};
pub use early::EarlyReflections;
pub use lofi::Lofi;
pub use precedence::{Precedence, PrecedenceSettings};
pub use reverb::{FdnReverb, ReverbParams};
pub use spatial::{BinauralParams, BinauralPanner, Spatializer, azimuth_to_binaural};
pub use width::apply_width;
