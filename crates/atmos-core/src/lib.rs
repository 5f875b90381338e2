//! Atmos Core - DSP primitives for environmental audio rendering
//!
//! This crate provides the building blocks the atmos engine is assembled from,
//! designed for real-time processing with zero allocation in the audio path.
//! Every buffer is sized once at construction; nothing here reallocates.
//!
//! # Core Abstractions
//!
//! ## Parameters
//!
//! - [`AtomicParam`] - Lock-free `f32` cell (relaxed atomics, clamping setter)
//! - [`ParamRange`] - Documented range and default of a control
//! - [`MainParams`] / [`ExtendedParams`] - The two parameter tiers with validation
//!
//! ## Reverb Building Blocks
//!
//! - [`AllpassFilter`] - Schroeder allpass diffuser with a retunable length
//! - [`DampedDelayLine`] - Recirculating FDN line with one-pole damping
//! - [`hadamard_8`] - Normalized 8-point Hadamard mixing
//! - [`rt60_feedback`] - Feedback gain for a target decay time
//!
//! ## Filters, Delays and Envelopes
//!
//! - [`OnePole`] - RC one-pole lowpass/highpass
//! - [`TapDelay`] - Integer-tap circular delay buffer
//! - [`Adsr`] - Linear ADSR amplitude envelope
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`flush_denormal`]
//! - [`Lcg`] - Allocation-free noise source
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use the crate on embedded targets:
//!
//! ```toml
//! [dependencies]
//! atmos-core = { version = "0.2", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod delay;
pub mod envelope;
pub mod fdn_line;
pub mod hadamard;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod params;
pub mod rng;

pub use allpass::AllpassFilter;
pub use delay::TapDelay;
pub use envelope::{Adsr, AdsrSettings, EnvelopeState};
pub use fdn_line::{DampedDelayLine, rt60_feedback};
pub use hadamard::hadamard_8;
pub use math::{db_to_linear, flush_denormal, linear_to_db, sanitize};
pub use one_pole::OnePole;
pub use param::{AtomicParam, ParamRange};
pub use params::{ExtendedParams, MainParams, ParamError, ranges};
pub use rng::Lcg;
