//! Real-time environmental audio engine.
//!
//! An [`Engine`] owns one mono-to-stereo effect graph: distance attenuation,
//! brightness, an FDN reverb, lofi, a spatial stage, an ADSR envelope, a
//! precedence echo and stereo width. Perceptual controls live in a
//! lock-free [`ParameterPlane`] that any thread may update while the audio
//! thread calls [`Engine::process`].
//!
//! # Example
//!
//! ```rust
//! use atmos_engine::{AudioBuffer, AudioBufferMut, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let params = engine.params();
//!
//! // From a control thread
//! std::thread::spawn(move || {
//!     params.apply_scenario("cathedral", 0.8).unwrap();
//!     params.set_distance(4.0);
//! })
//! .join()
//! .unwrap();
//!
//! // From the audio thread
//! let input = [0.0f32; 256];
//! let mut output = [0.0f32; 512];
//! engine
//!     .process(
//!         Some(AudioBuffer::mono(&input)),
//!         &mut AudioBufferMut::interleaved(&mut output, 2),
//!     )
//!     .unwrap();
//! ```
//!
//! # Threading
//!
//! `process` never allocates, locks or logs. Parameter writes are relaxed
//! atomic stores: each value is seen whole by the next block, but several
//! values set together may land in different blocks.

mod buffer;
mod config;
mod control;
mod engine;
mod error;
mod params;
mod version;

pub use buffer::{AudioBuffer, AudioBufferMut, ChannelLayout};
pub use config::{EngineConfig, SUPPORTED_SAMPLE_RATE};
pub use control::Biosignal;
pub use engine::{Engine, UNMEASURED_LUFS};
pub use error::{Error, Result, Status};
pub use params::{ParamId, ParamSnapshot, ParameterPlane};
pub use version::{
    VERSION, VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH, check_abi_compatibility, version_string,
};

pub use atmos_config::{ExtendedParams, MainParams, Scenario, ScenarioBlend};
pub use atmos_core::{AdsrSettings, EnvelopeState};
pub use atmos_effects::{
    BinauralParams, DopplerSettings, PrecedenceSettings, Spatializer, azimuth_to_binaural,
};
