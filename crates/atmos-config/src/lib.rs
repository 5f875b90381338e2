//! Scenario configuration for the atmos engine.
//!
//! A scenario is a named main + extended parameter set describing an
//! acoustic environment ("cave", "cathedral", "telephone", ...). This crate
//! holds the factory scenario table, TOML scenario files and weighted
//! blending of several scenarios into one parameter set.
//!
//! # Example
//!
//! ```rust
//! use atmos_config::{ScenarioBlend, blend, scenario_defaults};
//!
//! let (main, _extended) = scenario_defaults("cave").unwrap();
//! assert_eq!(main.room_size, 0.7);
//!
//! let (mixed, _) = blend(&[
//!     ScenarioBlend::new("cave", 1.0),
//!     ScenarioBlend::new("forest", 1.0),
//! ])
//! .unwrap();
//! assert!((mixed.room_size - 0.5).abs() < 1e-6);
//! ```

mod blend;
mod error;
mod scenario;

/// Factory scenarios bundled with the library.
pub mod factory_scenarios;

pub use blend::{ScenarioBlend, blend};
pub use error::ConfigError;
pub use factory_scenarios::{
    FACTORY_SCENARIO_NAMES, FactoryScenario, factory_scenarios, find_scenario, scenario_defaults,
};
pub use scenario::{ExtendedSection, MainSection, Scenario};

/// Re-export of the parameter tiers scenarios resolve to.
pub use atmos_core::{ExtendedParams, MainParams, ParamError};
