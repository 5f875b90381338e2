//! Scenario file format and operations.

use atmos_core::{ExtendedParams, MainParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A named acoustic environment.
///
/// Scenarios are stored as TOML files. Missing fields take the engine
/// defaults, so a file only needs the values it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "Boiler Room"
/// description = "Small, bright and metallic"
///
/// [main]
/// distance = 4.0
/// room_size = 0.3
/// brightness = 0.4
///
/// [extended]
/// decay_time = 1.8
/// diffusion = 0.2
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Name of the scenario.
    pub name: String,

    /// Optional description of the scenario.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Main-tier values.
    #[serde(default)]
    pub main: MainSection,

    /// Extended-tier values.
    #[serde(default)]
    pub extended: ExtendedSection,
}

/// `[main]` table of a scenario file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MainSection {
    /// Source distance in metres.
    pub distance: f32,
    /// Normalized room size.
    pub room_size: f32,
    /// Spectral tilt.
    pub brightness: f32,
    /// Stereo width.
    pub width: f32,
    /// Dry/wet balance.
    pub dry_wet: f32,
    /// Wet intensity.
    pub intensity: f32,
}

impl Default for MainSection {
    fn default() -> Self {
        MainParams::default().into()
    }
}

impl From<MainParams> for MainSection {
    fn from(p: MainParams) -> Self {
        Self {
            distance: p.distance,
            room_size: p.room_size,
            brightness: p.brightness,
            width: p.width,
            dry_wet: p.dry_wet,
            intensity: p.intensity,
        }
    }
}

impl From<MainSection> for MainParams {
    fn from(s: MainSection) -> Self {
        Self {
            distance: s.distance,
            room_size: s.room_size,
            brightness: s.brightness,
            width: s.width,
            dry_wet: s.dry_wet,
            intensity: s.intensity,
        }
    }
}

/// `[extended]` table of a scenario file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtendedSection {
    /// Reverb decay in seconds (0 = derive from room size).
    pub decay_time: f32,
    /// Diffuser density.
    pub diffusion: f32,
    /// Lofi amount.
    pub lofi_amount: f32,
    /// Modulation depth.
    pub modulation: f32,
}

impl Default for ExtendedSection {
    fn default() -> Self {
        ExtendedParams::default().into()
    }
}

impl From<ExtendedParams> for ExtendedSection {
    fn from(p: ExtendedParams) -> Self {
        Self {
            decay_time: p.decay_time,
            diffusion: p.diffusion,
            lofi_amount: p.lofi_amount,
            modulation: p.modulation,
        }
    }
}

impl From<ExtendedSection> for ExtendedParams {
    fn from(s: ExtendedSection) -> Self {
        Self {
            decay_time: s.decay_time,
            diffusion: s.diffusion,
            lofi_amount: s.lofi_amount,
            modulation: s.modulation,
        }
    }
}

impl Scenario {
    /// Create a scenario holding the engine defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            main: MainSection::default(),
            extended: ExtendedSection::default(),
        }
    }

    /// Create a scenario from explicit parameter sets.
    pub fn from_params(name: impl Into<String>, main: MainParams, extended: ExtendedParams) -> Self {
        Self {
            name: name.into(),
            description: None,
            main: main.into(),
            extended: extended.into(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load and validate a scenario from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let scenario = Self::from_toml(&content)?;
        tracing::debug!(name = %scenario.name, path = %path.display(), "scenario loaded");
        Ok(scenario)
    }

    /// Parse and validate a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let scenario: Scenario = toml::from_str(toml_str)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Convert the scenario to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject main values that are NaN or out of range.
    ///
    /// Extended values are clamped when applied and are not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.main_params().validate()?;
        Ok(())
    }

    /// Main-tier values as engine parameters.
    pub fn main_params(&self) -> MainParams {
        self.main.into()
    }

    /// Extended-tier values as engine parameters.
    pub fn extended_params(&self) -> ExtendedParams {
        self.extended.into()
    }
}
