//! Lock-free parameter plane.
//!
//! Ten independent [`AtomicParam`] cells, one per control. Any number of
//! control threads write through `&self` setters while the audio thread
//! takes one [`ParamSnapshot`] per block. Single values never tear; groups
//! of values are not updated atomically, so a bulk set may be adopted
//! across two consecutive blocks.

use atmos_config::{Scenario, ScenarioBlend, blend, scenario_defaults};
use atmos_core::{AtomicParam, ExtendedParams, MainParams, ParamRange, ranges};

use crate::Result;

/// Identifier of a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Source distance in metres.
    Distance,
    /// Normalized room size.
    RoomSize,
    /// Spectral tilt.
    Brightness,
    /// Stereo width.
    Width,
    /// Dry/wet balance.
    DryWet,
    /// Wet intensity.
    Intensity,
    /// Reverb decay in seconds.
    DecayTime,
    /// Diffuser density.
    Diffusion,
    /// Lofi amount.
    LofiAmount,
    /// Reverb input modulation depth.
    Modulation,
}

impl ParamId {
    /// Every control, main tier first.
    pub const ALL: [ParamId; 10] = [
        ParamId::Distance,
        ParamId::RoomSize,
        ParamId::Brightness,
        ParamId::Width,
        ParamId::DryWet,
        ParamId::Intensity,
        ParamId::DecayTime,
        ParamId::Diffusion,
        ParamId::LofiAmount,
        ParamId::Modulation,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            ParamId::Distance => "distance",
            ParamId::RoomSize => "room_size",
            ParamId::Brightness => "brightness",
            ParamId::Width => "width",
            ParamId::DryWet => "dry_wet",
            ParamId::Intensity => "intensity",
            ParamId::DecayTime => "decay_time",
            ParamId::Diffusion => "diffusion",
            ParamId::LofiAmount => "lofi_amount",
            ParamId::Modulation => "modulation",
        }
    }

    /// Look up a control by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Documented range and default.
    pub fn range(self) -> ParamRange {
        match self {
            ParamId::Distance => ranges::DISTANCE,
            ParamId::RoomSize => ranges::ROOM_SIZE,
            ParamId::Brightness => ranges::BRIGHTNESS,
            ParamId::Width => ranges::WIDTH,
            ParamId::DryWet => ranges::DRY_WET,
            ParamId::Intensity => ranges::INTENSITY,
            ParamId::DecayTime => ranges::DECAY_TIME,
            ParamId::Diffusion => ranges::DIFFUSION,
            ParamId::LofiAmount => ranges::LOFI_AMOUNT,
            ParamId::Modulation => ranges::MODULATION,
        }
    }

    /// Whether the control belongs to the validated main tier.
    pub fn is_main(self) -> bool {
        (self as usize) < 6
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Every control read once, re-clamped into range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamSnapshot {
    /// Main tier.
    pub main: MainParams,
    /// Extended tier.
    pub extended: ExtendedParams,
}

/// Shared store of all engine controls.
///
/// Obtain it from [`Engine::params`](crate::Engine::params) and move the
/// `Arc` to any thread.
///
/// ```rust
/// use atmos_engine::{ParamId, ParameterPlane};
///
/// let plane = ParameterPlane::new();
/// plane.set_room_size(1.5);
/// assert_eq!(plane.get(ParamId::RoomSize), 1.0);
///
/// plane.load_scenario("cave").unwrap();
/// assert_eq!(plane.main_params().distance, 20.0);
/// ```
#[derive(Debug)]
pub struct ParameterPlane {
    cells: [AtomicParam; 10],
}

impl Default for ParameterPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterPlane {
    /// Create a plane holding every default.
    pub fn new() -> Self {
        Self {
            cells: ParamId::ALL.map(|id| AtomicParam::new(id.range())),
        }
    }

    fn cell(&self, id: ParamId) -> &AtomicParam {
        &self.cells[id.index()]
    }

    /// Store `value` clamped into range. NaN is ignored.
    pub fn set(&self, id: ParamId, value: f32) {
        self.cell(id).set(value);
    }

    /// Current value of one control.
    pub fn get(&self, id: ParamId) -> f32 {
        self.cell(id).get()
    }

    /// Set the source distance (clamped to [0.1, 1000] m).
    pub fn set_distance(&self, value: f32) {
        self.set(ParamId::Distance, value);
    }

    /// Set the room size (clamped to [0, 1]).
    pub fn set_room_size(&self, value: f32) {
        self.set(ParamId::RoomSize, value);
    }

    /// Set the brightness (clamped to [-1, 1]).
    pub fn set_brightness(&self, value: f32) {
        self.set(ParamId::Brightness, value);
    }

    /// Set the stereo width (clamped to [0, 2]).
    pub fn set_width(&self, value: f32) {
        self.set(ParamId::Width, value);
    }

    /// Set the dry/wet balance (clamped to [0, 1]).
    pub fn set_dry_wet(&self, value: f32) {
        self.set(ParamId::DryWet, value);
    }

    /// Set the wet intensity (clamped to [0, 1]).
    pub fn set_intensity(&self, value: f32) {
        self.set(ParamId::Intensity, value);
    }

    /// Set the decay time (clamped to [0, 30] s; 0 derives it from room size).
    pub fn set_decay_time(&self, value: f32) {
        self.set(ParamId::DecayTime, value);
    }

    /// Set the diffusion (clamped to [0, 1]).
    pub fn set_diffusion(&self, value: f32) {
        self.set(ParamId::Diffusion, value);
    }

    /// Set the lofi amount (clamped to [0, 1]).
    pub fn set_lofi_amount(&self, value: f32) {
        self.set(ParamId::LofiAmount, value);
    }

    /// Set the modulation depth (clamped to [0, 1]).
    pub fn set_modulation(&self, value: f32) {
        self.set(ParamId::Modulation, value);
    }

    /// Current main-tier values.
    pub fn main_params(&self) -> MainParams {
        MainParams {
            distance: self.get(ParamId::Distance),
            room_size: self.get(ParamId::RoomSize),
            brightness: self.get(ParamId::Brightness),
            width: self.get(ParamId::Width),
            dry_wet: self.get(ParamId::DryWet),
            intensity: self.get(ParamId::Intensity),
        }
    }

    /// Current extended-tier values.
    pub fn extended_params(&self) -> ExtendedParams {
        ExtendedParams {
            decay_time: self.get(ParamId::DecayTime),
            diffusion: self.get(ParamId::Diffusion),
            lofi_amount: self.get(ParamId::LofiAmount),
            modulation: self.get(ParamId::Modulation),
        }
    }

    /// Validate and store all main-tier values.
    ///
    /// The whole struct is rejected, and nothing stored, if any field is NaN
    /// or out of range.
    pub fn set_main_params(&self, params: &MainParams) -> Result<()> {
        if let Err(e) = params.validate() {
            tracing::warn!(error = %e, "main parameters rejected");
            return Err(e.into());
        }
        self.set(ParamId::Distance, params.distance);
        self.set(ParamId::RoomSize, params.room_size);
        self.set(ParamId::Brightness, params.brightness);
        self.set(ParamId::Width, params.width);
        self.set(ParamId::DryWet, params.dry_wet);
        self.set(ParamId::Intensity, params.intensity);
        Ok(())
    }

    /// Store all extended-tier values, clamping each field.
    pub fn set_extended_params(&self, params: &ExtendedParams) {
        self.set(ParamId::DecayTime, params.decay_time);
        self.set(ParamId::Diffusion, params.diffusion);
        self.set(ParamId::LofiAmount, params.lofi_amount);
        self.set(ParamId::Modulation, params.modulation);
    }

    /// Read every control once and clamp it into range (NaN becomes the default).
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            main: self.main_params().clamped(),
            extended: self.extended_params().clamped(),
        }
    }

    /// Restore every default.
    pub fn reset_to_defaults(&self) {
        for cell in &self.cells {
            cell.reset();
        }
    }

    /// Store every value of a factory scenario verbatim.
    pub fn load_scenario(&self, name: &str) -> Result<()> {
        let (main, extended) = scenario_defaults(name)?;
        self.store_raw(&main, &extended);
        tracing::debug!(scenario = name, "scenario loaded");
        Ok(())
    }

    /// Apply a factory scenario with its intensity replaced by `intensity`.
    ///
    /// Main values go through [`set_main_params`](Self::set_main_params),
    /// then extended values through [`set_extended_params`](Self::set_extended_params).
    pub fn apply_scenario(&self, name: &str, intensity: f32) -> Result<()> {
        let (mut main, extended) = scenario_defaults(name)?;
        main.intensity = ranges::INTENSITY.clamp(intensity);
        self.set_main_params(&main)?;
        self.set_extended_params(&extended);
        tracing::debug!(scenario = name, intensity = main.intensity, "scenario applied");
        Ok(())
    }

    /// Apply a scenario loaded from a file.
    pub fn apply_scenario_def(&self, scenario: &Scenario) -> Result<()> {
        self.set_main_params(&scenario.main_params())?;
        self.set_extended_params(&scenario.extended_params());
        tracing::debug!(scenario = %scenario.name, "scenario applied");
        Ok(())
    }

    /// Apply the weighted average of several factory scenarios.
    ///
    /// Nothing is stored if any entry is rejected.
    pub fn blend_scenarios(&self, blends: &[ScenarioBlend<'_>]) -> Result<()> {
        let (main, extended) = blend(blends)?;
        self.set_main_params(&main)?;
        self.set_extended_params(&extended);
        tracing::debug!(entries = blends.len(), "scenarios blended");
        Ok(())
    }

    fn store_raw(&self, main: &MainParams, extended: &ExtendedParams) {
        self.cell(ParamId::Distance).store_raw(main.distance);
        self.cell(ParamId::RoomSize).store_raw(main.room_size);
        self.cell(ParamId::Brightness).store_raw(main.brightness);
        self.cell(ParamId::Width).store_raw(main.width);
        self.cell(ParamId::DryWet).store_raw(main.dry_wet);
        self.cell(ParamId::Intensity).store_raw(main.intensity);
        self.cell(ParamId::DecayTime).store_raw(extended.decay_time);
        self.cell(ParamId::Diffusion).store_raw(extended.diffusion);
        self.cell(ParamId::LofiAmount).store_raw(extended.lofi_amount);
        self.cell(ParamId::Modulation).store_raw(extended.modulation);
    }
}
