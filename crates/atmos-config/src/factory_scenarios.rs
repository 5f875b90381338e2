//! Factory scenarios bundled with the atmos library.
//!
//! The table is compiled in and always available. Names are matched
//! exactly (lowercase snake_case).

use atmos_core::{ExtendedParams, MainParams};

use crate::{ConfigError, Scenario};

/// One entry of the built-in scenario table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactoryScenario {
    /// Lookup name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Main-tier values.
    pub main: MainParams,
    /// Extended-tier values.
    pub extended: ExtendedParams,
}

impl FactoryScenario {
    /// Owned, serializable copy of this entry.
    pub fn to_scenario(&self) -> Scenario {
        Scenario::from_params(self.name, self.main, self.extended)
            .with_description(self.description)
    }
}

const fn entry(
    name: &'static str,
    description: &'static str,
    main: [f32; 6],
    extended: [f32; 4],
) -> FactoryScenario {
    FactoryScenario {
        name,
        description,
        main: MainParams {
            distance: main[0],
            room_size: main[1],
            brightness: main[2],
            width: main[3],
            dry_wet: main[4],
            intensity: main[5],
        },
        extended: ExtendedParams {
            decay_time: extended[0],
            diffusion: extended[1],
            lofi_amount: extended[2],
            modulation: extended[3],
        },
    }
}

// main: distance, room_size, brightness, width, dry_wet, intensity
// extended: decay_time, diffusion, lofi_amount, modulation
static FACTORY_SCENARIOS: &[FactoryScenario] = &[
    entry(
        "deep_sea",
        "Dark, wide and slowly drifting underwater space",
        [50.0, 0.85, -0.5, 1.6, 0.7, 1.0],
        [8.0, 0.8, 0.1, 0.2],
    ),
    entry(
        "cave",
        "Large rock cavity with long, dense reflections",
        [20.0, 0.7, 0.0, 1.5, 0.65, 1.0],
        [6.0, 0.7, 0.0, 0.1],
    ),
    entry(
        "forest",
        "Open woodland with short, sparse scattering",
        [15.0, 0.3, -0.2, 1.2, 0.4, 1.0],
        [1.5, 0.5, 0.0, 0.0],
    ),
    entry(
        "cathedral",
        "Vast stone nave with a ten second tail",
        [30.0, 0.9, -0.1, 1.6, 0.75, 1.0],
        [10.0, 0.9, 0.0, 0.2],
    ),
    entry(
        "tension",
        "Close, bright and unsettled",
        [5.0, 0.35, 0.4, 0.6, 0.5, 1.0],
        [1.2, 0.4, 0.1, 0.4],
    ),
    entry(
        "nostalgia",
        "Warm, worn room with a hint of tape",
        [8.0, 0.45, -0.3, 1.0, 0.55, 1.0],
        [2.2, 0.5, 0.5, 0.2],
    ),
    entry(
        "intimate",
        "Source at arm's length in a small space",
        [1.0, 0.15, 0.1, 0.4, 0.25, 1.0],
        [0.6, 0.3, 0.0, 0.0],
    ),
    entry(
        "open_field",
        "Distant source with almost no reflections",
        [100.0, 0.0, -0.2, 1.0, 0.1, 1.0],
        [0.2, 0.1, 0.0, 0.0],
    ),
    entry(
        "space",
        "Very distant, dark and nearly dry",
        [200.0, 0.0, -0.8, 1.2, 0.2, 1.0],
        [0.2, 0.2, 0.0, 0.0],
    ),
    entry(
        "office",
        "Treated workspace with a short decay",
        [10.0, 0.2, -0.1, 0.9, 0.3, 1.0],
        [0.8, 0.3, 0.0, 0.0],
    ),
    entry(
        "tunnel",
        "Long concrete passage",
        [12.0, 0.4, 0.1, 1.1, 0.45, 1.0],
        [2.5, 0.6, 0.0, 0.2],
    ),
    entry(
        "small_room",
        "Furnished domestic room",
        [4.0, 0.2, 0.0, 0.8, 0.4, 1.0],
        [0.7, 0.4, 0.0, 0.0],
    ),
    entry(
        "radio",
        "Narrow, dull broadcast through a small speaker",
        [8.0, 0.2, -0.4, 0.7, 0.6, 1.0],
        [1.0, 0.2, 0.7, 0.0],
    ),
    entry(
        "telephone",
        "Band-limited, degraded voice line",
        [12.0, 0.2, -0.3, 0.7, 0.6, 1.0],
        [1.0, 0.2, 0.6, 0.0],
    ),
    entry(
        "dream",
        "Soft, wide and slowly wavering",
        [20.0, 0.7, -0.1, 1.4, 0.7, 1.0],
        [6.0, 0.7, 0.2, 0.5],
    ),
    entry(
        "chaos",
        "Crushed, heavily modulated wash",
        [10.0, 0.5, 0.2, 1.4, 0.8, 1.0],
        [3.0, 0.3, 0.9, 0.8],
    ),
    entry(
        "ethereal",
        "Bright, enveloping shimmer",
        [25.0, 0.8, 0.1, 1.8, 0.75, 1.0],
        [7.0, 0.9, 0.1, 0.6],
    ),
];

/// Factory scenario names in table order.
pub static FACTORY_SCENARIO_NAMES: &[&str] = &[
    "deep_sea",
    "cave",
    "forest",
    "cathedral",
    "tension",
    "nostalgia",
    "intimate",
    "open_field",
    "space",
    "office",
    "tunnel",
    "small_room",
    "radio",
    "telephone",
    "dream",
    "chaos",
    "ethereal",
];

/// Look up a factory scenario by exact name.
pub fn find_scenario(name: &str) -> Option<&'static FactoryScenario> {
    FACTORY_SCENARIOS.iter().find(|s| s.name == name)
}

/// Main and extended values of a factory scenario.
pub fn scenario_defaults(name: &str) -> Result<(MainParams, ExtendedParams), ConfigError> {
    find_scenario(name)
        .map(|s| (s.main, s.extended))
        .ok_or_else(|| ConfigError::ScenarioNotFound(name.to_string()))
}

/// All factory scenarios as owned [`Scenario`] values.
pub fn factory_scenarios() -> Vec<Scenario> {
    FACTORY_SCENARIOS.iter().map(FactoryScenario::to_scenario).collect()
}
