//! Weighted blending of factory scenarios.

use atmos_core::{ExtendedParams, MainParams};

use crate::{ConfigError, find_scenario};

/// One scenario and its weight in a blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioBlend<'a> {
    /// Factory scenario name.
    pub name: &'a str,
    /// Non-negative weight; entries with weight 0 are skipped.
    pub weight: f32,
}

impl<'a> ScenarioBlend<'a> {
    /// Create a blend entry.
    pub fn new(name: &'a str, weight: f32) -> Self {
        Self { name, weight }
    }
}

/// Weighted average of factory scenarios.
///
/// Every entry is checked before anything is computed: a negative or
/// non-finite weight fails with [`ConfigError::InvalidWeight`], an unknown name with
/// [`ConfigError::ScenarioNotFound`]. Weights are normalized by the sum of
/// the positive weights; an empty list or one without a positive weight
/// fails with [`ConfigError::EmptyBlend`]. The result is clamped into the
/// parameter ranges so rounding can never push it outside.
pub fn blend(blends: &[ScenarioBlend<'_>]) -> Result<(MainParams, ExtendedParams), ConfigError> {
    let mut weight_sum = 0.0f32;
    for b in blends {
        if !b.weight.is_finite() || b.weight < 0.0 {
            return Err(ConfigError::invalid_weight(b.name, b.weight));
        }
        if find_scenario(b.name).is_none() {
            return Err(ConfigError::ScenarioNotFound(b.name.to_string()));
        }
        if b.weight > 0.0 {
            weight_sum += b.weight;
        }
    }
    if weight_sum <= 0.0 || !weight_sum.is_finite() {
        return Err(ConfigError::EmptyBlend);
    }

    let mut main = MainParams {
        distance: 0.0,
        room_size: 0.0,
        brightness: 0.0,
        width: 0.0,
        dry_wet: 0.0,
        intensity: 0.0,
    };
    let mut extended = ExtendedParams {
        decay_time: 0.0,
        diffusion: 0.0,
        lofi_amount: 0.0,
        modulation: 0.0,
    };

    for b in blends.iter().filter(|b| b.weight > 0.0) {
        let Some(s) = find_scenario(b.name) else {
            continue;
        };
        let w = b.weight / weight_sum;
        main.distance += s.main.distance * w;
        main.room_size += s.main.room_size * w;
        main.brightness += s.main.brightness * w;
        main.width += s.main.width * w;
        main.dry_wet += s.main.dry_wet * w;
        main.intensity += s.main.intensity * w;

        extended.decay_time += s.extended.decay_time * w;
        extended.diffusion += s.extended.diffusion * w;
        extended.lofi_amount += s.extended.lofi_amount * w;
        extended.modulation += s.extended.modulation * w;
    }

    Ok((main.clamped(), extended.clamped()))
}
