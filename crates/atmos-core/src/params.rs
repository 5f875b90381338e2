//! The two parameter tiers and their validation.
//!
//! Main parameters (distance, room size, brightness, width, dry/wet,
//! intensity) are validated as a whole struct: a bulk set is rejected if any
//! field is NaN or out of range. Extended parameters (decay time, diffusion,
//! lofi, modulation) are clamped field by field.

use crate::ParamRange;

/// Documented ranges and defaults of every control.
pub mod ranges {
    use crate::ParamRange;

    /// Source distance in metres.
    pub const DISTANCE: ParamRange = ParamRange::new(0.1, 1000.0, 10.0);
    /// Normalized room size.
    pub const ROOM_SIZE: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
    /// Spectral tilt: negative darkens, positive brightens.
    pub const BRIGHTNESS: ParamRange = ParamRange::new(-1.0, 1.0, 0.0);
    /// Stereo width: 0 mono, 1 unchanged, 2 doubled side.
    pub const WIDTH: ParamRange = ParamRange::new(0.0, 2.0, 1.0);
    /// Dry/wet balance.
    pub const DRY_WET: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
    /// Wet intensity.
    pub const INTENSITY: ParamRange = ParamRange::new(0.0, 1.0, 1.0);
    /// Reverb decay in seconds; 0 derives RT60 from room size.
    pub const DECAY_TIME: ParamRange = ParamRange::new(0.0, 30.0, 0.0);
    /// Diffuser density.
    pub const DIFFUSION: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
    /// Bit reduction and noise amount on the wet path.
    pub const LOFI_AMOUNT: ParamRange = ParamRange::new(0.0, 1.0, 0.0);
    /// Depth of the reverb input modulation.
    pub const MODULATION: ParamRange = ParamRange::new(0.0, 1.0, 0.0);
}

/// A main-tier parameter that failed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    /// The field was NaN.
    NotANumber(&'static str),
    /// The field was outside its documented range.
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: f32,
        /// Accepted range.
        range: ParamRange,
    },
}

impl ParamError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotANumber(field) | Self::OutOfRange { field, .. } => field,
        }
    }
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotANumber(field) => write!(f, "{field} is NaN"),
            Self::OutOfRange {
                field,
                value,
                range,
            } => write!(
                f,
                "{field} = {value} is outside [{}, {}]",
                range.min, range.max
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

fn check(field: &'static str, value: f32, range: ParamRange) -> Result<(), ParamError> {
    if value.is_nan() {
        Err(ParamError::NotANumber(field))
    } else if !range.contains(value) {
        Err(ParamError::OutOfRange {
            field,
            value,
            range,
        })
    } else {
        Ok(())
    }
}

/// Main perceptual parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MainParams {
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

impl Default for MainParams {
    fn default() -> Self {
        Self {
            distance: ranges::DISTANCE.default,
            room_size: ranges::ROOM_SIZE.default,
            brightness: ranges::BRIGHTNESS.default,
            width: ranges::WIDTH.default,
            dry_wet: ranges::DRY_WET.default,
            intensity: ranges::INTENSITY.default,
        }
    }
}

impl MainParams {
    /// Reject the struct if any field is NaN or out of range.
    ///
    /// The first offending field in declaration order is reported.
    pub fn validate(&self) -> Result<(), ParamError> {
        check("distance", self.distance, ranges::DISTANCE)?;
        check("room_size", self.room_size, ranges::ROOM_SIZE)?;
        check("brightness", self.brightness, ranges::BRIGHTNESS)?;
        check("width", self.width, ranges::WIDTH)?;
        check("dry_wet", self.dry_wet, ranges::DRY_WET)?;
        check("intensity", self.intensity, ranges::INTENSITY)
    }

    /// Copy with every field clamped into range (NaN becomes the default).
    pub fn clamped(&self) -> Self {
        Self {
            distance: ranges::DISTANCE.clamp(self.distance),
            room_size: ranges::ROOM_SIZE.clamp(self.room_size),
            brightness: ranges::BRIGHTNESS.clamp(self.brightness),
            width: ranges::WIDTH.clamp(self.width),
            dry_wet: ranges::DRY_WET.clamp(self.dry_wet),
            intensity: ranges::INTENSITY.clamp(self.intensity),
        }
    }
}

/// Extended reverb and texture parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtendedParams {
    /// Reverb decay in seconds (0 = derive from room size).
    pub decay_time: f32,
    /// Diffuser density.
    pub diffusion: f32,
    /// Lofi amount.
    pub lofi_amount: f32,
    /// Modulation depth.
    pub modulation: f32,
}

impl Default for ExtendedParams {
    fn default() -> Self {
        Self {
            decay_time: ranges::DECAY_TIME.default,
            diffusion: ranges::DIFFUSION.default,
            lofi_amount: ranges::LOFI_AMOUNT.default,
            modulation: ranges::MODULATION.default,
        }
    }
}

impl ExtendedParams {
    /// Copy with every field clamped into range (NaN becomes the default).
    pub fn clamped(&self) -> Self {
        Self {
            decay_time: ranges::DECAY_TIME.clamp(self.decay_time),
            diffusion: ranges::DIFFUSION.clamp(self.diffusion),
            lofi_amount: ranges::LOFI_AMOUNT.clamp(self.lofi_amount),
            modulation: ranges::MODULATION.clamp(self.modulation),
        }
    }
}
