//! Spatial stage of the dry path.
//!
//! The engine treats spatial rendering as an external collaborator behind
//! the [`Spatializer`] trait: it hands over the dry stereo pair once per
//! block and expects it back in place. [`BinauralPanner`] is the built-in
//! implementation, a lightweight ITD/ILD model with a one-pole head shadow
//! on the far ear. Hosts with an HRIR convolver plug it in instead.

use atmos_core::{OnePole, TapDelay, db_to_linear, sanitize};
use libm::sinf;

/// Largest interaural time difference produced by [`azimuth_to_binaural`], in µs.
pub const MAX_ITD_US: f32 = 625.0;
/// Largest interaural level difference, in dB.
pub const MAX_ILD_DB: f32 = 20.0;
/// Head radius used by the spherical-head ITD model, in metres.
const HEAD_RADIUS: f32 = 0.215;

/// Binaural cues for one source direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BinauralParams {
    /// Interaural time difference in µs; positive delays the left ear.
    pub itd_us: f32,
    /// Interaural level difference in dB; positive favours the right ear.
    pub ild_db: f32,
    /// Azimuth in degrees, positive to the right.
    pub azimuth_deg: f32,
    /// Elevation in degrees.
    pub elevation_deg: f32,
}

/// Derive ITD and ILD for a direction at a reference frequency.
///
/// ITD follows `0.215·sin θ / 343` seconds. ILD is zero up to 500 Hz and
/// ramps to `20·sin θ` dB at 2 kHz and above.
///
/// ```rust
/// use atmos_effects::azimuth_to_binaural;
///
/// let p = azimuth_to_binaural(90.0, 0.0, 1000.0);
/// assert!(p.itd_us > 600.0);
/// assert!(p.ild_db > 6.0);
/// ```
pub fn azimuth_to_binaural(azimuth_deg: f32, elevation_deg: f32, frequency_hz: f32) -> BinauralParams {
    let azimuth = sanitize(azimuth_deg, -180.0, 180.0, 0.0);
    let elevation = sanitize(elevation_deg, -90.0, 90.0, 0.0);
    let theta = azimuth.to_radians();
    let itd_us = HEAD_RADIUS * sinf(theta) / crate::SPEED_OF_SOUND * 1e6;
    let ild_db = if frequency_hz > 500.0 {
        let scale = ((frequency_hz - 500.0) / 1500.0).clamp(0.0, 1.0);
        MAX_ILD_DB * sinf(theta) * scale
    } else {
        0.0
    };
    BinauralParams {
        itd_us: itd_us.clamp(-MAX_ITD_US, MAX_ITD_US),
        ild_db: ild_db.clamp(-MAX_ILD_DB, MAX_ILD_DB),
        azimuth_deg: azimuth,
        elevation_deg: elevation,
    }
}

/// Spatial rendering collaborator.
///
/// Implementations run on the audio thread: `process` must not allocate,
/// lock or block.
pub trait Spatializer: Send {
    /// Render the dry stereo pair in place.
    fn process(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Apply new binaural cues. Called from the engine's owner between blocks.
    fn set_params(&mut self, params: &BinauralParams) {
        let _ = params;
    }

    /// Clear internal state.
    fn reset(&mut self) {}
}

/// ITD/ILD panner with head shadowing.
///
/// Pass-through until cues are applied with [`Spatializer::set_params`].
#[derive(Debug, Clone)]
pub struct BinauralPanner {
    enabled: bool,
    params: BinauralParams,
    itd_samples: isize,
    gain_l: f32,
    gain_r: f32,
    delay_l: TapDelay,
    delay_r: TapDelay,
    shadow_l: OnePole,
    shadow_r: OnePole,
    sample_rate: f32,
}

impl BinauralPanner {
    /// Create a panner with 10 ms of ITD capacity.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            enabled: false,
            params: BinauralParams::default(),
            itd_samples: 0,
            gain_l: 1.0,
            gain_r: 1.0,
            delay_l: TapDelay::from_time(sample_rate, 0.01),
            delay_r: TapDelay::from_time(sample_rate, 0.01),
            shadow_l: OnePole::new(sample_rate, 10_000.0),
            shadow_r: OnePole::new(sample_rate, 10_000.0),
            sample_rate,
        }
    }

    /// Whether cues have been applied.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cues in effect.
    pub fn params(&self) -> BinauralParams {
        self.params
    }

    /// ITD in whole samples; positive delays the left channel.
    pub fn itd_samples(&self) -> isize {
        self.itd_samples
    }

    /// Linear `(left, right)` ILD gains.
    pub fn gains(&self) -> (f32, f32) {
        (self.gain_l, self.gain_r)
    }

    /// Head-shadow cutoff for an azimuth: 10 kHz straight ahead, 2 kHz at 90°.
    pub fn shadow_cutoff(azimuth_deg: f32) -> f32 {
        let shadow = (azimuth_deg.abs() / 90.0).clamp(0.0, 1.0);
        2000.0 + (1.0 - shadow) * 8000.0
    }
}

impl Spatializer for BinauralPanner {
    fn set_params(&mut self, params: &BinauralParams) {
        self.params = *params;
        self.enabled = true;

        let max_itd = self.delay_l.max_delay() as isize;
        let itd = sanitize(params.itd_us, -1e6, 1e6, 0.0) * 1e-6 * self.sample_rate;
        self.itd_samples = (libm::roundf(itd) as isize).clamp(-max_itd, max_itd);

        let ild = sanitize(params.ild_db, -MAX_ILD_DB, MAX_ILD_DB, 0.0);
        self.gain_l = db_to_linear(-0.5 * ild);
        self.gain_r = db_to_linear(0.5 * ild);

        let cutoff = Self::shadow_cutoff(sanitize(params.azimuth_deg, -180.0, 180.0, 0.0));
        self.shadow_l.set_cutoff(cutoff);
        self.shadow_r.set_cutoff(cutoff);
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        if !self.enabled {
            return;
        }
        let delay_left = self.itd_samples.max(0).unsigned_abs();
        let delay_right = self.itd_samples.min(0).unsigned_abs();
        let shadow_left = self.params.azimuth_deg > 0.0;
        let shadow_right = self.params.azimuth_deg < 0.0;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let in_l = *l;
            let in_r = *r;
            let mut out_l = if delay_left > 0 { self.delay_l.read(delay_left) } else { in_l };
            let mut out_r = if delay_right > 0 { self.delay_r.read(delay_right) } else { in_r };
            self.delay_l.write(in_l);
            self.delay_r.write(in_r);

            out_l *= self.gain_l;
            out_r *= self.gain_r;
            if shadow_left {
                out_l = self.shadow_l.lowpass(out_l);
            } else if shadow_right {
                out_r = self.shadow_r.lowpass(out_r);
            }
            *l = out_l;
            *r = out_r;
        }
    }

    fn reset(&mut self) {
        self.delay_l.clear();
        self.delay_r.clear();
        self.shadow_l.reset();
        self.shadow_r.reset();
    }
}
