//! Linear ADSR amplitude envelope.
//!
//! Applied post-mix to the whole stereo output, one step per frame. Segments
//! are linear ramps whose per-sample increments are derived from the stage
//! durations; a zero-length stage completes on the sample it is entered.
//!
//! ```text
//! Idle ─(trigger)→ Attack → Decay → Sustain ─(release)→ Release → Idle
//! ```
//!
//! In every state the output is `input × level`. Idle holds whatever level
//! it was left at, so a fresh envelope (level 1.0) passes audio unchanged
//! and a finished one (level 0.0) is silent.

/// ADSR envelope states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive: level is held.
    #[default]
    Idle,
    /// Level ramps up towards 1.0.
    Attack,
    /// Level ramps down towards the sustain level.
    Decay,
    /// Level holds at the sustain level.
    Sustain,
    /// Level ramps down towards 0.0.
    Release,
}

/// Stage durations and sustain level of an envelope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrSettings {
    /// Attack duration in milliseconds.
    pub attack_ms: f32,
    /// Decay duration in milliseconds.
    pub decay_ms: f32,
    /// Sustain level (0.0 to 1.0).
    pub sustain_level: f32,
    /// Release duration in milliseconds.
    pub release_ms: f32,
}

impl Default for AdsrSettings {
    fn default() -> Self {
        Self::PASSTHROUGH
    }
}

impl AdsrSettings {
    /// Envelope that jumps straight to full level and holds it.
    pub const PASSTHROUGH: Self = Self {
        attack_ms: 0.0,
        decay_ms: 0.0,
        sustain_level: 1.0,
        release_ms: 0.0,
    };

    /// Copy with every field forced into range (negative or NaN durations become 0).
    pub fn sanitized(self) -> Self {
        let time = |ms: f32| if ms.is_nan() { 0.0 } else { ms.max(0.0) };
        Self {
            attack_ms: time(self.attack_ms),
            decay_ms: time(self.decay_ms),
            sustain_level: crate::sanitize(self.sustain_level, 0.0, 1.0, 1.0),
            release_ms: time(self.release_ms),
        }
    }
}

/// Linear ADSR envelope.
///
/// # Example
///
/// ```rust
/// use atmos_core::{Adsr, AdsrSettings, EnvelopeState};
///
/// let mut env = Adsr::new(48000.0);
/// env.trigger(AdsrSettings {
///     attack_ms: 0.0,
///     decay_ms: 10.0,
///     sustain_level: 0.5,
///     release_ms: 100.0,
/// });
///
/// assert_eq!(env.advance(), 1.0);
/// for _ in 0..500 {
///     env.advance();
/// }
/// assert_eq!(env.state(), EnvelopeState::Sustain);
/// assert_eq!(env.level(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Adsr {
    state: EnvelopeState,
    level: f32,
    sample_rate: f32,
    settings: AdsrSettings,
    release_step: f32,
}

impl Adsr {
    /// Create an idle envelope at level 1.0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            state: EnvelopeState::Idle,
            level: 1.0,
            sample_rate,
            settings: AdsrSettings::PASSTHROUGH,
            release_step: 0.0,
        }
    }

    /// Apply new settings and restart from Attack at level 0.
    pub fn trigger(&mut self, settings: AdsrSettings) {
        self.settings = settings.sanitized();
        self.state = EnvelopeState::Attack;
        self.level = 0.0;
        #[cfg(feature = "tracing")]
        tracing::debug!(settings = ?self.settings, "envelope triggered");
    }

    /// Enter Release from any active state.
    ///
    /// The ramp runs from the current level to zero over the release time;
    /// released from Sustain this is `sustain / (release · sr)` per sample.
    pub fn release(&mut self) {
        if self.state == EnvelopeState::Idle {
            return;
        }
        self.state = EnvelopeState::Release;
        let samples = self.samples(self.settings.release_ms);
        self.release_step = if samples > 0.0 { self.level / samples } else { 0.0 };
        #[cfg(feature = "tracing")]
        tracing::debug!(level = self.level, "envelope released");
    }

    /// Return to Idle at level 1.0 (pass-through).
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 1.0;
        self.release_step = 0.0;
    }

    /// Current state.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Settings in effect.
    pub fn settings(&self) -> AdsrSettings {
        self.settings
    }

    /// Advance by one step and return the new level.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle | EnvelopeState::Sustain => {}
            EnvelopeState::Attack => {
                let samples = self.samples(self.settings.attack_ms);
                if samples <= 0.0 {
                    self.level = 1.0;
                } else {
                    self.level += 1.0 / samples;
                }
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                let sustain = self.settings.sustain_level;
                let samples = self.samples(self.settings.decay_ms);
                if samples <= 0.0 {
                    self.level = sustain;
                } else {
                    self.level -= (1.0 - sustain) / samples;
                }
                if self.level <= sustain {
                    self.level = sustain;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Release => {
                if self.release_step <= 0.0 {
                    self.level = 0.0;
                } else {
                    self.level -= self.release_step;
                }
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
        }
        self.level
    }

    /// Advance one step and scale `input` by the resulting level.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        input * self.advance()
    }

    fn samples(&self, ms: f32) -> f32 {
        ms * 0.001 * self.sample_rate
    }
}
