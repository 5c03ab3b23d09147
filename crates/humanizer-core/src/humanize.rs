//! Velocity humanizer

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::HumanizerConfig;
use crate::error::Result;

/// Velocities above this are pulled down before jitter is added
pub const VELOCITY_HEADROOM_CEILING: u8 = 107;
pub const MAX_VELOCITY: u8 = 127;
pub const MAX_JITTER_PROBABILITY: u8 = 100;
pub const DEFAULT_JITTER_PROBABILITY: u8 = 50;
pub const DEFAULT_JITTER_AMPLITUDE: u8 = 10;

/// What to do with a jittered velocity that leaves 0..=127
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Saturate at 0 and 127
    #[default]
    Clamp,
    /// 8-bit wrapping arithmetic masked to a 7-bit data byte.
    ///
    /// Keeps the byte valid but is not the raw 8-bit result: 3 - 5 wraps to
    /// 254 and is written as 126, so an underflowing soft note comes out
    /// near full velocity.
    Wrap,
}

impl OverflowPolicy {
    fn apply(self, base: u8, offset: u8, subtract: bool) -> u8 {
        match self {
            Self::Clamp => {
                let value = if subtract {
                    i16::from(base) - i16::from(offset)
                } else {
                    i16::from(base) + i16::from(offset)
                };
                value.clamp(0, i16::from(MAX_VELOCITY)) as u8
            }
            Self::Wrap => {
                let value = if subtract {
                    base.wrapping_sub(offset)
                } else {
                    base.wrapping_add(offset)
                };
                value & MAX_VELOCITY
            }
        }
    }
}

/// Per-instance humanizer state.
///
/// Owns its generator, so two instances never share random state. Starts
/// inactive; the host flips it with [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate).
#[derive(Debug, Clone)]
pub struct VelocityHumanizer {
    active: bool,
    jitter_probability: u8,
    jitter_amplitude: u8,
    overflow: OverflowPolicy,
    rng: fastrand::Rng,
}

impl Default for VelocityHumanizer {
    fn default() -> Self {
        Self::with_seed(clock_seed())
    }
}

impl VelocityHumanizer {
    pub fn new(config: &HumanizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            active: false,
            jitter_probability: config.jitter_probability,
            jitter_amplitude: config.jitter_amplitude,
            overflow: config.overflow,
            rng: fastrand::Rng::with_seed(config.seed.unwrap_or_else(clock_seed)),
        })
    }

    /// Default parameters with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            active: false,
            jitter_probability: DEFAULT_JITTER_PROBABILITY,
            jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
            overflow: OverflowPolicy::default(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Replace the tunables. The generator is only reseeded when the config
    /// carries an explicit seed.
    pub fn apply_config(&mut self, config: &HumanizerConfig) -> Result<()> {
        config.validate()?;
        self.jitter_probability = config.jitter_probability;
        self.jitter_amplitude = config.jitter_amplitude;
        self.overflow = config.overflow;
        if let Some(seed) = config.seed {
            self.rng.seed(seed);
        }
        Ok(())
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn jitter_probability(&self) -> u8 {
        self.jitter_probability
    }

    pub fn set_jitter_probability(&mut self, percent: u8) {
        self.jitter_probability = percent.min(MAX_JITTER_PROBABILITY);
    }

    pub fn jitter_amplitude(&self) -> u8 {
        self.jitter_amplitude
    }

    pub fn set_jitter_amplitude(&mut self, amplitude: u8) {
        self.jitter_amplitude = amplitude.min(MAX_VELOCITY);
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Perturb one note velocity.
    ///
    /// Inactive: `raw` comes back untouched. Active: the velocity is capped
    /// at [`VELOCITY_HEADROOM_CEILING`], then with `jitter_probability`
    /// percent chance moved up or down by less than `jitter_amplitude`.
    pub fn humanize(&mut self, raw: u8) -> u8 {
        if !self.active {
            return raw;
        }

        let velocity = raw.min(VELOCITY_HEADROOM_CEILING);
        if self.rng.u8(0..100) >= self.jitter_probability {
            return velocity;
        }

        let subtract = self.rng.bool();
        let offset = match self.jitter_amplitude {
            0 => 0,
            amplitude => self.rng.u8(0..amplitude),
        };
        self.overflow.apply(velocity, offset, subtract)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
