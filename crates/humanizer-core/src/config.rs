//! Construction-time humanizer configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HumanizerError, Result};
use crate::humanize::{
    DEFAULT_JITTER_AMPLITUDE, DEFAULT_JITTER_PROBABILITY, MAX_JITTER_PROBABILITY, MAX_VELOCITY,
    OverflowPolicy,
};

/// Tunables for a humanizer instance.
///
/// Missing keys fall back to the defaults, so an empty TOML document is a
/// valid config:
///
/// ```toml
/// jitter_probability = 50
/// jitter_amplitude = 10
/// overflow = "clamp"
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizerConfig {
    /// Percent chance (0-100) that a note's velocity is perturbed
    pub jitter_probability: u8,
    /// Offsets are drawn from `0..jitter_amplitude`
    pub jitter_amplitude: u8,
    pub overflow: OverflowPolicy,
    /// Fixed generator seed; the wall clock is used when absent
    pub seed: Option<u64>,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            jitter_probability: DEFAULT_JITTER_PROBABILITY,
            jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
            overflow: OverflowPolicy::default(),
            seed: None,
        }
    }
}

impl HumanizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jitter_probability > MAX_JITTER_PROBABILITY {
            return Err(HumanizerError::InvalidConfig(format!(
                "jitter_probability {} exceeds {MAX_JITTER_PROBABILITY}",
                self.jitter_probability
            )));
        }
        if self.jitter_amplitude > MAX_VELOCITY {
            return Err(HumanizerError::InvalidConfig(format!(
                "jitter_amplitude {} exceeds {MAX_VELOCITY}",
                self.jitter_amplitude
            )));
        }
        Ok(())
    }
}
