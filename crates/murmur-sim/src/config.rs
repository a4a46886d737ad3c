//! JSON configuration surface.
//!
//! One document configures the whole run; deserialization plus
//! [`SimulationConfig::validate`] catch malformed input before any
//! population is built.

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use murmur_agent::{AeroConfig, InitialPlacement};
use murmur_behavior::{StateConfig, StressSourceConfig, TransitionConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated seconds per tick.
    pub dt: f32,
    /// Run length in simulated seconds.
    pub t_max: f32,
    pub seed: u64,
    /// Worker threads; the global pool when absent.
    #[serde(default)]
    pub threads: Option<usize>,
    pub flock_detection: FlockDetectionConfig,
    /// State indices broadcast as "escaping" for the copy mechanism.
    #[serde(default)]
    pub escape_states: Vec<u16>,
    pub species: Vec<SpeciesConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlockDetectionConfig {
    /// Clustering distance [m].
    pub threshold: f32,
    /// Seconds between re-clustering runs; centroids coast in between.
    pub interval: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesConfig {
    pub name: String,
    pub n: usize,
    /// Population starts permanently asleep (no updates, no integration)
    /// until woken explicitly.
    #[serde(default)]
    pub start_asleep: bool,
    pub aero: AeroConfig,
    #[serde(default)]
    pub stress: StressConfig,
    pub states: Vec<StateConfig>,
    pub transitions: TransitionConfig,
    pub init: InitialPlacement,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StressConfig {
    /// Individual stress-baseline variation, Normal(mean, sd).
    #[serde(default)]
    pub ind_var_mean: f32,
    #[serde(default)]
    pub ind_var_sd: f32,
    #[serde(default)]
    pub sources: Vec<StressSourceConfig>,
}

impl SimulationConfig {
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0) {
            return Err(SimError::Config(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if self.t_max < 0.0 {
            return Err(SimError::Config(format!(
                "t_max must be non-negative, got {}",
                self.t_max
            )));
        }
        if self.flock_detection.threshold <= 0.0 || self.flock_detection.interval <= 0.0 {
            return Err(SimError::Config(
                "flock_detection threshold and interval must be positive".into(),
            ));
        }
        if self.species.is_empty() {
            return Err(SimError::Config("at least one species is required".into()));
        }
        for (i, sp) in self.species.iter().enumerate() {
            if self.species[..i].iter().any(|other| other.name == sp.name) {
                return Err(SimError::Config(format!(
                    "duplicate species name '{}'",
                    sp.name
                )));
            }
            if sp.states.is_empty() {
                return Err(SimError::Config(format!(
                    "species '{}' declares no states",
                    sp.name
                )));
            }
            if sp.stress.ind_var_sd < 0.0 {
                return Err(SimError::Config(format!(
                    "species '{}': ind_var_sd must be non-negative",
                    sp.name
                )));
            }
            sp.aero.validate()?;
        }
        let max_states = self.species.iter().map(|s| s.states.len()).max().unwrap_or(0);
        if let Some(&bad) = self
            .escape_states
            .iter()
            .find(|&&s| (s as usize) >= max_states)
        {
            return Err(SimError::Config(format!(
                "escape state {bad} is out of range (no species has that many states)"
            )));
        }
        Ok(())
    }

    /// Index of a species by name.
    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }
}
