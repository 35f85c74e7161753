//! Run configuration: environment choice, agent options, seed, and the
//! exploration schedule, loaded from a single YAML file.

use std::path::Path;

use aixi_core::{AgentConfig, ConfigError};
use aixi_env::EnvConfig;
use serde::Deserialize;

fn default_explore_decay() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    /// Which environment to run, with its options.
    pub environment: EnvConfig,
    /// Seed for the shared random stream.
    #[serde(default)]
    pub random_seed: u64,
    /// Core agent options.
    pub agent: AgentConfig,
    /// Initial probability of exploring (uniform random action).
    #[serde(default)]
    pub exploration: f64,
    /// Multiplicative per-cycle decay of the exploration rate.
    #[serde(default = "default_explore_decay")]
    pub explore_decay: f64,
    /// Stop once the agent is older than this (0 = run until finished).
    #[serde(default)]
    pub terminate_age: u64,
}

impl RunConfig {
    /// Load a run configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load a run configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        if !(0.0..=1.0).contains(&self.exploration) {
            return Err(ConfigError::InvalidOption {
                msg: "exploration must be in [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.explore_decay) {
            return Err(ConfigError::InvalidOption {
                msg: "explore-decay must be in [0, 1]",
            });
        }
        Ok(())
    }
}
