//! Agent configuration schema.
//!
//! Field names keep the classic option spelling (`ct-depth`,
//! `agent-horizon`, ...) so existing configuration files read naturally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading / validation errors. Fatal at initialization.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid option: {msg}")]
    InvalidOption { msg: &'static str },
}

/// Core agent options.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AgentConfig {
    /// Maximum depth of the context tree.
    pub ct_depth: u32,
    /// Planning horizon in agent/environment cycles.
    pub agent_horizon: u32,
    /// Monte-Carlo simulations per decision.
    pub mc_simulations: u32,
    /// Cycle after which percept updates stop learning (0 = never stop).
    #[serde(default)]
    pub learning_period: u64,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ct_depth == 0 {
            return Err(ConfigError::InvalidOption {
                msg: "ct-depth must be > 0",
            });
        }
        if self.agent_horizon == 0 {
            return Err(ConfigError::InvalidOption {
                msg: "agent-horizon must be > 0",
            });
        }
        if self.mc_simulations == 0 {
            return Err(ConfigError::InvalidOption {
                msg: "mc-simulations must be > 0",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_options() {
        let yaml = r#"
ct-depth: 30
agent-horizon: 5
mc-simulations: 300
"#;
        let cfg: AgentConfig = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(cfg.ct_depth, 30);
        assert_eq!(cfg.agent_horizon, 5);
        assert_eq!(cfg.mc_simulations, 300);
        assert_eq!(cfg.learning_period, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_depth() {
        let cfg = AgentConfig {
            ct_depth: 0,
            agent_horizon: 5,
            mc_simulations: 300,
            learning_period: 0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn rejects_zero_horizon_and_simulations() {
        let mut cfg = AgentConfig {
            ct_depth: 4,
            agent_horizon: 0,
            mc_simulations: 300,
            learning_period: 0,
        };
        assert!(cfg.validate().is_err());
        cfg.agent_horizon = 5;
        cfg.mc_simulations = 0;
        assert!(cfg.validate().is_err());
    }
}
