//! aixi-env: sample environments.
//!
//! Every environment implements [`aixi_core::Environment`] and draws its
//! chance events from the shared [`aixi_core::AgentRng`], so a run is fully
//! determined by the seed. Construction goes through the tagged
//! [`EnvConfig`] so a YAML run file can pick an environment by name.

pub mod coin_flip;
pub mod extended_tiger;
pub mod kuhn_poker;
pub mod maze;
pub mod rock_paper_scissors;
pub mod tiger;
pub mod tictactoe;

pub use coin_flip::CoinFlip;
pub use extended_tiger::ExtendedTiger;
pub use kuhn_poker::KuhnPoker;
pub use maze::{Maze, MazeConfig, ObservationEncoding};
pub use rock_paper_scissors::RockPaperScissors;
pub use tiger::Tiger;
pub use tictactoe::TicTacToe;

use aixi_core::{AgentRng, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid environment option: {msg}")]
    InvalidOption { msg: String },
}

fn default_coin_flip_p() -> f64 {
    CoinFlip::DEFAULT_PROBABILITY
}

fn default_listen_accuracy() -> f64 {
    Tiger::DEFAULT_LISTEN_ACCURACY
}

/// Environment selection and per-environment options.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum EnvConfig {
    CoinFlip {
        #[serde(default = "default_coin_flip_p")]
        p: f64,
    },
    RockPaperScissors,
    Tiger {
        #[serde(default = "default_listen_accuracy")]
        listen_accuracy: f64,
    },
    ExtendedTiger {
        #[serde(default = "default_listen_accuracy")]
        listen_accuracy: f64,
    },
    KuhnPoker,
    Tictactoe,
    Maze(MazeConfig),
}

impl EnvConfig {
    /// The environment's configuration-file name.
    pub fn name(&self) -> &'static str {
        match self {
            EnvConfig::CoinFlip { .. } => "coin-flip",
            EnvConfig::RockPaperScissors => "rock-paper-scissors",
            EnvConfig::Tiger { .. } => "tiger",
            EnvConfig::ExtendedTiger { .. } => "extended-tiger",
            EnvConfig::KuhnPoker => "kuhn-poker",
            EnvConfig::Tictactoe => "tictactoe",
            EnvConfig::Maze(_) => "maze",
        }
    }
}

/// Build the configured environment, drawing any initial chance events
/// from `rng`.
pub fn build(config: &EnvConfig, rng: &mut AgentRng) -> Result<Box<dyn Environment>, EnvError> {
    Ok(match config {
        EnvConfig::CoinFlip { p } => Box::new(CoinFlip::new(*p, rng)?),
        EnvConfig::RockPaperScissors => Box::new(RockPaperScissors::new()),
        EnvConfig::Tiger { listen_accuracy } => Box::new(Tiger::new(*listen_accuracy, rng)?),
        EnvConfig::ExtendedTiger { listen_accuracy } => {
            Box::new(ExtendedTiger::new(*listen_accuracy, rng)?)
        }
        EnvConfig::KuhnPoker => Box::new(KuhnPoker::new(rng)),
        EnvConfig::Tictactoe => Box::new(TicTacToe::new()),
        EnvConfig::Maze(config) => Box::new(Maze::new(config, rng)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn config_parses_by_name_with_defaults() {
        let config: EnvConfig = serde_yaml::from_str("name: coin-flip").expect("parse");
        let EnvConfig::CoinFlip { p } = config else {
            panic!("wrong variant");
        };
        assert_eq!(p, CoinFlip::DEFAULT_PROBABILITY);

        let config: EnvConfig =
            serde_yaml::from_str("name: tiger\nlisten-accuracy: 0.9").expect("parse");
        let EnvConfig::Tiger { listen_accuracy } = config else {
            panic!("wrong variant");
        };
        assert_eq!(listen_accuracy, 0.9);
    }

    #[test]
    fn build_produces_a_live_environment() {
        let mut rng = AgentRng::seed_from_u64(0);
        let config: EnvConfig = serde_yaml::from_str("name: rock-paper-scissors").expect("parse");
        let env = build(&config, &mut rng).expect("build");
        assert_eq!(env.max_action(), 2);
        assert!(!env.is_finished());
    }
}
