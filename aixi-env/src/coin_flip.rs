//! A biased coin. The agent guesses the outcome of the next flip and is
//! paid 1 on a correct guess.

use aixi_core::{AgentRng, Environment};

use crate::EnvError;

pub struct CoinFlip {
    probability: f64,
    action: u32,
    observation: u32,
    reward: u32,
}

impl CoinFlip {
    pub const A_TAILS: u32 = 0;
    pub const A_HEADS: u32 = 1;

    pub const O_TAILS: u32 = 0;
    pub const O_HEADS: u32 = 1;

    pub const R_LOSS: u32 = 0;
    pub const R_WIN: u32 = 1;

    pub const DEFAULT_PROBABILITY: f64 = 0.7;

    /// `probability` is the chance of heads. The initial percept is a free
    /// observation of one flip.
    pub fn new(probability: f64, rng: &mut AgentRng) -> Result<Self, EnvError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(EnvError::InvalidOption {
                msg: format!("coin-flip p must be in [0, 1], got {probability}"),
            });
        }
        let observation = if rng.r01() < probability {
            Self::O_HEADS
        } else {
            Self::O_TAILS
        };
        Ok(Self {
            probability,
            action: Self::A_TAILS,
            observation,
            reward: 0,
        })
    }
}

impl Environment for CoinFlip {
    fn max_action(&self) -> u32 {
        1
    }

    fn max_observation(&self) -> u32 {
        1
    }

    fn max_reward(&self) -> u32 {
        1
    }

    fn observation(&self) -> u32 {
        self.observation
    }

    fn reward(&self) -> u32 {
        self.reward
    }

    fn perform_action(&mut self, action: u32, rng: &mut AgentRng) {
        assert!(self.is_valid_action(action));
        self.action = action;

        self.observation = if rng.r01() < self.probability {
            Self::O_HEADS
        } else {
            Self::O_TAILS
        };
        self.reward = if action == self.observation {
            Self::R_WIN
        } else {
            Self::R_LOSS
        };
    }

    fn describe(&self) -> String {
        format!(
            "prediction: {}, observation: {}, reward: {}",
            if self.action == Self::A_TAILS {
                "tails"
            } else {
                "heads"
            },
            if self.observation == Self::O_TAILS {
                "tails"
            } else {
                "heads"
            },
            self.reward
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_probability_out_of_range() {
        let mut rng = AgentRng::seed_from_u64(0);
        assert!(CoinFlip::new(1.5, &mut rng).is_err());
        assert!(CoinFlip::new(-0.1, &mut rng).is_err());
    }

    #[test]
    fn certain_coin_rewards_matching_guesses() {
        let mut rng = AgentRng::seed_from_u64(0);
        let mut env = CoinFlip::new(1.0, &mut rng).unwrap();
        assert_eq!(env.observation(), CoinFlip::O_HEADS);

        env.perform_action(CoinFlip::A_HEADS, &mut rng);
        assert_eq!(env.reward(), CoinFlip::R_WIN);
        env.perform_action(CoinFlip::A_TAILS, &mut rng);
        assert_eq!(env.reward(), CoinFlip::R_LOSS);
    }

    #[test]
    fn reward_always_matches_guess_against_observation() {
        let mut rng = AgentRng::seed_from_u64(3);
        let mut env = CoinFlip::new(0.7, &mut rng).unwrap();
        for i in 0..200 {
            let action = i % 2;
            env.perform_action(action, &mut rng);
            let expected = (action == env.observation()) as u32;
            assert_eq!(env.reward(), expected);
        }
    }

    #[test]
    fn single_bit_widths() {
        let mut rng = AgentRng::seed_from_u64(0);
        let env = CoinFlip::new(0.7, &mut rng).unwrap();
        assert_eq!(aixi_core::EnvSpec::of(&env).percept_bits(), 2);
        assert_eq!(aixi_core::EnvSpec::of(&env).action_bits(), 1);
    }
}
