//! Environment contract.
//!
//! An environment interacts with the agent in cycles: the agent reads the
//! current `(observation, reward)` percept, then hands back an action via
//! [`Environment::perform_action`], which computes the next percept.
//! Environments draw their chance events from the shared [`AgentRng`].

use crate::bits::bits_required;
use crate::rng::AgentRng;

pub trait Environment {
    /// The maximum possible action value.
    fn max_action(&self) -> u32;

    /// The maximum possible observation value.
    fn max_observation(&self) -> u32;

    /// The maximum possible reward value.
    fn max_reward(&self) -> u32;

    /// The minimum possible action value.
    fn min_action(&self) -> u32 {
        0
    }

    /// The minimum possible observation value.
    fn min_observation(&self) -> u32 {
        0
    }

    /// The minimum possible reward value.
    fn min_reward(&self) -> u32 {
        0
    }

    fn is_valid_action(&self, action: u32) -> bool {
        (self.min_action()..=self.max_action()).contains(&action)
    }

    fn is_valid_observation(&self, observation: u32) -> bool {
        (self.min_observation()..=self.max_observation()).contains(&observation)
    }

    fn is_valid_reward(&self, reward: u32) -> bool {
        (self.min_reward()..=self.max_reward()).contains(&reward)
    }

    /// The current observation.
    fn observation(&self) -> u32;

    /// The current reward.
    fn reward(&self) -> u32;

    /// Receive the agent's action and compute the next percept.
    fn perform_action(&mut self, action: u32, rng: &mut AgentRng);

    /// True once the environment can no longer interact with the agent.
    fn is_finished(&self) -> bool {
        false
    }

    /// Human-readable state line for verbose logging.
    fn describe(&self) -> String {
        String::new()
    }
}

/// Immutable snapshot of an environment's action/percept ranges and the bit
/// widths derived from them. The agent keeps one of these instead of a
/// borrow of the environment itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvSpec {
    pub max_action: u32,
    pub max_observation: u32,
    pub max_reward: u32,
}

impl EnvSpec {
    pub fn of(env: &(impl Environment + ?Sized)) -> Self {
        Self {
            max_action: env.max_action(),
            max_observation: env.max_observation(),
            max_reward: env.max_reward(),
        }
    }

    pub fn action_bits(&self) -> u32 {
        bits_required(self.max_action)
    }

    pub fn observation_bits(&self) -> u32 {
        bits_required(self.max_observation)
    }

    pub fn reward_bits(&self) -> u32 {
        bits_required(self.max_reward)
    }

    pub fn percept_bits(&self) -> u32 {
        self.observation_bits() + self.reward_bits()
    }

    pub fn is_valid_action(&self, action: u32) -> bool {
        action <= self.max_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Environment for Fixed {
        fn max_action(&self) -> u32 {
            2
        }
        fn max_observation(&self) -> u32 {
            2
        }
        fn max_reward(&self) -> u32 {
            110
        }
        fn observation(&self) -> u32 {
            0
        }
        fn reward(&self) -> u32 {
            0
        }
        fn perform_action(&mut self, _action: u32, _rng: &mut AgentRng) {}
    }

    #[test]
    fn spec_derives_bit_widths() {
        let spec = EnvSpec::of(&Fixed);
        assert_eq!(spec.action_bits(), 2);
        assert_eq!(spec.observation_bits(), 2);
        assert_eq!(spec.reward_bits(), 7);
        assert_eq!(spec.percept_bits(), 9);
    }

    #[test]
    fn validity_follows_ranges() {
        let env = Fixed;
        assert!(env.is_valid_action(0));
        assert!(env.is_valid_action(2));
        assert!(!env.is_valid_action(3));
        assert!(env.is_valid_reward(110));
        assert!(!env.is_valid_reward(111));
    }
}
