//! The extended tiger problem: the agent starts seated and must stand
//! before it can open a door, while listening only works seated. Invalid
//! combinations earn the minimum reward.
//!
//! Wire rewards: invalid/tiger = 0 (-100), stand = 99 (-1), listen = 100
//! (0), gold = 130 (+30).

use aixi_core::{AgentRng, Environment};

use crate::EnvError;

pub struct ExtendedTiger {
    listen_accuracy: f64,
    tiger: u32,
    gold: u32,
    sitting: bool,
    action: u32,
    observation: u32,
    reward: u32,
}

impl ExtendedTiger {
    pub const A_LISTEN: u32 = 0;
    pub const A_LEFT: u32 = 1;
    pub const A_RIGHT: u32 = 2;
    pub const A_STAND: u32 = 3;

    pub const O_NULL: u32 = 0;
    pub const O_LEFT: u32 = 1;
    pub const O_RIGHT: u32 = 2;

    pub const R_INVALID: u32 = 0;
    pub const R_TIGER: u32 = 0;
    pub const R_STAND: u32 = 99;
    pub const R_LISTEN: u32 = 100;
    pub const R_GOLD: u32 = 130;

    pub fn new(listen_accuracy: f64, rng: &mut AgentRng) -> Result<Self, EnvError> {
        if !(0.0..=1.0).contains(&listen_accuracy) {
            return Err(EnvError::InvalidOption {
                msg: format!("listen-accuracy must be in [0, 1], got {listen_accuracy}"),
            });
        }
        let mut env = Self {
            listen_accuracy,
            tiger: Self::O_LEFT,
            gold: Self::O_RIGHT,
            sitting: true,
            action: Self::A_LISTEN,
            observation: Self::O_NULL,
            reward: 0,
        };
        env.reset(rng);
        Ok(env)
    }

    /// Re-place tiger and gold, re-seat the agent.
    fn reset(&mut self, rng: &mut AgentRng) {
        self.tiger = if rng.r01() < 0.5 {
            Self::O_LEFT
        } else {
            Self::O_RIGHT
        };
        self.gold = if self.tiger == Self::O_LEFT {
            Self::O_RIGHT
        } else {
            Self::O_LEFT
        };
        self.sitting = true;
    }
}

impl Environment for ExtendedTiger {
    fn max_action(&self) -> u32 {
        3
    }

    fn max_observation(&self) -> u32 {
        2
    }

    fn max_reward(&self) -> u32 {
        130
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

        // Unless explicitly handled below, the action is invalid.
        self.observation = Self::O_NULL;
        self.reward = Self::R_INVALID;

        if action == Self::A_LISTEN && self.sitting {
            self.observation = if rng.r01() < self.listen_accuracy {
                self.tiger
            } else {
                self.gold
            };
            self.reward = Self::R_LISTEN;
        } else if action == Self::A_LEFT && !self.sitting {
            self.reward = if self.tiger == Self::O_LEFT {
                Self::R_TIGER
            } else {
                Self::R_GOLD
            };
            self.reset(rng);
        } else if action == Self::A_RIGHT && !self.sitting {
            self.reward = if self.tiger == Self::O_RIGHT {
                Self::R_TIGER
            } else {
                Self::R_GOLD
            };
            self.reset(rng);
        } else if action == Self::A_STAND && self.sitting {
            self.reward = Self::R_STAND;
            self.sitting = false;
        }
    }

    fn describe(&self) -> String {
        let action = match self.action {
            Self::A_LISTEN => "listen",
            Self::A_LEFT => "open left door",
            Self::A_RIGHT => "open right door",
            _ => "stand up",
        };
        let observation = match self.observation {
            Self::O_NULL => "null",
            Self::O_LEFT => "hear tiger at left door",
            _ => "hear tiger at right door",
        };
        format!(
            "action = {action}, observation = {observation}, reward = {}, agent is now {}",
            self.reward,
            if self.sitting { "sitting" } else { "standing" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_a_door_while_sitting_is_invalid() {
        let mut rng = AgentRng::seed_from_u64(0);
        let mut env = ExtendedTiger::new(1.0, &mut rng).unwrap();
        env.perform_action(ExtendedTiger::A_LEFT, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_INVALID);
        assert_eq!(env.observation(), ExtendedTiger::O_NULL);
    }

    #[test]
    fn listen_stand_open_finds_the_gold() {
        let mut rng = AgentRng::seed_from_u64(1);
        let mut env = ExtendedTiger::new(1.0, &mut rng).unwrap();

        env.perform_action(ExtendedTiger::A_LISTEN, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_LISTEN);
        let tiger_door = env.observation();

        env.perform_action(ExtendedTiger::A_STAND, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_STAND);

        // Listening while standing is invalid.
        env.perform_action(ExtendedTiger::A_LISTEN, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_INVALID);

        let open = if tiger_door == ExtendedTiger::O_LEFT {
            ExtendedTiger::A_RIGHT
        } else {
            ExtendedTiger::A_LEFT
        };
        env.perform_action(open, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_GOLD);
    }

    #[test]
    fn standing_twice_is_invalid() {
        let mut rng = AgentRng::seed_from_u64(2);
        let mut env = ExtendedTiger::new(0.85, &mut rng).unwrap();
        env.perform_action(ExtendedTiger::A_STAND, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_STAND);
        env.perform_action(ExtendedTiger::A_STAND, &mut rng);
        assert_eq!(env.reward(), ExtendedTiger::R_INVALID);
    }
}
