//! The tiger problem. A tiger hides behind one of two doors and gold
//! behind the other. Listening reveals the tiger's door with some accuracy;
//! opening a door yields gold or the tiger, after which both are re-placed.
//!
//! Rewards are shifted to be non-negative on the wire: eaten = 0 (-100),
//! listen = 99 (-1), gold = 110 (+10).

use aixi_core::{AgentRng, Environment};

use crate::EnvError;

pub struct Tiger {
    listen_accuracy: f64,
    tiger: u32,
    gold: u32,
    action: u32,
    observation: u32,
    reward: u32,
}

impl Tiger {
    pub const A_LISTEN: u32 = 0;
    pub const A_LEFT: u32 = 1;
    pub const A_RIGHT: u32 = 2;

    pub const O_NULL: u32 = 0;
    pub const O_LEFT: u32 = 1;
    pub const O_RIGHT: u32 = 2;

    pub const R_EATEN: u32 = 0;
    pub const R_LISTEN: u32 = 99;
    pub const R_GOLD: u32 = 110;

    pub const DEFAULT_LISTEN_ACCURACY: f64 = 0.85;

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
            action: Self::A_LISTEN,
            observation: Self::O_NULL,
            reward: 0,
        };
        env.place_tiger(rng);
        Ok(env)
    }

    /// Tiger behind one door at random, gold behind the other.
    fn place_tiger(&mut self, rng: &mut AgentRng) {
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
    }
}

impl Environment for Tiger {
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
        self.observation
    }

    fn reward(&self) -> u32 {
        self.reward
    }

    fn perform_action(&mut self, action: u32, rng: &mut AgentRng) {
        assert!(self.is_valid_action(action));
        self.action = action;

        if action == Self::A_LISTEN {
            self.reward = Self::R_LISTEN;
            self.observation = if rng.r01() < self.listen_accuracy {
                self.tiger
            } else {
                self.gold
            };
        } else {
            let door = if action == Self::A_LEFT {
                Self::O_LEFT
            } else {
                Self::O_RIGHT
            };
            self.reward = if self.tiger == door {
                Self::R_EATEN
            } else {
                Self::R_GOLD
            };
            self.observation = Self::O_NULL;
            self.place_tiger(rng);
        }
    }

    fn describe(&self) -> String {
        let action = match self.action {
            Self::A_LISTEN => "listen",
            Self::A_LEFT => "open left door",
            _ => "open right door",
        };
        let observation = match self.observation {
            Self::O_NULL => "null",
            Self::O_LEFT => "hear tiger at left door",
            _ => "hear tiger at right door",
        };
        let reward = match self.reward {
            Self::R_EATEN => "eaten",
            Self::R_LISTEN => "listen",
            _ => "gold!",
        };
        format!("action = {action}, observation = {observation}, reward = {reward} ({})", self.reward)
    }
}
