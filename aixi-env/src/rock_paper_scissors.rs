//! Biased rock-paper-scissors. The opponent repeats rock after winning
//! with rock and otherwise plays uniformly at random, which an attentive
//! agent can exploit for better-than-chance reward.

use aixi_core::{AgentRng, Environment};

pub struct RockPaperScissors {
    action: u32,
    observation: u32,
    reward: u32,
}

impl RockPaperScissors {
    pub const A_ROCK: u32 = 0;
    pub const A_PAPER: u32 = 1;
    pub const A_SCISSORS: u32 = 2;

    pub const O_ROCK: u32 = 0;
    pub const O_PAPER: u32 = 1;
    pub const O_SCISSORS: u32 = 2;

    pub const R_LOSE: u32 = 0;
    pub const R_DRAW: u32 = 1;
    pub const R_WIN: u32 = 2;

    pub fn new() -> Self {
        Self {
            action: Self::A_ROCK,
            // Anything but rock, so the first opponent move is random.
            observation: Self::O_PAPER,
            reward: 0,
        }
    }
}

impl Default for RockPaperScissors {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for RockPaperScissors {
    fn max_action(&self) -> u32 {
        2
    }

    fn max_observation(&self) -> u32 {
        2
    }

    fn max_reward(&self) -> u32 {
        2
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

        // Opponent repeats rock after winning with rock, else plays
        // uniformly.
        if self.observation == Self::O_ROCK && self.reward == Self::R_LOSE {
            self.observation = Self::O_ROCK;
        } else {
            self.observation = rng.rand_range(3);
        }

        self.reward = if action == self.observation {
            Self::R_DRAW
        } else {
            let beats = match action {
                Self::A_ROCK => Self::O_SCISSORS,
                Self::A_PAPER => Self::O_ROCK,
                _ => Self::O_PAPER,
            };
            if self.observation == beats {
                Self::R_WIN
            } else {
                Self::R_LOSE
            }
        };
    }

    fn describe(&self) -> String {
        let name = |v: u32| match v {
            Self::O_ROCK => "rock",
            Self::O_PAPER => "paper",
            _ => "scissors",
        };
        format!(
            "agent played {}, environment played {}, agent {}",
            name(self.action),
            name(self.observation),
            match self.reward {
                Self::R_WIN => "wins",
                Self::R_DRAW => "draws",
                _ => "loses",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_reward(action: u32, observation: u32) -> u32 {
        if action == observation {
            return RockPaperScissors::R_DRAW;
        }
        let wins = matches!(
            (action, observation),
            (RockPaperScissors::A_ROCK, RockPaperScissors::O_SCISSORS)
                | (RockPaperScissors::A_PAPER, RockPaperScissors::O_ROCK)
                | (RockPaperScissors::A_SCISSORS, RockPaperScissors::O_PAPER)
        );
        if wins {
            RockPaperScissors::R_WIN
        } else {
            RockPaperScissors::R_LOSE
        }
    }

    #[test]
    fn reward_follows_the_game_matrix() {
        let mut rng = AgentRng::seed_from_u64(1);
        let mut env = RockPaperScissors::new();
        for i in 0..300 {
            let action = i % 3;
            env.perform_action(action, &mut rng);
            assert_eq!(env.reward(), expected_reward(action, env.observation()));
        }
    }

    #[test]
    fn opponent_repeats_rock_after_winning_with_rock() {
        let mut rng = AgentRng::seed_from_u64(2);
        let mut env = RockPaperScissors::new();
        let mut checked = 0;
        for _ in 0..500 {
            let won_with_rock = env.observation() == RockPaperScissors::O_ROCK
                && env.reward() == RockPaperScissors::R_LOSE;
            env.perform_action(RockPaperScissors::A_SCISSORS, &mut rng);
            if won_with_rock {
                assert_eq!(env.observation(), RockPaperScissors::O_ROCK);
                checked += 1;
            }
        }
        assert!(checked > 0, "rule never triggered");
    }
}
