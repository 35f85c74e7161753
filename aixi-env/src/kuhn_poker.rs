//! Kuhn poker against a fixed stochastic opponent.
//!
//! Each round both players ante one chip and receive one card from
//! {jack, queen, king}. The opponent moves first with a Nash-style betting
//! rule; the agent then bets or passes. The observation packs the agent's
//! card with the opponent's bet status; rewards encode the chip delta
//! shifted by two (0 = -2 ... 4 = +2).

use aixi_core::{AgentRng, Environment};

pub struct KuhnPoker {
    action: u32,
    observation: u32,
    reward: u32,
    agent_card: u32,
    env_card: u32,
    env_action: u32,
    previous_agent_card: u32,
    previous_env_card: u32,
    previous_env_action: u32,
}

impl KuhnPoker {
    pub const A_BET: u32 = 0;
    pub const A_PASS: u32 = 1;

    pub const O_JACK: u32 = 0;
    pub const O_QUEEN: u32 = 1;
    pub const O_KING: u32 = 2;
    pub const O_BET: u32 = 0;
    pub const O_PASS: u32 = 4;

    pub const R_BET_LOSS: u32 = 0;
    pub const R_PASS_LOSS: u32 = 1;
    pub const R_PASS_WIN: u32 = 3;
    pub const R_BET_WIN: u32 = 4;

    pub const BET_PROB_KING: f64 = 0.7;
    pub const BET_PROB_QUEEN: f64 = (1.0 + Self::BET_PROB_KING) / 3.0;
    pub const BET_PROB_JACK: f64 = Self::BET_PROB_KING / 3.0;

    pub fn new(rng: &mut AgentRng) -> Self {
        let mut env = Self {
            action: Self::A_PASS,
            observation: 0,
            reward: 0,
            agent_card: Self::O_JACK,
            env_card: Self::O_QUEEN,
            env_action: Self::A_PASS,
            previous_agent_card: Self::O_JACK,
            previous_env_card: Self::O_QUEEN,
            previous_env_action: Self::A_PASS,
        };
        env.deal(rng);
        env
    }

    fn random_card(rng: &mut AgentRng) -> u32 {
        rng.rand_range(3)
    }

    /// Start a new round: deal distinct cards, pick the opponent's opening
    /// move, and publish the observation.
    fn deal(&mut self, rng: &mut AgentRng) {
        self.previous_agent_card = self.agent_card;
        self.previous_env_card = self.env_card;
        self.previous_env_action = self.env_action;

        self.agent_card = Self::random_card(rng);
        self.env_card = self.agent_card;
        while self.env_card == self.agent_card {
            self.env_card = Self::random_card(rng);
        }

        self.env_action = match self.env_card {
            Self::O_JACK => {
                if rng.r01() < Self::BET_PROB_JACK {
                    Self::A_BET
                } else {
                    Self::A_PASS
                }
            }
            Self::O_QUEEN => Self::A_PASS,
            _ => {
                if rng.r01() < Self::BET_PROB_KING {
                    Self::A_BET
                } else {
                    Self::A_PASS
                }
            }
        };

        self.observation = self.agent_card
            + if self.env_action == Self::A_PASS {
                Self::O_PASS
            } else {
                Self::O_BET
            };
    }
}

impl Environment for KuhnPoker {
    fn max_action(&self) -> u32 {
        1
    }

    fn max_observation(&self) -> u32 {
        6
    }

    fn max_reward(&self) -> u32 {
        4
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

        // Folding against a bet loses the ante outright.
        if action == Self::A_PASS && self.env_action == Self::A_BET {
            self.reward = Self::R_PASS_LOSS;
            self.deal(rng);
            return;
        }

        // If the opponent passed and the agent bets, the opponent may
        // change its mind: always with a king, sometimes with a queen.
        if action == Self::A_BET && self.env_action == Self::A_PASS {
            if self.env_card == Self::O_QUEEN && rng.r01() < Self::BET_PROB_QUEEN {
                self.env_action = Self::A_BET;
            } else if self.env_card == Self::O_KING {
                self.env_action = Self::A_BET;
            } else {
                self.reward = Self::R_PASS_WIN;
                self.deal(rng);
                return;
            }
        }

        // Showdown: equal stakes, the higher card wins.
        let agent_wins = self.env_card == Self::O_JACK
            || (self.env_card == Self::O_QUEEN && self.agent_card == Self::O_KING);
        self.reward = if agent_wins {
            if self.env_action == Self::A_BET {
                Self::R_BET_WIN
            } else {
                Self::R_PASS_WIN
            }
        } else if self.action == Self::A_BET {
            Self::R_BET_LOSS
        } else {
            Self::R_PASS_LOSS
        };
        self.deal(rng);
    }

    fn describe(&self) -> String {
        let card = |c: u32| match c {
            Self::O_JACK => "jack",
            Self::O_QUEEN => "queen",
            _ => "king",
        };
        let agent_wins = self.reward == Self::R_PASS_WIN || self.reward == Self::R_BET_WIN;
        format!(
            "agent card = {}, environment card = {}, agent {}, environment {}, agent {} (reward = {})",
            card(self.previous_agent_card),
            card(self.previous_env_card),
            if self.action == Self::A_PASS { "passes" } else { "bets" },
            if self.previous_env_action == Self::A_PASS { "passes" } else { "bets" },
            if agent_wins { "wins" } else { "loses" },
            self.reward
        )
    }
}
