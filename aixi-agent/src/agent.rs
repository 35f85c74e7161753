//! The agent: model bookkeeping, percept/action codecs, playout policy,
//! and the search driver.
//!
//! Update order alternates strictly: a percept update must follow an action
//! update and vice versa. Violations are programmer errors and abort.

use aixi_core::bits::{decode, encode, Symbol, SymbolList};
use aixi_core::{AgentConfig, AgentRng, ConfigError, ContextTree, EnvSpec};

use crate::search::SearchTree;

/// Which half of the interaction cycle the model absorbed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Action,
    Percept,
}

/// Snapshot of the agent's bookkeeping, taken before a planning call and
/// restored after every simulation.
#[derive(Debug, Clone, Copy)]
pub struct ModelUndo {
    age: u64,
    total_reward: f64,
    history_size: usize,
    last_update: UpdateKind,
}

impl ModelUndo {
    pub fn of(agent: &Agent) -> Self {
        Self {
            age: agent.age,
            total_reward: agent.total_reward,
            history_size: agent.history_size(),
            last_update: agent.last_update,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    spec: EnvSpec,
    ctw: ContextTree,
    horizon: u32,
    mc_simulations: u32,
    learning_period: u64,
    age: u64,
    total_reward: f64,
    last_update: UpdateKind,
}

impl Agent {
    /// Create an agent for an environment with the given action/percept
    /// ranges. Rejects out-of-range configuration.
    pub fn new(config: &AgentConfig, spec: EnvSpec) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spec,
            ctw: ContextTree::new(config.ct_depth as usize),
            horizon: config.agent_horizon,
            mc_simulations: config.mc_simulations,
            learning_period: config.learning_period,
            age: 0,
            total_reward: 0.0,
            last_update: UpdateKind::Action,
        })
    }

    /// Age in completed cycles.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Reward accumulated over the agent's lifetime.
    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn average_reward(&self) -> f64 {
        if self.age > 0 {
            self.total_reward / self.age as f64
        } else {
            0.0
        }
    }

    pub fn history_size(&self) -> usize {
        self.ctw.history_size()
    }

    /// Search horizon in cycles.
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Number of nodes in the environment model.
    pub fn model_size(&self) -> usize {
        self.ctw.size()
    }

    pub fn max_action(&self) -> u32 {
        self.spec.max_action
    }

    pub fn max_reward(&self) -> u32 {
        self.spec.max_reward
    }

    pub fn learning_period(&self) -> u64 {
        self.learning_period
    }

    /// Absorb a percept from the environment. Learns through the context
    /// tree unless the learning period has expired, in which case the bits
    /// only extend the history.
    pub fn model_update_percept(&mut self, observation: u32, reward: u32) {
        assert_eq!(
            self.last_update,
            UpdateKind::Action,
            "percept update out of order"
        );

        let symbols = self.encode_percept(observation, reward);
        if self.learning_period > 0 && self.age > self.learning_period {
            self.ctw.update_history_seq(&symbols);
        } else {
            self.ctw.update_seq(&symbols);
        }

        self.total_reward += reward as f64;
        self.last_update = UpdateKind::Percept;
    }

    /// Absorb the agent's own action. Self-produced bits are never modeled
    /// as random events, so they extend the history without learning.
    pub fn model_update_action(&mut self, action: u32) {
        assert!(self.spec.is_valid_action(action), "invalid action {action}");
        assert_eq!(
            self.last_update,
            UpdateKind::Percept,
            "action update out of order"
        );

        let symbols = self.encode_action(action);
        self.ctw.update_history_seq(&symbols);

        self.age += 1;
        self.last_update = UpdateKind::Action;
    }

    /// Restore the agent to a snapshot taken earlier in the same cycle
    /// structure. Percept bits are unwound through the tree (they were
    /// learned); action bits only shrink the history.
    pub fn model_revert(&mut self, undo: &ModelUndo) {
        while self.history_size() > undo.history_size {
            if self.last_update == UpdateKind::Percept {
                self.ctw.revert_n(self.spec.percept_bits() as usize);
                self.last_update = UpdateKind::Action;
            } else {
                self.ctw.revert_history(self.spec.action_bits() as usize);
                self.last_update = UpdateKind::Percept;
            }
        }
        self.age = undo.age;
        self.total_reward = undo.total_reward;
        self.last_update = undo.last_update;
    }

    /// Forget everything: model, history, age, reward. The next update must
    /// be a percept, matching an environment that opens with one.
    pub fn reset(&mut self) {
        self.ctw.clear();
        self.age = 0;
        self.total_reward = 0.0;
        self.last_update = UpdateKind::Action;
    }

    /// An action drawn uniformly at random.
    pub fn gen_random_action(&self, rng: &mut AgentRng) -> u32 {
        rng.rand_range(self.spec.max_action + 1)
    }

    /// An action sampled from the agent's model of its own past behaviour.
    /// Leaves the model untouched.
    pub fn gen_action(&mut self, rng: &mut AgentRng) -> u32 {
        assert_eq!(self.last_update, UpdateKind::Percept, "gen_action order");
        let mut symbols = SymbolList::new();
        self.ctw
            .gen_random_symbols(rng, &mut symbols, self.spec.action_bits() as usize);
        self.decode_action(&symbols)
    }

    /// A percept sampled from the model. Leaves the model untouched.
    pub fn gen_percept(&mut self, rng: &mut AgentRng) -> (u32, u32) {
        let mut symbols = SymbolList::new();
        self.ctw
            .gen_random_symbols(rng, &mut symbols, self.spec.percept_bits() as usize);
        self.decode_percept(&symbols)
    }

    /// A percept sampled from the model, which the model then learns as if
    /// the environment had produced it. Accumulates the sampled reward.
    pub fn gen_percept_and_update(&mut self, rng: &mut AgentRng) -> (u32, u32) {
        let mut symbols = SymbolList::new();
        self.ctw
            .gen_random_symbols_and_update(rng, &mut symbols, self.spec.percept_bits() as usize);
        let (observation, reward) = self.decode_percept(&symbols);

        self.total_reward += reward as f64;
        self.last_update = UpdateKind::Percept;
        (observation, reward)
    }

    /// Model probability of the agent selecting `action` next.
    pub fn predicted_action_prob(&mut self, action: u32) -> f64 {
        assert!(self.spec.is_valid_action(action), "invalid action {action}");
        assert_eq!(
            self.last_update,
            UpdateKind::Percept,
            "predicted_action_prob order"
        );
        let symbols = self.encode_action(action);
        self.ctw.predict_seq(&symbols)
    }

    /// Model probability of receiving the percept `(observation, reward)`.
    pub fn percept_probability(&mut self, observation: u32, reward: u32) -> f64 {
        assert_eq!(
            self.last_update,
            UpdateKind::Action,
            "percept_probability order"
        );
        let symbols = self.encode_percept(observation, reward);
        self.ctw.predict_seq(&symbols)
    }

    /// Uniform-random playout: for each remaining cycle, execute a random
    /// action and sample a percept from the model, accumulating reward.
    /// The model mutations (and the reward side effect) are expected to be
    /// undone by the caller's `model_revert`.
    pub fn playout(&mut self, rng: &mut AgentRng, horizon: u32) -> f64 {
        let mut reward = 0.0;
        for _ in 0..horizon {
            let action = self.gen_random_action(rng);
            self.model_update_action(action);

            let (_observation, r) = self.gen_percept_and_update(rng);
            reward += r as f64;
        }
        reward
    }

    /// Plan the next action with rhoUCT: run `mc-simulations` samples
    /// through a fresh search tree, undoing the model after each, then pick
    /// the action whose child has the highest mean (small random
    /// perturbation as tie-break). Falls back to a random action when
    /// nothing was explored.
    pub fn search(&mut self, rng: &mut AgentRng) -> u32 {
        let undo = ModelUndo::of(self);
        let mut tree = SearchTree::new();

        for _ in 0..self.mc_simulations {
            tree.sample(self, rng, self.horizon);
            self.model_revert(&undo);
        }

        let mut best_action = self.gen_random_action(rng);
        let mut best_mean = -1.0;
        for action in 0..=self.spec.max_action {
            if let Some(child) = tree.child(tree.root(), action) {
                let mean = tree.node(child).mean() + rng.r01() * 0.0001;
                if mean > best_mean {
                    best_mean = mean;
                    best_action = action;
                }
            }
        }
        best_action
    }

    fn encode_action(&self, action: u32) -> SymbolList {
        let mut symbols = SymbolList::new();
        encode(&mut symbols, action, self.spec.action_bits());
        symbols
    }

    /// Percept layout on the wire: reward bits first, then observation bits.
    fn encode_percept(&self, observation: u32, reward: u32) -> SymbolList {
        let mut symbols = SymbolList::new();
        encode(&mut symbols, reward, self.spec.reward_bits());
        encode(&mut symbols, observation, self.spec.observation_bits());
        symbols
    }

    /// Decoded actions wrap modulo the action count, so sampled bit
    /// patterns beyond `max_action` still land on a valid action.
    pub(crate) fn decode_action(&self, symbols: &[Symbol]) -> u32 {
        decode(symbols, self.spec.action_bits()) % (self.spec.max_action + 1)
    }

    pub(crate) fn decode_percept(&self, symbols: &[Symbol]) -> (u32, u32) {
        let reward_bits = self.spec.reward_bits() as usize;
        let reward = decode(&symbols[..reward_bits], reward_bits as u32);
        let observation = decode(&symbols[reward_bits..], self.spec.observation_bits());
        (observation, reward)
    }
}
