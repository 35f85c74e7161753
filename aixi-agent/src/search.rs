//! rhoUCT Monte-Carlo search tree.
//!
//! Decision nodes branch on agent actions, chance nodes on observations
//! sampled from the CTW model; the two alternate, and one decision+chance
//! pair consumes one unit of horizon (the decrement happens on the chance
//! edge). The tree lives for a single planning call.
//!
//! Nodes sit in a flat arena; children are keyed by
//! `(parent id, edge value)` in a single map. The simulation walks down
//! collecting the visited path and per-step rewards, then backs the sampled
//! return up the path in reverse — the walk is iterative, so deep horizons
//! cannot overflow the stack.

use aixi_core::AgentRng;
use rustc_hash::FxHashMap;

use crate::agent::Agent;

pub type NodeId = u32;

/// UCB exploration constant.
const EXPLORATION_CONSTANT: f64 = 2.0;

/// Priority assigned to actions with no (or an unvisited) child.
const UNEXPLORED_BIAS: f64 = 1.0e9;

/// Decision nodes branch on actions, chance nodes on observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Decision,
    Chance,
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    kind: NodeKind,
    mean: f64,
    visits: u64,
}

impl SearchNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            mean: 0.0,
            visits: 0,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The sampled expected reward from this node to the horizon.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }
}

pub struct SearchTree {
    nodes: Vec<SearchNode>,
    /// Child lookup: `(parent, action or observation) -> child`.
    children: FxHashMap<(NodeId, u32), NodeId>,
    root: NodeId,
}

impl SearchTree {
    /// A fresh tree rooted at an unvisited decision node.
    pub fn new() -> Self {
        Self {
            nodes: vec![SearchNode::new(NodeKind::Decision)],
            children: FxHashMap::default(),
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id as usize]
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn child(&self, parent: NodeId, index: u32) -> Option<NodeId> {
        self.children.get(&(parent, index)).copied()
    }

    fn child_or_insert(&mut self, parent: NodeId, index: u32, kind: NodeKind) -> NodeId {
        if let Some(&child) = self.children.get(&(parent, index)) {
            return child;
        }
        let child = self.nodes.len() as NodeId;
        self.nodes.push(SearchNode::new(kind));
        self.children.insert((parent, index), child);
        child
    }

    /// Run one simulation of `horizon` future cycles from the root and
    /// return the sampled reward. The agent's model advances along the way;
    /// the caller reverts it afterwards.
    pub fn sample(&mut self, agent: &mut Agent, rng: &mut AgentRng, horizon: u32) -> f64 {
        // (node, reward collected at that node) for every node the walk
        // visited. A node cut off by the horizon is not recorded and so
        // keeps its statistics untouched.
        let mut path: Vec<(NodeId, f64)> = Vec::with_capacity(2 * horizon as usize + 1);
        let mut node = self.root;
        let mut h = horizon;

        loop {
            if h == 0 {
                break;
            }
            match self.nodes[node as usize].kind {
                NodeKind::Chance => {
                    // Sample a percept from the model and follow its edge.
                    let (observation, reward) = agent.gen_percept_and_update(rng);
                    let child = self.child_or_insert(node, observation, NodeKind::Decision);
                    path.push((node, reward as f64));
                    node = child;
                    h -= 1;
                }
                NodeKind::Decision if self.nodes[node as usize].visits == 0 => {
                    // Frontier: estimate the remaining reward by playout.
                    let reward = agent.playout(rng, h);
                    path.push((node, reward));
                    break;
                }
                NodeKind::Decision => {
                    // In-tree: UCB action selection. The horizon is not
                    // consumed until the matching chance step.
                    let action = self.select_action(agent, rng, node);
                    agent.model_update_action(action);
                    let child = self.child_or_insert(node, action, NodeKind::Chance);
                    path.push((node, 0.0));
                    node = child;
                }
            }
        }

        // Back the sampled return up the path: each node's reward is the
        // sum of the step rewards at and below it.
        let mut reward = 0.0;
        for &(id, step_reward) in path.iter().rev() {
            reward += step_reward;
            let node = &mut self.nodes[id as usize];
            node.mean = (reward + node.visits as f64 * node.mean) / (node.visits as f64 + 1.0);
            node.visits += 1;
        }
        reward
    }

    /// UCB action choice at a decision node: unexplored actions get a large
    /// fixed priority, explored ones their mean plus an exploration term
    /// scaled by `horizon * max_reward`. Ties break on a small random
    /// perturbation.
    fn select_action(&self, agent: &Agent, rng: &mut AgentRng, id: NodeId) -> u32 {
        let explore_bias = agent.horizon() as f64 * agent.max_reward() as f64;
        let log_visits = (self.nodes[id as usize].visits as f64).ln();

        let mut best_action = 0;
        let mut best_priority = f64::NEG_INFINITY;
        for action in 0..=agent.max_action() {
            let priority = match self.child(id, action) {
                Some(child) if self.nodes[child as usize].visits > 0 => {
                    let node = &self.nodes[child as usize];
                    node.mean
                        + explore_bias
                            * (EXPLORATION_CONSTANT * log_visits / node.visits as f64).sqrt()
                }
                _ => UNEXPLORED_BIAS,
            };

            if priority > best_priority + rng.r01() * 0.001 {
                best_action = action;
                best_priority = priority;
            }
        }
        best_action
    }
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}
