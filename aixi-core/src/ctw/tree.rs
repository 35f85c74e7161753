//! The context tree: history, lazily grown suffix tree, and the log-domain
//! probability machinery.
//!
//! Updating with a symbol touches the D+1 nodes on the current context path
//! (the path selected by the D most recent history bits), deepest first, so
//! every parent recomputes its weighted probability from fresh children.
//! `revert` runs the same walk backwards and deletes nodes whose visit
//! counts return to zero, which makes update/revert pairs exact inverses —
//! the property the planner's simulate-then-undo loop depends on.

use crate::bits::{Symbol, SymbolList};
use crate::ctw::arena::CtwArena;
use crate::ctw::node::{CtwNode, NodeId};
use crate::rng::AgentRng;

const LOG_HALF: f64 = -std::f64::consts::LN_2;

#[derive(Debug, Clone)]
pub struct ContextTree {
    arena: CtwArena,
    root: NodeId,
    history: SymbolList,
    depth: usize,
    /// Scratch for the D+1 nodes on the current context path, root first.
    /// Only valid between `update_context` and the traversal that follows.
    context: Vec<NodeId>,
}

impl ContextTree {
    /// Create a context tree of maximum depth `depth`. Only the root is
    /// allocated; deeper nodes appear lazily as contexts are observed.
    ///
    /// # Panics
    /// Panics if `depth == 0`.
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0, "context tree depth must be > 0");
        let mut arena = CtwArena::new();
        let root = arena.alloc();
        Self {
            arena,
            root,
            history: SymbolList::new(),
            depth,
            context: vec![root; depth + 1],
        }
    }

    /// Drop all nodes and history, leaving a fresh root.
    pub fn clear(&mut self) {
        self.history.clear();
        self.arena.release_subtree(self.root);
        self.root = self.arena.alloc();
    }

    /// Learn a single symbol: update the D+1 context-path nodes (deepest
    /// first), then append the symbol to the history. While the history is
    /// still shorter than D the tree is left untouched.
    pub fn update(&mut self, symbol: Symbol) {
        if self.history.len() >= self.depth {
            self.update_context();
            for i in (0..=self.depth).rev() {
                self.node_update(self.context[i], symbol);
            }
        }
        self.history.push(symbol);
    }

    /// Learn a sequence of symbols in order.
    pub fn update_seq(&mut self, symbols: &[Symbol]) {
        for &s in symbols {
            self.update(s);
        }
    }

    /// Append a symbol to the history without touching the tree. Used for
    /// agent actions, which are self-produced rather than modeled.
    pub fn update_history(&mut self, symbol: Symbol) {
        self.history.push(symbol);
    }

    /// Append a sequence to the history without touching the tree.
    pub fn update_history_seq(&mut self, symbols: &[Symbol]) {
        self.history.extend_from_slice(symbols);
    }

    /// Undo the most recent `update`. A no-op on an empty history.
    pub fn revert(&mut self) {
        let Some(symbol) = self.history.pop() else {
            return;
        };
        if self.history.len() >= self.depth {
            self.update_context();
            for i in (0..=self.depth).rev() {
                self.node_revert(self.context[i], symbol);
            }
        }
    }

    /// Undo the `n` most recent updates.
    pub fn revert_n(&mut self, n: usize) {
        for _ in 0..n {
            self.revert();
        }
    }

    /// Shrink the history by `n` symbols without touching the tree.
    ///
    /// # Panics
    /// Panics if `n` exceeds the history length.
    pub fn revert_history(&mut self, n: usize) {
        assert!(n <= self.history.len(), "revert_history past the start");
        self.history.truncate(self.history.len() - n);
    }

    /// Conditional probability of observing `symbol` next, given the
    /// history: `rho(s | h) = rho(hs) / rho(h)`, evaluated at the root.
    /// Returns 1/2 while there is not yet enough context.
    pub fn predict(&mut self, symbol: Symbol) -> f64 {
        if self.history.len() < self.depth {
            return 0.5;
        }
        let log_prob_history = self.log_block_probability();
        self.update(symbol);
        let log_prob_sequence = self.log_block_probability();
        self.revert();
        (log_prob_sequence - log_prob_history).exp()
    }

    /// Conditional probability of observing a sequence of symbols next.
    /// Uniform (`0.5^len`) while history plus sequence still fit within D.
    pub fn predict_seq(&mut self, symbols: &[Symbol]) -> f64 {
        if self.history.len() + symbols.len() <= self.depth {
            return 0.5f64.powi(symbols.len() as i32);
        }
        let log_prob_history = self.log_block_probability();
        self.update_seq(symbols);
        let log_prob_sequence = self.log_block_probability();
        self.revert_n(symbols.len());
        (log_prob_sequence - log_prob_history).exp()
    }

    /// Sample `bits` symbols from the tree statistics, learning each one as
    /// it is drawn. The sampled symbols are appended to `out`.
    pub fn gen_random_symbols_and_update(
        &mut self,
        rng: &mut AgentRng,
        out: &mut SymbolList,
        bits: usize,
    ) {
        for _ in 0..bits {
            let symbol = rng.r01() < self.predict(true);
            self.update(symbol);
            out.push(symbol);
        }
    }

    /// Sample `bits` symbols, then revert the updates so the tree is left
    /// exactly as it was before the call.
    pub fn gen_random_symbols(&mut self, rng: &mut AgentRng, out: &mut SymbolList, bits: usize) {
        self.gen_random_symbols_and_update(rng, out, bits);
        self.revert_n(bits);
    }

    /// The log block probability of the whole history: `ln P_w` at the root.
    pub fn log_block_probability(&self) -> f64 {
        self.arena.get(self.root).log_prob()
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.arena.live()
    }

    pub fn history_size(&self) -> usize {
        self.history.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &CtwNode {
        self.arena.get(id)
    }

    /// Fill `context` with the nodes on the current context path:
    /// `context[0]` is the root, `context[depth]` the leaf reached by
    /// descending along the most recent history bits (most recent first).
    /// Missing nodes are created on demand.
    fn update_context(&mut self) {
        debug_assert!(self.history.len() >= self.depth);
        self.context[0] = self.root;
        let mut node = self.root;
        for i in 1..=self.depth {
            let symbol = self.history[self.history.len() - i];
            let slot = symbol as usize;
            node = match self.arena.get(node).child[slot] {
                Some(child) => child,
                None => {
                    let child = self.arena.alloc();
                    self.arena.get_mut(node).child[slot] = Some(child);
                    child
                }
            };
            self.context[i] = node;
        }
    }

    /// `ln ((count[s] + 1/2) / (visits + 1))`: the KT update multiplier for
    /// observing `symbol` next at `id`, given the current counts.
    fn log_kt_multiplier(&self, id: NodeId, symbol: Symbol) -> f64 {
        let node = self.arena.get(id);
        let numerator = node.count[symbol as usize] as f64 + 0.5;
        let denominator = node.visits() as f64 + 1.0;
        (numerator / denominator).ln()
    }

    /// Observe `symbol` at `id`: fold the multiplier into the KT estimate,
    /// recompute the weighted probability, then bump the count. The
    /// multiplier must be evaluated before the count changes.
    fn node_update(&mut self, id: NodeId, symbol: Symbol) {
        let multiplier = self.log_kt_multiplier(id, symbol);
        self.arena.get_mut(id).log_kt += multiplier;
        self.refresh_log_probability(id);
        self.arena.get_mut(id).count[symbol as usize] += 1;
    }

    /// Undo the most recent `node_update(id, symbol)`: drop the count back,
    /// delete the `symbol` child if its visits returned to zero, then
    /// subtract the same multiplier `node_update` added (the decremented
    /// counts reproduce it) and recompute the weighted probability.
    fn node_revert(&mut self, id: NodeId, symbol: Symbol) {
        let slot = symbol as usize;
        self.arena.get_mut(id).count[slot] -= 1;
        if let Some(child) = self.arena.get(id).child[slot] {
            if self.arena.get(child).visits() == 0 {
                self.arena.release_subtree(child);
                self.arena.get_mut(id).child[slot] = None;
            }
        }
        let multiplier = self.log_kt_multiplier(id, symbol);
        self.arena.get_mut(id).log_kt -= multiplier;
        self.refresh_log_probability(id);
    }

    /// Recompute `log_prob` at `id` from its KT estimate and children:
    /// `ln Pr_kt` at a leaf, otherwise the half-and-half mixture
    /// `ln(1/2) + max + ln(1 + exp(min - max))` with `max`/`min` over the
    /// KT estimate and the product of the child probabilities. Ordering by
    /// magnitude keeps the exponent non-positive.
    fn refresh_log_probability(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        let new_log_prob = if node.is_leaf() {
            node.log_kt
        } else {
            let mut log_child_prob = 0.0;
            for slot in 0..2 {
                if let Some(child) = node.child[slot] {
                    log_child_prob += self.arena.get(child).log_prob;
                }
            }
            let a = node.log_kt.max(log_child_prob);
            let b = node.log_kt.min(log_child_prob);
            LOG_HALF + a + (b - a).exp().ln_1p()
        };
        self.arena.get_mut(id).log_prob = new_log_prob;
    }
}
