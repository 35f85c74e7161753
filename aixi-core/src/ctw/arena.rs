//! Arena-backed node storage with a free list.
//!
//! Revert deletes nodes as often as update creates them, so freed slots are
//! recycled instead of growing the backing vector. Subtree release walks an
//! explicit stack; the tree can be D levels deep and recursion is avoided.

use crate::ctw::node::{CtwNode, NodeId};

#[derive(Debug, Clone)]
pub struct CtwArena {
    nodes: Vec<CtwNode>,
    free: Vec<NodeId>,
    live: usize,
}

impl CtwArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn alloc(&mut self) -> NodeId {
        self.live += 1;
        if let Some(id) = self.free.pop() {
            self.nodes[id as usize] = CtwNode::new();
            id
        } else {
            let id = self.nodes.len() as NodeId;
            self.nodes.push(CtwNode::new());
            id
        }
    }

    /// Release `root` and every node reachable below it.
    pub fn release_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            stack.extend(node.child.iter().flatten());
            self.free.push(id);
            self.live -= 1;
        }
    }

    pub fn get(&self, id: NodeId) -> &CtwNode {
        &self.nodes[id as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CtwNode {
        &mut self.nodes[id as usize]
    }
}

impl Default for CtwArena {
    fn default() -> Self {
        Self::new()
    }
}
