//! Ping-pong traversal over a fixed chain of shapes.
//!
//! Only the current node animates. Each completed transition moves the
//! cursor one node along the traversal direction; at either end of the
//! chain the direction flips and the cursor stays put, so the boundary
//! node plays its transition back on the next trigger.

pub mod node;
pub mod state;

use log::debug;
use node::Node;
pub use state::{Motion, State, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chain {
    nodes: Vec<Node>,
    current: usize,
    dir: Direction,
}

impl Chain {
    /// Chain of `len` nodes starting at the head, moving forward.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "chain needs at least one node");
        Self {
            nodes: Node::build_chain(len),
            current: 0,
            dir: Direction::Forward,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn current(&self) -> &Node {
        &self.nodes[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Moves to the neighbor in the traversal direction, or reverses the
    /// direction when the current node is a boundary.
    pub fn advance(&mut self) {
        match self.nodes[self.current].neighbor(self.dir) {
            Some(next) => {
                debug!("chain: node {} -> {}", self.current, next);
                self.current = next;
            }
            None => {
                self.dir = self.dir.reversed();
                debug!("chain: boundary at node {}, now {:?}", self.current, self.dir);
            }
        }
    }

    pub fn update(&mut self, gap: f32) -> Transition {
        let transition = self.nodes[self.current].state.update(gap);
        if transition == Transition::Completed {
            self.advance();
        }
        transition
    }

    pub fn start_updating(&mut self) -> Transition {
        self.nodes[self.current].state.start_updating()
    }
}
