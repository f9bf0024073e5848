use super::state::State;
use super::Direction;

/// One shape in the chain. Links are arena indices.
#[derive(Debug, Clone)]
pub struct Node {
    index: usize,
    pub(super) state: State,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Node {
    /// Builds the whole chain `0..len` up front.
    pub fn build_chain(len: usize) -> Vec<Node> {
        (0..len)
            .map(|index| Node {
                index,
                state: State::new(),
                prev: index.checked_sub(1),
                next: (index + 1 < len).then_some(index + 1),
            })
            .collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub fn neighbor(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Forward => self.next,
            Direction::Backward => self.prev,
        }
    }
}
