//! Sideways-and-up window walk
//!
//! Starting from one node, the window grows one sibling at a time in a single
//! direction. When the side is exhausted the window collapses to the parent
//! and growth resumes from there, which lets a search cross tag boundaries
//! (e.g. `<span>¥</span><span>1,000</span>`).

use crate::dom::document::{Document, NodeId};
use std::collections::VecDeque;

/// Upper bound on window evaluations for a single walk
pub const MAX_GROWTH_STEPS: usize = 1000;

/// Which side of the start node the window grows towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards following siblings (text after the symbol)
    Forward,
    /// Towards preceding siblings (text before the symbol)
    Backward,
}

/// Verdict of the growth callback for the current window
#[derive(Debug, Clone, PartialEq)]
pub enum Growth<T> {
    /// The sought value was found; the walk ends with it
    Found(T),
    /// Conclusive non-match; the walk ends empty-handed
    Stop,
    /// Inconclusive; grow the window
    KeepGoing,
}

/// How a walk ended
#[derive(Debug, Clone, PartialEq)]
pub enum WalkOutcome<T> {
    Found(T),
    Stopped,
    /// Climbing failed because the window reached a node without a parent
    ReachedTop,
    /// [`MAX_GROWTH_STEPS`] evaluations without a verdict
    StepLimit,
}

impl<T> WalkOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            WalkOutcome::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Growing,
    WaitingToClimb,
    Done,
}

struct Window {
    nodes: VecDeque<NodeId>,
    /// Node the window was last reset to; climbing goes to its parent
    anchor: NodeId,
    direction: Direction,
}

impl Window {
    fn new(start: NodeId, direction: Direction) -> Self {
        Self {
            nodes: VecDeque::from([start]),
            anchor: start,
            direction,
        }
    }

    /// Add the next sibling on the growth side; false when there is none
    fn grow(&mut self, doc: &Document) -> bool {
        let next = match self.direction {
            Direction::Forward => self.nodes.back().and_then(|&n| doc.next_sibling(n)),
            Direction::Backward => self.nodes.front().and_then(|&n| doc.previous_sibling(n)),
        };
        match (next, self.direction) {
            (Some(node), Direction::Forward) => self.nodes.push_back(node),
            (Some(node), Direction::Backward) => self.nodes.push_front(node),
            (None, _) => return false,
        }
        true
    }

    /// Collapse to `[parent]`; false at the top of the tree
    fn climb(&mut self, doc: &Document) -> bool {
        let Some(parent) = doc.parent(self.anchor) else {
            return false;
        };
        self.anchor = parent;
        self.nodes.clear();
        self.nodes.push_back(parent);
        true
    }
}

/// Walk from `start` in `direction`, asking `on_grow` about every window
pub fn walk<T, F>(doc: &Document, start: NodeId, direction: Direction, mut on_grow: F) -> WalkOutcome<T>
where
    F: FnMut(&[NodeId]) -> Growth<T>,
{
    let mut window = Window::new(start, direction);
    let mut state = WalkState::Growing;
    let mut steps = 0;
    let mut evaluate = true;

    while state != WalkState::Done {
        match state {
            WalkState::Growing => {
                if evaluate {
                    if steps >= MAX_GROWTH_STEPS {
                        log::debug!("walk from {:?} hit the step limit", start);
                        return WalkOutcome::StepLimit;
                    }
                    steps += 1;
                    match on_grow(window.nodes.make_contiguous()) {
                        Growth::Found(value) => return WalkOutcome::Found(value),
                        Growth::Stop => return WalkOutcome::Stopped,
                        Growth::KeepGoing => {}
                    }
                }
                evaluate = window.grow(doc);
                if !evaluate {
                    state = WalkState::WaitingToClimb;
                }
            }
            WalkState::WaitingToClimb => {
                if window.climb(doc) {
                    evaluate = true;
                    state = WalkState::Growing;
                } else {
                    state = WalkState::Done;
                }
            }
            WalkState::Done => {}
        }
    }

    log::debug!("walk from {:?} reached the top of the tree", start);
    WalkOutcome::ReachedTop
}
