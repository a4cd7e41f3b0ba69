//! # Move Tree Node
//!
//! A node stands for the position reached from the root by the moves on its
//! path. It is created unevaluated by its parent's expansion, expanded at
//! most once, and destroyed together with its subtree.
//!
//! ## Ownership
//!
//! - A parent owns its children (`Vec<Arc<MoveTreeNode>>`)
//! - A child points back at its parent through a `Weak`, so dropping a
//!   subtree never leaks through a reference cycle
//! - Walkers hold `Arc` clones while they work, which keeps a node alive
//!   even if a concurrent prune detaches it from the tree
//!
//! ## Locking
//!
//! All mutable fields sit behind one `parking_lot::Mutex`, so readers see
//! either the whole unevaluated state or the whole evaluated one. No method
//! holds a node's lock while locking another node.

use std::sync::{Arc, Weak};

use chess_rules::{Move, Score};
use parking_lot::Mutex;
use tracing::trace;

use crate::adapter::Position;

#[derive(Debug)]
struct NodeState {
    parent: Weak<MoveTreeNode>,
    mv: Move,
    evaluated: bool,
    base_score: Score,
    compound_score: Score,
    children: Vec<Arc<MoveTreeNode>>,
}

impl NodeState {
    fn fresh(parent: Weak<MoveTreeNode>, mv: Move) -> Self {
        NodeState {
            parent,
            mv: if mv.is_valid() { mv } else { Move::NONE },
            evaluated: false,
            base_score: 0,
            compound_score: 0,
            children: Vec::new(),
        }
    }
}

/// Consistent copy of a node's fields taken under one lock acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub mv: Move,
    pub evaluated: bool,
    pub base_score: Score,
    pub compound_score: Score,
    pub child_count: usize,
}

#[derive(Debug)]
pub struct MoveTreeNode {
    state: Mutex<NodeState>,
}

impl MoveTreeNode {
    /// Unevaluated root: no parent, no move
    pub fn new_root() -> Arc<Self> {
        Arc::new(MoveTreeNode {
            state: Mutex::new(NodeState::fresh(Weak::new(), Move::NONE)),
        })
    }

    /// Unevaluated child of `parent` reached by `mv`
    ///
    /// An invalid `mv` is stored as [`Move::NONE`]. The node is not shared
    /// with anyone until this returns.
    pub fn init(parent: &Arc<MoveTreeNode>, mv: Move) -> Arc<Self> {
        Arc::new(MoveTreeNode {
            state: Mutex::new(NodeState::fresh(Arc::downgrade(parent), mv)),
        })
    }

    /// Score the node and create one unevaluated child per legal move
    ///
    /// `position` must be the position this node stands for. Runs at most
    /// once per node: concurrent callers block on the lock and the losers
    /// return `false` without touching the position. A position without
    /// legal moves becomes an evaluated leaf.
    pub fn expand_and_evaluate<P: Position + ?Sized>(self: &Arc<Self>, position: &P) -> bool {
        let mut state = self.state.lock();
        if state.evaluated {
            return false;
        }

        let score = position.static_score();
        let legal = position.legal_moves();
        let children: Vec<Arc<MoveTreeNode>> = legal
            .iter()
            .map(|&mv| MoveTreeNode::init(self, mv))
            .collect();

        trace!(
            "[MOVE_TREE] expanded {} -> {} children, base {}",
            state.mv,
            children.len(),
            score
        );

        state.base_score = score;
        state.compound_score = score;
        state.children = children;
        state.evaluated = true;
        true
    }

    /// Drop the subtree below this node and return it to the unevaluated state
    pub fn unevaluate(&self) {
        let children = {
            let mut state = self.state.lock();
            state.evaluated = false;
            state.base_score = 0;
            state.compound_score = 0;
            std::mem::take(&mut state.children)
        };
        teardown(children);
    }

    /// Tear down this node and everything below it
    ///
    /// Descendants still referenced by a walker stay allocated until the
    /// walker lets go, but they are emptied here and no longer reachable.
    pub fn delete(self: Arc<Self>) {
        let children = {
            let mut state = self.state.lock();
            state.evaluated = false;
            state.parent = Weak::new();
            std::mem::take(&mut state.children)
        };
        teardown(children);
    }

    /// Unlink `child` from this node's children so a teardown leaves it intact
    pub(crate) fn remove_child(&self, child: &Arc<MoveTreeNode>) -> bool {
        let mut state = self.state.lock();
        let before = state.children.len();
        state.children.retain(|c| !Arc::ptr_eq(c, child));
        state.children.len() != before
    }

    /// Turn this node into a root: no parent, no move
    pub(crate) fn detach(&self) {
        let mut state = self.state.lock();
        state.parent = Weak::new();
        state.mv.invalidate();
    }

    pub(crate) fn set_compound_score(&self, score: Score) {
        self.state.lock().compound_score = score;
    }

    pub(crate) fn reset_compound_score(&self) {
        let mut state = self.state.lock();
        state.compound_score = state.base_score;
    }

    pub fn mv(&self) -> Move {
        self.state.lock().mv
    }

    pub fn parent(&self) -> Option<Arc<MoveTreeNode>> {
        self.state.lock().parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.state.lock().parent.upgrade().is_none()
    }

    pub fn is_evaluated(&self) -> bool {
        self.state.lock().evaluated
    }

    pub fn base_score(&self) -> Score {
        self.state.lock().base_score
    }

    pub fn compound_score(&self) -> Score {
        self.state.lock().compound_score
    }

    /// Clones of the child handles, in legal-move order
    pub fn children(&self) -> Vec<Arc<MoveTreeNode>> {
        self.state.lock().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.state.lock().children.len()
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        let state = self.state.lock();
        NodeSnapshot {
            mv: state.mv,
            evaluated: state.evaluated,
            base_score: state.base_score,
            compound_score: state.compound_score,
            child_count: state.children.len(),
        }
    }

    /// Moves leading from the root to this node, root side first
    pub fn path_from_root(&self) -> Vec<Move> {
        let mut path = Vec::new();
        let (mv, mut parent) = {
            let state = self.state.lock();
            (state.mv, state.parent.upgrade())
        };
        if parent.is_some() {
            path.push(mv);
        }
        while let Some(node) = parent {
            let (mv, next) = {
                let state = node.state.lock();
                (state.mv, state.parent.upgrade())
            };
            if next.is_some() {
                path.push(mv);
            }
            parent = next;
        }
        path.reverse();
        path
    }

    /// Number of nodes in the subtree rooted here, this node included
    pub fn subtree_size(&self) -> usize {
        let mut count = 1;
        let mut stack = self.children();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children());
        }
        count
    }
}

/// Empty a detached subtree level by level instead of recursing in `Drop`
fn teardown(children: Vec<Arc<MoveTreeNode>>) {
    let mut stack = children;
    while let Some(node) = stack.pop() {
        let grandchildren = {
            let mut state = node.state.lock();
            state.evaluated = false;
            state.parent = Weak::new();
            std::mem::take(&mut state.children)
        };
        stack.extend(grandchildren);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::{Board, MATE_SCORE};

    #[test]
    fn test_new_root_is_unevaluated() {
        let root = MoveTreeNode::new_root();
        let snapshot = root.snapshot();
        assert_eq!(snapshot.mv, Move::NONE);
        assert!(!snapshot.evaluated);
        assert_eq!(snapshot.child_count, 0);
        assert!(root.is_root());
        assert!(root.path_from_root().is_empty());
    }

    #[test]
    fn test_init_rejects_invalid_move() {
        let root = MoveTreeNode::new_root();
        let child = MoveTreeNode::init(&root, Move::plain(12, 12));
        assert_eq!(child.mv(), Move::NONE, "src == dst is not a valid move");
        assert!(!child.is_root());
    }

    #[test]
    fn test_expand_is_idempotent() {
        let root = MoveTreeNode::new_root();
        let board = Board::new();
        assert!(root.expand_and_evaluate(&board));
        assert!(!root.expand_and_evaluate(&board), "second call does nothing");
        assert_eq!(root.child_count(), 20);
        for child in root.children() {
            assert!(!child.is_evaluated());
            assert!(child.mv().is_valid());
            let parent = child.parent().unwrap();
            assert!(Arc::ptr_eq(&parent, &root));
        }
    }

    #[test]
    fn test_terminal_position_is_evaluated_leaf() {
        let board = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let root = MoveTreeNode::new_root();
        assert!(root.expand_and_evaluate(&board));
        let snapshot = root.snapshot();
        assert!(snapshot.evaluated);
        assert_eq!(snapshot.child_count, 0);
        assert_eq!(snapshot.base_score, -MATE_SCORE);
        assert_eq!(snapshot.compound_score, snapshot.base_score);
    }

    #[test]
    fn test_unevaluate_drops_subtree() {
        let mut board = Board::new();
        let root = MoveTreeNode::new_root();
        root.expand_and_evaluate(&board);
        let child = root.children()[0].clone();
        board.apply(child.mv()).unwrap();
        child.expand_and_evaluate(&board);
        let grandchild = Arc::downgrade(&child.children()[0]);
        drop(child);

        root.unevaluate();
        assert!(!root.is_evaluated());
        assert_eq!(root.child_count(), 0);
        assert!(grandchild.upgrade().is_none(), "grandchildren are freed");
        assert_eq!(root.subtree_size(), 1);
    }

    #[test]
    fn test_delete_empties_held_descendants() {
        let board = Board::new();
        let root = MoveTreeNode::new_root();
        root.expand_and_evaluate(&board);
        let held = root.children()[3].clone();
        root.delete();
        assert!(held.is_root(), "parent is gone");
        assert!(!held.is_evaluated());
    }

    #[test]
    fn test_path_from_root() {
        let mut board = Board::new();
        let root = MoveTreeNode::new_root();
        root.expand_and_evaluate(&board);
        let child = root.children()[5].clone();
        board.apply(child.mv()).unwrap();
        child.expand_and_evaluate(&board);
        let grandchild = child.children()[2].clone();
        assert_eq!(grandchild.path_from_root(), vec![child.mv(), grandchild.mv()]);
        assert_eq!(root.subtree_size(), 1 + 20 + 20);
    }
}
