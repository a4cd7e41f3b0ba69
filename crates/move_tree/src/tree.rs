//! Move tree manager
//!
//! Owns the root of the search tree across moves of a game. When the game
//! advances by a move the tree already explored, the matching child becomes
//! the new root and its analysis is kept; everything else is dropped.

use std::sync::Arc;

use chess_rules::Move;
use tracing::{debug, info};

use crate::node::MoveTreeNode;

/// Child of `node` reached by `mv`
///
/// `None` when `node` is unevaluated or has no such child.
pub fn find_child_for_move(node: &MoveTreeNode, mv: Move) -> Option<Arc<MoveTreeNode>> {
    if !node.is_evaluated() {
        return None;
    }
    node.children().into_iter().find(|child| child.mv() == mv)
}

#[derive(Debug)]
pub struct MoveTree {
    root: Arc<MoveTreeNode>,
    max_nodes: Option<usize>,
}

impl Default for MoveTree {
    fn default() -> Self {
        MoveTree::new()
    }
}

impl MoveTree {
    pub fn new() -> Self {
        MoveTree {
            root: MoveTreeNode::new_root(),
            max_nodes: None,
        }
    }

    pub fn with_max_nodes(max_nodes: Option<usize>) -> Self {
        MoveTree {
            root: MoveTreeNode::new_root(),
            max_nodes,
        }
    }

    pub fn root(&self) -> Arc<MoveTreeNode> {
        Arc::clone(&self.root)
    }

    pub fn set_max_nodes(&mut self, max_nodes: Option<usize>) {
        self.max_nodes = max_nodes;
    }

    /// Discard the whole tree and start from an unevaluated root
    pub fn reset(&mut self) {
        let old = std::mem::replace(&mut self.root, MoveTreeNode::new_root());
        old.delete();
    }

    /// Move the root one ply forward along `mv`
    ///
    /// Returns `true` when an explored child was reused, `false` when the
    /// tree had to start over. The caller keeps the matching position.
    pub fn advance(&mut self, mv: Move) -> bool {
        match find_child_for_move(&self.root, mv) {
            Some(child) => {
                self.root.remove_child(&child);
                child.detach();
                let old = std::mem::replace(&mut self.root, child);
                old.delete();
                debug!(
                    "[MOVE_TREE] reused subtree for {} ({} nodes)",
                    mv,
                    self.root.subtree_size()
                );
                true
            }
            None => {
                debug!("[MOVE_TREE] no child for {}, starting a fresh tree", mv);
                self.reset();
                false
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Prune below the root's children when the tree is over its node budget
    ///
    /// The root stays expanded, so its child list still matches the legal
    /// moves; only deeper analysis is thrown away. Returns whether anything
    /// was pruned.
    pub fn enforce_budget(&self) -> bool {
        let Some(limit) = self.max_nodes else {
            return false;
        };
        let count = self.node_count();
        if count <= limit {
            return false;
        }
        for child in self.root.children() {
            child.unevaluate();
        }
        info!(
            "[MOVE_TREE] pruned tree from {} to {} nodes (budget {})",
            count,
            self.node_count(),
            limit
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::Board;

    fn expanded_two_plies() -> (MoveTree, Board) {
        let tree = MoveTree::new();
        let mut board = Board::new();
        let root = tree.root();
        root.expand_and_evaluate(&board);
        for child in root.children() {
            board.apply(child.mv()).unwrap();
            child.expand_and_evaluate(&board);
            board.undo(child.mv()).unwrap();
        }
        (tree, board)
    }

    #[test]
    fn test_find_child_requires_evaluation() {
        let tree = MoveTree::new();
        let e4 = Board::new().find_legal_move("e2e4").unwrap();
        assert!(find_child_for_move(&tree.root(), e4).is_none());
    }

    #[test]
    fn test_find_child_by_move() {
        let (tree, board) = expanded_two_plies();
        let e4 = board.find_legal_move("e2e4").unwrap();
        let child = find_child_for_move(&tree.root(), e4).unwrap();
        assert_eq!(child.mv(), e4);
        assert!(find_child_for_move(&tree.root(), Move::plain(0, 63)).is_none());
    }

    #[test]
    fn test_advance_reuses_child() {
        let (mut tree, board) = expanded_two_plies();
        let e4 = board.find_legal_move("e2e4").unwrap();
        assert_eq!(tree.node_count(), 1 + 20 + 400);
        assert!(tree.advance(e4));
        let root = tree.root();
        assert!(root.is_root());
        assert_eq!(root.mv(), Move::NONE);
        assert!(root.is_evaluated());
        assert_eq!(root.child_count(), 20, "reused root keeps its children");
        assert_eq!(tree.node_count(), 21);
    }

    #[test]
    fn test_remove_child_unlinks_only_that_child() {
        let (tree, board) = expanded_two_plies();
        let root = tree.root();
        let e4 = find_child_for_move(&root, board.find_legal_move("e2e4").unwrap()).unwrap();
        assert!(root.remove_child(&e4));
        assert!(!root.remove_child(&e4), "already removed");
        assert_eq!(root.child_count(), 19);
        root.delete();
        assert!(e4.is_evaluated(), "teardown of the old root skips the unlinked child");
        assert_eq!(e4.child_count(), 20);
    }

    #[test]
    fn test_advance_without_match_starts_over() {
        let (mut tree, _) = expanded_two_plies();
        assert!(!tree.advance(Move::plain(0, 63)));
        assert!(!tree.root().is_evaluated());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_budget_prunes_below_root_children() {
        let (mut tree, _) = expanded_two_plies();
        tree.set_max_nodes(Some(100));
        assert!(tree.enforce_budget());
        assert_eq!(tree.node_count(), 21, "root keeps its 20 children");
        assert!(!tree.enforce_budget(), "already within budget");
    }
}
