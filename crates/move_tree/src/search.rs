//! # Search Driver
//!
//! Depth-bounded minimax over the move tree.
//!
//! ## Algorithm
//!
//! For a node and a remaining depth:
//!
//! 1. Expand the node if it has not been evaluated yet
//! 2. At depth 0, or with no children, the compound score is the base score
//! 3. Otherwise apply each child's move, search the child one ply shallower,
//!    then undo the move
//! 4. Once every child is done the compound score becomes the best child
//!    score for the side to move: maximum for White, minimum for Black
//!
//! Scores are absolute (positive favours White) at every ply, so the role
//! flips with the side to move rather than by negating scores. A node's
//! compound score is written once per completed subtree; readers may see the
//! previous value while a search is still running below it.
//!
//! ## Parallel search
//!
//! [`SearchDriver::search_parallel`] expands the root, then hands its
//! children to worker threads through a `crossbeam-channel` queue. Each
//! worker walks its own clone of the position. Tree nodes are shared and
//! protected by their own locks; root children are disjoint subtrees, so
//! the result is the same as a serial search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chess_rules::{Color, Move, Score};
use tracing::{debug, error, info};

use crate::adapter::Position;
use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::node::MoveTreeNode;
use crate::tie_break::{FirstCandidate, RandomTieBreak, TieBreak};
use crate::tree::MoveTree;

/// Node counters for one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes the search passed through
    pub visited: u64,
    /// Nodes expanded by this search (already expanded nodes are reused)
    pub expanded: u64,
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.visited += other.visited;
        self.expanded += other.expanded;
    }
}

/// Result of [`SearchDriver::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the root position has no legal moves
    pub best_move: Option<Move>,
    /// Compound score of the root, positive favouring White
    pub score: Score,
    pub depth: u32,
    pub stats: SearchStats,
    /// Nodes held by the tree after the search
    pub tree_nodes: usize,
}

/// Better of two scores for `side`
#[inline]
fn prefer(side: Color, a: Score, b: Score) -> Score {
    match side {
        Color::White => a.max(b),
        Color::Black => a.min(b),
    }
}

/// Set `node`'s compound score from its searched children
fn backpropagate(node: &MoveTreeNode, children: &[Arc<MoveTreeNode>], side: Color) {
    let best = children
        .iter()
        .map(|child| child.compound_score())
        .reduce(|a, b| prefer(side, a, b));
    match best {
        Some(score) => node.set_compound_score(score),
        None => node.reset_compound_score(),
    }
}

/// Apply `mv`, search `child` below it, then undo `mv`
fn search_child<P: Position + ?Sized>(
    child: &Arc<MoveTreeNode>,
    position: &mut P,
    depth: u32,
    stats: &mut SearchStats,
) -> SearchResult<()> {
    let mv = child.mv();
    position.apply(mv).map_err(|source| SearchError::ApplyFailed {
        mv: mv.to_string(),
        source,
    })?;
    SearchDriver::search(child, position, depth, stats)?;
    position.undo(mv).map_err(|source| SearchError::UndoFailed {
        mv: mv.to_string(),
        source,
    })
}

pub struct SearchDriver {
    config: SearchConfig,
    tie_break: Box<dyn TieBreak>,
}

impl SearchDriver {
    pub fn new(config: SearchConfig) -> Self {
        let tie_break: Box<dyn TieBreak> = if config.random {
            Box::new(RandomTieBreak::new(config.seed))
        } else {
            Box::new(FirstCandidate)
        };
        SearchDriver { config, tie_break }
    }

    pub fn with_tie_break(config: SearchConfig, tie_break: Box<dyn TieBreak>) -> Self {
        SearchDriver { config, tie_break }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the configuration, rebuilding the tie-break strategy
    pub fn set_config(&mut self, config: SearchConfig) {
        *self = SearchDriver::new(config);
    }

    /// Search `node` to `depth` plies on the calling thread
    ///
    /// `position` must stand for `node` and is returned to that state on
    /// success.
    ///
    /// # Errors
    ///
    /// Apply or undo failures from the rules engine. The search stops at the
    /// first failure and `position` is left wherever it stopped.
    pub fn search<P: Position + ?Sized>(
        node: &Arc<MoveTreeNode>,
        position: &mut P,
        depth: u32,
        stats: &mut SearchStats,
    ) -> SearchResult<()> {
        stats.visited += 1;
        if node.expand_and_evaluate(position) {
            stats.expanded += 1;
        }

        let children = node.children();
        if depth == 0 || children.is_empty() {
            node.reset_compound_score();
            return Ok(());
        }

        let side = position.side_to_move();
        for child in &children {
            search_child(child, position, depth - 1, stats)?;
        }
        backpropagate(node, &children, side);
        Ok(())
    }

    /// Search the root with its children split across worker threads
    ///
    /// Each worker clones `position` once and walks only the subtrees it
    /// takes from the queue.
    pub fn search_parallel<P>(
        &self,
        root: &Arc<MoveTreeNode>,
        position: &mut P,
        depth: u32,
    ) -> SearchResult<SearchStats>
    where
        P: Position + Clone + Send,
    {
        let mut stats = SearchStats::default();
        let workers = self.config.effective_workers();
        if depth == 0 || workers <= 1 {
            SearchDriver::search(root, position, depth, &mut stats)?;
            return Ok(stats);
        }

        stats.visited += 1;
        if root.expand_and_evaluate(position) {
            stats.expanded += 1;
        }
        let children = root.children();
        if children.is_empty() {
            root.reset_compound_score();
            return Ok(stats);
        }

        let workers = workers.min(children.len());
        let (sender, receiver) = crossbeam_channel::bounded(children.len());
        for child in children.iter().cloned() {
            if sender.send(child).is_err() {
                break;
            }
        }
        drop(sender);

        debug!(
            "[SEARCH] {} root moves across {} workers, depth {}",
            children.len(),
            workers,
            depth
        );

        let failed = AtomicBool::new(false);
        let results: Vec<SearchResult<SearchStats>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let receiver = receiver.clone();
                    let mut walker = position.clone();
                    let failed = &failed;
                    scope.spawn(move || {
                        let mut stats = SearchStats::default();
                        for child in receiver.iter() {
                            if failed.load(Ordering::Relaxed) {
                                break;
                            }
                            if let Err(err) = search_child(&child, &mut walker, depth - 1, &mut stats) {
                                failed.store(true, Ordering::Relaxed);
                                return Err(err);
                            }
                        }
                        Ok(stats)
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle
                        .join()
                        .unwrap_or(Err(SearchError::WorkerPanicked { worker }))
                })
                .collect()
        });

        for result in results {
            stats.merge(result?);
        }
        backpropagate(root, &children, position.side_to_move());
        Ok(stats)
    }

    /// Best root move for `side`, ties resolved by the tie-break strategy
    pub fn select_best(&mut self, root: &MoveTreeNode, side: Color) -> Option<(Move, Score)> {
        let scored: Vec<(Move, Score)> = root
            .children()
            .iter()
            .map(|child| (child.mv(), child.compound_score()))
            .collect();
        let best = scored
            .iter()
            .map(|&(_, score)| score)
            .reduce(|a, b| prefer(side, a, b))?;
        let candidates: Vec<Move> = scored
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(mv, _)| mv)
            .collect();
        self.tie_break.choose(&candidates).map(|mv| (mv, best))
    }

    /// Full search of the tree's root to the configured depth
    pub fn run<P>(&mut self, tree: &MoveTree, position: &mut P) -> SearchResult<SearchOutcome>
    where
        P: Position + Clone + Send,
    {
        let depth = self.config.max_search_depth;
        self.run_to_depth(tree, position, depth)
    }

    /// Full search of the tree's root to `depth` plies
    pub fn run_to_depth<P>(
        &mut self,
        tree: &MoveTree,
        position: &mut P,
        depth: u32,
    ) -> SearchResult<SearchOutcome>
    where
        P: Position + Clone + Send,
    {
        tree.enforce_budget();
        let root = tree.root();
        let started = Instant::now();

        let stats = self.search_parallel(&root, position, depth).map_err(|err| {
            error!("[SEARCH] search aborted: {}", err);
            err
        })?;

        let side = position.side_to_move();
        let best = self.select_best(&root, side);
        let outcome = SearchOutcome {
            best_move: best.map(|(mv, _)| mv),
            score: root.compound_score(),
            depth,
            stats,
            tree_nodes: tree.node_count(),
        };

        info!(
            "[SEARCH] depth {} best {} score {} ({} visited, {} expanded, {} in tree, tie-break {}) in {:?}",
            depth,
            outcome.best_move.unwrap_or(Move::NONE),
            outcome.score,
            stats.visited,
            stats.expanded,
            outcome.tree_nodes,
            self.tie_break.name(),
            started.elapsed()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_rules::{Board, MATE_SCORE};

    #[test]
    fn test_depth_zero_keeps_base_score() {
        let root = MoveTreeNode::new_root();
        let mut board = Board::new();
        let mut stats = SearchStats::default();
        SearchDriver::search(&root, &mut board, 0, &mut stats).unwrap();
        assert_eq!(root.compound_score(), root.base_score());
        assert_eq!(stats.visited, 1);
        assert_eq!(root.child_count(), 20, "depth 0 still expands the node");
    }

    #[test]
    fn test_search_restores_position() {
        let root = MoveTreeNode::new_root();
        let mut board = Board::new();
        let mut stats = SearchStats::default();
        SearchDriver::search(&root, &mut board, 2, &mut stats).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(board.ply_count(), 0);
        assert_eq!(stats.expanded, 1 + 20 + 400);
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Rd1-d8 mates on the back rank
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1").unwrap();
        let tree = MoveTree::new();
        let mut driver = SearchDriver::new(SearchConfig {
            max_search_depth: 1,
            ..SearchConfig::default()
        });
        let outcome = driver.run(&tree, &mut board).unwrap();
        assert_eq!(outcome.best_move.map(|mv| mv.to_string()), Some("d1d8".to_string()));
        assert_eq!(outcome.score, MATE_SCORE);
    }

    #[test]
    fn test_black_minimises() {
        // Black queen can take the undefended white queen
        let mut board = Board::from_fen("3qk3/8/8/8/8/8/8/3Q3K b - - 0 1").unwrap();
        let tree = MoveTree::new();
        let mut driver = SearchDriver::new(SearchConfig {
            max_search_depth: 1,
            ..SearchConfig::default()
        });
        let outcome = driver.run(&tree, &mut board).unwrap();
        assert_eq!(outcome.best_move.map(|mv| mv.to_string()), Some("d8d1".to_string()));
        assert!(outcome.score < 0, "Black is a queen up after the capture");
    }

    #[test]
    fn test_no_legal_moves_gives_no_best_move() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let tree = MoveTree::new();
        let mut driver = SearchDriver::new(SearchConfig::default());
        let outcome = driver.run(&tree, &mut board).unwrap();
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.score, 0, "stalemate");
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut board = Board::new();
        let serial = MoveTreeNode::new_root();
        let mut stats = SearchStats::default();
        SearchDriver::search(&serial, &mut board, 2, &mut stats).unwrap();

        let driver = SearchDriver::new(SearchConfig {
            workers: 4,
            ..SearchConfig::default()
        });
        let parallel = MoveTreeNode::new_root();
        let parallel_stats = driver.search_parallel(&parallel, &mut board, 2).unwrap();

        assert_eq!(parallel.compound_score(), serial.compound_score());
        assert_eq!(parallel_stats.expanded, stats.expanded);
        for (a, b) in serial.children().iter().zip(parallel.children().iter()) {
            assert_eq!(a.snapshot(), b.snapshot());
        }
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_first_candidate_breaks_ties_in_child_order() {
        let mut board = Board::new();
        let root = MoveTreeNode::new_root();
        let mut stats = SearchStats::default();
        SearchDriver::search(&root, &mut board, 1, &mut stats).unwrap();
        let mut driver = SearchDriver::new(SearchConfig::default());
        let (mv, score) = driver.select_best(&root, Color::White).unwrap();
        let first_best = root
            .children()
            .into_iter()
            .find(|child| child.compound_score() == score)
            .map(|child| child.mv());
        assert_eq!(Some(mv), first_best);
    }
}
