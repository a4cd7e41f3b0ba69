//! Board state adapter
//!
//! The search core walks a single live position per thread, moving it down
//! the tree with `apply` and back up with `undo`. [`Position`] is the seam
//! between the tree and the rules engine; anything that can list legal moves,
//! score itself and step forward/back can be searched.

use chess_rules::{static_score, Board, Color, Move, RulesResult, Score};

pub trait Position {
    /// Legal moves in a stable order; this order is the order of a node's children
    fn legal_moves(&self) -> Vec<Move>;

    /// Move the position forward by `mv`
    fn apply(&mut self, mv: Move) -> RulesResult<()>;

    /// Revert `mv`, which must be the most recently applied move
    fn undo(&mut self, mv: Move) -> RulesResult<()>;

    /// Heuristic value, positive favouring White
    fn static_score(&self) -> Score;

    fn side_to_move(&self) -> Color;
}

impl Position for Board {
    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn apply(&mut self, mv: Move) -> RulesResult<()> {
        Board::apply(self, mv)
    }

    fn undo(&mut self, mv: Move) -> RulesResult<()> {
        Board::undo(self, mv)
    }

    fn static_score(&self) -> Score {
        static_score(self)
    }

    fn side_to_move(&self) -> Color {
        Board::side_to_move(self)
    }
}
