//! Static position evaluation
//!
//! Scores a position in centipawns from White's point of view:
//! - Material count (piece values)
//! - Positional bonuses (piece-square tables)
//! - Terminal detection: the side to move being checkmated scores
//!   [`MATE_SCORE`](crate::constants::MATE_SCORE) against it, stalemate is level
//!
//! ## Module Organization
//!
//! - `pst` - Piece-square tables for positional evaluation
//! - `material` - Material balance evaluation

mod material;
mod pst;

pub use material::evaluate_material;
pub use pst::evaluate_placement;

use crate::board::Board;
use crate::constants::MATE_SCORE;
use crate::types::*;

/// Full static score of `board`, positive favouring White
pub fn static_score(board: &Board) -> Score {
    if !board.has_legal_move() {
        if board.in_check() {
            return match board.side_to_move() {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            };
        }
        return 0;
    }
    evaluate_material(board) + evaluate_placement(board)
}
