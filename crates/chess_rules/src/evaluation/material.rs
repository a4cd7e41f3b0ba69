//! Material evaluation
//!
//! Evaluates the material balance of a position by counting piece values.

use crate::board::Board;
use crate::constants::*;
use crate::types::*;

/// Evaluate material balance
pub fn evaluate_material(board: &Board) -> Score {
    board
        .squares()
        .iter()
        .filter(|&&piece| piece != VOID_ID)
        .map(|&piece| {
            let value = FIGURE_VALUE[piece.unsigned_abs() as usize];
            if piece > 0 {
                value
            } else {
                -value
            }
        })
        .sum()
}
