//! Attack detection and square checking
//!
//! Provides functions to check if squares are under attack and if kings are in check.
//! This module is critical for move legality validation, castling, and check detection.
//!
//! ## Algorithm
//!
//! To check if a square is attacked, we look outward from the target square: a
//! knight step that lands on an enemy knight, a ray that first meets an enemy
//! rook/queen (or bishop/queen on diagonals), an adjacent enemy king, or an
//! enemy pawn one rank "behind" diagonally. This touches at most a few dozen
//! squares instead of scanning every enemy piece.

use crate::board::Board;
use crate::constants::*;
use crate::types::*;

/// Check if a square is under attack by pieces of the specified color
///
/// # Arguments
///
/// * `board` - The current position
/// * `square` - Target square index (0-63) to check
/// * `by` - Color of pieces that might attack
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    let sign = by.sign();

    // An attacking pawn sits one rank behind the target, from the attacker's view
    let pawn = PAWN_ID * sign;
    for df in [-1, 1] {
        if let Some(from) = offset_square(square, df, -by.pawn_step()) {
            if board.piece_at(from) == pawn {
                return true;
            }
        }
    }

    let knight = KNIGHT_ID * sign;
    for &(df, dr) in &KNIGHT_STEPS {
        if let Some(from) = offset_square(square, df, dr) {
            if board.piece_at(from) == knight {
                return true;
            }
        }
    }

    let king = KING_ID * sign;
    for &(df, dr) in &KING_STEPS {
        if let Some(from) = offset_square(square, df, dr) {
            if board.piece_at(from) == king {
                return true;
            }
        }
    }

    let queen = QUEEN_ID * sign;
    let rook = ROOK_ID * sign;
    let bishop = BISHOP_ID * sign;

    ray_hits(board, square, &ROOK_DIRS, rook, queen)
        || ray_hits(board, square, &BISHOP_DIRS, bishop, queen)
}

/// First piece met along each ray is one of the two given slider codes
fn ray_hits(board: &Board, square: Square, dirs: &[(i8, i8)], slider: i8, queen: i8) -> bool {
    for &(df, dr) in dirs {
        let mut current = square;
        while let Some(next) = offset_square(current, df, dr) {
            let piece = board.piece_at(next);
            if piece != VOID_ID {
                if piece == slider || piece == queen {
                    return true;
                }
                break;
            }
            current = next;
        }
    }
    false
}

/// Check if the king of a color is in check
///
/// A side without a king is never in check; setup positions in tests may
/// omit kings, the FEN parser never does.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(king) => is_square_attacked(board, king, color.opponent()),
        None => false,
    }
}
