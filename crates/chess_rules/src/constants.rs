//! # Rules Constants - Piece Encoding, Values & Board Geometry
//!
//! ## Piece Encoding
//!
//! Squares hold a signed 8-bit piece code:
//! - Positive values (1-6) are white pieces
//! - Negative values (-1 to -6) are black pieces
//! - Zero is an empty square
//!
//! `piece.abs()` yields the piece id and the sign yields the colour, so ownership
//! checks are a single comparison.
//!
//! ## Square Numbering
//!
//! Squares are numbered 0-63 with `a1 = 0`, `h1 = 7`, `a8 = 56`, `h8 = 63`.
//! `file = square % 8`, `rank = square / 8`.
//!
//! ## Centipawn Values
//!
//! - **Pawn**: 100
//! - **Knight**: 300
//! - **Bishop**: 300
//! - **Rook**: 500
//! - **Queen**: 900
//!
//! The king is never counted as material. Checkmate is scored with
//! [`MATE_SCORE`], far outside any reachable material balance.

use crate::types::Score;

pub const VOID_ID: i8 = 0;
pub const PAWN_ID: i8 = 1;
pub const KNIGHT_ID: i8 = 2;
pub const BISHOP_ID: i8 = 3;
pub const ROOK_ID: i8 = 4;
pub const QUEEN_ID: i8 = 5;
pub const KING_ID: i8 = 6;

pub const W_PAWN: i8 = PAWN_ID;
pub const W_KNIGHT: i8 = KNIGHT_ID;
pub const W_BISHOP: i8 = BISHOP_ID;
pub const W_ROOK: i8 = ROOK_ID;
pub const W_QUEEN: i8 = QUEEN_ID;
pub const W_KING: i8 = KING_ID;

pub const B_PAWN: i8 = -PAWN_ID;
pub const B_KNIGHT: i8 = -KNIGHT_ID;
pub const B_BISHOP: i8 = -BISHOP_ID;
pub const B_ROOK: i8 = -ROOK_ID;
pub const B_QUEEN: i8 = -QUEEN_ID;
pub const B_KING: i8 = -KING_ID;

/// Pieces a pawn may promote to, strongest first
pub const PROMOTION_IDS: [i8; 4] = [QUEEN_ID, ROOK_ID, BISHOP_ID, KNIGHT_ID];

pub const VOID_VALUE: Score = 0;
pub const PAWN_VALUE: Score = 100;
pub const KNIGHT_VALUE: Score = 300;
pub const BISHOP_VALUE: Score = 300;
pub const ROOK_VALUE: Score = 500;
pub const QUEEN_VALUE: Score = 900;

pub const FIGURE_VALUE: [Score; KING_ID as usize + 1] = [
    VOID_VALUE,
    PAWN_VALUE,
    KNIGHT_VALUE,
    BISHOP_VALUE,
    ROOK_VALUE,
    QUEEN_VALUE,
    0,
];

/// Score of a checkmated position, from White's point of view when Black is mated
pub const MATE_SCORE: Score = 32_000;

/// Scores beyond this magnitude denote a forced mate
pub const MATE_THRESHOLD: Score = MATE_SCORE / 2;

/// File/rank steps as `(file_delta, rank_delta)`
pub const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2), (-1, 2), (1, -2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];
pub const KING_STEPS: [(i8, i8); 8] = [
    (0, 1), (1, 0), (0, -1), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];
pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const SETUP: [i8; 64] = [
    W_ROOK, W_KNIGHT, W_BISHOP, W_QUEEN, W_KING, W_BISHOP, W_KNIGHT, W_ROOK,
    W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN, W_PAWN,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0,
    B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN, B_PAWN,
    B_ROOK, B_KNIGHT, B_BISHOP, B_QUEEN, B_KING, B_BISHOP, B_KNIGHT, B_ROOK,
];

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const NO_SQUARE: u8 = 64;

pub const A1: u8 = 0;
pub const C1: u8 = 2;
pub const D1: u8 = 3;
pub const E1: u8 = 4;
pub const F1: u8 = 5;
pub const G1: u8 = 6;
pub const H1: u8 = 7;
pub const A8: u8 = 56;
pub const C8: u8 = 58;
pub const D8: u8 = 59;
pub const E8: u8 = 60;
pub const F8: u8 = 61;
pub const G8: u8 = 62;
pub const H8: u8 = 63;

pub const CASTLE_WHITE_KING: u8 = 0b0001;
pub const CASTLE_WHITE_QUEEN: u8 = 0b0010;
pub const CASTLE_BLACK_KING: u8 = 0b0100;
pub const CASTLE_BLACK_QUEEN: u8 = 0b1000;
pub const CASTLE_ALL: u8 = 0b1111;

pub const FIG_CHARS: [char; 7] = ['.', 'p', 'n', 'b', 'r', 'q', 'k'];
