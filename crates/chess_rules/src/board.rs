//! Board state and square queries
//!
//! `Board` is the single authoritative position a searcher mutates in place.
//! Besides piece placement it tracks side to move, castling rights, the en
//! passant target, the move clocks, and the undo history that lets
//! [`Board::undo`](crate::make_unmake) restore earlier positions exactly.

use std::fmt;

use crate::constants::*;
use crate::make_unmake::UndoInfo;
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) squares: [i8; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: u8,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) history: Vec<UndoInfo>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Two boards are equal when they describe the same position; the undo
/// history is not part of the position.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Board {}

impl Board {
    /// Standard starting position
    pub fn new() -> Self {
        Board {
            squares: SETUP,
            side_to_move: Color::White,
            castling: CASTLE_ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    /// Board with no pieces, White to move, no castling rights
    pub fn empty() -> Self {
        Board {
            squares: [VOID_ID; 64],
            side_to_move: Color::White,
            castling: 0,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> i8 {
        self.squares[square as usize]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square as usize] == VOID_ID
    }

    /// Place (or clear, with `VOID_ID`) a piece. Intended for position setup.
    pub fn set_piece(&mut self, square: Square, piece: i8) {
        self.squares[square as usize] = piece;
    }

    #[inline]
    pub fn squares(&self) -> &[i8; 64] {
        &self.squares
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Number of moves applied since this board was set up
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Most recently applied move still on the undo stack
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|undo| undo.mv)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = KING_ID * color.sign();
        self.squares
            .iter()
            .position(|&piece| piece == king)
            .map(|square| square as Square)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let piece = self.squares[(rank * 8 + file) as usize];
                let ch = FIG_CHARS[piece.unsigned_abs() as usize];
                let ch = if piece > 0 { ch.to_ascii_uppercase() } else { ch };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h  ({} to move)", self.side_to_move)
    }
}
