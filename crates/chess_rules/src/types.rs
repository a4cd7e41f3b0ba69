//! # Core Rules Types
//!
//! ## `Move` - A Single Ply
//!
//! A `Move` carries:
//! - **src/dst**: origin and destination squares (0-63, `a1 = 0`)
//! - **flag**: special-move metadata (double push, en passant, castle, promotion)
//!
//! `Move::NONE` is the distinguished "no move" value. It is what the root of a
//! search tree carries, and what [`Move::invalidate`] resets a move to. Every
//! move produced by move generation satisfies [`Move::is_valid`].
//!
//! Moves compare by all fields, so two moves are equal only when origin,
//! destination, and special-move flag agree.
//!
//! ## Text Form
//!
//! `Display` writes long algebraic notation as used by UCI: `e2e4`, `e7e8q`,
//! castling as the king move `e1g1`. The none move prints as `0000`.

use std::fmt;

use crate::constants::*;
use crate::error::{RulesError, RulesResult};

/// Heuristic score in centipawns, positive favouring White
pub type Score = i32;

/// Square index 0-63
pub type Square = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// `1` for White, `-1` for Black; multiplies piece ids into signed codes
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank index (0-7) where this colour's pawns promote
    #[inline]
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank delta of a single pawn push
    #[inline]
    pub fn pawn_step(self) -> i8 {
        self.sign()
    }

    #[inline]
    pub fn piece_belongs(self, piece: i8) -> bool {
        match self {
            Color::White => piece > 0,
            Color::Black => piece < 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Special-move metadata attached to a [`Move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveFlag {
    #[default]
    Plain,
    DoublePush,
    EnPassant,
    Castle,
    /// Promotion to the given piece id (`KNIGHT_ID..=QUEEN_ID`)
    Promotion(i8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub flag: MoveFlag,
}

impl Default for Move {
    fn default() -> Self {
        Move::NONE
    }
}

impl Move {
    pub const NONE: Move = Move {
        src: NO_SQUARE,
        dst: NO_SQUARE,
        flag: MoveFlag::Plain,
    };

    #[inline]
    pub fn new(src: Square, dst: Square, flag: MoveFlag) -> Self {
        Move { src, dst, flag }
    }

    #[inline]
    pub fn plain(src: Square, dst: Square) -> Self {
        Move::new(src, dst, MoveFlag::Plain)
    }

    /// Validity predicate: both squares on the board and distinct
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.src < 64 && self.dst < 64 && self.src != self.dst
    }

    /// Reset this move to [`Move::NONE`]
    #[inline]
    pub fn invalidate(&mut self) {
        *self = Move::NONE;
    }

    #[inline]
    pub fn promotion(&self) -> Option<i8> {
        match self.flag {
            MoveFlag::Promotion(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", square_name(self.src), square_name(self.dst))?;
        if let Some(id) = self.promotion() {
            write!(f, "{}", FIG_CHARS[id as usize])?;
        }
        Ok(())
    }
}

/// The squares and promotion piece a move text names, before it is matched
/// against the legal moves of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveText {
    pub src: Square,
    pub dst: Square,
    pub promotion: Option<i8>,
}

impl MoveText {
    pub fn parse(text: &str) -> RulesResult<Self> {
        let invalid = || RulesError::InvalidMoveText {
            text: text.to_string(),
        };
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(invalid());
        }
        let src = parse_square(&text[0..2]).map_err(|_| invalid())?;
        let dst = parse_square(&text[2..4]).map_err(|_| invalid())?;
        let promotion = match text.as_bytes().get(4) {
            None => None,
            Some(b'q') => Some(QUEEN_ID),
            Some(b'r') => Some(ROOK_ID),
            Some(b'b') => Some(BISHOP_ID),
            Some(b'n') => Some(KNIGHT_ID),
            Some(_) => return Err(invalid()),
        };
        Ok(MoveText {
            src,
            dst,
            promotion,
        })
    }

    pub fn matches(&self, mv: &Move) -> bool {
        mv.src == self.src && mv.dst == self.dst && mv.promotion() == self.promotion
    }
}

#[inline]
pub fn file_of(square: Square) -> i8 {
    (square % 8) as i8
}

#[inline]
pub fn rank_of(square: Square) -> i8 {
    (square / 8) as i8
}

/// Square reached by stepping `(df, dr)` from `square`, if it stays on the board
#[inline]
pub fn offset_square(square: Square, df: i8, dr: i8) -> Option<Square> {
    let file = file_of(square) + df;
    let rank = rank_of(square) + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank * 8 + file) as Square)
    } else {
        None
    }
}

pub fn square_name(square: Square) -> String {
    let file = (b'a' + square % 8) as char;
    let rank = (b'1' + square / 8) as char;
    format!("{}{}", file, rank)
}

pub fn parse_square(text: &str) -> RulesResult<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(RulesError::InvalidSquare {
            text: text.to_string(),
        });
    }
    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(RulesError::InvalidSquare {
            text: text.to_string(),
        });
    }
    Ok((rank - b'1') * 8 + (file - b'a'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_move_is_invalid() {
        assert!(!Move::NONE.is_valid());
        assert_eq!(Move::default(), Move::NONE);
        assert_eq!(Move::NONE.to_string(), "0000");
    }

    #[test]
    fn test_invalidate_resets_to_none() {
        let mut mv = Move::plain(12, 28);
        assert!(mv.is_valid());
        mv.invalidate();
        assert_eq!(mv, Move::NONE);
    }

    #[test]
    fn test_move_display_long_algebraic() {
        assert_eq!(Move::plain(12, 28).to_string(), "e2e4");
        assert_eq!(
            Move::new(52, 60, MoveFlag::Promotion(QUEEN_ID)).to_string(),
            "e7e8q"
        );
        assert_eq!(Move::new(E1, G1, MoveFlag::Castle).to_string(), "e1g1");
    }

    #[test]
    fn test_square_names() {
        assert_eq!(square_name(0), "a1");
        assert_eq!(square_name(63), "h8");
        assert_eq!(parse_square("e4").unwrap(), 28);
        assert!(parse_square("i9").is_err());
        assert!(parse_square("e").is_err());
    }

    #[test]
    fn test_move_text_parse() {
        let text = MoveText::parse("a7a8n").unwrap();
        assert_eq!(text.src, 48);
        assert_eq!(text.dst, 56);
        assert_eq!(text.promotion, Some(KNIGHT_ID));
        assert!(MoveText::parse("e2e4x").is_err());
        assert!(MoveText::parse("e2").is_err());
    }

    #[test]
    fn test_offset_square_stays_on_board() {
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(7, 1, 0), None);
        assert_eq!(offset_square(0, 1, 2), Some(17));
        assert_eq!(offset_square(63, 0, 1), None);
    }
}
