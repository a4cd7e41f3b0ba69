//! Move making and unmaking
//!
//! Every applied move pushes an [`UndoInfo`] onto the board's history so the
//! previous position can be restored exactly. Undo is strictly LIFO: only the
//! most recently applied move may be undone.
//!
//! `apply` performs a structural sanity check (the moving piece belongs to
//! the side to move, special-move flags agree with the position) rather than
//! a full legality test; callers apply moves taken from [`Board::legal_moves`].
//! [`Board::play`] is the fully checked variant for moves from outside.

use tracing::trace;

use crate::board::Board;
use crate::constants::*;
use crate::error::{RulesError, RulesResult};
use crate::types::*;

/// Information needed to undo a move
#[derive(Debug, Clone, Copy)]
pub(crate) struct UndoInfo {
    pub mv: Move,
    pub captured: i8,
    pub castling: u8,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
}

/// Rook origin and destination for a castling king move
fn castle_rook_squares(king_dst: Square) -> Option<(Square, Square)> {
    match king_dst {
        G1 => Some((H1, F1)),
        C1 => Some((A1, D1)),
        G8 => Some((H8, F8)),
        C8 => Some((A8, D8)),
        _ => None,
    }
}

/// Castling rights lost when a piece leaves or arrives on `square`
fn rights_cleared_by(square: Square) -> u8 {
    match square {
        E1 => CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN,
        A1 => CASTLE_WHITE_QUEEN,
        H1 => CASTLE_WHITE_KING,
        E8 => CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN,
        A8 => CASTLE_BLACK_QUEEN,
        H8 => CASTLE_BLACK_KING,
        _ => 0,
    }
}

impl Board {
    /// Square of the pawn removed by an en passant capture landing on `dst`
    #[inline]
    fn en_passant_victim(&self, src: Square, dst: Square) -> Square {
        (src / 8) * 8 + dst % 8
    }

    pub(crate) fn make_unchecked(&mut self, mv: Move) {
        let us = self.side_to_move;
        let piece = self.squares[mv.src as usize];

        let captured = match mv.flag {
            MoveFlag::EnPassant => {
                let victim = self.en_passant_victim(mv.src, mv.dst);
                let captured = self.squares[victim as usize];
                self.squares[victim as usize] = VOID_ID;
                captured
            }
            _ => self.squares[mv.dst as usize],
        };

        self.history.push(UndoInfo {
            mv,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        });

        self.squares[mv.src as usize] = VOID_ID;
        self.squares[mv.dst as usize] = match mv.flag {
            MoveFlag::Promotion(id) => id * us.sign(),
            _ => piece,
        };

        if mv.flag == MoveFlag::Castle {
            if let Some((rook_src, rook_dst)) = castle_rook_squares(mv.dst) {
                self.squares[rook_dst as usize] = self.squares[rook_src as usize];
                self.squares[rook_src as usize] = VOID_ID;
            }
        }

        self.castling &= !(rights_cleared_by(mv.src) | rights_cleared_by(mv.dst));

        self.en_passant = match mv.flag {
            MoveFlag::DoublePush => Some((mv.src + mv.dst) / 2),
            _ => None,
        };

        if piece.abs() == PAWN_ID || captured != VOID_ID {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = us.opponent();
    }

    pub(crate) fn unmake_unchecked(&mut self) -> Option<UndoInfo> {
        let undo = self.history.pop()?;
        let mv = undo.mv;
        let us = self.side_to_move.opponent();
        self.side_to_move = us;
        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        let moved = match mv.flag {
            MoveFlag::Promotion(_) => PAWN_ID * us.sign(),
            _ => self.squares[mv.dst as usize],
        };
        self.squares[mv.src as usize] = moved;

        match mv.flag {
            MoveFlag::EnPassant => {
                self.squares[mv.dst as usize] = VOID_ID;
                let victim = self.en_passant_victim(mv.src, mv.dst);
                self.squares[victim as usize] = undo.captured;
            }
            _ => self.squares[mv.dst as usize] = undo.captured,
        }

        if mv.flag == MoveFlag::Castle {
            if let Some((rook_src, rook_dst)) = castle_rook_squares(mv.dst) {
                self.squares[rook_src as usize] = self.squares[rook_dst as usize];
                self.squares[rook_dst as usize] = VOID_ID;
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        Some(undo)
    }

    fn illegal(&self, mv: Move) -> RulesError {
        RulesError::IllegalMove {
            mv: mv.to_string(),
            fen: self.to_fen(),
        }
    }

    /// Structural check that `mv` fits the current position
    fn fits_position(&self, mv: Move) -> bool {
        if !mv.is_valid() {
            return false;
        }
        let us = self.side_to_move;
        let piece = self.squares[mv.src as usize];
        if !us.piece_belongs(piece) || us.piece_belongs(self.squares[mv.dst as usize]) {
            return false;
        }
        let is_pawn = piece.abs() == PAWN_ID;
        match mv.flag {
            MoveFlag::Plain => !(is_pawn && rank_of(mv.dst) as u8 == us.promotion_rank()),
            MoveFlag::DoublePush => is_pawn && mv.src.abs_diff(mv.dst) == 16,
            MoveFlag::EnPassant => is_pawn && self.en_passant == Some(mv.dst),
            MoveFlag::Castle => {
                piece.abs() == KING_ID
                    && castle_rook_squares(mv.dst).is_some()
                    && self.castling & rights_cleared_by(mv.src) != 0
            }
            MoveFlag::Promotion(id) => {
                is_pawn
                    && PROMOTION_IDS.contains(&id)
                    && rank_of(mv.dst) as u8 == us.promotion_rank()
            }
        }
    }

    /// Apply `mv` to the position, moving it forward one ply
    ///
    /// # Errors
    ///
    /// [`RulesError::IllegalMove`] if the move does not fit the position.
    pub fn apply(&mut self, mv: Move) -> RulesResult<()> {
        if !self.fits_position(mv) {
            return Err(self.illegal(mv));
        }
        self.make_unchecked(mv);
        trace!("[RULES] applied {} (ply {})", mv, self.ply_count());
        Ok(())
    }

    /// Revert `mv`, which must be the most recently applied move
    ///
    /// # Errors
    ///
    /// [`RulesError::NoMoveToUndo`] with an empty history,
    /// [`RulesError::UndoMismatch`] when `mv` is not the last applied move.
    pub fn undo(&mut self, mv: Move) -> RulesResult<()> {
        match self.history.last() {
            None => Err(RulesError::NoMoveToUndo { mv: mv.to_string() }),
            Some(last) if last.mv != mv => Err(RulesError::UndoMismatch {
                requested: mv.to_string(),
                applied: last.mv.to_string(),
            }),
            Some(_) => {
                self.unmake_unchecked();
                trace!("[RULES] undid {} (ply {})", mv, self.ply_count());
                Ok(())
            }
        }
    }

    /// Apply `mv` only if it is one of the legal moves of the position
    pub fn play(&mut self, mv: Move) -> RulesResult<()> {
        if !self.legal_moves().contains(&mv) {
            return Err(self.illegal(mv));
        }
        self.make_unchecked(mv);
        Ok(())
    }

    /// Resolve long algebraic move text against the legal moves, then play it
    pub fn play_text(&mut self, text: &str) -> RulesResult<Move> {
        let mv = self.find_legal_move(text)?;
        self.make_unchecked(mv);
        Ok(mv)
    }

    /// Legal move named by long algebraic `text`
    pub fn find_legal_move(&self, text: &str) -> RulesResult<Move> {
        let wanted = MoveText::parse(text)?;
        self.legal_moves()
            .into_iter()
            .find(|mv| wanted.matches(mv))
            .ok_or_else(|| RulesError::IllegalMove {
                mv: text.to_string(),
                fen: self.to_fen(),
            })
    }
}
