//! Move generation
//!
//! Generation runs in two stages:
//!
//! 1. **Pseudo-legal**: every move obeying piece movement rules, including
//!    double pushes, en passant, promotions and castling. Castling already
//!    checks that the king does not start in, pass through, or land in check.
//! 2. **Legal**: each pseudo-legal move is made on a history-free scratch copy
//!    and kept only when the mover's king is not left in check.
//!
//! Move order is deterministic: squares are visited from a1 to h8, and each
//! piece emits its moves in a fixed direction order. Search tie-breaking
//! depends on this order being stable.

pub mod attack;

pub use attack::{is_in_check, is_square_attacked};

use crate::board::Board;
use crate::constants::*;
use crate::types::*;

/// All pseudo-legal moves for the side to move
pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let us = board.side_to_move();

    for square in 0..64u8 {
        let piece = board.piece_at(square);
        if !us.piece_belongs(piece) {
            continue;
        }
        match piece.abs() {
            PAWN_ID => pawn_moves(board, square, us, &mut moves),
            KNIGHT_ID => step_moves(board, square, us, &KNIGHT_STEPS, &mut moves),
            BISHOP_ID => slide_moves(board, square, us, &BISHOP_DIRS, &mut moves),
            ROOK_ID => slide_moves(board, square, us, &ROOK_DIRS, &mut moves),
            QUEEN_ID => {
                slide_moves(board, square, us, &ROOK_DIRS, &mut moves);
                slide_moves(board, square, us, &BISHOP_DIRS, &mut moves);
            }
            KING_ID => {
                step_moves(board, square, us, &KING_STEPS, &mut moves);
                castle_moves(board, square, us, &mut moves);
            }
            _ => {}
        }
    }

    moves
}

fn push_pawn_move(src: Square, dst: Square, us: Color, moves: &mut Vec<Move>) {
    if rank_of(dst) as u8 == us.promotion_rank() {
        for id in PROMOTION_IDS {
            moves.push(Move::new(src, dst, MoveFlag::Promotion(id)));
        }
    } else {
        moves.push(Move::plain(src, dst));
    }
}

fn pawn_moves(board: &Board, square: Square, us: Color, moves: &mut Vec<Move>) {
    let step = us.pawn_step();
    let start_rank = match us {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(one) = offset_square(square, 0, step) {
        if board.is_empty(one) {
            push_pawn_move(square, one, us, moves);
            if rank_of(square) == start_rank {
                if let Some(two) = offset_square(one, 0, step) {
                    if board.is_empty(two) {
                        moves.push(Move::new(square, two, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = offset_square(square, df, step) else {
            continue;
        };
        if us.opponent().piece_belongs(board.piece_at(target)) {
            push_pawn_move(square, target, us, moves);
        } else if board.en_passant() == Some(target) {
            moves.push(Move::new(square, target, MoveFlag::EnPassant));
        }
    }
}

fn step_moves(board: &Board, square: Square, us: Color, steps: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(df, dr) in steps {
        if let Some(target) = offset_square(square, df, dr) {
            if !us.piece_belongs(board.piece_at(target)) {
                moves.push(Move::plain(square, target));
            }
        }
    }
}

fn slide_moves(board: &Board, square: Square, us: Color, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(df, dr) in dirs {
        let mut current = square;
        while let Some(target) = offset_square(current, df, dr) {
            let piece = board.piece_at(target);
            if us.piece_belongs(piece) {
                break;
            }
            moves.push(Move::plain(square, target));
            if piece != VOID_ID {
                break;
            }
            current = target;
        }
    }
}

fn castle_moves(board: &Board, square: Square, us: Color, moves: &mut Vec<Move>) {
    let (home, king_side, queen_side, rook) = match us {
        Color::White => (E1, CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN, W_ROOK),
        Color::Black => (E8, CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN, B_ROOK),
    };
    let rights = board.castling_rights();
    if square != home || rights & (king_side | queen_side) == 0 {
        return;
    }
    let them = us.opponent();
    if is_square_attacked(board, home, them) {
        return;
    }

    // (right, rook square, squares that must be empty, squares the king crosses)
    let sides: [(u8, Square, &[Square], [Square; 2]); 2] = [
        (king_side, home + 3, &[home + 1, home + 2], [home + 1, home + 2]),
        (queen_side, home - 4, &[home - 1, home - 2, home - 3], [home - 1, home - 2]),
    ];
    for (right, rook_square, empty, crossed) in sides {
        if rights & right == 0 || board.piece_at(rook_square) != rook {
            continue;
        }
        if !empty.iter().all(|&sq| board.is_empty(sq)) {
            continue;
        }
        if crossed.iter().any(|&sq| is_square_attacked(board, sq, them)) {
            continue;
        }
        moves.push(Move::new(home, crossed[1], MoveFlag::Castle));
    }
}

impl Board {
    /// Copy of the position without undo history, for trial moves
    fn scratch(&self) -> Board {
        Board {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            history: Vec::with_capacity(1),
        }
    }

    /// All legal moves for the side to move, in generation order
    pub fn legal_moves(&self) -> Vec<Move> {
        let us = self.side_to_move;
        let mut scratch = self.scratch();
        pseudo_legal_moves(self)
            .into_iter()
            .filter(|&mv| {
                scratch.make_unchecked(mv);
                let legal = !is_in_check(&scratch, us);
                scratch.unmake_unchecked();
                legal
            })
            .collect()
    }

    /// Whether the side to move has at least one legal move
    pub fn has_legal_move(&self) -> bool {
        let us = self.side_to_move;
        let mut scratch = self.scratch();
        pseudo_legal_moves(self).into_iter().any(|mv| {
            scratch.make_unchecked(mv);
            let legal = !is_in_check(&scratch, us);
            scratch.unmake_unchecked();
            legal
        })
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        is_in_check(self, self.side_to_move)
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_move()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_move()
    }
}
