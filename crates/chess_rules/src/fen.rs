//! FEN parsing and formatting
//!
//! Accepts the six standard fields. The two clock fields may be omitted, in
//! which case they default to `0 1`.

use std::str::FromStr;

use crate::board::Board;
use crate::constants::*;
use crate::error::{RulesError, RulesResult};
use crate::types::*;

fn piece_from_char(ch: char) -> Option<i8> {
    let id = match ch.to_ascii_lowercase() {
        'p' => PAWN_ID,
        'n' => KNIGHT_ID,
        'b' => BISHOP_ID,
        'r' => ROOK_ID,
        'q' => QUEEN_ID,
        'k' => KING_ID,
        _ => return None,
    };
    Some(if ch.is_ascii_uppercase() { id } else { -id })
}

fn piece_to_char(piece: i8) -> char {
    let ch = FIG_CHARS[piece.unsigned_abs() as usize];
    if piece > 0 {
        ch.to_ascii_uppercase()
    } else {
        ch
    }
}

impl Board {
    pub fn from_fen(fen: &str) -> RulesResult<Board> {
        let invalid = |reason: &str| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(invalid("expected 4 or 6 fields"));
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in rank_text.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(invalid("bad empty-square count"));
                    }
                    file += skip as u8;
                } else {
                    let piece = piece_from_char(ch).ok_or_else(|| invalid("unknown piece"))?;
                    if file >= 8 {
                        return Err(invalid("rank too long"));
                    }
                    board.squares[(rank * 8 + file) as usize] = piece;
                    file += 1;
                }
                if file > 8 {
                    return Err(invalid("rank too long"));
                }
            }
            if file != 8 {
                return Err(invalid("rank too short"));
            }
        }

        if board.king_square(Color::White).is_none() || board.king_square(Color::Black).is_none() {
            return Err(invalid("both kings must be present"));
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("side to move must be 'w' or 'b'")),
        };

        if fields[2] != "-" {
            for ch in fields[2].chars() {
                board.castling |= match ch {
                    'K' => CASTLE_WHITE_KING,
                    'Q' => CASTLE_WHITE_QUEEN,
                    'k' => CASTLE_BLACK_KING,
                    'q' => CASTLE_BLACK_QUEEN,
                    _ => return Err(invalid("bad castling field")),
                };
            }
        }

        board.en_passant = match fields[3] {
            "-" => None,
            text => Some(parse_square(text).map_err(|_| invalid("bad en passant square"))?),
        };

        if fields.len() == 6 {
            board.halfmove_clock = fields[4]
                .parse()
                .map_err(|_| invalid("bad halfmove clock"))?;
            board.fullmove_number = fields[5]
                .parse()
                .map_err(|_| invalid("bad fullmove number"))?;
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = self.squares[(rank * 8 + file) as usize];
                if piece == VOID_ID {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    fen.push_str(&empty.to_string());
                    empty = 0;
                }
                fen.push(piece_to_char(piece));
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (bit, ch) in [
                (CASTLE_WHITE_KING, 'K'),
                (CASTLE_WHITE_QUEEN, 'Q'),
                (CASTLE_BLACK_KING, 'k'),
                (CASTLE_BLACK_QUEEN, 'q'),
            ] {
                if self.castling & bit != 0 {
                    fen.push(ch);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(square) => fen.push_str(&square_name(square)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

impl FromStr for Board {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}
