//! # Chess Rules
//!
//! Board representation, FEN, legal move generation, apply/undo and static
//! evaluation. This crate is the rules collaborator of the search core: it
//! knows nothing about trees or threads, and every operation is synchronous
//! and single-threaded on the `Board` it is given.
//!
//! ## Quick Start
//!
//! ```
//! use chess_rules::{static_score, Board};
//!
//! let mut board = Board::new();
//! let mv = board.find_legal_move("e2e4").unwrap();
//! board.apply(mv).unwrap();
//! assert_eq!(board.legal_moves().len(), 20);
//! board.undo(mv).unwrap();
//! assert_eq!(static_score(&board), 0);
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod make_unmake;
pub mod move_gen;
pub mod perft;
pub mod types;

pub use board::Board;
pub use constants::{MATE_SCORE, MATE_THRESHOLD, START_FEN};
pub use error::{RulesError, RulesResult};
pub use evaluation::static_score;
pub use move_gen::{is_in_check, is_square_attacked, pseudo_legal_moves};
pub use perft::{perft, perft_divide};
pub use types::{Color, Move, MoveFlag, MoveText, Score, Square};
