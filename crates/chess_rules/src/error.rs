//! Error types for the rules engine
//!
//! Covers position parsing, move text parsing, and the apply/undo contract.

use thiserror::Error;

/// Errors that can occur in the rules engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// FEN string could not be parsed
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Square text is not `a1`..`h8`
    #[error("Invalid square: '{text}'")]
    InvalidSquare { text: String },

    /// Move text is not long algebraic notation
    #[error("Invalid move text: '{text}'")]
    InvalidMoveText { text: String },

    /// Move cannot be applied to the current position
    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },

    /// Undo requested with an empty history
    #[error("No move to undo (requested {mv})")]
    NoMoveToUndo { mv: String },

    /// Undo requested for a move other than the most recently applied one
    #[error("Undo mismatch: requested {requested}, last applied {applied}")]
    UndoMismatch { requested: String, applied: String },
}

/// Result type alias for rules engine operations
pub type RulesResult<T> = Result<T, RulesError>;
