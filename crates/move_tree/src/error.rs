//! Error types for the search core
//!
//! A search only fails when the rules engine refuses a move the tree itself
//! produced, or when a worker thread dies. Both leave the tree consistent but
//! the walker's position unusable, so callers treat them as fatal.

use chess_rules::RulesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The rules engine rejected a move taken from the tree
    #[error("Failed to apply move {mv} during search: {source}")]
    ApplyFailed {
        mv: String,
        #[source]
        source: RulesError,
    },

    /// The rules engine could not undo a move the search just applied
    #[error("Failed to undo move {mv} during search: {source}")]
    UndoFailed {
        mv: String,
        #[source]
        source: RulesError,
    },

    /// A search worker panicked before finishing its share of the root moves
    #[error("Search worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
