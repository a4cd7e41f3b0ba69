//! # Move Tree
//!
//! Search core of the engine: a lazily grown tree of future positions that
//! several threads can expand and score at once.
//!
//! ## Module Organization
//!
//! - `adapter` - [`Position`], the seam to the rules engine
//! - `node` - [`MoveTreeNode`], one lock-guarded position in the tree
//! - `tree` - [`MoveTree`], root ownership and reuse between game moves
//! - `search` - [`SearchDriver`], minimax backpropagation and the worker pool
//! - `tie_break` - root move tie-breaking strategies
//! - `config` - [`SearchConfig`]
//! - `error` - [`SearchError`]

pub mod adapter;
pub mod config;
pub mod error;
pub mod node;
pub mod search;
pub mod tie_break;
pub mod tree;

pub use adapter::Position;
pub use config::{SearchConfig, DEFAULT_SEARCH_DEPTH};
pub use error::{SearchError, SearchResult};
pub use node::{MoveTreeNode, NodeSnapshot};
pub use search::{SearchDriver, SearchOutcome, SearchStats};
pub use tie_break::{FirstCandidate, RandomTieBreak, TieBreak};
pub use tree::{find_child_for_move, MoveTree};
