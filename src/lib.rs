//! # Gambit
//!
//! UCI chess engine built on a shared, lazily expanded move tree.
//!
//! ## Crates
//!
//! - `chess_rules` - board, legal moves, apply/undo, static evaluation
//! - `move_tree` - the search tree, minimax driver and worker pool
//! - `gambit` (this crate) - command line, configuration, logging and the
//!   UCI session that ties them together

pub mod cli;
pub mod config;
pub mod logging;
pub mod uci;

pub const ENGINE_NAME: &str = "Gambit";
pub const ENGINE_AUTHOR: &str = "trilltino";

pub use cli::Cli;
pub use config::EngineConfig;
pub use uci::{Command, UciError, UciSession};
