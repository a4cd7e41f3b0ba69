//! # UCI Protocol Session
//!
//! Reads controller commands line by line and writes engine responses.
//!
//! ## Supported Commands
//!
//! - `uci` - identify the engine and list its options
//! - `isready` - synchronisation ping, answered with `readyok`
//! - `debug on|off` - send per-move scores as `info string` lines
//! - `setoption name <Depth|Threads|Random> value <v>`
//! - `ucinewgame` - forget the current game and its search tree
//! - `position startpos|fen <fen> [moves ...]`
//! - `go [depth N]` - search and answer with `bestmove`
//! - `stop` - searches are depth bounded, so there is nothing to stop
//! - `quit`
//!
//! ## Tree Reuse
//!
//! Controllers resend the whole game on every `position` command. When the
//! new move list extends the previous one from the same start position, the
//! search tree is advanced along the new moves instead of being rebuilt.
//!
//! Malformed commands are logged and ignored. Only a failed search ends the
//! session with an error.

use std::io::{BufRead, Write};

use chess_rules::{Board, Color, Move, RulesError, START_FEN};
use move_tree::{MoveTree, SearchDriver, SearchError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::{ENGINE_AUTHOR, ENGINE_NAME};

/// Highest depth accepted from `setoption` or `go depth`
pub const MAX_DEPTH: u32 = 64;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("I/O error on the protocol channel: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// A parsed controller command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    Debug(bool),
    SetOption { name: String, value: String },
    UciNewGame,
    Position { fen: Option<String>, moves: Vec<String> },
    Go { depth: Option<u32> },
    Stop,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line; `None` for a blank line
    pub fn parse(line: &str) -> Option<Command> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next()?;
        let rest: Vec<&str> = tokens.collect();

        let command = match keyword {
            "uci" => Command::Uci,
            "isready" => Command::IsReady,
            "debug" => match rest.first() {
                Some(&"on") => Command::Debug(true),
                Some(&"off") => Command::Debug(false),
                _ => Command::Unknown(line.trim().to_string()),
            },
            "setoption" => parse_setoption(&rest)
                .unwrap_or_else(|| Command::Unknown(line.trim().to_string())),
            "ucinewgame" => Command::UciNewGame,
            "position" => parse_position(&rest)
                .unwrap_or_else(|| Command::Unknown(line.trim().to_string())),
            "go" => Command::Go {
                depth: rest
                    .iter()
                    .position(|&token| token == "depth")
                    .and_then(|i| rest.get(i + 1))
                    .and_then(|text| text.parse().ok()),
            },
            "stop" => Command::Stop,
            "quit" => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

/// `name <words...> value <words...>`
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.first() != Some(&"name") {
        return None;
    }
    let value_at = tokens.iter().position(|&token| token == "value");
    let name_end = value_at.unwrap_or(tokens.len());
    let name = tokens[1..name_end].join(" ");
    if name.is_empty() {
        return None;
    }
    let value = value_at
        .map(|i| tokens[i + 1..].join(" "))
        .unwrap_or_default();
    Some(Command::SetOption { name, value })
}

/// `startpos [moves ...]` or `fen <6 fields> [moves ...]`
fn parse_position(tokens: &[&str]) -> Option<Command> {
    let moves_at = tokens.iter().position(|&token| token == "moves");
    let setup = &tokens[..moves_at.unwrap_or(tokens.len())];
    let moves = moves_at
        .map(|i| tokens[i + 1..].iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    let fen = match setup.first() {
        Some(&"startpos") => None,
        Some(&"fen") if setup.len() > 1 => Some(setup[1..].join(" ")),
        _ => return None,
    };
    Some(Command::Position { fen, moves })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Some(true),
        "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Whether the session keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct UciSession<W: Write> {
    out: W,
    config: EngineConfig,
    seed: Option<u64>,
    driver: SearchDriver,
    tree: MoveTree,
    board: Board,
    /// Canonical FEN of the position the current game started from
    start_fen: String,
    /// Game moves played from `start_fen`
    played: Vec<Move>,
    debug: bool,
}

impl<W: Write> UciSession<W> {
    pub fn new(config: EngineConfig, seed: Option<u64>, out: W) -> Self {
        let driver = SearchDriver::new(config.search_config(seed));
        let tree = MoveTree::with_max_nodes(config.max_nodes);
        UciSession {
            out,
            config,
            seed,
            driver,
            tree,
            board: Board::new(),
            start_fen: START_FEN.to_string(),
            played: Vec::new(),
            debug: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Process commands until `quit` or end of input
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), UciError> {
        for line in input.lines() {
            let line = line?;
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
        }
        info!("[UCI] session finished");
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow, UciError> {
        let Some(command) = Command::parse(line) else {
            return Ok(Flow::Continue);
        };
        debug!("[UCI] << {}", line.trim());
        self.handle(command)
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow, UciError> {
        match command {
            Command::Uci => self.identify()?,
            Command::IsReady => self.send("readyok")?,
            Command::Debug(on) => {
                self.debug = on;
                info!("[UCI] debug {}", if on { "on" } else { "off" });
            }
            Command::SetOption { name, value } => self.set_option(&name, &value),
            Command::UciNewGame => self.new_game(),
            Command::Position { fen, moves } => {
                if let Err(err) = self.set_position(fen.as_deref(), &moves) {
                    warn!("[UCI] ignoring position command: {}", err);
                }
            }
            Command::Go { depth } => self.go(depth)?,
            Command::Stop => debug!("[UCI] stop: no search in progress"),
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(text) => warn!("[UCI] unknown command: {}", text),
        }
        Ok(Flow::Continue)
    }

    fn send(&mut self, line: &str) -> Result<(), UciError> {
        debug!("[UCI] >> {}", line);
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    fn identify(&mut self) -> Result<(), UciError> {
        self.send(&format!("id name {} {}", ENGINE_NAME, env!("CARGO_PKG_VERSION")))?;
        self.send(&format!("id author {}", ENGINE_AUTHOR))?;
        self.send(&format!(
            "option name Depth type spin default {} min 1 max {}",
            self.config.max_search_depth, MAX_DEPTH
        ))?;
        self.send(&format!(
            "option name Threads type spin default {} min 0 max 256",
            self.config.workers
        ))?;
        self.send(&format!(
            "option name Random type check default {}",
            self.config.random
        ))?;
        self.send("uciok")
    }

    fn set_option(&mut self, name: &str, value: &str) {
        let mut config = self.config.clone();
        let accepted = match name.to_ascii_lowercase().as_str() {
            "depth" => match value.parse::<u32>() {
                Ok(depth) if (1..=MAX_DEPTH).contains(&depth) => {
                    config.max_search_depth = depth;
                    true
                }
                _ => false,
            },
            "threads" => match value.parse::<usize>() {
                Ok(threads) if threads <= 256 => {
                    config.workers = threads;
                    true
                }
                _ => false,
            },
            "random" => match parse_bool(value) {
                Some(random) => {
                    config.random = random;
                    true
                }
                None => false,
            },
            _ => {
                warn!("[UCI] unknown option '{}'", name);
                return;
            }
        };
        if !accepted {
            warn!("[UCI] invalid value '{}' for option {}", value, name);
            return;
        }
        info!("[UCI] option {} = {}", name, value);
        self.driver.set_config(config.search_config(self.seed));
        self.tree.set_max_nodes(config.max_nodes);
        self.config = config;
    }

    fn new_game(&mut self) {
        self.board = Board::new();
        self.start_fen = START_FEN.to_string();
        self.played.clear();
        self.tree.reset();
        debug!("[UCI] new game");
    }

    /// Rebuild the game from `fen` (start position when `None`) and `moves`
    ///
    /// Nothing changes when the position or any move is invalid.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), RulesError> {
        let mut board = Board::from_fen(fen.unwrap_or(START_FEN))?;
        let start_fen = board.to_fen();
        let mut played = Vec::with_capacity(moves.len());
        for text in moves {
            played.push(board.play_text(text)?);
        }

        if start_fen == self.start_fen && played.starts_with(&self.played) {
            let mut reused = true;
            for &mv in &played[self.played.len()..] {
                reused &= self.tree.advance(mv);
            }
            debug!(
                "[UCI] position extends the game by {} moves (tree {})",
                played.len() - self.played.len(),
                if reused { "reused" } else { "rebuilt" }
            );
        } else {
            self.tree.reset();
            debug!("[UCI] new position, tree rebuilt");
        }

        self.board = board;
        self.start_fen = start_fen;
        self.played = played;
        Ok(())
    }

    fn go(&mut self, depth: Option<u32>) -> Result<(), UciError> {
        let depth = depth
            .map(|depth| depth.clamp(1, MAX_DEPTH))
            .unwrap_or(self.config.max_search_depth);
        let outcome = self
            .driver
            .run_to_depth(&self.tree, &mut self.board, depth)?;

        // UCI scores are from the side to move's point of view
        let score = match self.board.side_to_move() {
            Color::White => outcome.score,
            Color::Black => -outcome.score,
        };

        if self.debug {
            for child in self.tree.root().children() {
                self.send(&format!(
                    "info string move {} score {}",
                    child.mv(),
                    child.compound_score()
                ))?;
            }
        }

        let best = outcome.best_move.unwrap_or(Move::NONE);
        self.send(&format!(
            "info depth {} score cp {} nodes {} pv {}",
            outcome.depth, score, outcome.stats.visited, best
        ))?;
        self.send(&format!("bestmove {}", best))
    }
}

impl<W: Write + Default> UciSession<W> {
    /// Everything written since the last call, leaving an empty output
    pub fn take_output(&mut self) -> W {
        std::mem::take(&mut self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> UciSession<Vec<u8>> {
        let config = EngineConfig {
            max_search_depth: 2,
            ..EngineConfig::default()
        };
        UciSession::new(config, Some(1), Vec::new())
    }

    fn output(session: UciSession<Vec<u8>>) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("uci"), Some(Command::Uci));
        assert_eq!(Command::parse("debug on"), Some(Command::Debug(true)));
        assert_eq!(
            Command::parse("go depth 3 movetime 100"),
            Some(Command::Go { depth: Some(3) })
        );
        assert_eq!(Command::parse("go infinite"), Some(Command::Go { depth: None }));
        assert_eq!(
            Command::parse("setoption name Random value true"),
            Some(Command::SetOption {
                name: "Random".to_string(),
                value: "true".to_string()
            })
        );
        assert!(matches!(Command::parse("xyzzy"), Some(Command::Unknown(_))));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(
            Command::parse("position startpos moves e2e4 e7e5"),
            Some(Command::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            })
        );
        assert_eq!(
            Command::parse("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Some(Command::Position {
                fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()),
                moves: vec![]
            })
        );
        assert!(matches!(Command::parse("position"), Some(Command::Unknown(_))));
    }

    #[test]
    fn test_uci_handshake() {
        let mut session = session();
        session.handle_line("uci").unwrap();
        session.handle_line("isready").unwrap();
        let text = output(session);
        assert!(text.starts_with("id name Gambit"));
        assert!(text.contains("option name Depth type spin default 2"));
        assert!(text.contains("uciok\nreadyok\n"));
    }

    #[test]
    fn test_quit_stops_run() {
        let mut session = session();
        let input = "isready\nquit\nisready\n".as_bytes();
        session.run(input).unwrap();
        assert_eq!(output(session), "readyok\n");
    }

    #[test]
    fn test_position_reuses_tree() {
        let mut session = session();
        session.handle_line("position startpos").unwrap();
        session.handle_line("go depth 2").unwrap();
        // leaves at the horizon are expanded too
        assert_eq!(session.tree().node_count(), 1 + 20 + 400 + 8902);
        let e4 = session.board().find_legal_move("e2e4").unwrap();
        let kept = move_tree::find_child_for_move(&session.tree().root(), e4).unwrap();
        let kept_size = kept.subtree_size();
        drop(kept);

        session.handle_line("position startpos moves e2e4").unwrap();
        let root = session.tree().root();
        assert!(root.is_evaluated(), "e2e4 subtree kept");
        assert_eq!(root.child_count(), 20);
        assert_eq!(session.tree().node_count(), kept_size);
        assert!(root.children().iter().all(|child| child.is_evaluated()));
        assert_eq!(session.board().ply_count(), 1);

        session.handle_line("position startpos moves d2d4").unwrap();
        assert!(!session.tree().root().is_evaluated(), "diverging game rebuilds the tree");
    }

    #[test]
    fn test_invalid_position_is_ignored() {
        let mut session = session();
        session.handle_line("position startpos moves e2e4").unwrap();
        session.handle_line("position startpos moves e2e4 e2e4").unwrap();
        assert_eq!(session.board().ply_count(), 1, "bad move leaves the game unchanged");
        session.handle_line("position fen not/a/fen w - - 0 1").unwrap();
        assert_eq!(session.board().ply_count(), 1);
    }

    #[test]
    fn test_go_reports_bestmove() {
        let mut session = session();
        session
            .handle_line("position fen 6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1")
            .unwrap();
        session.handle_line("go depth 1").unwrap();
        let text = output(session);
        assert!(text.contains("info depth 1 score cp 32000"), "{}", text);
        assert!(text.ends_with("bestmove d1d8\n"), "{}", text);
    }

    #[test]
    fn test_go_without_moves() {
        let mut session = session();
        session
            .handle_line("position fen rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        session.handle_line("go").unwrap();
        assert!(output(session).ends_with("bestmove 0000\n"));
    }

    #[test]
    fn test_setoption_updates_config() {
        let mut session = session();
        session.handle_line("setoption name Depth value 3").unwrap();
        session.handle_line("setoption name Threads value 2").unwrap();
        session.handle_line("setoption name Random value true").unwrap();
        session.handle_line("setoption name Depth value 0").unwrap();
        session.handle_line("setoption name Hash value 16").unwrap();
        assert_eq!(session.config().max_search_depth, 3);
        assert_eq!(session.config().workers, 2);
        assert!(session.config().random);
    }

    #[test]
    fn test_debug_mode_lists_root_moves() {
        let mut session = session();
        session.handle_line("debug on").unwrap();
        session.handle_line("go depth 1").unwrap();
        let text = output(session);
        assert_eq!(text.matches("info string move").count(), 20);
    }
}
