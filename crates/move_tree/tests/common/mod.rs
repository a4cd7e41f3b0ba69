//! Synthetic game used to check search arithmetic independently of chess

#![allow(dead_code)]

use chess_rules::{Color, Move, RulesError, RulesResult, Score};
use move_tree::Position;

/// Uniform game tree: every position has `branching` moves until the game
/// is `length` plies long. Scores are a fixed hash of the move path.
#[derive(Debug, Clone)]
pub struct SyntheticGame {
    pub path: Vec<u8>,
    pub branching: u8,
    pub length: usize,
    /// Refuse to apply this move index
    pub poisoned: Option<u8>,
}

impl SyntheticGame {
    pub fn new(branching: u8, length: usize) -> Self {
        SyntheticGame {
            path: Vec::new(),
            branching,
            length,
            poisoned: None,
        }
    }

    pub fn move_for(index: u8) -> Move {
        Move::plain(index, index + 8)
    }

    pub fn score_of(path: &[u8]) -> Score {
        path.iter()
            .fold(17i32, |hash, &index| (hash * 31 + index as i32 + 1) % 1009)
            - 504
    }

    /// Reference minimax, independent of the tree
    pub fn minimax(&mut self, depth: u32) -> Score {
        let moves = self.legal_moves();
        if depth == 0 || moves.is_empty() {
            return self.static_score();
        }
        let side = self.side_to_move();
        let mut best: Option<Score> = None;
        for mv in moves {
            self.path.push(mv.src);
            let score = self.minimax(depth - 1);
            self.path.pop();
            best = Some(match (best, side) {
                (None, _) => score,
                (Some(b), Color::White) => b.max(score),
                (Some(b), Color::Black) => b.min(score),
            });
        }
        best.unwrap_or_default()
    }
}

impl Position for SyntheticGame {
    fn legal_moves(&self) -> Vec<Move> {
        if self.path.len() >= self.length {
            return Vec::new();
        }
        (0..self.branching).map(SyntheticGame::move_for).collect()
    }

    fn apply(&mut self, mv: Move) -> RulesResult<()> {
        if Some(mv.src) == self.poisoned || mv.src >= self.branching {
            return Err(RulesError::IllegalMove {
                mv: mv.to_string(),
                fen: format!("{:?}", self.path),
            });
        }
        self.path.push(mv.src);
        Ok(())
    }

    fn undo(&mut self, mv: Move) -> RulesResult<()> {
        match self.path.last() {
            None => Err(RulesError::NoMoveToUndo { mv: mv.to_string() }),
            Some(&last) if last != mv.src => Err(RulesError::UndoMismatch {
                requested: mv.to_string(),
                applied: SyntheticGame::move_for(last).to_string(),
            }),
            Some(_) => {
                self.path.pop();
                Ok(())
            }
        }
    }

    fn static_score(&self) -> Score {
        SyntheticGame::score_of(&self.path)
    }

    fn side_to_move(&self) -> Color {
        if self.path.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
}
