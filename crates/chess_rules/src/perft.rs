//! Perft: leaf-node counting for move generator verification

use crate::board::Board;

/// Number of leaf positions reachable in exactly `depth` plies
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        board.make_unchecked(mv);
        nodes += perft(board, depth - 1);
        board.unmake_unchecked();
    }
    nodes
}

/// Per-move breakdown of [`perft`], in generation order
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = board.legal_moves();
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        board.make_unchecked(mv);
        counts.push((mv.to_string(), perft(board, depth - 1)));
        board.unmake_unchecked();
    }
    counts
}
