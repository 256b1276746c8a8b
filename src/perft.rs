use rayon::prelude::*;

use crate::board::apply::apply_legal;
use crate::board::bitboard::BoardState;
use crate::board::movegen::valid_moves_mask;
use crate::board::types::{Color, Position};

/// Leaf count of the move tree `depth` plies deep. A forced pass counts as
/// one move; a finished game is a leaf wherever it occurs.
pub fn perft(board: &BoardState, color: Color, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let moves = valid_moves_mask(board, color);
    if moves.is_empty() {
        if valid_moves_mask(board, color.opponent()).is_empty() { return 1; }
        return perft(board, color.opponent(), depth - 1);
    }
    if depth == 1 { return moves.len() as u64; }
    let mut nodes = 0u64;
    for mv in moves {
        let child = apply_legal(board, color, mv);
        nodes += perft(&child, color.opponent(), depth - 1);
    }
    nodes
}

/// Per-root-move counts, sub-trees counted on the rayon pool.
pub fn divide(board: &BoardState, color: Color, depth: u32) -> Vec<(Position, u64)> {
    let moves = valid_moves_mask(board, color).to_vec();
    moves
        .par_iter()
        .map(|&mv| (mv, perft(&apply_legal(board, color, mv), color.opponent(), depth.saturating_sub(1))))
        .collect()
}
