use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::apply::apply_legal;
use crate::board::bitboard::BoardState;
use crate::board::movegen::valid_moves_mask;
use crate::board::types::Color;
use crate::eval::Evaluator;
use crate::search::snapshot::PositionSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub board: BoardState,
    pub color: Color,
    pub left: i32,
    pub right: i32,
}

/// Scores every position with both evaluators and reports where they differ.
/// `right` is driven through `evaluate_many` so batch paths are covered.
pub fn cross_validate(left: &dyn Evaluator, right: &dyn Evaluator, positions: &[(BoardState, Color)]) -> Vec<Divergence> {
    let batched = right.evaluate_many(positions);
    let mut out = Vec::new();
    for (&(board, color), &r) in positions.iter().zip(batched.iter()) {
        let l = left.evaluate(&PositionSnapshot::new(&board), &board, color);
        if l != r {
            log::warn!("evaluator divergence for {:?}: {} vs {} ({:#x}/{:#x})", color, l, r, board.black(), board.white());
            out.push(Divergence { board, color, left: l, right: r });
        }
    }
    out
}

/// Positions from seeded random playouts, both colors per position, with
/// passes taken when forced. Finished games are included once reached.
pub fn random_positions(seed: u64, games: usize) -> Vec<(BoardState, Color)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = Vec::new();
    for _ in 0..games {
        let mut board = BoardState::initial();
        let mut color = Color::Black;
        loop {
            out.push((board, color));
            out.push((board, color.opponent()));
            let mut moves = valid_moves_mask(&board, color);
            if moves.is_empty() {
                color = color.opponent();
                moves = valid_moves_mask(&board, color);
                if moves.is_empty() { break; }
            }
            let pick = rng.gen_range(0..moves.len());
            let Some(pos) = moves.into_iter().nth(pick) else { break };
            board = apply_legal(&board, color, pos);
            color = color.opponent();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playouts_are_seeded() {
        assert_eq!(random_positions(7, 3), random_positions(7, 3));
        assert_ne!(random_positions(7, 3), random_positions(8, 3));
    }
}
