//! Raw component scores, each from `color`'s point of view.
//!
//! Every component has a per-cell form, which is the readable definition,
//! and the stability and frontier components also have a mask form used by
//! the batch evaluator. Both must produce identical integers.

use crate::board::bitboard::{shift, BoardState, CORNERS, DIRECTIONS};
use crate::board::types::{Color, Piece, Position};
use crate::search::snapshot::PositionSnapshot;

pub const STABILITY_MAP: [[i32; 8]; 8] = [
    [4, -3, 2, 2, 2, 2, -3, 4],
    [-3, -4, -1, -1, -1, -1, -4, -3],
    [2, -1, 1, 0, 0, 1, -1, 2],
    [2, -1, 0, 1, 1, 0, -1, 2],
    [2, -1, 0, 1, 1, 0, -1, 2],
    [2, -1, 1, 0, 0, 1, -1, 2],
    [-3, -4, -1, -1, -1, -1, -4, -3],
    [4, -3, 2, 2, 2, 2, -3, 4],
];

/// Distinct non-zero weights in `STABILITY_MAP`.
pub const STABILITY_CLASSES: [i32; 6] = [4, -3, 2, -4, -1, 1];

const fn class_mask(weight: i32) -> u64 {
    let mut m = 0u64;
    let mut i = 0;
    while i < 64 {
        if STABILITY_MAP[i / 8][i % 8] == weight { m |= 1 << i; }
        i += 1;
    }
    m
}

/// Cells carrying each weight in `STABILITY_CLASSES`, same order.
pub const STABILITY_MASKS: [u64; 6] = [
    class_mask(4),
    class_mask(-3),
    class_mask(2),
    class_mask(-4),
    class_mask(-1),
    class_mask(1),
];

#[inline]
pub fn material(snap: &PositionSnapshot, color: Color) -> i32 {
    snap.count(color) as i32 - snap.count(color.opponent()) as i32
}

#[inline]
pub fn mobility(snap: &PositionSnapshot, color: Color) -> i32 {
    snap.moves(color).len() as i32 - snap.moves(color.opponent()).len() as i32
}

#[inline]
pub fn corners(board: &BoardState, color: Color) -> i32 {
    (board.pieces(color) & CORNERS).count_ones() as i32
        - (board.pieces(color.opponent()) & CORNERS).count_ones() as i32
}

/// Even empties favour white, odd favour black.
#[inline]
pub fn parity(snap: &PositionSnapshot, color: Color) -> i32 {
    let even = snap.empty_count() % 2 == 0;
    match (even, color) {
        (true, Color::Black) | (false, Color::White) => -1,
        (true, Color::White) | (false, Color::Black) => 1,
    }
}

pub fn stability(board: &BoardState, color: Color) -> i32 {
    let own = color.to_piece();
    let opp = color.opponent().to_piece();
    let mut score = 0;
    for (r, row) in STABILITY_MAP.iter().enumerate() {
        for (c, &w) in row.iter().enumerate() {
            let Some(p) = Position::new(r as u8, c as u8) else { continue };
            let piece = board.piece_at(p);
            if piece == own { score += w; } else if piece == opp { score -= w; }
        }
    }
    score
}

pub fn stability_bits(board: &BoardState, color: Color) -> i32 {
    let own = board.pieces(color);
    let opp = board.pieces(color.opponent());
    STABILITY_CLASSES
        .iter()
        .zip(STABILITY_MASKS.iter())
        .map(|(&w, &m)| w * ((own & m).count_ones() as i32 - (opp & m).count_ones() as i32))
        .sum()
}

fn touches_empty(board: &BoardState, pos: Position) -> bool {
    DIRECTIONS.iter().any(|&(dr, dc)| {
        Position::from_signed(pos.row() as i32 + dr, pos.col() as i32 + dc)
            .map_or(false, |n| board.piece_at(n) == Piece::Empty)
    })
}

/// Opponent frontier discs minus own frontier discs.
pub fn frontier(board: &BoardState, color: Color) -> i32 {
    let own = color.to_piece();
    let opp = color.opponent().to_piece();
    let (mut mine, mut theirs) = (0, 0);
    for p in (0u8..64).filter_map(Position::from_index) {
        let piece = board.piece_at(p);
        if piece == Piece::Empty || !touches_empty(board, p) { continue; }
        if piece == own { mine += 1; } else if piece == opp { theirs += 1; }
    }
    theirs - mine
}

/// Cells adjacent to at least one empty cell.
#[inline]
pub fn empty_neighbourhood(board: &BoardState) -> u64 {
    let empty = board.empties();
    DIRECTIONS.iter().fold(0u64, |acc, &(dr, dc)| acc | shift(empty, dr, dc))
}

pub fn frontier_bits(board: &BoardState, color: Color) -> i32 {
    let near = empty_neighbourhood(board);
    (board.pieces(color.opponent()) & near).count_ones() as i32 - (board.pieces(color) & near).count_ones() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stability_masks_cover_map() {
        let zero = class_mask(0);
        let all = STABILITY_MASKS.iter().fold(zero, |a, m| a | m);
        assert_eq!(all, !0u64);
        let abs_sum: i32 = STABILITY_MAP.iter().flatten().map(|w| w.abs()).sum();
        assert_eq!(abs_sum, 112);
    }

    #[test]
    fn mask_forms_match_cell_forms_on_start() {
        let b = BoardState::initial();
        for c in [Color::Black, Color::White] {
            assert_eq!(stability(&b, c), stability_bits(&b, c));
            assert_eq!(frontier(&b, c), frontier_bits(&b, c));
        }
        assert_eq!(frontier(&b, Color::Black), 0);
    }

    #[test]
    fn parity_follows_empty_count() {
        let s = PositionSnapshot::new(&BoardState::initial());
        assert_eq!(parity(&s, Color::Black), -1);
        assert_eq!(parity(&s, Color::White), 1);
    }
}
