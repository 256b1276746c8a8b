use crate::board::bitboard::BoardState;
use crate::board::movegen::{valid_moves_mask, MoveSet};
use crate::board::types::Color;

/// Facts about a node computed once and shared by move ordering and leaf
/// evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionSnapshot {
    pub black_count: u32,
    pub white_count: u32,
    pub black_moves: MoveSet,
    pub white_moves: MoveSet,
    /// Neither side can move, or the board is full.
    pub terminal: bool,
}

impl PositionSnapshot {
    pub fn new(board: &BoardState) -> Self {
        let black_count = board.count(Color::Black);
        let white_count = board.count(Color::White);
        if black_count + white_count == 64 {
            return Self { black_count, white_count, black_moves: MoveSet(0), white_moves: MoveSet(0), terminal: true };
        }
        let black_moves = valid_moves_mask(board, Color::Black);
        let white_moves = valid_moves_mask(board, Color::White);
        let terminal = black_moves.is_empty() && white_moves.is_empty();
        Self { black_count, white_count, black_moves, white_moves, terminal }
    }

    #[inline]
    pub fn moves(&self, color: Color) -> MoveSet {
        match color { Color::Black => self.black_moves, Color::White => self.white_moves }
    }

    #[inline]
    pub fn count(&self, color: Color) -> u32 {
        match color { Color::Black => self.black_count, Color::White => self.white_count }
    }

    pub fn occupied(&self) -> u32 { self.black_count + self.white_count }
    pub fn empty_count(&self) -> u32 { 64 - self.occupied() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_snapshot() {
        let s = PositionSnapshot::new(&BoardState::initial());
        assert_eq!(s.occupied(), 4);
        assert_eq!(s.moves(Color::Black).len(), 4);
        assert_eq!(s.moves(Color::White).len(), 4);
        assert!(!s.terminal);
    }

    #[test]
    fn full_board_is_terminal() {
        let b = BoardState::from_masks(0xFFFF_FFFF, 0xFFFF_FFFF_0000_0000).unwrap();
        let s = PositionSnapshot::new(&b);
        assert!(s.terminal);
        assert_eq!(s.empty_count(), 0);
    }
}
