use crate::board::bitboard::{shift, BoardState, DIRECTIONS};
use crate::board::types::{Color, Position};

/// Legal destinations as a mask. Iterates in ascending bit order, which is
/// ascending row, then ascending column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MoveSet(pub u64);

impl MoveSet {
    pub const fn mask(self) -> u64 { self.0 }
    pub const fn len(self) -> usize { self.0.count_ones() as usize }
    pub const fn is_empty(self) -> bool { self.0 == 0 }
    pub const fn contains(self, pos: Position) -> bool { self.0 & pos.bit() != 0 }

    pub fn first(self) -> Option<Position> {
        if self.0 == 0 { None } else { Position::from_index(self.0.trailing_zeros() as u8) }
    }

    pub fn to_vec(self) -> Vec<Position> { self.into_iter().collect() }
}

pub struct MoveSetIter(u64);

impl Iterator for MoveSetIter {
    type Item = Position;

    #[inline]
    fn next(&mut self) -> Option<Position> {
        if self.0 == 0 { return None; }
        let idx = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Position::from_index(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MoveSetIter {}

impl IntoIterator for MoveSet {
    type Item = Position;
    type IntoIter = MoveSetIter;
    fn into_iter(self) -> MoveSetIter { MoveSetIter(self.0) }
}

/// Flood fill in all eight directions. A run of opponent discs is at most
/// six long, so five propagation steps after the seed cover every run.
#[inline]
pub fn valid_moves_mask(board: &BoardState, color: Color) -> MoveSet {
    let own = board.pieces(color);
    let opp = board.pieces(color.opponent());
    let empty = board.empties();
    let mut moves = 0u64;
    for &(dr, dc) in DIRECTIONS.iter() {
        let mut flood = shift(own, dr, dc) & opp;
        for _ in 0..5 { flood |= shift(flood, dr, dc) & opp; }
        moves |= shift(flood, dr, dc) & empty;
    }
    MoveSet(moves)
}

pub fn valid_moves(board: &BoardState, color: Color) -> Vec<Position> {
    valid_moves_mask(board, color).to_vec()
}

/// Point check by walking each direction from `pos`.
pub fn is_valid_move(board: &BoardState, color: Color, pos: Position) -> bool {
    if board.occupied() & pos.bit() != 0 { return false; }
    let own = color.to_piece();
    let opp = color.opponent().to_piece();
    for &(dr, dc) in DIRECTIONS.iter() {
        let mut r = pos.row() as i32 + dr;
        let mut c = pos.col() as i32 + dc;
        let mut seen_opp = false;
        while let Some(p) = Position::from_signed(r, c) {
            let piece = board.piece_at(p);
            if piece == opp {
                seen_opp = true;
            } else {
                if piece == own && seen_opp { return true; }
                break;
            }
            r += dr;
            c += dc;
        }
    }
    false
}

/// Naive scan of every cell; the oracle the flood generator must match.
pub fn valid_moves_reference(board: &BoardState, color: Color) -> Vec<Position> {
    (0u8..64)
        .filter_map(Position::from_index)
        .filter(|&p| is_valid_move(board, color, p))
        .collect()
}

pub fn has_any_moves(board: &BoardState, color: Color) -> bool {
    !valid_moves_mask(board, color).is_empty()
}

pub fn is_game_finished(board: &BoardState) -> bool {
    board.is_full() || (!has_any_moves(board, Color::Black) && !has_any_moves(board, Color::White))
}

/// `(black, white)` disc counts.
pub fn count_pieces(board: &BoardState) -> (u32, u32) {
    (board.count(Color::Black), board.count(Color::White))
}

/// Color with more discs, `None` on a draw. Meaningful for finished games.
pub fn winner(board: &BoardState) -> Option<Color> {
    let (b, w) = count_pieces(board);
    if b > w { Some(Color::Black) } else if w > b { Some(Color::White) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position { Position::from_algebraic(s).unwrap() }

    #[test]
    fn start_position_moves() {
        let b = BoardState::initial();
        assert_eq!(valid_moves(&b, Color::Black), vec![sq("d3"), sq("c4"), sq("f5"), sq("e6")]);
        assert_eq!(valid_moves(&b, Color::White), vec![sq("e3"), sq("f4"), sq("c5"), sq("d6")]);
        assert_eq!(valid_moves_reference(&b, Color::Black), valid_moves(&b, Color::Black));
    }

    #[test]
    fn long_run_along_row_is_found() {
        // black at a1, six white discs b1..g1, h1 empty
        let b: BoardState = "BWWWWWW. ........ ........ ........ ........ ........ ........ ........".parse().unwrap();
        assert_eq!(valid_moves(&b, Color::Black), vec![sq("h1")]);
        assert!(is_valid_move(&b, Color::Black, sq("h1")));
        assert!(valid_moves(&b, Color::White).is_empty());
    }

    #[test]
    fn no_wraparound_between_rows() {
        // black at h1, white at a2, b2 empty: not a capture line
        let b: BoardState = ".......B W....... ........ ........ ........ ........ ........ ........".parse().unwrap();
        assert!(valid_moves(&b, Color::Black).is_empty());
        assert!(valid_moves_reference(&b, Color::Black).is_empty());
    }

    #[test]
    fn empty_board_is_finished_with_no_winner() {
        let b = BoardState::empty();
        assert!(is_game_finished(&b));
        assert_eq!(winner(&b), None);
        assert_eq!(count_pieces(&BoardState::initial()), (2, 2));
    }
}
