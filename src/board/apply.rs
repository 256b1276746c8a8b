use crate::board::bitboard::{shift, BoardState, DIRECTIONS};
use crate::board::types::{Color, Position};
use crate::board::MoveError;

/// Mask of discs that placing `color` at `pos` would flip. Zero when the
/// square captures nothing or is occupied.
#[inline]
pub fn flips(board: &BoardState, color: Color, pos: Position) -> u64 {
    let bit = pos.bit();
    if board.occupied() & bit != 0 { return 0; }
    let own = board.pieces(color);
    let opp = board.pieces(color.opponent());
    let mut all = 0u64;
    for &(dr, dc) in DIRECTIONS.iter() {
        let mut run = 0u64;
        let mut cur = shift(bit, dr, dc);
        while cur & opp != 0 {
            run |= cur;
            cur = shift(cur, dr, dc);
        }
        if cur & own != 0 { all |= run; }
    }
    all
}

/// Places a disc for `color` at `pos` and returns the resulting board.
pub fn apply_move(board: &BoardState, color: Color, pos: Position) -> Result<BoardState, MoveError> {
    let bit = pos.bit();
    if board.occupied() & bit != 0 { return Err(MoveError::Occupied(pos)); }
    let f = flips(board, color, pos);
    if f == 0 { return Err(MoveError::NoCapture(pos)); }
    let own = board.pieces(color) | f | bit;
    let opp = board.pieces(color.opponent()) & !f;
    Ok(match color {
        Color::Black => BoardState::from_masks_unchecked(own, opp),
        Color::White => BoardState::from_masks_unchecked(opp, own),
    })
}

/// Applies a move already known to be legal, e.g. one taken from a `MoveSet`.
#[inline]
pub(crate) fn apply_legal(board: &BoardState, color: Color, pos: Position) -> BoardState {
    let bit = pos.bit();
    let f = flips(board, color, pos);
    let own = board.pieces(color) | f | bit;
    let opp = board.pieces(color.opponent()) & !f;
    match color {
        Color::Black => BoardState::from_masks_unchecked(own, opp),
        Color::White => BoardState::from_masks_unchecked(opp, own),
    }
}
