use std::fmt;
use std::str::FromStr;

use crate::board::types::{Color, Piece, Position};
use crate::board::BoardError;

pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_H: u64 = 0x8080_8080_8080_8080;
pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;
pub const CORNERS: u64 = (1 << 0) | (1 << 7) | (1 << 56) | (1 << 63);
pub const FULL: u64 = !0;

/// The eight compass directions as (row delta, col delta).
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// Shifts every bit one step in direction `(dr, dc)`, dropping bits that
/// would leave the board or wrap to the opposite file.
#[inline(always)]
pub const fn shift(bits: u64, dr: i32, dc: i32) -> u64 {
    let s = dr * 8 + dc;
    let moved = if s > 0 { bits << s } else { bits >> (-s) };
    match dc {
        1 => moved & NOT_FILE_A,
        -1 => moved & NOT_FILE_H,
        _ => moved,
    }
}

/// Position as two disjoint occupancy masks. A value type: moves produce a
/// new `BoardState` and never touch the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BoardState {
    black: u64,
    white: u64,
}

impl BoardState {
    pub const fn empty() -> Self { Self { black: 0, white: 0 } }

    /// Standard opening: white on d4/e5, black on e4/d5.
    pub const fn initial() -> Self {
        let d4 = 1u64 << (3 * 8 + 3);
        let e4 = 1u64 << (3 * 8 + 4);
        let d5 = 1u64 << (4 * 8 + 3);
        let e5 = 1u64 << (4 * 8 + 4);
        Self { black: e4 | d5, white: d4 | e5 }
    }

    pub fn from_masks(black: u64, white: u64) -> Result<Self, BoardError> {
        if black & white != 0 { return Err(BoardError::Overlap(black & white)); }
        Ok(Self { black, white })
    }

    /// Callers must guarantee the masks are disjoint.
    pub(crate) const fn from_masks_unchecked(black: u64, white: u64) -> Self {
        Self { black, white }
    }

    pub const fn black(&self) -> u64 { self.black }
    pub const fn white(&self) -> u64 { self.white }

    pub const fn pieces(&self, color: Color) -> u64 {
        match color { Color::Black => self.black, Color::White => self.white }
    }

    pub const fn occupied(&self) -> u64 { self.black | self.white }
    pub const fn empties(&self) -> u64 { !(self.black | self.white) }

    pub const fn count(&self, color: Color) -> u32 { self.pieces(color).count_ones() }
    pub const fn occupied_count(&self) -> u32 { self.occupied().count_ones() }
    pub const fn empty_count(&self) -> u32 { 64 - self.occupied_count() }
    pub const fn is_full(&self) -> bool { self.occupied() == FULL }

    pub const fn piece_at(&self, pos: Position) -> Piece {
        let bit = pos.bit();
        if self.black & bit != 0 { Piece::Black } else if self.white & bit != 0 { Piece::White } else { Piece::Empty }
    }

    /// Returns a copy with `pos` set to `piece`.
    pub fn with_piece(&self, pos: Position, piece: Piece) -> Self {
        let bit = pos.bit();
        let (mut black, mut white) = (self.black & !bit, self.white & !bit);
        match piece {
            Piece::Black => black |= bit,
            Piece::White => white |= bit,
            Piece::Empty => {}
        }
        Self { black, white }
    }

    pub fn to_grid(&self) -> [[Piece; 8]; 8] {
        let mut grid = [[Piece::Empty; 8]; 8];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if let Some(p) = Position::new(r as u8, c as u8) { *cell = self.piece_at(p); }
            }
        }
        grid
    }

    pub fn from_grid(grid: &[[Piece; 8]; 8]) -> Self {
        let (mut black, mut white) = (0u64, 0u64);
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let bit = 1u64 << (r * 8 + c);
                match cell {
                    Piece::Black => black |= bit,
                    Piece::White => white |= bit,
                    Piece::Empty => {}
                }
            }
        }
        Self { black, white }
    }
}

/// Parses 64 cells in row-major order; `B`/`X` black, `W`/`O` white, `.`/`-` empty.
/// Whitespace is ignored so multi-line grids work.
impl FromStr for BoardState {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != 64 { return Err(BoardError::BadGrid(format!("expected 64 cells, got {}", cells.len()))); }
        let (mut black, mut white) = (0u64, 0u64);
        for (i, ch) in cells.iter().enumerate() {
            match ch {
                'B' | 'b' | 'X' | 'x' => black |= 1 << i,
                'W' | 'w' | 'O' | 'o' => white |= 1 << i,
                '.' | '-' => {}
                other => return Err(BoardError::BadGrid(format!("unexpected cell '{}' at {}", other, i))),
            }
        }
        Ok(Self { black, white })
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (r, row) in self.to_grid().iter().enumerate() {
            write!(f, "{}", r + 1)?;
            for cell in row { write!(f, " {}", cell.symbol())?; }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout() {
        let b = BoardState::initial();
        assert_eq!(b.count(Color::Black), 2);
        assert_eq!(b.count(Color::White), 2);
        assert_eq!(b.piece_at(Position::from_algebraic("d4").unwrap()), Piece::White);
        assert_eq!(b.piece_at(Position::from_algebraic("e4").unwrap()), Piece::Black);
        assert_eq!(b.piece_at(Position::from_algebraic("d5").unwrap()), Piece::Black);
        assert_eq!(b.piece_at(Position::from_algebraic("e5").unwrap()), Piece::White);
    }

    #[test]
    fn shift_guards_files() {
        // h1 east would wrap to a2
        assert_eq!(shift(1 << 7, 0, 1), 0);
        // a2 west would wrap to h1
        assert_eq!(shift(1 << 8, 0, -1), 0);
        assert_eq!(shift(1 << 63, 1, 0), 0);
        assert_eq!(shift(1 << 9, -1, -1), 1);
    }

    #[test]
    fn from_masks_rejects_overlap() {
        assert!(BoardState::from_masks(0b11, 0b10).is_err());
        assert!(BoardState::from_masks(0b01, 0b10).is_ok());
    }

    #[test]
    fn grid_and_text_agree() {
        let b = BoardState::initial();
        assert_eq!(BoardState::from_grid(&b.to_grid()), b);
        let text = "
            ........
            ........
            ........
            ...WB...
            ...BW...
            ........
            ........
            ........";
        assert_eq!(text.parse::<BoardState>().unwrap(), b);
        assert!("BW".parse::<BoardState>().is_err());
    }
}
