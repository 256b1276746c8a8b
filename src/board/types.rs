use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::BoardError;

/// The two sides of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const fn opponent(self) -> Color {
        match self { Color::Black => Color::White, Color::White => Color::Black }
    }

    pub const fn to_piece(self) -> Piece {
        match self { Color::Black => Piece::Black, Color::White => Piece::White }
    }

    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Color::Black => write!(f, "black"), Color::White => write!(f, "white") }
    }
}

/// Contents of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Piece {
    #[default]
    Empty,
    Black,
    White,
}

impl Piece {
    pub const fn color(self) -> Option<Color> {
        match self { Piece::Empty => None, Piece::Black => Some(Color::Black), Piece::White => Some(Color::White) }
    }

    pub const fn symbol(self) -> char {
        match self { Piece::Empty => '.', Piece::Black => 'B', Piece::White => 'W' }
    }
}

/// A cell on the 8x8 grid. Bit index is `row * 8 + col`, so ascending bit
/// order is ascending row, then ascending column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Option<Position> {
        if row < 8 && col < 8 { Some(Position { row, col }) } else { None }
    }

    /// Signed-coordinate constructor used by directional walks.
    pub fn from_signed(row: i32, col: i32) -> Option<Position> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub const fn from_index(index: u8) -> Option<Position> {
        if index < 64 { Some(Position { row: index / 8, col: index % 8 }) } else { None }
    }

    pub const fn row(self) -> u8 { self.row }
    pub const fn col(self) -> u8 { self.col }
    pub const fn index(self) -> u8 { self.row * 8 + self.col }
    pub const fn bit(self) -> u64 { 1u64 << self.index() }

    /// Parses algebraic notation: column letter then row digit (`c4` is row 3, col 2).
    pub fn from_algebraic(s: &str) -> Result<Position, BoardError> {
        let b = s.as_bytes();
        if b.len() != 2 { return Err(BoardError::BadAlgebraic(s.to_string())); }
        let col = b[0].to_ascii_lowercase();
        let row = b[1];
        if !(b'a'..=b'h').contains(&col) || !(b'1'..=b'8').contains(&row) {
            return Err(BoardError::BadAlgebraic(s.to_string()));
        }
        Ok(Position { row: row - b'1', col: col - b'a' })
    }

    pub fn to_algebraic(self) -> String {
        let mut s = String::with_capacity(2);
        s.push((b'a' + self.col) as char);
        s.push((b'1' + self.row) as char);
        s
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Splits a transcript such as `"c4c3d3"` into positions.
pub fn parse_transcript(transcript: &str) -> Result<Vec<Position>, BoardError> {
    let t = transcript.trim();
    if !t.is_ascii() || t.len() % 2 != 0 { return Err(BoardError::BadAlgebraic(t.to_string())); }
    (0..t.len()).step_by(2).map(|i| Position::from_algebraic(&t[i..i + 2])).collect()
}

pub fn format_transcript(moves: &[Position]) -> String {
    moves.iter().map(|p| p.to_algebraic()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_matches_row_col_layout() {
        let p = Position::from_algebraic("c4").unwrap();
        assert_eq!((p.row(), p.col()), (3, 2));
        assert_eq!(p.to_algebraic(), "c4");
        assert_eq!(Position::new(7, 7).unwrap().to_algebraic(), "h8");
        assert!(Position::from_algebraic("i1").is_err());
        assert!(Position::from_algebraic("a9").is_err());
        assert!(Position::from_algebraic("a").is_err());
    }

    #[test]
    fn ordering_is_row_major() {
        let a = Position::new(2, 7).unwrap();
        let b = Position::new(3, 0).unwrap();
        assert!(a < b);
        assert!(a.index() < b.index());
    }

    #[test]
    fn transcript_roundtrip_and_rejects_odd_length() {
        let moves = parse_transcript("c4c3d3").unwrap();
        assert_eq!(moves.len(), 3);
        assert_eq!(format_transcript(&moves), "c4c3d3");
        assert!(parse_transcript("c4c").is_err());
        assert!(parse_transcript("").unwrap().is_empty());
    }
}
