use serde::{Deserialize, Serialize};

use crate::board::apply::apply_move;
use crate::board::bitboard::BoardState;
use crate::board::movegen::{has_any_moves, is_game_finished, valid_moves, winner};
use crate::board::types::{format_transcript, parse_transcript, Color, Position};
use crate::board::{BoardError, MoveError};

/// A game in progress: board, side to move, and played squares.
///
/// Passes are automatic. After each move, if the side due to move has no
/// legal move but the other side does, the turn returns to the mover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    black: u64,
    white: u64,
    to_move: Color,
    history: Vec<Position>,
    passes: u32,
}

impl Default for Game {
    fn default() -> Self { Self::new() }
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(BoardState::initial(), Color::Black)
    }

    pub fn from_board(board: BoardState, to_move: Color) -> Self {
        let mut g = Self { black: board.black(), white: board.white(), to_move, history: Vec::new(), passes: 0 };
        g.settle_turn();
        g
    }

    /// Replays a transcript like `"f5d6c3"` from the standard start.
    pub fn from_transcript(transcript: &str) -> Result<Self, BoardError> {
        let mut g = Self::new();
        for (index, square) in parse_transcript(transcript)?.into_iter().enumerate() {
            let color = g.to_move;
            g.play(square).map_err(|_| BoardError::IllegalTranscriptMove { index, square, color })?;
        }
        Ok(g)
    }

    pub fn board(&self) -> BoardState { BoardState::from_masks_unchecked(self.black, self.white) }
    pub fn to_move(&self) -> Color { self.to_move }
    pub fn history(&self) -> &[Position] { &self.history }
    pub fn move_count(&self) -> usize { self.history.len() }
    pub fn passes(&self) -> u32 { self.passes }
    pub fn transcript(&self) -> String { format_transcript(&self.history) }

    pub fn valid_moves(&self) -> Vec<Position> { valid_moves(&self.board(), self.to_move) }
    pub fn is_finished(&self) -> bool { is_game_finished(&self.board()) }

    /// Winner once the game is over, `None` while it runs or on a draw.
    pub fn winner(&self) -> Option<Color> {
        if self.is_finished() { winner(&self.board()) } else { None }
    }

    pub fn play(&mut self, pos: Position) -> Result<(), MoveError> {
        let next = apply_move(&self.board(), self.to_move, pos)?;
        self.black = next.black();
        self.white = next.white();
        self.history.push(pos);
        self.to_move = self.to_move.opponent();
        self.settle_turn();
        Ok(())
    }

    fn settle_turn(&mut self) {
        let b = self.board();
        if !has_any_moves(&b, self.to_move) && has_any_moves(&b, self.to_move.opponent()) {
            self.to_move = self.to_move.opponent();
            self.passes += 1;
        }
    }
}
