pub mod types;
pub mod bitboard;
pub mod movegen;
pub mod apply;
pub mod game;

pub use types::{Color, Piece, Position};
pub use bitboard::BoardState;
pub use movegen::{MoveSet, valid_moves, valid_moves_mask, is_valid_move, has_any_moves, is_game_finished, winner, count_pieces};
pub use apply::{apply_move, flips};
pub use game::Game;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("black and white masks overlap: {0:#018x}")]
    Overlap(u64),
    #[error("bad board text: {0}")]
    BadGrid(String),
    #[error("bad square or transcript '{0}'")]
    BadAlgebraic(String),
    #[error("move {index} ({square}) is not legal for {color}")]
    IllegalTranscriptMove { index: usize, square: Position, color: Color },
}

/// Why a placement was refused. The board passed in is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square {0} is occupied")]
    Occupied(Position),
    #[error("square {0} captures nothing")]
    NoCapture(Position),
}
