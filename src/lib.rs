//! Othello engine core: bitboard move generation, phase-weighted
//! evaluation, and deterministic alpha-beta search.
pub mod board;
pub mod eval;
pub mod search;
pub mod perft;
pub mod protocol;
pub mod selfplay;

pub use board::{apply_move, count_pieces, is_game_finished, valid_moves, BoardState, Color, Game, Position};
pub use eval::{Evaluator, EvaluationCoefficients, MixedEvaluator, BatchEvaluator};
pub use search::{EvaluationCache, SearchResult, Searcher};
