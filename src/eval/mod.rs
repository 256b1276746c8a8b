pub mod coeffs;
pub mod heuristics;
pub mod mixed;
pub mod batch;
pub mod verify;

use std::sync::Arc;

use crate::board::bitboard::BoardState;
use crate::board::types::Color;
use crate::search::cache::CacheSource;
use crate::search::snapshot::PositionSnapshot;

pub use coeffs::{preset, CoefficientError, EvaluationCoefficients, PhaseBands};
pub use mixed::MixedEvaluator;
pub use batch::BatchEvaluator;

/// Base score of a won finished game. Exceeds every heuristic total a
/// validated coefficient set can produce.
pub const WIN_SCORE: i32 = 10_000_000;
/// Score when the opponent has no discs left.
pub const WIPEOUT_SCORE: i32 = WIN_SCORE + 64;

const _: () = assert!((WIN_SCORE as i64) > EvaluationCoefficients::heuristic_bound());

/// Scores a position for `color`. Implementations must be pure: the same
/// inputs give the same integer on every call and every backend.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, snap: &PositionSnapshot, board: &BoardState, color: Color) -> i32;

    /// Scores many positions, results in input order.
    fn evaluate_many(&self, positions: &[(BoardState, Color)]) -> Vec<i32> {
        positions.iter().map(|(b, c)| self.evaluate(&PositionSnapshot::new(b), b, *c)).collect()
    }

    fn source(&self) -> CacheSource;

    /// Identifies the scoring function for cache namespacing.
    fn fingerprint(&self) -> u64;

    fn coefficients(&self) -> &EvaluationCoefficients;
}

/// Evaluator implementation selector used by the binaries and the protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Reference,
    Batch,
}

impl Backend {
    pub fn build(self, coeffs: EvaluationCoefficients) -> Result<Arc<dyn Evaluator>, CoefficientError> {
        let e: Arc<dyn Evaluator> = match self {
            Backend::Reference => Arc::new(MixedEvaluator::new(coeffs)?),
            Backend::Batch => Arc::new(BatchEvaluator::new(coeffs)?),
        };
        Ok(e)
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" | "ref" | "mixed" => Ok(Backend::Reference),
            "batch" => Ok(Backend::Batch),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Fixed score for wiped-out or finished positions, `None` otherwise.
/// A finished game scores `±WIN_SCORE` plus the disc margin, a draw 0.
#[inline]
pub fn terminal_score(snap: &PositionSnapshot, color: Color) -> Option<i32> {
    let own = snap.count(color) as i32;
    let opp = snap.count(color.opponent()) as i32;
    if own == 0 && opp > 0 { return Some(-WIPEOUT_SCORE); }
    if opp == 0 && own > 0 { return Some(WIPEOUT_SCORE); }
    if !snap.terminal { return None; }
    let margin = own - opp;
    Some(match margin.signum() {
        1 => WIN_SCORE + margin,
        -1 => -WIN_SCORE + margin,
        _ => 0,
    })
}

/// Whether `score` came from `terminal_score` rather than the heuristics.
pub fn is_decisive(score: i32) -> bool {
    score.unsigned_abs() as i64 > EvaluationCoefficients::heuristic_bound()
}
