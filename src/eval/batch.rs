use rayon::prelude::*;

use crate::board::bitboard::{BoardState, CORNERS};
use crate::board::types::Color;
use crate::eval::coeffs::{CoefficientError, EvaluationCoefficients};
use crate::eval::heuristics::{frontier_bits, stability_bits};
use crate::eval::{terminal_score, Evaluator};
use crate::search::cache::CacheSource;
use crate::search::snapshot::PositionSnapshot;

const DEFAULT_PARALLEL_MIN: usize = 64;

/// Mask-only evaluator. Scores match `MixedEvaluator` exactly; batches at or
/// above `parallel_min` positions are split across the rayon pool.
#[derive(Clone, Debug)]
pub struct BatchEvaluator {
    coeffs: EvaluationCoefficients,
    fingerprint: u64,
    parallel_min: usize,
}

impl BatchEvaluator {
    pub fn new(coeffs: EvaluationCoefficients) -> Result<Self, CoefficientError> {
        coeffs.validate()?;
        let fingerprint = coeffs.fingerprint();
        log::info!("evaluator: batch backend with '{}' v{}", coeffs.name, coeffs.version);
        Ok(Self { coeffs, fingerprint, parallel_min: DEFAULT_PARALLEL_MIN })
    }

    pub fn with_parallel_min(mut self, n: usize) -> Self { self.parallel_min = n.max(1); self }

    #[inline]
    fn score(&self, snap: &PositionSnapshot, board: &BoardState, color: Color) -> i32 {
        if let Some(t) = terminal_score(snap, color) { return t; }
        let opp = color.opponent();
        let w = self.coeffs.weights_for(snap.occupied());
        let own_bits = board.pieces(color);
        let opp_bits = board.pieces(opp);
        let material = own_bits.count_ones() as i32 - opp_bits.count_ones() as i32;
        let mobility = snap.moves(color).len() as i32 - snap.moves(opp).len() as i32;
        let corners = (own_bits & CORNERS).count_ones() as i32 - (opp_bits & CORNERS).count_ones() as i32;
        // even empties: black -1, white +1
        let parity = if (snap.empty_count() & 1 == 0) == (color == Color::White) { 1 } else { -1 };
        w[0] * material
            + w[1] * mobility
            + w[2] * corners
            + w[3] * parity
            + w[4] * stability_bits(board, color)
            + w[5] * frontier_bits(board, color)
    }
}

impl Evaluator for BatchEvaluator {
    fn evaluate(&self, snap: &PositionSnapshot, board: &BoardState, color: Color) -> i32 {
        self.score(snap, board, color)
    }

    fn evaluate_many(&self, positions: &[(BoardState, Color)]) -> Vec<i32> {
        let one = |(b, c): &(BoardState, Color)| self.score(&PositionSnapshot::new(b), b, *c);
        if positions.len() < self.parallel_min {
            positions.iter().map(one).collect()
        } else {
            positions.par_iter().map(one).collect()
        }
    }

    fn source(&self) -> CacheSource { CacheSource::Batch }
    fn fingerprint(&self) -> u64 { self.fingerprint }
    fn coefficients(&self) -> &EvaluationCoefficients { &self.coeffs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::coeffs::v7;
    use crate::eval::mixed::MixedEvaluator;

    #[test]
    fn agrees_with_reference_on_start() {
        let b = BoardState::initial();
        let s = PositionSnapshot::new(&b);
        let r = MixedEvaluator::new(v7()).unwrap();
        let f = BatchEvaluator::new(v7()).unwrap();
        for c in [Color::Black, Color::White] {
            assert_eq!(r.evaluate(&s, &b, c), f.evaluate(&s, &b, c));
        }
        assert_eq!(r.fingerprint(), f.fingerprint());
    }

    #[test]
    fn evaluate_many_keeps_order() {
        let f = BatchEvaluator::new(v7()).unwrap().with_parallel_min(1);
        let b = BoardState::initial();
        let batch = vec![(b, Color::Black), (b, Color::White), (b, Color::Black)];
        let got = f.evaluate_many(&batch);
        let s = PositionSnapshot::new(&b);
        assert_eq!(got, vec![f.evaluate(&s, &b, Color::Black), f.evaluate(&s, &b, Color::White), f.evaluate(&s, &b, Color::Black)]);
    }
}
