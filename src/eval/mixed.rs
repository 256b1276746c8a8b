use serde::Serialize;

use crate::board::bitboard::BoardState;
use crate::board::types::Color;
use crate::eval::coeffs::{CoefficientError, Component, EvaluationCoefficients};
use crate::eval::heuristics;
use crate::eval::{terminal_score, Evaluator};
use crate::search::cache::CacheSource;
use crate::search::snapshot::PositionSnapshot;

/// Reference evaluator: phase-weighted sum of the six per-cell components.
#[derive(Clone, Debug)]
pub struct MixedEvaluator {
    coeffs: EvaluationCoefficients,
    fingerprint: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentScore {
    pub component: Component,
    pub raw: i32,
    pub coefficient: i32,
    pub contribution: i32,
}

/// Per-component view of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub phase: usize,
    /// Set when the position short-circuits to a terminal score.
    pub terminal: Option<i32>,
    pub components: Vec<ComponentScore>,
    pub total: i32,
}

impl MixedEvaluator {
    pub fn new(coeffs: EvaluationCoefficients) -> Result<Self, CoefficientError> {
        coeffs.validate()?;
        let fingerprint = coeffs.fingerprint();
        log::info!("evaluator: reference backend with '{}' v{} ({} phases)", coeffs.name, coeffs.version, coeffs.phases());
        Ok(Self { coeffs, fingerprint })
    }

    pub fn from_preset(name: &str) -> Result<Self, CoefficientError> {
        Self::new(crate::eval::coeffs::preset(name)?)
    }

    /// Raw component values in `Component::ALL` order.
    pub fn raw_components(snap: &PositionSnapshot, board: &BoardState, color: Color) -> [i32; 6] {
        [
            heuristics::material(snap, color),
            heuristics::mobility(snap, color),
            heuristics::corners(board, color),
            heuristics::parity(snap, color),
            heuristics::stability(board, color),
            heuristics::frontier(board, color),
        ]
    }

    pub fn breakdown(&self, snap: &PositionSnapshot, board: &BoardState, color: Color) -> Breakdown {
        let phase = self.coeffs.bands.phase_of(snap.occupied());
        let weights = self.coeffs.weights_for(snap.occupied());
        let raw = Self::raw_components(snap, board, color);
        let components: Vec<ComponentScore> = Component::ALL
            .iter()
            .zip(raw.iter().zip(weights.iter()))
            .map(|(&component, (&raw, &coefficient))| ComponentScore { component, raw, coefficient, contribution: raw * coefficient })
            .collect();
        let terminal = terminal_score(snap, color);
        let total = terminal.unwrap_or_else(|| components.iter().map(|c| c.contribution).sum());
        Breakdown { phase, terminal, components, total }
    }
}

impl Evaluator for MixedEvaluator {
    fn evaluate(&self, snap: &PositionSnapshot, board: &BoardState, color: Color) -> i32 {
        if let Some(t) = terminal_score(snap, color) { return t; }
        let w = self.coeffs.weights_for(snap.occupied());
        let raw = Self::raw_components(snap, board, color);
        w.iter().zip(raw.iter()).map(|(a, b)| a * b).sum()
    }

    fn source(&self) -> CacheSource { CacheSource::Reference }
    fn fingerprint(&self) -> u64 { self.fingerprint }
    fn coefficients(&self) -> &EvaluationCoefficients { &self.coeffs }
}
