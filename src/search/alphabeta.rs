use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::board::apply::apply_legal;
use crate::board::bitboard::BoardState;
use crate::board::types::{Color, Position};
use crate::eval::Evaluator;
use crate::search::cache::{CacheHit, CacheKey, EvaluationCache};
use crate::search::snapshot::PositionSnapshot;

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub depth: u32,
    pub use_cache: bool,
    /// Root moves are split across the rayon pool when above 1.
    pub threads: usize,
}

impl Default for SearchParams {
    fn default() -> Self { Self { depth: 4, use_cache: true, threads: 1 } }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub best_move: Option<Position>,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
    pub evals: u64,
}

/// Depth-limited minimax with alpha-beta pruning.
///
/// Scores are always from the root mover's point of view: the root mover's
/// nodes maximise, the opponent's minimise. Moves are tried in ascending
/// row then column order and the root keeps the first move among equals,
/// so the chosen move depends only on the position, depth and evaluator.
#[derive(Default)]
pub struct Searcher {
    cache: Option<Arc<EvaluationCache>>,
    use_cache: bool,
    threads: usize,
    abort: Option<Arc<AtomicBool>>,
    aborted: bool,
    nodes: u64,
    evals: u64,
}

impl Searcher {
    pub fn new() -> Self { Self { use_cache: true, threads: 1, ..Self::default() } }

    pub fn with_cache(cache: Arc<EvaluationCache>) -> Self {
        Self { cache: Some(cache), ..Self::new() }
    }

    pub fn set_cache(&mut self, cache: Option<Arc<EvaluationCache>>) { self.cache = cache; }
    pub fn cache(&self) -> Option<&Arc<EvaluationCache>> { self.cache.as_ref() }
    pub fn set_abort(&mut self, flag: Option<Arc<AtomicBool>>) { self.abort = flag; }
    pub fn set_threads(&mut self, n: usize) { self.threads = n.max(1); }

    pub fn solve(&mut self, board: &BoardState, color: Color, depth: u32, eval: &dyn Evaluator) -> SearchResult {
        self.nodes = 0;
        self.evals = 0;
        self.aborted = false;
        let res = self.solve_root(board, color, depth, eval);
        if !self.aborted {
            log::debug!(
                "solve {} depth {}: {} score {} nodes {} evals {}",
                color, depth, res.best_move.map_or_else(|| "pass".to_string(), |p| p.to_algebraic()), res.score, res.nodes, res.evals
            );
            if let (Some(cache), true) = (&self.cache, self.use_cache) {
                cache.store(CacheKey::root(board, color, eval.fingerprint()), depth, res.score, res.best_move, eval.source());
            }
        }
        res
    }

    /// Like `solve`, but `None` when the abort flag fired before the search
    /// completed.
    pub fn solve_cancellable(&mut self, board: &BoardState, color: Color, depth: u32, eval: &dyn Evaluator) -> Option<SearchResult> {
        let res = self.solve(board, color, depth, eval);
        if self.aborted { None } else { Some(res) }
    }

    pub fn search_with_params(&mut self, board: &BoardState, color: Color, params: SearchParams, eval: &dyn Evaluator) -> SearchResult {
        self.use_cache = params.use_cache;
        self.threads = params.threads.max(1);
        self.solve(board, color, params.depth, eval)
    }

    /// Stored root result at least `min_depth` deep, for display while a
    /// fresh search runs. Never consulted by `solve` itself.
    pub fn cached_result(&self, board: &BoardState, color: Color, min_depth: u32, eval: &dyn Evaluator) -> Option<CacheHit> {
        let cache = self.cache.as_ref()?;
        cache.lookup(&CacheKey::root(board, color, eval.fingerprint()), min_depth, eval.source())
    }

    pub fn was_aborted(&self) -> bool { self.aborted }

    fn solve_root(&mut self, board: &BoardState, color: Color, depth: u32, eval: &dyn Evaluator) -> SearchResult {
        self.nodes += 1;
        let snap = PositionSnapshot::new(board);
        let moves = snap.moves(color);

        if moves.is_empty() {
            let score = self.leaf(board, &snap, color, eval);
            return self.result(None, score, depth);
        }
        if moves.len() == 1 {
            let mv = moves.first();
            let child = match mv { Some(p) => apply_legal(board, color, p), None => *board };
            let score = self.leaf(&child, &PositionSnapshot::new(&child), color, eval);
            return self.result(mv, score, depth);
        }
        if depth == 0 {
            let score = self.leaf(board, &snap, color, eval);
            return self.result(moves.first(), score, depth);
        }
        if self.threads > 1 && depth > 1 {
            return self.solve_root_parallel(board, color, depth, eval);
        }

        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let mut best: Option<Position> = None;
        let mut best_score = i32::MIN;
        for mv in moves {
            let child = apply_legal(board, color, mv);
            let score = self.minimax(&child, color, depth - 1, false, alpha, beta, eval);
            if self.aborted { break; }
            if best.is_none() || score > best_score { best_score = score; best = Some(mv); }
            if best_score > alpha { alpha = best_score; }
        }
        self.result(best, best_score, depth)
    }

    // Each root move is searched with a full window, which yields the exact
    // value. Reducing in move order with strict `>` picks the same move and
    // score as the sequential search.
    fn solve_root_parallel(&mut self, board: &BoardState, color: Color, depth: u32, eval: &dyn Evaluator) -> SearchResult {
        let moves: Vec<Position> = PositionSnapshot::new(board).moves(color).to_vec();
        let cache = if self.use_cache { self.cache.clone() } else { None };
        let abort = self.abort.clone();
        let results: Vec<(Position, i32, u64, u64, bool)> = moves
            .par_iter()
            .map(|&mv| {
                let child = apply_legal(board, color, mv);
                let mut w = Searcher { cache: cache.clone(), use_cache: cache.is_some(), threads: 1, abort: abort.clone(), ..Searcher::default() };
                let score = w.minimax(&child, color, depth - 1, false, i32::MIN, i32::MAX, eval);
                (mv, score, w.nodes, w.evals, w.aborted)
            })
            .collect();

        let mut best: Option<(Position, i32)> = None;
        for (mv, score, nodes, evals, aborted) in results {
            self.nodes += nodes;
            self.evals += evals;
            self.aborted |= aborted;
            if best.map_or(true, |(_, bs)| score > bs) { best = Some((mv, score)); }
        }
        match best {
            Some((mv, score)) => self.result(Some(mv), score, depth),
            None => self.result(None, 0, depth),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(&mut self, board: &BoardState, root: Color, depth: u32, maximizing: bool, mut alpha: i32, mut beta: i32, eval: &dyn Evaluator) -> i32 {
        if let Some(ref flag) = self.abort { if flag.load(Ordering::Relaxed) { self.aborted = true; } }
        if self.aborted { return 0; }
        self.nodes += 1;
        let snap = PositionSnapshot::new(board);
        if depth == 0 || snap.terminal { return self.leaf(board, &snap, root, eval); }

        let mover = if maximizing { root } else { root.opponent() };
        let moves = snap.moves(mover);
        if moves.is_empty() {
            return self.minimax(board, root, depth - 1, !maximizing, alpha, beta, eval);
        }

        if maximizing {
            let mut score = i32::MIN;
            for mv in moves {
                let child = apply_legal(board, mover, mv);
                let s = self.minimax(&child, root, depth - 1, false, alpha, beta, eval);
                if s > score { score = s; }
                if score > alpha { alpha = score; }
                if beta <= alpha { break; }
            }
            score
        } else {
            let mut score = i32::MAX;
            for mv in moves {
                let child = apply_legal(board, mover, mv);
                let s = self.minimax(&child, root, depth - 1, true, alpha, beta, eval);
                if s < score { score = s; }
                if score < beta { beta = score; }
                if beta <= alpha { break; }
            }
            score
        }
    }

    fn leaf(&mut self, board: &BoardState, snap: &PositionSnapshot, root: Color, eval: &dyn Evaluator) -> i32 {
        let cache = if self.use_cache { self.cache.as_ref() } else { None };
        let Some(cache) = cache else {
            self.evals += 1;
            return eval.evaluate(snap, board, root);
        };
        let key = CacheKey::leaf(board, root, eval.fingerprint());
        if let Some(hit) = cache.lookup(&key, 0, eval.source()) { return hit.score; }
        self.evals += 1;
        let score = eval.evaluate(snap, board, root);
        cache.store(key, 0, score, None, eval.source());
        score
    }

    fn result(&self, best_move: Option<Position>, score: i32, depth: u32) -> SearchResult {
        SearchResult { best_move, score, depth, nodes: self.nodes, evals: self.evals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::coeffs::v3;
    use crate::eval::MixedEvaluator;

    #[test]
    fn depth_zero_returns_first_move() {
        let e = MixedEvaluator::new(v3()).unwrap();
        let mut s = Searcher::new();
        let r = s.solve(&BoardState::initial(), Color::Black, 0, &e);
        assert_eq!(r.best_move, Position::from_algebraic("d3").ok());
        assert_eq!(r.evals, 1);
    }

    #[test]
    fn depth_one_counts_children() {
        let e = MixedEvaluator::new(v3()).unwrap();
        let mut s = Searcher::new();
        let r = s.solve(&BoardState::initial(), Color::Black, 1, &e);
        assert_eq!(r.nodes, 5);
        assert_eq!(r.evals, 4);
        assert!(r.best_move.is_some());
    }
}
