use std::sync::Arc;

use othello_engine::board::{is_game_finished, BoardState, Color, Game, Position};
use othello_engine::eval::coeffs::{presets, v3, v7};
use othello_engine::eval::verify::random_positions;
use othello_engine::eval::{BatchEvaluator, Evaluator, MixedEvaluator, WIN_SCORE};
use othello_engine::search::{EvaluationCache, SearchParams, Searcher};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

fn sq(s: &str) -> Option<Position> { Position::from_algebraic(s).ok() }

// white to move with a7 as the only legal move
const FORCED: &str = "BBBBBB..BWWW.....WWWW....WBWWW.W.WBWWWWWBWBW..WW.BBW..W.BWWW....";

#[test]
fn start_position_ties_resolve_to_first_move() {
    let b = BoardState::initial();
    for c in presets() {
        let e = MixedEvaluator::new(c.clone()).unwrap();
        for depth in 1..=4 {
            let r = Searcher::new().solve(&b, Color::Black, depth, &e);
            assert_eq!(r.best_move, sq("d3"), "{} depth {}", c.name, depth);
        }
    }
}

#[test]
fn start_position_known_scores() {
    let b = BoardState::initial();
    let e = MixedEvaluator::new(v7()).unwrap();
    let scores: Vec<i32> = (1..=4).map(|d| Searcher::new().solve(&b, Color::Black, d, &e).score).collect();
    assert_eq!(scores, vec![-77, -77, -28, -36]);
}

#[test]
fn midgame_known_results() {
    let g = Game::from_transcript("f5d6c3d3c4f4f6f3e6e7d7c5").unwrap();
    let v7e = MixedEvaluator::new(v7()).unwrap();
    let v3e = MixedEvaluator::new(v3()).unwrap();
    let got: Vec<(Option<Position>, i32)> = (1..=4)
        .map(|d| { let r = Searcher::new().solve(&g.board(), g.to_move(), d, &v7e); (r.best_move, r.score) })
        .collect();
    assert_eq!(got, vec![(sq("e3"), 14), (sq("b6"), 12), (sq("b6"), -9), (sq("b6"), 5)]);
    let r = Searcher::new().solve(&g.board(), g.to_move(), 4, &v3e);
    assert_eq!((r.best_move, r.score), (sq("b6"), -42));
}

#[test]
fn repeated_searches_are_identical() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let b = BoardState::initial();
    let first = Searcher::new().solve(&b, Color::Black, 4, &e);
    for _ in 0..3 {
        assert_eq!(Searcher::new().solve(&b, Color::Black, 4, &e), first);
    }
}

#[test]
fn forced_move_is_returned_without_search() {
    let b: BoardState = FORCED.parse().unwrap();
    let e = MixedEvaluator::new(v7()).unwrap();
    for depth in [1, 6] {
        let r = Searcher::new().solve(&b, Color::White, depth, &e);
        assert_eq!(r.best_move, sq("a7"));
        assert_eq!(r.score, -631);
        assert_eq!((r.nodes, r.evals), (1, 1));
    }
}

#[test]
fn no_moves_for_either_side() {
    let b: BoardState = "BB.....W ........ ........ ........ ........ ........ ........ B.......".parse().unwrap();
    assert!(is_game_finished(&b));
    let e = MixedEvaluator::new(v7()).unwrap();
    let r = Searcher::new().solve(&b, Color::White, 5, &e);
    assert_eq!(r.best_move, None);
    assert_eq!(r.score, -WIN_SCORE - 2);
    let r = Searcher::new().solve(&b, Color::Black, 5, &e);
    assert_eq!(r.score, WIN_SCORE + 2);
}

#[test]
fn backends_pick_identical_moves() {
    let r = MixedEvaluator::new(v7()).unwrap();
    let f = BatchEvaluator::new(v7()).unwrap();
    for (b, c) in random_positions(606, 4).into_iter().step_by(7) {
        let a = Searcher::new().solve(&b, c, 3, &r);
        let z = Searcher::new().solve(&b, c, 3, &f);
        assert_eq!(a, z);
    }
}

#[test]
fn warm_cache_does_not_change_the_result() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let g = Game::from_transcript("f5d6c3d3c4f4f6f3e6e7d7c5").unwrap();
    let plain = Searcher::new().solve(&g.board(), g.to_move(), 4, &e);
    let cache = Arc::new(EvaluationCache::new(1 << 16));
    let cold = Searcher::with_cache(cache.clone()).solve(&g.board(), g.to_move(), 4, &e);
    let warm = Searcher::with_cache(cache.clone()).solve(&g.board(), g.to_move(), 4, &e);
    assert_eq!((cold.best_move, cold.score, cold.nodes), (plain.best_move, plain.score, plain.nodes));
    assert_eq!((warm.best_move, warm.score, warm.nodes), (plain.best_move, plain.score, plain.nodes));
    assert_eq!(warm.evals, 0);
    assert!(cold.evals <= plain.evals);
}

#[test]
fn cached_root_result_is_available_after_solve() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let cache = Arc::new(EvaluationCache::new(1 << 12));
    let mut s = Searcher::with_cache(cache);
    let b = BoardState::initial();
    assert!(s.cached_result(&b, Color::Black, 1, &e).is_none());
    let r = s.solve(&b, Color::Black, 3, &e);
    let hit = s.cached_result(&b, Color::Black, 3, &e).expect("root stored");
    assert_eq!((hit.best_move, hit.score, hit.depth), (r.best_move, r.score, 3));
    assert!(s.cached_result(&b, Color::Black, 4, &e).is_none());
}

#[test]
fn root_split_matches_sequential() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let g = Game::from_transcript("f5d6c3d3c4f4f6f3e6e7d7c5").unwrap();
    let seq = Searcher::new().solve(&g.board(), g.to_move(), 4, &e);
    let params = SearchParams { depth: 4, use_cache: false, threads: 4 };
    let par = Searcher::new().search_with_params(&g.board(), g.to_move(), params, &e);
    assert_eq!((par.best_move, par.score), (seq.best_move, seq.score));
}

#[test]
fn concurrent_solves_share_a_cache() {
    let e: Arc<dyn Evaluator> = Arc::new(MixedEvaluator::new(v7()).unwrap());
    let cache = Arc::new(EvaluationCache::new(1 << 16));
    let positions: Vec<_> = random_positions(12, 3).into_iter().step_by(5).collect();
    let expected: Vec<_> = positions.iter().map(|(b, c)| Searcher::new().solve(b, *c, 3, e.as_ref())).collect();
    let got: Vec<_> = positions
        .par_iter()
        .map(|(b, c)| Searcher::with_cache(cache.clone()).solve(b, *c, 3, e.as_ref()))
        .collect();
    for (x, y) in expected.iter().zip(got.iter()) {
        assert_eq!((x.best_move, x.score), (y.best_move, y.score));
    }
    assert!(!cache.is_empty());
}
