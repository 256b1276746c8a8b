use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use othello_engine::board::{BoardState, Color};
use othello_engine::eval::coeffs::v7;
use othello_engine::eval::{Evaluator, MixedEvaluator};
use othello_engine::search::progressive::{deepen, spawn};
use othello_engine::search::Searcher;

#[test]
fn deepen_reports_each_depth_in_order() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let mut s = Searcher::new();
    let mut depths = Vec::new();
    let last = deepen(&mut s, &BoardState::initial(), Color::Black, 4, &e, |r| depths.push(r.depth)).unwrap();
    assert_eq!(depths, vec![1, 2, 3, 4]);
    assert_eq!(last, Searcher::new().solve(&BoardState::initial(), Color::Black, 4, &e));
}

#[test]
fn background_search_delivers_completed_depths() {
    let e: Arc<dyn Evaluator> = Arc::new(MixedEvaluator::new(v7()).unwrap());
    let mut p = spawn(BoardState::initial(), Color::Black, 3, e.clone(), None);
    let first = p.next_depth().expect("depth 1");
    assert_eq!(first.depth, 1);
    let last = p.join().expect("completed");
    assert_eq!(last.depth, 3);
    assert_eq!(last.best_move, Searcher::new().solve(&BoardState::initial(), Color::Black, 3, e.as_ref()).best_move);
}

#[test]
fn cancelled_search_surfaces_nothing_partial() {
    let e = MixedEvaluator::new(v7()).unwrap();
    let flag = Arc::new(AtomicBool::new(true));
    let mut s = Searcher::new();
    s.set_abort(Some(flag.clone()));
    assert!(s.solve_cancellable(&BoardState::initial(), Color::Black, 6, &e).is_none());
    flag.store(false, Ordering::Relaxed);
    assert!(s.solve_cancellable(&BoardState::initial(), Color::Black, 2, &e).is_some());
}

#[test]
fn cancel_stops_a_deep_background_search() {
    let e: Arc<dyn Evaluator> = Arc::new(MixedEvaluator::new(v7()).unwrap());
    let p = spawn(BoardState::initial(), Color::Black, 40, e, None);
    p.cancel();
    assert!(p.is_cancelled());
    // whatever completed before the cancel is a whole depth
    if let Some(r) = p.join() { assert!(r.depth < 40); }
}
