use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::board::bitboard::BoardState;
use crate::board::types::Color;
use crate::eval::Evaluator;
use crate::search::alphabeta::{SearchResult, Searcher};
use crate::search::cache::EvaluationCache;

/// Runs depths `1..=max_depth` on `searcher`, calling `on_depth` after each
/// completed depth. Stops early when the abort flag fires or a depth
/// returns without a move to choose. Returns the deepest completed result.
pub fn deepen<F>(searcher: &mut Searcher, board: &BoardState, color: Color, max_depth: u32, eval: &dyn Evaluator, mut on_depth: F) -> Option<SearchResult>
where
    F: FnMut(&SearchResult),
{
    let mut last = None;
    for d in 1..=max_depth.max(1) {
        let Some(r) = searcher.solve_cancellable(board, color, d, eval) else { break };
        on_depth(&r);
        // a root without moves gives the same answer at every depth
        let settled = r.best_move.is_none();
        last = Some(r);
        if settled { break; }
    }
    last
}

/// Handle to a background deepening search.
pub struct ProgressiveSearch {
    rx: Receiver<SearchResult>,
    abort: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    latest: Option<SearchResult>,
}

/// Starts deepening on a worker thread. Each completed depth is sent as it
/// finishes; a depth interrupted by `cancel` is never sent.
pub fn spawn(board: BoardState, color: Color, max_depth: u32, eval: Arc<dyn Evaluator>, cache: Option<Arc<EvaluationCache>>) -> ProgressiveSearch {
    let (tx, rx) = mpsc::channel();
    let abort = Arc::new(AtomicBool::new(false));
    let flag = abort.clone();
    let handle = std::thread::spawn(move || {
        let mut s = Searcher::new();
        s.set_cache(cache);
        s.set_abort(Some(flag));
        deepen(&mut s, &board, color, max_depth, eval.as_ref(), |r| {
            // receiver may be gone already
            let _ = tx.send(r.clone());
        });
    });
    ProgressiveSearch { rx, abort, handle: Some(handle), latest: None }
}

impl ProgressiveSearch {
    pub fn cancel(&self) { self.abort.store(true, Ordering::Relaxed); }

    pub fn is_cancelled(&self) -> bool { self.abort.load(Ordering::Relaxed) }

    /// Newest completed depth received so far, without blocking.
    pub fn latest(&mut self) -> Option<&SearchResult> {
        loop {
            match self.rx.try_recv() {
                Ok(r) => self.latest = Some(r),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.latest.as_ref()
    }

    /// Blocks for the next completed depth; `None` once the worker is done.
    pub fn next_depth(&mut self) -> Option<SearchResult> {
        let r = self.rx.recv().ok()?;
        self.latest = Some(r.clone());
        Some(r)
    }

    /// Waits for the worker and returns the deepest completed result.
    pub fn join(mut self) -> Option<SearchResult> {
        if let Some(h) = self.handle.take() {
            if h.join().is_err() { log::warn!("progressive search worker panicked"); }
        }
        while let Ok(r) = self.rx.try_recv() { self.latest = Some(r); }
        self.latest.take()
    }
}

impl Drop for ProgressiveSearch {
    fn drop(&mut self) {
        self.cancel();
        if let Some(h) = self.handle.take() { let _ = h.join(); }
    }
}
