use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::board::bitboard::BoardState;
use crate::board::types::{Color, Position};

/// Which backend produced or requested an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheSource {
    Reference,
    Batch,
}

impl CacheSource {
    const fn slot(self) -> usize {
        match self { CacheSource::Reference => 0, CacheSource::Batch => 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Static evaluation of a single node.
    Leaf,
    /// Result of a completed root search.
    Root,
}

/// Exact position identity plus the evaluator that scored it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub black: u64,
    pub white: u64,
    pub to_move: Color,
    pub fingerprint: u64,
    pub scope: CacheScope,
}

impl CacheKey {
    pub fn new(board: &BoardState, to_move: Color, fingerprint: u64, scope: CacheScope) -> Self {
        Self { black: board.black(), white: board.white(), to_move, fingerprint, scope }
    }

    pub fn leaf(board: &BoardState, to_move: Color, fingerprint: u64) -> Self {
        Self::new(board, to_move, fingerprint, CacheScope::Leaf)
    }

    pub fn root(board: &BoardState, to_move: Color, fingerprint: u64) -> Self {
        Self::new(board, to_move, fingerprint, CacheScope::Root)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    pub depth: u32,
    pub best_move: Option<Position>,
    pub source: CacheSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheHit {
    pub score: i32,
    pub depth: u32,
    pub best_move: Option<Position>,
    pub source: CacheSource,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub reference_hits: u64,
    pub reference_misses: u64,
    pub batch_hits: u64,
    pub batch_misses: u64,
    pub rejected: u64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 { self.reference_hits + self.batch_hits }
    pub fn misses(&self) -> u64 { self.reference_misses + self.batch_misses }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 { 0.0 } else { self.hits() as f64 / total as f64 }
    }
}

pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Shared memo of evaluations and root results.
///
/// Readers share the lock; writers hold it exclusively, so an entry is
/// never observed half-written. Entries are never evicted one by one.
/// Once `capacity` keys are held, new keys are refused until `clear`.
pub struct EvaluationCache {
    map: RwLock<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    hits: [AtomicU64; 2],
    misses: [AtomicU64; 2],
    rejected: AtomicU64,
}

impl Default for EvaluationCache {
    fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl EvaluationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(capacity.min(1 << 16))),
            capacity,
            hits: [AtomicU64::new(0), AtomicU64::new(0)],
            misses: [AtomicU64::new(0), AtomicU64::new(0)],
            rejected: AtomicU64::new(0),
        }
    }

    /// Entry for `key` searched at least `min_depth` deep. `requester`
    /// only attributes the hit or miss in `stats`.
    pub fn lookup(&self, key: &CacheKey, min_depth: u32, requester: CacheSource) -> Option<CacheHit> {
        let found = {
            let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
            map.get(key).copied()
        };
        match found {
            Some(e) if e.depth >= min_depth => {
                self.hits[requester.slot()].fetch_add(1, Ordering::Relaxed);
                Some(CacheHit { score: e.score, depth: e.depth, best_move: e.best_move, source: e.source })
            }
            _ => {
                self.misses[requester.slot()].fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Returns whether the entry was written. An existing key is only
    /// replaced by an equal or deeper result.
    pub fn store(&self, key: CacheKey, depth: u32, score: i32, best_move: Option<Position>, source: CacheSource) -> bool {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let entry = CacheEntry { score, depth, best_move, source };
        if let Some(existing) = map.get_mut(&key) {
            if existing.depth > depth { return false; }
            *existing = entry;
            return true;
        }
        if map.len() >= self.capacity {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        map.insert(key, entry);
        true
    }

    pub fn clear(&self) {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        let n = map.len();
        map.clear();
        for c in self.hits.iter().chain(self.misses.iter()) { c.store(0, Ordering::Relaxed); }
        self.rejected.store(0, Ordering::Relaxed);
        log::info!("cache cleared ({} entries)", n);
    }

    pub fn len(&self) -> usize { self.map.read().unwrap_or_else(PoisonError::into_inner).len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    pub fn capacity(&self) -> usize { self.capacity }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            reference_hits: self.hits[0].load(Ordering::Relaxed),
            reference_misses: self.misses[0].load(Ordering::Relaxed),
            batch_hits: self.hits[1].load(Ordering::Relaxed),
            batch_misses: self.misses[1].load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_entries_replace_shallower_only() {
        let c = EvaluationCache::new(8);
        let k = CacheKey::root(&BoardState::initial(), Color::Black, 1);
        assert!(c.store(k, 4, 10, None, CacheSource::Reference));
        assert!(!c.store(k, 2, 99, None, CacheSource::Reference));
        assert_eq!(c.lookup(&k, 4, CacheSource::Reference).map(|h| h.score), Some(10));
        assert!(c.lookup(&k, 5, CacheSource::Reference).is_none());
        assert!(c.store(k, 6, 12, None, CacheSource::Batch));
        assert_eq!(c.lookup(&k, 5, CacheSource::Batch).map(|h| (h.score, h.source)), Some((12, CacheSource::Batch)));
    }

    #[test]
    fn scope_and_fingerprint_separate_keys() {
        let b = BoardState::initial();
        let c = EvaluationCache::new(8);
        c.store(CacheKey::leaf(&b, Color::Black, 1), 0, 5, None, CacheSource::Reference);
        assert!(c.lookup(&CacheKey::root(&b, Color::Black, 1), 0, CacheSource::Reference).is_none());
        assert!(c.lookup(&CacheKey::leaf(&b, Color::Black, 2), 0, CacheSource::Reference).is_none());
        assert!(c.lookup(&CacheKey::leaf(&b, Color::White, 1), 0, CacheSource::Reference).is_none());
        let s = c.stats();
        assert_eq!((s.reference_hits, s.reference_misses), (0, 3));
    }
}
