pub mod snapshot;
pub mod cache;
pub mod alphabeta;
pub mod progressive;

pub use alphabeta::{SearchParams, SearchResult, Searcher};
pub use cache::{CacheKey, CacheScope, CacheSource, EvaluationCache};
pub use snapshot::PositionSnapshot;
