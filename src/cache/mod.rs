mod macros;

use std::fmt::Display;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::models::MovieId;

/// Upper bound on entries held by one cache
pub const MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Metadata(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Metadata(movie_id) => write!(f, "meta:{}", movie_id),
        }
    }
}

/// In-process TTL cache for values fetched from external services.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct Cache<V> {
    entries: MokaCache<CacheKey, V>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Entries expire `ttl` after insertion
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: u64) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// Retrieves a value, `None` when absent or expired
    pub async fn get_from_cache(&self, key: &CacheKey) -> Option<V> {
        self.entries.get(key).await
    }

    pub async fn set(&self, key: CacheKey, value: V) {
        tracing::debug!(key = %key, "Caching value");
        self.entries.insert(key, value).await;
    }
}
