//! In-process TTL cache for filter catalogs and content-type lists.
//!
//! Item queries are never cached. Derived data is keyed by the normalized
//! content-type selection and dropped wholesale with
//! [`CacheLayer::invalidate_all`] when the admin invalidation endpoint is
//! called.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

/// Maximum number of cached entries.
const MAX_CAPACITY: u64 = 1_000;

/// TTL cache over values of type `V`.
///
/// Built with a zero TTL the cache is disabled: every lookup misses and
/// inserts are dropped.
#[derive(Clone)]
pub struct CacheLayer<V>
where
    V: Clone + Send + Sync + 'static,
{
    local: Option<Cache<String, V>>,
}

impl<V> CacheLayer<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache whose entries live for `ttl_secs` seconds.
    pub fn new(ttl_secs: u64) -> Self {
        let local = (ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CAPACITY)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });
        Self { local }
    }

    /// Whether entries are retained at all.
    pub fn is_enabled(&self) -> bool {
        self.local.is_some()
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let value = self.local.as_ref()?.get(key).await;
        if value.is_some() {
            debug!(key = %key, "cache hit");
        }
        value
    }

    pub async fn insert(&self, key: &str, value: V) {
        if let Some(local) = &self.local {
            local.insert(key.to_string(), value).await;
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        if let Some(local) = &self.local {
            local.invalidate_all();
            debug!("cache cleared");
        }
    }

    /// Build the key for a content-type selection.
    ///
    /// The selection is sorted so that equal sets share an entry.
    pub fn selection_key(prefix: &str, types: &[String]) -> String {
        let mut sorted: Vec<&str> = types.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.dedup();
        format!("{prefix}:{}", sorted.join(","))
    }
}

impl<V> std::fmt::Debug for CacheLayer<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
