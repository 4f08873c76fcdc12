//! Builder for LRU-K caches.
//!
//! Collects capacity, K and an optional eviction callback, then validates them
//! in one place.
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::LrukBuilder;
//! use lrukit::traits::CoreCache;
//!
//! let mut cache = LrukBuilder::<u64, String>::new(100).k(3).try_build().unwrap();
//! cache.put(1, "hello".to_string());
//! assert!(!cache.contains(&1));
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru_k::{ConcurrentLrukCache, EvictionCallback, LrukCache};

/// K used when the builder is not told otherwise.
pub const DEFAULT_K: usize = 2;

/// Builder for [`LrukCache`] and [`ConcurrentLrukCache`].
pub struct LrukBuilder<K, V> {
    capacity: usize,
    k: usize,
    on_evict: Option<EvictionCallback<K, V>>,
}

impl<K, V> LrukBuilder<K, V> {
    /// Create a builder with the specified capacity and K = [`DEFAULT_K`].
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            k: DEFAULT_K,
            on_evict: None,
        }
    }

    /// Number of accesses required before a key is admitted.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Callback invoked with every evicted key and value.
    pub fn on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        self.on_evict = Some(Box::new(on_evict));
        self
    }
}

impl<K, V> LrukBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Build a single-threaded cache.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if capacity or K is zero.
    ///
    /// ```rust
    /// use lrukit::builder::LrukBuilder;
    ///
    /// assert!(LrukBuilder::<u64, u64>::new(0).try_build().is_err());
    /// assert!(LrukBuilder::<u64, u64>::new(10).k(0).try_build().is_err());
    /// ```
    pub fn try_build(self) -> Result<LrukCache<K, V>, ConfigError> {
        LrukCache::from_parts(self.capacity, self.k, self.on_evict)
    }
}

impl<K, V> LrukBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Build a cache shareable across threads.
    pub fn try_build_concurrent(self) -> Result<ConcurrentLrukCache<K, V>, ConfigError> {
        self.try_build().map(ConcurrentLrukCache::from)
    }
}

impl<K, V> fmt::Debug for LrukBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukBuilder")
            .field("capacity", &self.capacity)
            .field("k", &self.k)
            .field("has_on_evict", &self.on_evict.is_some())
            .finish()
    }
}
