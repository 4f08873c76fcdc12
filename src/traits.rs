//! # Cache Traits
//!
//! Operation sets shared by admission caches, split so that generic code can
//! ask for only what it needs.
//!
//! ```text
//!   ┌────────────────────────────────────┐
//!   │          CoreCache<K, V>           │
//!   │  put / get / peek / contains       │
//!   │  len / is_empty / capacity / clear │
//!   └─────────────────┬──────────────────┘
//!                     ▼
//!   ┌────────────────────────────────────┐
//!   │         MutableCache<K, V>         │
//!   │  remove(&K) → Option<V>            │
//!   └─────────────────┬──────────────────┘
//!                     ▼
//!   ┌────────────────────────────────────┐
//!   │        LrukCacheTrait<K, V>        │
//!   │  k_value / touch / history_len     │
//!   │  access_count / access_history     │
//!   └────────────────────────────────────┘
//! ```
//!
//! "Present" means *admitted*: an admission cache may know about a key that it
//! still refuses to serve. `get`, `peek`, `contains` and `len` only see
//! admitted entries; `remove`, `access_count` and `touch` see every tracked key.

/// Operations every admission cache supports.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru_k::LrukCache;
/// use lrukit::traits::CoreCache;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, key: u64, value: &str, times: usize) {
///     for _ in 0..times {
///         cache.put(key, value.to_string());
///     }
/// }
///
/// let mut cache = LrukCache::try_new(10, 2).unwrap();
/// warm(&mut cache, 1, "one", 2);
/// assert_eq!(cache.len(), 1);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates `key`, recording one access.
    ///
    /// Returns `true` if the access admitted an entry into a full cache and
    /// another entry had to be evicted to make room.
    fn put(&mut self, key: K, value: V) -> bool;

    /// Records an access and returns the value if the key is admitted.
    ///
    /// Tracked keys that have not yet been admitted return `None`, even though
    /// the access still counts toward their admission.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns the admitted value without recording an access or reordering.
    fn peek(&self, key: &K) -> Option<&V>;

    /// `true` if `key` is admitted. Never reorders.
    fn contains(&self, key: &K) -> bool;

    /// Number of admitted entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of admitted entries.
    fn capacity(&self) -> usize;

    /// Drops every admitted and tracked entry.
    fn clear(&mut self);
}

/// Caches that allow removing a key regardless of its admission state.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key` and returns its value. No eviction callback is invoked.
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    /// use lrukit::traits::{CoreCache, MutableCache};
    ///
    /// let mut cache = LrukCache::try_new(10, 3).unwrap();
    /// cache.put(1, "tracked");
    ///
    /// assert_eq!(cache.remove(&1), Some("tracked"));
    /// assert_eq!(cache.remove(&1), None);
    /// ```
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// LRU-K specific inspection and access recording.
pub trait LrukCacheTrait<K, V>: MutableCache<K, V> {
    /// Accesses required before a key is admitted.
    fn k_value(&self) -> usize;

    /// Access ticks recorded for `key`, most recent first (at most K).
    ///
    /// Ticks come from a logical clock, not wall time.
    fn access_history(&self, key: &K) -> Option<Vec<u64>>;

    /// Number of ticks currently held for `key` (at most K).
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    /// use lrukit::traits::{CoreCache, LrukCacheTrait};
    ///
    /// let mut cache = LrukCache::try_new(10, 3).unwrap();
    /// cache.put(1, "v");
    /// cache.get(&1);
    /// assert_eq!(cache.access_count(&1), Some(2));
    /// assert_eq!(cache.access_count(&2), None);
    /// ```
    fn access_count(&self, key: &K) -> Option<usize>;

    /// Records an access without reading the value.
    ///
    /// May admit the key (and so evict another). Returns `false` if the key is
    /// not tracked at all.
    fn touch(&mut self, key: &K) -> bool;

    /// Number of tracked keys still waiting for admission.
    fn history_len(&self) -> usize;
}
