//! # LRU-K Admission Cache
//!
//! A key has to be referenced K times before it is admitted into the bounded
//! cache region. Keys seen fewer than K times wait in an unbounded history
//! list; one-off scans therefore never displace admitted data.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LrukCache<K, V>                                 │
//!   │                                                                          │
//!   │   index: FxHashMap<K, Position { membership, SlotId }>                   │
//!   │                                                                          │
//!   │   history (IntrusiveList<Entry>)        cached (IntrusiveList<Entry>)    │
//!   │   < K accesses, unbounded               = K accesses, len ≤ capacity     │
//!   │                                                                          │
//!   │   MRU ─► [x] ◄─► [y] ◄─► [z] ◄─ LRU     MRU ─► [a] ◄─► [b] ◄─ LRU         │
//!   │                                                                          │
//!   │   Entry { key, value, history: FixedHistory (last K ticks) }             │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Lifecycle
//!
//! ```text
//!   put(new key) ──► history ──(K-th access)──► cached ──(tail on overflow)──► on_evict
//!                       │                          │
//!                       └──── remove / clear ──────┴──── remove / clear / resize
//! ```
//!
//! There is no demotion: once admitted, an entry leaves the cache only by
//! eviction, `remove`, `clear`, or a shrinking `resize`. A removed key that
//! comes back starts over with an empty history.
//!
//! ## Eviction
//!
//! Admission into a full cache evicts the tail of `cached`, i.e. the admitted
//! entry that has gone longest without a `get`/`put`/`touch`. Order inside the
//! cached list is plain recency; no backward K-distance ranking is computed.
//! History entries are never evicted.
//!
//! ## Operations
//!
//! | Method              | Complexity | Notes                                     |
//! |---------------------|------------|-------------------------------------------|
//! | `put(key, val)`     | O(1)       | May admit, and so evict one entry         |
//! | `get(&key)`         | O(1)       | Records an access; `None` until admitted  |
//! | `peek(&key)`        | O(1)       | No access recorded, no reordering         |
//! | `contains(&key)`    | O(1)       | Admitted keys only                        |
//! | `remove(&key)`      | O(1)       | Any tracked key; no callback              |
//! | `resize(cap)`       | O(evicted) | Evicts from the tail until within bound   |
//! | `clear()`           | O(n)       | Callback for every admitted entry         |
//! | `keys/values/items` | O(len)     | Admitted entries, MRU first               |
//! | `stats()`           | O(1)       |                                           |
//!
//! ## Thread Safety
//!
//! [`LrukCache`] takes `&mut self` for every mutation. [`ConcurrentLrukCache`]
//! puts the whole engine behind one `parking_lot::RwLock`: `get` takes the
//! write lock because it records an access, while `peek`, `contains` and the
//! snapshot methods share the read lock.
//!
//! The eviction callback runs while that write lock is held. It must not call
//! back into the same cache.
//!
//! ## Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use lrukit::policy::lru_k::LrukCache;
//! use lrukit::traits::CoreCache;
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//! let mut cache = LrukCache::try_with_evict(2, 2, move |k, v| {
//!     sink.lock().unwrap().push((k, v));
//! })
//! .unwrap();
//!
//! cache.put("a", 1);
//! assert!(!cache.contains(&"a")); // one access, still in history
//! cache.put("a", 1);
//! assert!(cache.contains(&"a")); // second access admits it
//!
//! cache.put("b", 2);
//! cache.put("b", 2);
//! cache.put("c", 3);
//! assert!(cache.put("c", 3)); // admitting "c" evicts "a"
//!
//! assert_eq!(cache.keys(), vec!["c", "b"]);
//! assert_eq!(*evicted.lock().unwrap(), vec![("a", 1)]);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{FixedHistory, IntrusiveList, SlotId};
use crate::error::ConfigError;
use crate::metrics::snapshot::LrukStats;
use crate::traits::{CoreCache, LrukCacheTrait, MutableCache};

/// Called with the owned key and value of every evicted entry.
pub type EvictionCallback<K, V> = Box<dyn FnMut(K, V) + Send + Sync>;

/// Which list currently owns an entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Membership {
    /// Fewer than K accesses since admission started.
    History,
    /// Admitted; subject to capacity-bound eviction.
    Cached,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Position {
    membership: Membership,
    id: SlotId,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    history: FixedHistory,
}

/// LRU-K admission cache.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru_k::LrukCache;
/// use lrukit::traits::{CoreCache, LrukCacheTrait};
///
/// let mut cache: LrukCache<u32, &str> = LrukCache::try_new(100, 3).unwrap();
/// cache.put(1, "page");
/// cache.get(&1);
/// assert_eq!(cache.get(&1), Some(&"page")); // third access
///
/// // A one-off scan never reaches the cache.
/// for page in 1000..1100 {
///     cache.put(page, "scan");
/// }
/// assert_eq!(cache.len(), 1);
/// assert_eq!(cache.history_len(), 100);
/// ```
pub struct LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    k: usize,
    capacity: usize,
    index: FxHashMap<K, Position>,
    history: IntrusiveList<Entry<K, V>>,
    cached: IntrusiveList<Entry<K, V>>,
    on_evict: Option<EvictionCallback<K, V>>,
    tick: u64,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache admitting keys after `k` accesses.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` or `k` is zero.
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    ///
    /// assert!(LrukCache::<u32, u32>::try_new(0, 2).is_err());
    /// assert!(LrukCache::<u32, u32>::try_new(8, 0).is_err());
    /// assert!(LrukCache::<u32, u32>::try_new(8, 1).is_ok());
    /// ```
    pub fn try_new(capacity: usize, k: usize) -> Result<Self, ConfigError> {
        Self::from_parts(capacity, k, None)
    }

    /// Like [`try_new`](Self::try_new), registering `on_evict` for evictions
    /// caused by admission, `resize` and `clear`.
    pub fn try_with_evict<F>(capacity: usize, k: usize, on_evict: F) -> Result<Self, ConfigError>
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        Self::from_parts(capacity, k, Some(Box::new(on_evict)))
    }

    pub(crate) fn from_parts(
        capacity: usize,
        k: usize,
        on_evict: Option<EvictionCallback<K, V>>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        if k == 0 {
            return Err(ConfigError::zero_k());
        }
        Ok(LrukCache {
            k,
            capacity,
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            history: IntrusiveList::new(),
            cached: IntrusiveList::with_capacity(capacity),
            on_evict,
            tick: 0,
        })
    }

    /// Changes the capacity, evicting admitted entries from the LRU end until
    /// they fit. Returns how many entries were evicted.
    ///
    /// Every victim is unlinked before the callback runs. If the callback
    /// panics, the remaining victims are dropped without being reported.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` is zero; the cache is left untouched.
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    /// use lrukit::traits::CoreCache;
    ///
    /// let mut cache = LrukCache::try_new(3, 1).unwrap();
    /// cache.put(1, ());
    /// cache.put(2, ());
    /// cache.put(3, ());
    ///
    /// assert_eq!(cache.resize(1), Ok(2));
    /// assert_eq!(cache.keys(), vec![3]);
    /// assert!(cache.resize(0).is_err());
    /// assert_eq!(cache.capacity(), 1);
    /// ```
    pub fn resize(&mut self, capacity: usize) -> Result<usize, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        let old = self.capacity;
        self.capacity = capacity;

        let mut victims = Vec::with_capacity(self.cached.len().saturating_sub(capacity));
        while self.cached.len() > capacity {
            let Some(entry) = self.take_lru() else {
                break;
            };
            victims.push(entry);
        }
        let evicted = victims.len();
        for entry in victims {
            self.notify_evicted(entry);
        }
        debug!(old, new = capacity, evicted, "resized lru-k cache");
        Ok(evicted)
    }

    /// Snapshot of the cache's counts.
    pub fn stats(&self) -> LrukStats {
        LrukStats {
            size: self.cached.len(),
            capacity: self.capacity,
            k: self.k,
            history_size: self.history.len(),
            total_entries: self.index.len(),
        }
    }

    /// Admitted keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        self.cached.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Admitted values, most recently used first.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.cached.iter().map(|entry| entry.value.clone()).collect()
    }

    /// Admitted key/value pairs, most recently used first.
    pub fn items(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.cached
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Membership of a tracked key, `None` if the key is unknown.
    pub fn membership(&self, key: &K) -> Option<Membership> {
        self.index.get(key).map(|pos| pos.membership)
    }

    fn list(&self, membership: Membership) -> &IntrusiveList<Entry<K, V>> {
        match membership {
            Membership::History => &self.history,
            Membership::Cached => &self.cached,
        }
    }

    fn list_mut(&mut self, membership: Membership) -> &mut IntrusiveList<Entry<K, V>> {
        match membership {
            Membership::History => &mut self.history,
            Membership::Cached => &mut self.cached,
        }
    }

    fn entry(&self, key: &K) -> Option<&Entry<K, V>> {
        let pos = self.index.get(key)?;
        self.list(pos.membership).get(pos.id)
    }

    /// Records an access for `key`. `None` if the key is not tracked,
    /// otherwise whether the access caused an eviction.
    fn record_access(&mut self, key: &K) -> Option<bool> {
        let pos = *self.index.get(key)?;
        Some(self.record_access_at(pos))
    }

    fn record_access_at(&mut self, pos: Position) -> bool {
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        let list = self.list_mut(pos.membership);
        let ready = match list.get_mut(pos.id) {
            Some(entry) => {
                entry.history.record(tick);
                entry.history.is_full()
            },
            None => return false,
        };
        list.move_to_front(pos.id);

        pos.membership == Membership::History && ready && self.promote(pos.id)
    }

    /// Moves a history entry to the MRU end of the cache, evicting first if
    /// the cache is full. Returns whether an eviction happened.
    ///
    /// The callback for the victim runs only after the promoted entry is in
    /// place, so a panicking callback leaves both lists consistent.
    fn promote(&mut self, id: SlotId) -> bool {
        let victim = if self.cached.len() >= self.capacity {
            self.take_lru()
        } else {
            None
        };

        if let Some(entry) = self.history.remove(id) {
            let cached_id = self.cached.push_front(entry);
            if let Some(entry) = self.cached.get(cached_id) {
                if let Some(pos) = self.index.get_mut(&entry.key) {
                    *pos = Position {
                        membership: Membership::Cached,
                        id: cached_id,
                    };
                }
            }
            trace!(k = self.k, cached_len = self.cached.len(), "admitted entry");
        }

        match victim {
            Some(entry) => {
                self.notify_evicted(entry);
                true
            },
            None => false,
        }
    }

    /// Unlinks the least recently used admitted entry from the list and index.
    fn take_lru(&mut self) -> Option<Entry<K, V>> {
        let entry = self.cached.pop_back()?;
        self.index.remove(&entry.key);
        debug!(
            cached_len = self.cached.len(),
            capacity = self.capacity,
            "evicted lru-k entry"
        );
        Some(entry)
    }

    fn notify_evicted(&mut self, entry: Entry<K, V>) {
        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(entry.key, entry.value);
        }
    }

    /// Validates internal invariants (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: fmt::Debug,
    {
        use crate::error::InvariantError;

        if self.cached.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "cached len {} exceeds capacity {}",
                self.cached.len(),
                self.capacity
            )));
        }

        let tracked = self.cached.len() + self.history.len();
        if self.index.len() != tracked {
            return Err(InvariantError::new(format!(
                "index len {} != cached {} + history {}",
                self.index.len(),
                self.cached.len(),
                self.history.len()
            )));
        }

        for (key, pos) in &self.index {
            let entry = self.list(pos.membership).get(pos.id).ok_or_else(|| {
                InvariantError::new(format!("{:?}: stale {:?} position", key, pos.membership))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "{:?}: position points at {:?}",
                    key, entry.key
                )));
            }
            let admitted = entry.history.len() >= self.k;
            match pos.membership {
                Membership::History if admitted => {
                    return Err(InvariantError::new(format!(
                        "{:?}: {} accesses but still in history",
                        key,
                        entry.history.len()
                    )));
                },
                Membership::Cached if !admitted => {
                    return Err(InvariantError::new(format!(
                        "{:?}: cached with only {} accesses",
                        key,
                        entry.history.len()
                    )));
                },
                _ => {},
            }
        }

        for (name, list) in [("history", &self.history), ("cached", &self.cached)] {
            list.debug_validate_invariants();
            let walked = list.iter().count();
            if walked != list.len() {
                return Err(InvariantError::new(format!(
                    "{} list walk found {} nodes, len is {}",
                    name,
                    walked,
                    list.len()
                )));
            }
        }

        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn put(&mut self, key: K, value: V) -> bool {
        if let Some(&pos) = self.index.get(&key) {
            if let Some(entry) = self.list_mut(pos.membership).get_mut(pos.id) {
                entry.value = value;
            }
            return self.record_access_at(pos);
        }

        let id = self.history.push_front(Entry {
            key: key.clone(),
            value,
            history: FixedHistory::new(self.k),
        });
        let pos = Position {
            membership: Membership::History,
            id,
        };
        self.index.insert(key, pos);
        self.record_access_at(pos)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.record_access(key)?;
        let pos = self.index.get(key)?;
        match pos.membership {
            Membership::Cached => self.cached.get(pos.id).map(|entry| &entry.value),
            Membership::History => None,
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let pos = self.index.get(key)?;
        match pos.membership {
            Membership::Cached => self.cached.get(pos.id).map(|entry| &entry.value),
            Membership::History => None,
        }
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.membership(key) == Some(Membership::Cached)
    }

    #[inline]
    fn len(&self) -> usize {
        self.cached.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        let cached = self.cached.len();
        let history = self.history.len();

        if let Some(on_evict) = self.on_evict.as_mut() {
            while let Some(entry) = self.cached.pop_back() {
                self.index.remove(&entry.key);
                on_evict(entry.key, entry.value);
            }
        }
        self.cached.clear();
        self.history.clear();
        self.index.clear();
        self.tick = 0;
        debug!(cached, history, "cleared lru-k cache");
    }
}

impl<K, V> MutableCache<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.index.remove(key)?;
        self.list_mut(pos.membership)
            .remove(pos.id)
            .map(|entry| entry.value)
    }
}

impl<K, V> LrukCacheTrait<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn k_value(&self) -> usize {
        self.k
    }

    fn access_history(&self, key: &K) -> Option<Vec<u64>> {
        self.entry(key).map(|entry| entry.history.to_vec_mru())
    }

    fn access_count(&self, key: &K) -> Option<usize> {
        self.entry(key).map(|entry| entry.history.len())
    }

    fn touch(&mut self, key: &K) -> bool {
        self.record_access(key).is_some()
    }

    #[inline]
    fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl<K, V> fmt::Debug for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukCache")
            .field("k", &self.k)
            .field("capacity", &self.capacity)
            .field("len", &self.cached.len())
            .field("history_len", &self.history.len())
            .field("has_on_evict", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU-K cache: one [`LrukCache`] behind a `parking_lot::RwLock`.
///
/// Cloning the handle shares the same cache. Values are returned by clone, so
/// store `Arc<T>` when values are large.
#[derive(Clone)]
pub struct ConcurrentLrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<RwLock<LrukCache<K, V>>>,
}

impl<K, V> fmt::Debug for ConcurrentLrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLrukCache")
            .field("k", &cache.k)
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> From<LrukCache<K, V>> for ConcurrentLrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn from(cache: LrukCache<K, V>) -> Self {
        ConcurrentLrukCache {
            inner: Arc::new(RwLock::new(cache)),
        }
    }
}

impl<K, V> ConcurrentLrukCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Creates an empty thread-safe cache.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if `capacity` or `k` is zero.
    ///
    /// ```
    /// use lrukit::policy::lru_k::ConcurrentLrukCache;
    ///
    /// let cache: ConcurrentLrukCache<u32, String> = ConcurrentLrukCache::try_new(64, 2).unwrap();
    /// assert_eq!(cache.capacity(), 64);
    /// assert!(cache.is_empty());
    /// ```
    pub fn try_new(capacity: usize, k: usize) -> Result<Self, ConfigError> {
        LrukCache::try_new(capacity, k).map(Self::from)
    }

    /// Creates an empty thread-safe cache with an eviction callback.
    ///
    /// The callback runs under the write lock and must not use this cache.
    pub fn try_with_evict<F>(capacity: usize, k: usize, on_evict: F) -> Result<Self, ConfigError>
    where
        F: FnMut(K, V) + Send + Sync + 'static,
    {
        LrukCache::try_with_evict(capacity, k, on_evict).map(Self::from)
    }

    /// Records an access and returns the value if the key is admitted.
    ///
    /// Takes the write lock.
    ///
    /// ```
    /// use lrukit::policy::lru_k::ConcurrentLrukCache;
    ///
    /// let cache = ConcurrentLrukCache::try_new(8, 2).unwrap();
    /// cache.put(1, "one".to_string());
    /// assert_eq!(cache.get(&1), Some("one".to_string())); // second access admits
    /// assert_eq!(cache.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Inserts or updates `key`; `true` if an eviction happened.
    pub fn put(&self, key: K, value: V) -> bool {
        let mut cache = self.inner.write();
        cache.put(key, value)
    }

    /// Removes any tracked key without invoking the eviction callback.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    /// Records an access without reading the value.
    pub fn touch(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.touch(key)
    }

    /// Returns the admitted value without recording an access. Read lock only.
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    /// `true` if `key` is admitted. Read lock only.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        cache.len()
    }

    /// `true` if no entry is admitted.
    pub fn is_empty(&self) -> bool {
        let cache = self.inner.read();
        cache.is_empty()
    }

    /// Maximum number of admitted entries.
    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        cache.capacity()
    }

    /// Accesses required before a key is admitted.
    pub fn k_value(&self) -> usize {
        let cache = self.inner.read();
        cache.k_value()
    }

    /// Ticks held for any tracked key, at most K.
    pub fn access_count(&self, key: &K) -> Option<usize> {
        let cache = self.inner.read();
        cache.access_count(key)
    }

    /// Evicts every admitted entry through the callback, then drops all state.
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    /// See [`LrukCache::resize`].
    pub fn resize(&self, capacity: usize) -> Result<usize, ConfigError> {
        let mut cache = self.inner.write();
        cache.resize(capacity)
    }

    /// Admitted keys, most recently used first.
    pub fn keys(&self) -> Vec<K> {
        let cache = self.inner.read();
        cache.keys()
    }

    /// Admitted values, most recently used first.
    pub fn values(&self) -> Vec<V> {
        let cache = self.inner.read();
        cache.values()
    }

    /// Admitted key/value pairs, most recently used first.
    pub fn items(&self) -> Vec<(K, V)> {
        let cache = self.inner.read();
        cache.items()
    }

    /// Snapshot of the counts, taken under one read lock.
    pub fn stats(&self) -> LrukStats {
        let cache = self.inner.read();
        cache.stats()
    }
}
