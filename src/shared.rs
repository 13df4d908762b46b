//! Thread-safe LRU cache with one-time capacity configuration.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────┐
//!   │                   SharedCache<K, V>                       │
//!   │                                                           │
//!   │   config: Mutex<ConfigState>     store: Mutex<LruStore>   │
//!   │   ┌─────────────────────┐        ┌──────────────────────┐ │
//!   │   │ configured: bool    │ ─────► │ index + recency list │ │
//!   │   └─────────────────────┘        └──────────────────────┘ │
//!   │     configure / reset              add / get / peek ...   │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! - `add` and `get` hold the store mutex for the whole operation (lookup,
//!   promotion, eviction, insertion). There is no reader/writer split: `get`
//!   reorders the recency list, so concurrent reads serialize too.
//! - `configure` and `reset` hold the config mutex for their whole duration
//!   and take the store mutex inside it. Data operations never take the
//!   config mutex, so the order is always config → store.
//! - Guards are RAII, so every exit path releases them.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::shared::SharedCache;
//!
//! let cache: SharedCache<u32, String> = SharedCache::new();
//! cache.configure(2).unwrap();
//!
//! cache.add(1, "A".to_string()).unwrap();
//! cache.add(2, "B".to_string()).unwrap();
//! assert_eq!(cache.get(&1).as_deref(), Some("A")); // 1 is now MRU
//!
//! cache.add(3, "C".to_string()).unwrap(); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! ```

use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{CacheError, ConfigError, InvalidArgument};
use crate::key::CacheKey;
use crate::stats::CacheStatsSnapshot;
use crate::store::lru::LruStore;
use crate::traits::ConcurrentCache;

#[derive(Debug, Default)]
struct ConfigState {
    configured: bool,
}

/// Bounded LRU cache safe to share between threads (e.g. behind an `Arc`).
pub struct SharedCache<K, V> {
    config: Mutex<ConfigState>,
    store: Mutex<LruStore<K, V>>,
}

impl<K, V> SharedCache<K, V>
where
    K: CacheKey + Clone,
{
    /// Creates an unconfigured cache with [`DEFAULT_CAPACITY`](crate::config::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self {
            config: Mutex::new(ConfigState::default()),
            store: Mutex::new(LruStore::with_config(CacheConfig::default())),
        }
    }

    /// Creates a cache whose capacity is already set.
    ///
    /// The result counts as configured: `configure` fails until `reset`.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config: Mutex::new(ConfigState { configured: true }),
            store: Mutex::new(LruStore::with_config(config)),
        }
    }

    /// Sets the capacity once and marks the cache configured.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidCapacity`] if `capacity < 1`.
    /// - [`ConfigError::AlreadyConfigured`] if configured since creation or
    ///   the last [`reset`](Self::reset).
    ///
    /// Shrinking below the current entry count evicts from the LRU end.
    pub fn configure<C>(&self, capacity: C) -> Result<(), ConfigError>
    where
        C: TryInto<usize> + fmt::Display + Copy,
    {
        let config = CacheConfig::new(capacity)?;

        let mut state = self.config.lock();
        if state.configured {
            return Err(ConfigError::AlreadyConfigured);
        }

        self.store.lock().set_capacity(config.non_zero_capacity());
        state.configured = true;

        debug!(capacity = config.capacity(), "cache configured");
        Ok(())
    }

    /// Empties the cache and clears the configured flag.
    ///
    /// Capacity keeps its last value; it is not restored to the default.
    /// Handles held by other callers keep pointing at this same, now empty,
    /// cache.
    pub fn reset(&self) {
        let mut state = self.config.lock();
        let mut store = self.store.lock();
        store.clear();
        state.configured = false;

        debug!(capacity = store.capacity(), "cache reset");
    }

    pub fn is_configured(&self) -> bool {
        self.config.lock().configured
    }

    /// Inserts or updates `key`, evicting the LRU entry if a new key does not fit.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidArgument`] if `key` is null. The cache is left
    /// untouched in that case.
    pub fn add(&self, key: K, value: V) -> Result<(), CacheError> {
        if key.is_null() {
            return Err(InvalidArgument::null_key().into());
        }

        self.store.lock().insert(key, value);
        Ok(())
    }

    /// Returns a clone of the value for `key` and marks it most recently used.
    ///
    /// `None` is the not-found result; it is never an error.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.store.lock().get(key).cloned()
    }

    /// Like [`get`](Self::get) but leaves recency untouched.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.store.lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.store.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_mru(&self) -> Vec<K> {
        self.store.lock().keys_mru()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.store.lock().stats()
    }

    /// Runs `f` against the store while holding the data lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&LruStore<K, V>) -> R) -> R {
        let store = self.store.lock();
        f(&*store)
    }
}

impl<K, V> Default for SharedCache<K, V>
where
    K: CacheKey + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SharedCache<K, V>
where
    K: CacheKey + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured = self.config.lock().configured;
        let store = self.store.lock();
        f.debug_struct("SharedCache")
            .field("len", &store.len())
            .field("capacity", &store.capacity())
            .field("configured", &configured)
            .finish()
    }
}

impl<K, V> ConcurrentCache<K, V> for SharedCache<K, V>
where
    K: CacheKey + Clone + Send,
    V: Clone + Send,
{
    fn add(&self, key: K, value: V) -> Result<(), CacheError> {
        SharedCache::add(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        SharedCache::get(self, key)
    }

    fn len(&self) -> usize {
        SharedCache::len(self)
    }

    fn capacity(&self) -> usize {
        SharedCache::capacity(self)
    }
}
