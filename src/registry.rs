//! One shared cache per key/value type pair.
//!
//! [`CacheRegistry`] hands out `Arc<SharedCache<K, V>>` handles keyed by
//! `TypeId::of::<(K, V)>()`. The first request for a type pair creates its
//! cache with the default capacity; every later request, from any thread,
//! gets the same instance. Type pairs never share capacity, configuration
//! state or contents.
//!
//! The registry is an ordinary value. Callers that want one process-wide
//! registry put it in a static themselves:
//!
//! ```
//! use std::sync::OnceLock;
//! use lrukit::registry::CacheRegistry;
//!
//! fn caches() -> &'static CacheRegistry {
//!     static REGISTRY: OnceLock<CacheRegistry> = OnceLock::new();
//!     REGISTRY.get_or_init(CacheRegistry::new)
//! }
//!
//! caches().configure::<u32, String>(3).unwrap();
//! let cache = caches().instance::<u32, String>();
//! cache.add(1, "Test1".to_string()).unwrap();
//!
//! assert!(std::sync::Arc::ptr_eq(&cache, &caches().instance::<u32, String>()));
//! assert_eq!(caches().instance::<u32, u32>().capacity(), 100);
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::ConfigError;
use crate::key::CacheKey;
use crate::shared::SharedCache;

type ErasedCache = Arc<dyn Any + Send + Sync>;

/// Lazily-populated map from type pair to its shared cache.
#[derive(Default)]
pub struct CacheRegistry {
    caches: RwLock<FxHashMap<TypeId, ErasedCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cache for `(K, V)`, creating it on first access.
    ///
    /// Concurrent first calls race on the write lock; exactly one of them
    /// inserts and all of them return that instance.
    pub fn instance<K, V>(&self) -> Arc<SharedCache<K, V>>
    where
        K: CacheKey + Clone + Send + 'static,
        V: Send + 'static,
    {
        let type_pair = TypeId::of::<(K, V)>();

        if let Some(erased) = self.caches.read().get(&type_pair) {
            return downcast(Arc::clone(erased));
        }

        let erased = Arc::clone(self.caches.write().entry(type_pair).or_insert_with(|| {
            debug!(
                key = type_name::<K>(),
                value = type_name::<V>(),
                "creating shared cache"
            );
            Arc::new(SharedCache::<K, V>::new()) as ErasedCache
        }));
        downcast(erased)
    }

    /// Configures the `(K, V)` cache. See [`SharedCache::configure`].
    pub fn configure<K, V>(
        &self,
        capacity: impl TryInto<usize> + fmt::Display + Copy,
    ) -> Result<(), ConfigError>
    where
        K: CacheKey + Clone + Send + 'static,
        V: Send + 'static,
    {
        self.instance::<K, V>().configure(capacity)
    }

    /// Resets the `(K, V)` cache. See [`SharedCache::reset`].
    pub fn reset<K, V>(&self)
    where
        K: CacheKey + Clone + Send + 'static,
        V: Send + 'static,
    {
        self.instance::<K, V>().reset()
    }

    /// Returns `true` once the `(K, V)` cache has been created.
    pub fn contains<K: 'static, V: 'static>(&self) -> bool {
        self.caches.read().contains_key(&TypeId::of::<(K, V)>())
    }

    /// Number of type pairs with a cache.
    pub fn len(&self) -> usize {
        self.caches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.read().is_empty()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("type_pairs", &self.len())
            .finish()
    }
}

fn downcast<K, V>(erased: ErasedCache) -> Arc<SharedCache<K, V>>
where
    K: Send + 'static,
    V: Send + 'static,
{
    match erased.downcast::<SharedCache<K, V>>() {
        Ok(cache) => cache,
        // entries are only ever inserted under the TypeId of their own (K, V)
        Err(_) => unreachable!(
            "registry entry for ({}, {}) holds a different type",
            type_name::<K>(),
            type_name::<V>()
        ),
    }
}
