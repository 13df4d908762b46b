//! # Cache Traits
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │        ConcurrentCache<K, V>            │
//!   │                                         │
//!   │  add(&, K, V) → Result<(), CacheError>  │
//!   │  get(&, &K) → Option<V>                 │
//!   │  len(&) → usize                         │
//!   │  is_empty(&) → bool                     │
//!   │  capacity(&) → usize                    │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! All methods take `&self`: implementors synchronize internally, so one
//! instance can be shared by reference or `Arc` across threads. `get` promotes
//! the entry it returns, which makes it a mutating operation even though the
//! receiver is shared.
//!
//! | Trait             | Implemented by                              |
//! |-------------------|---------------------------------------------|
//! | `ConcurrentCache` | [`SharedCache`](crate::shared::SharedCache) |

use crate::error::CacheError;

/// Thread-safe add/get contract of a bounded cache.
///
/// # Example
///
/// ```
/// use lrukit::shared::SharedCache;
/// use lrukit::traits::ConcurrentCache;
///
/// fn warm(cache: &dyn ConcurrentCache<u64, String>) {
///     for id in 0..3 {
///         cache.add(id, format!("page-{id}")).unwrap();
///     }
/// }
///
/// let cache: SharedCache<u64, String> = SharedCache::new();
/// warm(&cache);
/// assert_eq!(cache.len(), 3);
/// ```
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Inserts or updates `key`. Fails only on an unusable key.
    fn add(&self, key: K, value: V) -> Result<(), CacheError>;

    /// Returns the value for `key`, marking it most recently used.
    fn get(&self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}
